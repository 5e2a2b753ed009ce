//! Generates a key pair for the reference parameters, signs a message, and verifies it.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use walnut_gen::{PublicParams, Signer, WalnutError};
use walnut_runtime::Verifier;

fn main() -> Result<(), WalnutError> {
    let params = PublicParams::reference();
    let mut signer = Signer::new(ChaCha20Rng::from_seed([7u8; 32]), params.clone())?;
    let pair = signer.generate_keypair()?;
    println!("private w  = {}", pair.private.w);
    println!("private w' = {}", pair.private.w_prime);

    let (signature, basis) = signer.sign(&pair.private, &pair.public, b"test")?;
    println!("digest     = {}", signature.digest());
    println!("basis      = {:?}", basis.indices());
    println!("signature  = {} generators", signature.word().len());

    let verifier = Verifier::new(params)?;
    println!(
        "verify(\"test\") = {}",
        verifier.verify_message(&pair.public, b"test", &signature, &basis)?
    );
    println!(
        "verify(\"tesT\") = {}",
        verifier.verify_message(&pair.public, b"tesT", &signature, &basis)?
    );
    Ok(())
}
