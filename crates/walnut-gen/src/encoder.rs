//! Message hashing and the digest-to-pure-braid encoding.

use core::fmt;

use braid_core::{free_reduce, BraidWord, Generator};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};
use tracing::debug;

use crate::error::WalnutError;

/// Number of catalogue words a basis selects.
pub const BASIS_SIZE: usize = 4;

/// SHA-256 digest of a signed message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest(pub [u8; 32]);

impl Digest {
    /// Hashes `message`.
    pub fn of(message: &[u8]) -> Self {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&Sha256::digest(message));
        Self(bytes)
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// The 64 nibbles of the digest, high nibble of each byte first.
    pub fn nibbles(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().flat_map(|&byte| [byte >> 4, byte & 0x0f])
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Pure braid generator `k` of `B_degree`:
/// `b_{n-1} … b_k · b_k · b_{k+1}⁻¹ … b_{n-1}⁻¹`.
///
/// Panics unless `1 <= k < degree`.
pub fn pure_braid_generator(degree: usize, k: usize) -> Vec<Generator> {
    assert!(k >= 1 && k < degree, "pure generator {k} outside B_{degree}");
    let top = degree - 1;
    let mut word: Vec<Generator> = (k..=top).rev().map(|g| g as Generator).collect();
    word.push(k as Generator);
    word.extend((k + 1..=top).map(|g| -(g as Generator)));
    word
}

/// The catalogue of all `degree - 1` pure braid generators, indexed from `k = 1`.
pub fn pure_braid_generators(degree: usize) -> Vec<Vec<Generator>> {
    (1..degree).map(|k| pure_braid_generator(degree, k)).collect()
}

/// The four catalogue entries used to encode one message.
///
/// Signer and verifier must use the same basis; it travels with the signature.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncoderBasis {
    indices: [usize; BASIS_SIZE],
}

impl EncoderBasis {
    /// Builds a basis from catalogue indices `k ∈ [1, degree-1]`, all distinct.
    pub fn new(indices: [usize; BASIS_SIZE], degree: usize) -> Result<Self, WalnutError> {
        let basis = Self { indices };
        basis.validate(degree)?;
        Ok(basis)
    }

    /// Chooses four distinct catalogue entries uniformly at random.
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R, degree: usize) -> Result<Self, WalnutError> {
        let available = degree.saturating_sub(1);
        if available < BASIS_SIZE {
            return Err(WalnutError::params(format!(
                "degree {degree} offers {available} pure generators, need {BASIS_SIZE}"
            )));
        }
        let picked = rand::seq::index::sample(rng, available, BASIS_SIZE);
        let mut indices = [0usize; BASIS_SIZE];
        for (slot, index) in indices.iter_mut().zip(picked.iter()) {
            *slot = index + 1;
        }
        Ok(Self { indices })
    }

    /// Selected catalogue indices, in selector order.
    pub fn indices(&self) -> &[usize; BASIS_SIZE] {
        &self.indices
    }

    /// Checks that every index names a distinct generator of `B_degree`.
    pub fn validate(&self, degree: usize) -> Result<(), WalnutError> {
        for (i, &k) in self.indices.iter().enumerate() {
            if k < 1 || k >= degree {
                return Err(WalnutError::params(format!(
                    "basis index {k} outside [1, {}]",
                    degree.saturating_sub(1)
                )));
            }
            if self.indices[..i].contains(&k) {
                return Err(WalnutError::params(format!("basis index {k} repeated")));
            }
        }
        Ok(())
    }

    /// Serializes the basis with `bincode`.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserializes a basis with `bincode`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}

/// Encodes `digest` as a freely reduced pure braid of `B_degree`.
///
/// Every nibble appends `(nibble & 3) + 1` copies of basis word `nibble >> 2`.
pub fn encode_digest(
    digest: &Digest,
    degree: usize,
    basis: &EncoderBasis,
) -> Result<BraidWord, WalnutError> {
    basis.validate(degree)?;
    let words: Vec<Vec<Generator>> = basis
        .indices
        .iter()
        .map(|&k| pure_braid_generator(degree, k))
        .collect();

    let mut raw: Vec<Generator> = Vec::new();
    for nibble in digest.nibbles() {
        let word = &words[usize::from(nibble >> 2)];
        for _ in 0..=(nibble & 0x3) {
            raw.extend_from_slice(word);
        }
    }
    let reduced = free_reduce(&raw);
    debug!(raw = raw.len(), reduced = reduced.len(), "encoded digest");
    Ok(BraidWord::new(degree, reduced)?)
}

/// Hashes `message`, draws a fresh basis, and encodes the digest.
pub fn encode_message<R: RngCore + CryptoRng>(
    rng: &mut R,
    message: &[u8],
    degree: usize,
) -> Result<(Digest, BraidWord, EncoderBasis), WalnutError> {
    let digest = Digest::of(message);
    let basis = EncoderBasis::random(rng, degree)?;
    let word = encode_digest(&digest, degree, &basis)?;
    Ok((digest, word, basis))
}
