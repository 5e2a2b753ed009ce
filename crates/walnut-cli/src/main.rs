//! Command-line interface for `walnut`.

#![forbid(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing_subscriber::EnvFilter;
use walnut_gen::{
    EncoderBasis, KeyPair, Partition, PublicKey, PublicParams, Signature, Signer, SignerConfig,
};
use walnut_runtime::Verifier;

/// WalnutDSA CLI.
#[derive(Parser)]
#[command(
    name = "walnut",
    version,
    author,
    about = "WalnutDSA braid group signatures over GF(2^k)"
)]
struct Cli {
    /// Log at debug level (otherwise `RUST_LOG`, default `warn`).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a public parameter file (reference parameters unless overridden).
    Params {
        /// Output path for the serialized parameters.
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
        /// Braid group degree N.
        #[arg(long)]
        degree: Option<usize>,
        /// Field exponent k of GF(2^k).
        #[arg(long)]
        field_exponent: Option<u32>,
        /// Comma-separated strand values, one per strand.
        #[arg(long, value_delimiter = ',')]
        t_values: Option<Vec<u32>>,
        /// Comma-separated rewriter partition of N-1 (defaults to blocks of three).
        #[arg(long, value_delimiter = ',')]
        partition: Option<Vec<usize>>,
        /// Generator squared inside cloaking elements.
        #[arg(long)]
        cloak_seed: Option<usize>,
    },
    /// Generate a key pair.
    Keygen {
        /// Parameter file (reference parameters if omitted).
        #[arg(long, value_name = "FILE")]
        params: Option<PathBuf>,
        /// Output path for the full key pair.
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
        /// Output path for the public key alone.
        #[arg(long, value_name = "FILE")]
        public_out: PathBuf,
        /// Optional RNG seed for reproducible generation.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Sign a message file.
    Sign {
        /// Parameter file (reference parameters if omitted).
        #[arg(long, value_name = "FILE")]
        params: Option<PathBuf>,
        /// Key pair produced by `keygen`.
        #[arg(long, value_name = "FILE")]
        key: PathBuf,
        /// Message to sign.
        #[arg(long, value_name = "FILE")]
        message: PathBuf,
        /// Output path for the signature.
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
        /// Output path for the encoder basis the verifier needs.
        #[arg(long, value_name = "FILE")]
        basis_out: PathBuf,
        /// Skip the stochastic rewriting of the signature word.
        #[arg(long, default_value_t = false)]
        no_rewrite: bool,
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Verify a signature against a message file.
    Verify {
        /// Parameter file (reference parameters if omitted).
        #[arg(long, value_name = "FILE")]
        params: Option<PathBuf>,
        /// Public key produced by `keygen`.
        #[arg(long, value_name = "FILE")]
        public: PathBuf,
        /// Signed message.
        #[arg(long, value_name = "FILE")]
        message: PathBuf,
        /// Signature produced by `sign`.
        #[arg(long, value_name = "FILE")]
        signature: PathBuf,
        /// Encoder basis produced by `sign`.
        #[arg(long, value_name = "FILE")]
        basis: PathBuf,
    },
    /// Run a local demo: generate keys, sign a message, verify it and a tampered copy.
    Demo {
        /// Message to sign.
        #[arg(long, default_value = "test")]
        message: String,
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Params {
            out,
            degree,
            field_exponent,
            t_values,
            partition,
            cloak_seed,
        } => cmd_params(&out, degree, field_exponent, t_values, partition, cloak_seed),
        Commands::Keygen {
            params,
            out,
            public_out,
            seed,
        } => cmd_keygen(params.as_deref(), &out, &public_out, seed),
        Commands::Sign {
            params,
            key,
            message,
            out,
            basis_out,
            no_rewrite,
            seed,
        } => cmd_sign(
            params.as_deref(),
            &key,
            &message,
            &out,
            &basis_out,
            no_rewrite,
            seed,
        ),
        Commands::Verify {
            params,
            public,
            message,
            signature,
            basis,
        } => cmd_verify(params.as_deref(), &public, &message, &signature, &basis),
        Commands::Demo { message, seed } => cmd_demo(message.as_bytes(), seed),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_params(
    out: &Path,
    degree: Option<usize>,
    field_exponent: Option<u32>,
    t_values: Option<Vec<u32>>,
    partition: Option<Vec<usize>>,
    cloak_seed: Option<usize>,
) -> Result<()> {
    let mut params = PublicParams::reference();
    if let Some(degree) = degree {
        params.degree = degree;
        if partition.is_none() {
            params.partition = Partition::for_degree(degree)
                .context("derive default partition")?
                .parts()
                .to_vec();
        }
    }
    if let Some(k) = field_exponent {
        params.field_exponent = k;
    }
    if let Some(values) = t_values {
        params.t_values = values;
    }
    if let Some(parts) = partition {
        params.partition = parts;
    }
    if let Some(seed) = cloak_seed {
        params.cloak_seed_generator = seed;
    }
    params.validate().context("validate parameters")?;
    let bytes = params.to_bytes().context("serialize parameters")?;
    fs::write(out, bytes).with_context(|| format!("write {}", out.display()))?;
    Ok(())
}

fn cmd_keygen(
    params_path: Option<&Path>,
    out: &Path,
    public_out: &Path,
    seed: Option<u64>,
) -> Result<()> {
    let params = load_params(params_path)?;
    let mut signer = Signer::new(seeded_rng(seed), params).context("create signer")?;
    let pair = signer.generate_keypair().context("generate key pair")?;
    let bytes = pair.to_bytes().context("serialize key pair")?;
    fs::write(out, bytes).with_context(|| format!("write {}", out.display()))?;
    let bytes = pair.public.to_bytes().context("serialize public key")?;
    fs::write(public_out, bytes).with_context(|| format!("write {}", public_out.display()))?;
    println!("private w  : {}", pair.private.w);
    println!("private w' : {}", pair.private.w_prime);
    Ok(())
}

fn cmd_sign(
    params_path: Option<&Path>,
    key_path: &Path,
    message_path: &Path,
    out: &Path,
    basis_out: &Path,
    no_rewrite: bool,
    seed: Option<u64>,
) -> Result<()> {
    let params = load_params(params_path)?;
    let bytes = fs::read(key_path).with_context(|| format!("read {}", key_path.display()))?;
    let pair = KeyPair::from_bytes(&bytes).context("deserialize key pair")?;
    let message =
        fs::read(message_path).with_context(|| format!("read {}", message_path.display()))?;

    let config = SignerConfig {
        rewrite: !no_rewrite,
        ..SignerConfig::default()
    };
    let mut signer =
        Signer::with_config(seeded_rng(seed), params, config).context("create signer")?;
    let (signature, basis) = signer
        .sign(&pair.private, &pair.public, &message)
        .context("sign message")?;

    let bytes = signature.to_bytes().context("serialize signature")?;
    fs::write(out, bytes).with_context(|| format!("write {}", out.display()))?;
    let bytes = basis.to_bytes().context("serialize basis")?;
    fs::write(basis_out, bytes).with_context(|| format!("write {}", basis_out.display()))?;
    println!("digest: {}", hex::encode(signature.digest().as_bytes()));
    println!("signature length: {}", signature.word().len());
    Ok(())
}

fn cmd_verify(
    params_path: Option<&Path>,
    public_path: &Path,
    message_path: &Path,
    signature_path: &Path,
    basis_path: &Path,
) -> Result<()> {
    let params = load_params(params_path)?;
    let degree = params.degree;
    let verifier = Verifier::new(params).context("create verifier")?;

    let bytes =
        fs::read(public_path).with_context(|| format!("read {}", public_path.display()))?;
    let public = PublicKey::from_bytes(&bytes).context("deserialize public key")?;
    let bytes =
        fs::read(signature_path).with_context(|| format!("read {}", signature_path.display()))?;
    let signature = Signature::from_bytes(&bytes, degree).context("decode signature")?;
    let bytes = fs::read(basis_path).with_context(|| format!("read {}", basis_path.display()))?;
    let basis = EncoderBasis::from_bytes(&bytes).context("deserialize basis")?;
    let message =
        fs::read(message_path).with_context(|| format!("read {}", message_path.display()))?;

    if !verifier
        .verify_message(&public, &message, &signature, &basis)
        .context("verify signature")?
    {
        bail!("signature rejected");
    }
    println!("signature valid");
    Ok(())
}

fn cmd_demo(message: &[u8], seed: Option<u64>) -> Result<()> {
    let mut rng = seeded_rng(seed);
    let params = PublicParams::reference();
    let mut signer = Signer::new(ChaCha20Rng::from_seed(derive_seed(&mut rng)), params.clone())
        .context("create signer")?;
    let pair = signer.generate_keypair().context("generate key pair")?;
    let (signature, basis) = signer
        .sign(&pair.private, &pair.public, message)
        .context("sign message")?;

    let verifier = Verifier::new(params).context("create verifier")?;
    let valid = verifier
        .verify_message(&pair.public, message, &signature, &basis)
        .context("verify signature")?;
    let mut tampered = message.to_vec();
    match tampered.first_mut() {
        Some(byte) => *byte ^= 0x01,
        None => tampered.push(0x01),
    }
    let tampered_valid = verifier
        .verify_message(&pair.public, &tampered, &signature, &basis)
        .context("verify tampered message")?;

    println!("private w: {}", pair.private.w);
    println!("private w': {}", pair.private.w_prime);
    println!("digest: {}", hex::encode(signature.digest().as_bytes()));
    println!("basis: {:?}", basis.indices());
    println!("signature length: {}", signature.word().len());
    println!("verify(message): {valid}");
    println!("verify(tampered): {tampered_valid}");
    if !valid || tampered_valid {
        bail!("demo verification failed");
    }
    Ok(())
}

fn load_params(path: Option<&Path>) -> Result<PublicParams> {
    let Some(path) = path else {
        return Ok(PublicParams::reference());
    };
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    PublicParams::from_bytes(&bytes).context("deserialize parameters")
}

fn seeded_rng(seed: Option<u64>) -> impl RngCore + CryptoRng {
    match seed {
        Some(value) => {
            let mut seed_bytes = [0u8; 32];
            seed_bytes[..8].copy_from_slice(&value.to_le_bytes());
            ChaCha20Rng::from_seed(seed_bytes)
        }
        None => {
            let mut seed_bytes = [0u8; 32];
            rand::rngs::OsRng.fill_bytes(&mut seed_bytes);
            ChaCha20Rng::from_seed(seed_bytes)
        }
    }
}

fn derive_seed(rng: &mut impl RngCore) -> [u8; 32] {
    let mut seed_bytes = [0u8; 32];
    rng.fill_bytes(&mut seed_bytes);
    seed_bytes
}
