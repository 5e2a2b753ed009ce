//! Signatures and their wire encoding.

use braid_core::{BraidWord, Generator};
use serde::{Deserialize, Serialize};

use crate::encoder::Digest;
use crate::error::WalnutError;

/// A signature: the message digest and the signature braid word.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    digest: Digest,
    word: BraidWord,
}

#[derive(Serialize, Deserialize)]
struct WireSignature {
    digest: [u8; 32],
    word: Vec<Generator>,
}

impl Signature {
    /// Pairs a digest with its signature word.
    pub fn new(digest: Digest, word: BraidWord) -> Self {
        Self { digest, word }
    }

    /// Rebuilds a signature from wire fields, validating every entry against `degree`.
    pub fn from_parts(
        digest: [u8; 32],
        generators: Vec<Generator>,
        degree: usize,
    ) -> Result<Self, WalnutError> {
        for (position, &g) in generators.iter().enumerate() {
            if g == 0 {
                return Err(WalnutError::malformed(format!(
                    "zero generator at position {position}"
                )));
            }
            if g.unsigned_abs() as usize >= degree {
                return Err(WalnutError::malformed(format!(
                    "generator {g} at position {position} outside B_{degree}"
                )));
            }
        }
        Ok(Self {
            digest: Digest(digest),
            word: BraidWord::new(degree, generators)?,
        })
    }

    /// Digest of the signed message.
    pub fn digest(&self) -> &Digest {
        &self.digest
    }

    /// Signature braid word.
    pub fn word(&self) -> &BraidWord {
        &self.word
    }

    /// Encodes the digest and the signed generator sequence with `bincode`.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(&WireSignature {
            digest: self.digest.0,
            word: self.word.generators().to_vec(),
        })
    }

    /// Decodes a signature for `B_degree`, rejecting zero or out-of-range entries.
    pub fn from_bytes(bytes: &[u8], degree: usize) -> Result<Self, WalnutError> {
        let wire: WireSignature = bincode::deserialize(bytes)?;
        Self::from_parts(wire.digest, wire.word, degree)
    }
}
