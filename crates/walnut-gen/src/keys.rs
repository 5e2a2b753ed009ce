//! Key material.

use braid_core::BraidWord;
use serde::{Deserialize, Serialize};

use crate::emult::RepresentationState;
use crate::error::WalnutError;
use crate::params::PublicParams;

/// The two secret braid words `w` and `w′`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateKey {
    /// First secret word, `w`.
    pub w: BraidWord,
    /// Second secret word, `w′`.
    pub w_prime: BraidWord,
}

/// E-Multiplication images of the private words from the trivial state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    /// `P(w) = (I, id) ⋆ w`.
    pub pw: RepresentationState,
    /// `P(w′) = (I, id) ⋆ w′`.
    pub pw_prime: RepresentationState,
}

/// Matching private and public keys.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPair {
    /// Secret half.
    pub private: PrivateKey,
    /// Published half.
    pub public: PublicKey,
}

impl PrivateKey {
    /// Checks both words against the braid degree.
    pub fn validate(&self, params: &PublicParams) -> Result<(), WalnutError> {
        self.w.with_degree(params.degree)?;
        self.w_prime.with_degree(params.degree)?;
        Ok(())
    }

    /// Serializes the key with `bincode`.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserializes a key with `bincode`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}

impl PublicKey {
    /// Checks that both states are `N×N` over the parameter field.
    pub fn validate(&self, params: &PublicParams) -> Result<(), WalnutError> {
        let field = params.field()?;
        for (name, state) in [("P(w)", &self.pw), ("P(w')", &self.pw_prime)] {
            if state.matrix.size() != params.degree || state.permutation.len() != params.degree
            {
                return Err(WalnutError::params(format!(
                    "{name} does not have degree {}",
                    params.degree
                )));
            }
            if !state.matrix.is_over(&field) {
                return Err(WalnutError::params(format!(
                    "{name} has entries outside GF(2^{})",
                    params.field_exponent
                )));
            }
        }
        Ok(())
    }

    /// Serializes the key with `bincode`.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserializes a key with `bincode`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}

impl KeyPair {
    /// Serializes the pair with `bincode`.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserializes a pair with `bincode`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}
