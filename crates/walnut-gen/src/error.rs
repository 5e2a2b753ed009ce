//! Error type for key generation, signing, and verification.

use braid_core::BraidError;
use thiserror::Error;

use crate::burau::BurauError;
use crate::field::FieldError;

/// Errors surfaced by the signature scheme.
#[derive(Debug, Error)]
pub enum WalnutError {
    /// Invalid braid word or degree.
    #[error(transparent)]
    Braid(#[from] BraidError),

    /// Finite field failure, including division by zero.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// Exact Burau evaluation failure.
    #[error(transparent)]
    Burau(#[from] BurauError),

    /// Rewriter partition parts are below 3 or do not sum to `degree - 1`.
    #[error("invalid partition {parts:?}: parts must be at least 3 and sum to {expected_sum}")]
    InvalidPartition {
        /// Rejected parts.
        parts: Vec<usize>,
        /// Required sum, `degree - 1`.
        expected_sum: usize,
    },

    /// The evaluation context lacks two interior strands valued `1`.
    #[error("evaluation context has fewer than two interior t-values equal to 1")]
    NoTOnesAvailable,

    /// Cloaking element search hit its retry bound.
    #[error("cloak search exhausted after {attempts} attempts")]
    CloakSearchExhausted {
        /// Number of candidate words drawn.
        attempts: usize,
    },

    /// A decoded signature failed validation.
    #[error("malformed signature: {reason}")]
    MalformedSignature {
        /// Description of the defect.
        reason: String,
    },

    /// Public parameters or key material are inconsistent.
    #[error("invalid parameters: {reason}")]
    InvalidParams {
        /// Description of the defect.
        reason: String,
    },

    /// `bincode` encoding or decoding failure.
    #[error("serialization failed: {0}")]
    Serialization(#[from] bincode::Error),
}

impl WalnutError {
    pub(crate) fn params(reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedSignature {
            reason: reason.into(),
        }
    }
}
