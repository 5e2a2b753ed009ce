//! WalnutDSA key generation and signing.
//!
//! This crate carries the algebra that turns braid words into matrices over
//! GF(2^k) and everything the signer needs on top of it: E-Multiplication,
//! cloaking elements, the digest encoder, and the stochastic rewriter. The exact
//! colored Burau folds over `ℚ` are provided alongside for cross-checking.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod burau;
mod cloak;
mod emult;
mod encoder;
mod error;
mod field;
mod keys;
mod matrix;
mod params;
mod rewrite;
mod signature;
mod signer;

pub use burau::{
    generator_matrix, generator_row, left_fold, right_fold, BurauError, Coefficient,
    GeneratorRow, Rational, RationalMatrix,
};
pub use cloak::{find_t_ones, generate_cloak, CloakConfig};
pub use emult::{
    e_multiply, e_multiply_dense, generator_field_matrix, EvaluationContext,
    RepresentationState,
};
pub use encoder::{
    encode_digest, encode_message, pure_braid_generator, pure_braid_generators, Digest,
    EncoderBasis, BASIS_SIZE,
};
pub use error::WalnutError;
pub use field::{FieldElement, FieldError, GaloisField};
pub use keys::{KeyPair, PrivateKey, PublicKey};
pub use matrix::FieldMatrix;
pub use params::{PublicParams, SchemeId};
pub use rewrite::{
    apply_braid_relation, commute_far, Partition, RewriteConfig, StochasticRewriter, YSystem,
    CORRESPONDENCE_COUNT,
};
pub use signature::Signature;
pub use signer::{Signer, SignerConfig};
