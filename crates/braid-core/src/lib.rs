//! Braid group word model used by the WalnutDSA workspace.
//!
//! This crate provides the exact, non-randomized algebra the signature scheme is
//! built on:
//! - Permutations of strand positions and their composition.
//! - Braid words over signed Artin generators, with concatenation, inversion,
//!   free reduction, and projection onto the symmetric group.
//! - Canonical words for the Garside fundamental braid.
//!
//! Words are plain values; no operation mutates a word in place.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod fundamental;
mod permutation;
mod word;

pub use crate::error::BraidError;
pub use crate::fundamental::fundamental_braid;
pub use crate::permutation::Permutation;
pub use crate::word::{
    free_reduce, inverse_word, minimal_degree, project_permutation, BraidWord, Generator,
};
