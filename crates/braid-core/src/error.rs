//! Error type shared by the braid word model.

use thiserror::Error;

/// Errors raised while building or transforming braid words.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BraidError {
    /// A generator index does not exist in the braid group of the declared degree.
    #[error("generator {generator} is out of range for braid group of degree {degree}")]
    InvalidDegree {
        /// Offending signed generator.
        generator: i32,
        /// Declared degree of the word.
        degree: usize,
    },

    /// The degree itself is not a valid braid group degree.
    #[error("braid degree must be at least 1, got {degree}")]
    DegreeTooSmall {
        /// Rejected degree.
        degree: usize,
    },

    /// A word contained the zero sentinel, which names no generator.
    #[error("zero generator at position {position}")]
    ZeroGenerator {
        /// Index of the zero entry within the word.
        position: usize,
    },

    /// The pivot of a fundamental braid is outside `[1, degree]`.
    #[error("pivot {pivot} is out of range for fundamental braid of degree {degree}")]
    InvalidPivot {
        /// Requested pivot generator.
        pivot: usize,
        /// Braid group degree.
        degree: usize,
    },

    /// An image array is not a bijection on `{0, …, n-1}`.
    #[error("image array is not a permutation")]
    InvalidPermutation,
}
