//! Garside fundamental braid words.

use crate::error::BraidError;
use crate::word::{BraidWord, Generator};

/// Returns a positive word for the fundamental braid `Δ` of `B_degree`, built around
/// generator `pivot`.
///
/// The word is the concatenation of two triangular blocks:
/// `(b_p)(b_{p+1} b_p)…(b_{n-1} … b_p)` followed by
/// `(b_{p-1} … b_{n-1})(b_{p-2} … b_{n-1})…(b_1 … b_{n-1})`.
/// Pivot `1` leaves the second block empty and pivot `degree` the first one; both
/// still spell `Δ`. Every pivot yields a word of length `n(n-1)/2` projecting to the
/// strand reversal.
pub fn fundamental_braid(degree: usize, pivot: usize) -> Result<BraidWord, BraidError> {
    if degree < 1 {
        return Err(BraidError::DegreeTooSmall { degree });
    }
    if pivot < 1 || pivot > degree {
        return Err(BraidError::InvalidPivot { pivot, degree });
    }

    let mut generators: Vec<Generator> = Vec::with_capacity(degree * (degree - 1) / 2);

    for top in pivot..degree {
        generators.extend((pivot..=top).rev().map(|g| g as Generator));
    }
    for start in (1..pivot).rev() {
        generators.extend((start..degree).map(|g| g as Generator));
    }

    BraidWord::new(degree, generators)
}
