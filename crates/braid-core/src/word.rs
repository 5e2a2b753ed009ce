//! Braid words over the Artin generators.

use core::fmt;
use core::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::BraidError;
use crate::permutation::Permutation;

/// Signed Artin generator: `i` is the crossing `b_i`, `-i` its inverse, `i ≥ 1`.
pub type Generator = i32;

/// Word in the braid group `B_degree`.
///
/// Values are immutable: every operation returns a new word. The degree is at
/// least one more than the largest generator index in the word and can be raised
/// explicitly with [`BraidWord::with_degree`]. Decoding goes through
/// [`BraidWord::new`], so zero entries and out-of-range generators are rejected.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WireWord", into = "WireWord")]
pub struct BraidWord {
    degree: usize,
    generators: Vec<Generator>,
}

#[derive(Serialize, Deserialize)]
struct WireWord {
    degree: usize,
    generators: Vec<Generator>,
}

impl TryFrom<WireWord> for BraidWord {
    type Error = BraidError;

    fn try_from(wire: WireWord) -> Result<Self, Self::Error> {
        Self::new(wire.degree, wire.generators)
    }
}

impl From<BraidWord> for WireWord {
    fn from(word: BraidWord) -> Self {
        Self {
            degree: word.degree,
            generators: word.generators,
        }
    }
}

impl BraidWord {
    /// Builds a word in `B_degree`, rejecting zero entries and generators `≥ degree`.
    pub fn new(degree: usize, generators: Vec<Generator>) -> Result<Self, BraidError> {
        if degree < 1 {
            return Err(BraidError::DegreeTooSmall { degree });
        }
        validate_generators(degree, &generators)?;
        Ok(Self { degree, generators })
    }

    /// Builds a word whose degree is the smallest one containing every generator.
    pub fn from_generators(generators: Vec<Generator>) -> Result<Self, BraidError> {
        let degree = minimal_degree(&generators);
        Self::new(degree, generators)
    }

    /// The empty word of `B_degree`.
    pub fn identity(degree: usize) -> Result<Self, BraidError> {
        Self::new(degree, Vec::new())
    }

    /// Draws a uniformly random word of `B_degree`.
    ///
    /// The length is uniform in `length` and every entry uniform over the non-zero
    /// generators `±1, …, ±(degree-1)`. The result is not reduced. Panics if
    /// `length` is empty.
    pub fn random<R: Rng + ?Sized>(
        rng: &mut R,
        degree: usize,
        length: RangeInclusive<usize>,
    ) -> Result<Self, BraidError> {
        assert!(!length.is_empty(), "empty word length range");
        if degree < 2 {
            return Self::identity(degree);
        }
        let len = rng.gen_range(length);
        let max = (degree - 1) as Generator;
        let generators = (0..len)
            .map(|_| {
                let g = rng.gen_range(1..=max);
                if rng.gen::<bool>() {
                    -g
                } else {
                    g
                }
            })
            .collect();
        Ok(Self::from_parts(degree, generators))
    }

    /// Internal constructor for words whose generators are already known to fit.
    pub(crate) fn from_parts(degree: usize, generators: Vec<Generator>) -> Self {
        debug_assert!(validate_generators(degree, &generators).is_ok());
        Self { degree, generators }
    }

    /// Degree `n` of the braid group `B_n` the word lives in.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Signed generators in reading order.
    pub fn generators(&self) -> &[Generator] {
        &self.generators
    }

    /// Consumes the word and returns its generators.
    pub fn into_generators(self) -> Vec<Generator> {
        self.generators
    }

    /// Number of generators in the word.
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    /// Returns true for the empty word.
    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Returns the same word viewed in `B_degree`.
    ///
    /// Raising is always allowed; lowering fails if a generator would fall outside
    /// the smaller group.
    pub fn with_degree(&self, degree: usize) -> Result<Self, BraidError> {
        Self::new(degree, self.generators.clone())
    }

    /// Group product `self · other`, living in the larger of the two degrees.
    pub fn concatenate(&self, other: &Self) -> Self {
        let mut generators = Vec::with_capacity(self.len() + other.len());
        generators.extend_from_slice(&self.generators);
        generators.extend_from_slice(&other.generators);
        Self::from_parts(self.degree.max(other.degree), generators)
    }

    /// Group inverse: reversed word with every generator negated.
    pub fn inverse(&self) -> Self {
        Self::from_parts(self.degree, inverse_word(&self.generators))
    }

    /// Removes every adjacent `g g⁻¹` pair, see [`free_reduce`].
    pub fn free_reduce(&self) -> Self {
        Self::from_parts(self.degree, free_reduce(&self.generators))
    }

    /// Image of the word in the symmetric group on `degree` strands.
    pub fn permutation(&self) -> Permutation {
        project_permutation(&self.generators, self.degree)
    }

    /// Returns true if the word projects to the identity permutation.
    pub fn is_pure(&self) -> bool {
        self.permutation().is_identity()
    }
}

impl fmt::Display for BraidWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (idx, generator) in self.generators.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{generator}")?;
        }
        f.write_str("]")
    }
}

/// Smallest degree whose braid group contains every generator of `generators`.
pub fn minimal_degree(generators: &[Generator]) -> usize {
    generators
        .iter()
        .map(|g| g.unsigned_abs() as usize + 1)
        .max()
        .unwrap_or(1)
}

fn validate_generators(degree: usize, generators: &[Generator]) -> Result<(), BraidError> {
    for (position, &generator) in generators.iter().enumerate() {
        if generator == 0 {
            return Err(BraidError::ZeroGenerator { position });
        }
        if generator.unsigned_abs() as usize >= degree {
            return Err(BraidError::InvalidDegree { generator, degree });
        }
    }
    Ok(())
}

/// Reverses `word` and negates every entry.
pub fn inverse_word(word: &[Generator]) -> Vec<Generator> {
    word.iter().rev().map(|g| -g).collect()
}

/// Repeatedly deletes adjacent pairs `(g, -g)`.
///
/// After a deletion the scan steps back so that the pair brought together by the
/// removal is examined too, which makes the result free of cancelling pairs.
pub fn free_reduce(word: &[Generator]) -> Vec<Generator> {
    let mut out: Vec<Generator> = word.to_vec();
    let mut i = 0usize;
    while i + 1 < out.len() {
        if out[i] == -out[i + 1] {
            out.drain(i..i + 2);
            i = i.saturating_sub(2);
        } else {
            i += 1;
        }
    }
    out
}

/// Projects `word` onto the symmetric group on `degree` strands.
///
/// Generator `±g` maps to the transposition `(g-1, g)`; the word maps to the
/// composition of those transpositions in reading order. The result always has
/// exactly `max(degree, minimal_degree(word))` positions.
///
/// Panics if `word` contains the zero sentinel.
pub fn project_permutation(word: &[Generator], degree: usize) -> Permutation {
    assert!(!word.contains(&0), "zero generator has no transposition");
    let n = degree.max(minimal_degree(word));
    let mut images: Vec<usize> = (0..n).collect();
    // p ∘ (a a+1) is p with the images of a and a+1 exchanged.
    for &generator in word {
        let a = generator.unsigned_abs() as usize - 1;
        images.swap(a, a + 1);
    }
    Permutation::from_swapped_identity(images)
}
