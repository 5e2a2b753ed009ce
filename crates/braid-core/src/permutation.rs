//! Permutations of strand positions.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::BraidError;

/// Bijection on `{0, …, n-1}`, stored as its image array.
///
/// Composition follows function notation: `p.compose(&q)` maps `x` to `p(q(x))`.
/// Permutations of different lengths compose as if the shorter one fixed every
/// position past its end, so a permutation built for a small degree can be used
/// unchanged in a larger one.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Permutation {
    images: Vec<usize>,
}

impl Permutation {
    /// Returns the identity on `n` positions.
    pub fn identity(n: usize) -> Self {
        Self {
            images: (0..n).collect(),
        }
    }

    /// Returns the transposition exchanging `a` and `b` on `n` positions.
    pub fn transposition(a: usize, b: usize, n: usize) -> Self {
        assert!(a < n && b < n, "transposition ({a}, {b}) out of range for {n}");
        let mut images: Vec<usize> = (0..n).collect();
        images.swap(a, b);
        Self { images }
    }

    /// Builds a permutation from its image array, rejecting non-bijections.
    pub fn from_images(images: Vec<usize>) -> Result<Self, BraidError> {
        let mut seen = vec![false; images.len()];
        for &image in &images {
            if image >= images.len() || seen[image] {
                return Err(BraidError::InvalidPermutation);
            }
            seen[image] = true;
        }
        Ok(Self { images })
    }

    /// Wraps an image array obtained from the identity by swaps only.
    pub(crate) fn from_swapped_identity(images: Vec<usize>) -> Self {
        Self { images }
    }

    /// Number of positions the permutation acts on.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Returns true for the permutation on zero positions.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Image array, `images[i] = p(i)`.
    pub fn images(&self) -> &[usize] {
        &self.images
    }

    /// Returns true if every position is fixed.
    pub fn is_identity(&self) -> bool {
        self.images.iter().enumerate().all(|(i, &p)| i == p)
    }

    /// Image of a single position.
    ///
    /// Panics if `position` is outside the permutation.
    #[inline]
    pub fn apply(&self, position: usize) -> usize {
        self.images[position]
    }

    /// Returns `p ∘ q`, i.e. the map `x -> self(other(x))`.
    pub fn compose(&self, other: &Self) -> Self {
        let n = self.len().max(other.len());
        let images = (0..n)
            .map(|x| {
                let y = if x < other.len() { other.images[x] } else { x };
                if y < self.len() {
                    self.images[y]
                } else {
                    y
                }
            })
            .collect();
        Self { images }
    }

    /// Returns the inverse permutation.
    pub fn inverse(&self) -> Self {
        let mut images = vec![0usize; self.len()];
        for (i, &p) in self.images.iter().enumerate() {
            images[p] = i;
        }
        Self { images }
    }

    /// Pads the permutation with fixed points up to `n` positions.
    ///
    /// Never shrinks: a permutation already acting on `n` or more positions is returned as is.
    pub fn extend_to(&self, n: usize) -> Self {
        self.compose(&Self::identity(n))
    }

    /// Reindexes `seq` so that `out[i] = seq[p(i)]`.
    ///
    /// Entries past the end of the permutation are copied unchanged. Panics if `seq`
    /// is shorter than the permutation.
    pub fn apply_to_sequence<T: Clone>(&self, seq: &[T]) -> Vec<T> {
        assert!(
            seq.len() >= self.len(),
            "sequence of length {} is shorter than permutation of length {}",
            seq.len(),
            self.len()
        );
        let mut out: Vec<T> = self.images.iter().map(|&p| seq[p].clone()).collect();
        out.extend_from_slice(&seq[self.len()..]);
        out
    }
}

impl fmt::Debug for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Permutation({:?})", self.images)
    }
}

impl TryFrom<Vec<usize>> for Permutation {
    type Error = BraidError;

    fn try_from(images: Vec<usize>) -> Result<Self, Self::Error> {
        Self::from_images(images)
    }
}

impl From<Permutation> for Vec<usize> {
    fn from(value: Permutation) -> Self {
        value.images
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn permutation_strategy() -> impl Strategy<Value = Permutation> {
        (1usize..12)
            .prop_flat_map(|n| Just((0..n).collect::<Vec<_>>()).prop_shuffle())
            .prop_map(|images| Permutation::from_images(images).expect("shuffle is a bijection"))
    }

    #[test]
    fn compose_is_function_composition() {
        let p = Permutation::from_images(vec![1, 2, 0]).unwrap();
        let q = Permutation::from_images(vec![0, 2, 1]).unwrap();
        let pq = p.compose(&q);
        for x in 0..3 {
            assert_eq!(pq.apply(x), p.apply(q.apply(x)));
        }
        assert_ne!(pq, q.compose(&p), "symmetric group of degree 3 is not abelian");
    }

    #[test]
    fn rejects_non_bijections() {
        assert_eq!(
            Permutation::from_images(vec![0, 0, 1]),
            Err(BraidError::InvalidPermutation)
        );
        assert_eq!(
            Permutation::from_images(vec![0, 3, 1]),
            Err(BraidError::InvalidPermutation)
        );
    }

    #[test]
    fn compose_extends_shorter_permutation() {
        let short = Permutation::transposition(0, 1, 2);
        let long = Permutation::transposition(2, 3, 5);
        let composed = short.compose(&long);
        assert_eq!(composed.images(), &[1, 0, 3, 2, 4]);
        assert_eq!(short.extend_to(4).images(), &[1, 0, 2, 3]);
    }

    #[test]
    fn apply_to_sequence_preserves_tail() {
        let p = Permutation::from_images(vec![2, 0, 1]).unwrap();
        let seq = ['a', 'b', 'c', 'd', 'e'];
        assert_eq!(p.apply_to_sequence(&seq), vec!['c', 'a', 'b', 'd', 'e']);
    }

    #[test]
    #[should_panic(expected = "shorter than permutation")]
    fn apply_to_short_sequence_panics() {
        let p = Permutation::identity(4);
        let _ = p.apply_to_sequence(&[1, 2]);
    }

    #[test]
    fn try_from_validates_images() {
        assert!(Permutation::try_from(vec![1, 1]).is_err());
        let good = Permutation::try_from(vec![1, 0]).expect("valid images");
        assert_eq!(good, Permutation::transposition(0, 1, 2));
        let images: Vec<usize> = good.into();
        assert_eq!(images, vec![1, 0]);
    }

    proptest! {
        #[test]
        fn inverse_cancels(p in permutation_strategy()) {
            let n = p.len();
            prop_assert_eq!(p.compose(&p.inverse()), Permutation::identity(n));
            prop_assert_eq!(p.inverse().compose(&p), Permutation::identity(n));
        }

        #[test]
        fn compose_is_associative(
            p in permutation_strategy(),
            q in permutation_strategy(),
            r in permutation_strategy(),
        ) {
            prop_assert_eq!(p.compose(&q).compose(&r), p.compose(&q.compose(&r)));
        }

        #[test]
        fn sequence_application_matches_pointwise(p in permutation_strategy()) {
            let seq: Vec<usize> = (0..p.len()).map(|i| i * 7 + 3).collect();
            let out = p.apply_to_sequence(&seq);
            for (i, value) in out.iter().enumerate() {
                prop_assert_eq!(*value, seq[p.apply(i)]);
            }
        }
    }
}
