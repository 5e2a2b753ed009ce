//! Square matrices over GF(2^k).

use rand::{CryptoRng, Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::field::{FieldElement, FieldError, GaloisField};

/// `n×n` matrix of field elements, stored row-major.
///
/// Decoding rejects an entry count other than `size²`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WireMatrix", into = "WireMatrix")]
pub struct FieldMatrix {
    size: usize,
    entries: Vec<FieldElement>,
}

#[derive(Serialize, Deserialize)]
struct WireMatrix {
    size: usize,
    entries: Vec<FieldElement>,
}

impl TryFrom<WireMatrix> for FieldMatrix {
    type Error = FieldError;

    fn try_from(wire: WireMatrix) -> Result<Self, Self::Error> {
        let expected = wire.size.checked_mul(wire.size);
        if expected != Some(wire.entries.len()) {
            return Err(FieldError::MatrixShape {
                size: wire.size,
                entries: wire.entries.len(),
            });
        }
        Ok(Self {
            size: wire.size,
            entries: wire.entries,
        })
    }
}

impl From<FieldMatrix> for WireMatrix {
    fn from(m: FieldMatrix) -> Self {
        Self {
            size: m.size,
            entries: m.entries,
        }
    }
}

impl FieldMatrix {
    /// Returns the zero matrix.
    pub fn zero(size: usize) -> Self {
        Self {
            size,
            entries: vec![FieldElement::ZERO; size * size],
        }
    }

    /// Returns the identity matrix.
    pub fn identity(size: usize) -> Self {
        let mut m = Self::zero(size);
        for i in 0..size {
            m.set(i, i, FieldElement::ONE);
        }
        m
    }

    /// Builds a matrix from its rows. Returns `None` unless the rows form a square.
    pub fn from_rows(rows: Vec<Vec<FieldElement>>) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|row| row.len() != size) {
            return None;
        }
        Some(Self {
            size,
            entries: rows.into_iter().flatten().collect(),
        })
    }

    /// Generates a uniformly random matrix over `field`.
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R, size: usize, field: &GaloisField) -> Self {
        let order = field.order();
        let entries = (0..size * size)
            .map(|_| {
                field
                    .element(rng.gen_range(0..order))
                    .unwrap_or(FieldElement::ZERO)
            })
            .collect();
        Self { size, entries }
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Entry at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> FieldElement {
        self.entries[row * self.size + col]
    }

    /// Overwrites the entry at `(row, col)`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: FieldElement) {
        self.entries[row * self.size + col] = value;
    }

    /// Iterates over the rows.
    pub fn rows(&self) -> impl Iterator<Item = &[FieldElement]> {
        self.entries.chunks(self.size.max(1))
    }

    /// Returns true if every entry belongs to `field`.
    pub fn is_over(&self, field: &GaloisField) -> bool {
        self.entries.iter().all(|&e| field.contains(e))
    }

    /// Multiplies two matrices (`self * rhs`) with field arithmetic.
    ///
    /// `C[i][j] = Σ_k A[i][k]·B[k][j]`, products and sums taken in `field`.
    pub fn mul(&self, rhs: &Self, field: &GaloisField) -> Self {
        assert_eq!(self.size, rhs.size, "matrix size mismatch");
        let n = self.size;
        let mut result = Self::zero(n);
        for i in 0..n {
            for k in 0..n {
                let a = self.get(i, k);
                if a.is_zero() {
                    continue;
                }
                for j in 0..n {
                    let acc = result.get(i, j);
                    result.set(i, j, field.add(acc, field.mul(a, rhs.get(k, j))));
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn identity_is_neutral() {
        let field = GaloisField::new(5).unwrap();
        let mut rng = ChaCha20Rng::from_seed([1u8; 32]);
        for _ in 0..8 {
            let m = FieldMatrix::random(&mut rng, 6, &field);
            let id = FieldMatrix::identity(6);
            assert_eq!(m.mul(&id, &field), m);
            assert_eq!(id.mul(&m, &field), m);
        }
    }

    #[test]
    fn multiplication_is_associative() {
        let field = GaloisField::new(5).unwrap();
        let mut rng = ChaCha20Rng::from_seed([2u8; 32]);
        let a = FieldMatrix::random(&mut rng, 5, &field);
        let b = FieldMatrix::random(&mut rng, 5, &field);
        let c = FieldMatrix::random(&mut rng, 5, &field);
        assert_eq!(
            a.mul(&b, &field).mul(&c, &field),
            a.mul(&b.mul(&c, &field), &field)
        );
    }

    #[test]
    fn small_product_by_hand() {
        let field = GaloisField::new(5).unwrap();
        let e = |v: u32| field.element(v).unwrap();
        let a = FieldMatrix::from_rows(vec![vec![e(1), e(2)], vec![e(1), e(3)]]).unwrap();
        let b = FieldMatrix::from_rows(vec![vec![e(15), e(0)], vec![e(1), e(1)]]).unwrap();
        let c = a.mul(&b, &field);
        // Row 0: 1·15 + 2·1 = 15 ^ 2, 1·0 + 2·1 = 2.
        assert_eq!(c.get(0, 0), e(15 ^ 2));
        assert_eq!(c.get(0, 1), e(2));
        // Row 1: 1·15 + 3·1, 0 + 3·1.
        assert_eq!(c.get(1, 0), e(15 ^ 3));
        assert_eq!(c.get(1, 1), e(3));
    }

    #[test]
    fn decoding_checks_entry_count() {
        let field = GaloisField::new(5).unwrap();
        let mut rng = ChaCha20Rng::from_seed([3u8; 32]);
        let m = FieldMatrix::random(&mut rng, 4, &field);
        let bytes = bincode::serialize(&m).unwrap();
        assert_eq!(bincode::deserialize::<FieldMatrix>(&bytes).unwrap(), m);

        let short = bincode::serialize(&(8usize, vec![FieldElement::ONE; 3])).unwrap();
        assert!(bincode::deserialize::<FieldMatrix>(&short).is_err());
        assert!(FieldMatrix::try_from(WireMatrix {
            size: 2,
            entries: vec![FieldElement::ZERO; 5],
        })
        .is_err());
    }

    #[test]
    fn from_rows_requires_square() {
        assert!(FieldMatrix::from_rows(vec![vec![FieldElement::ONE; 2]]).is_none());
    }
}
