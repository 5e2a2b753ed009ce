//! Colored Burau matrices evaluated over exact rationals.
//!
//! Each Artin generator acts as the identity except in a single row. That row is
//! described once by [`generator_row`] and then materialized either over `ℚ`
//! (this module, for the left/right folds) or over GF(2^k) by the E-Multiplication
//! engine.

use core::ops::{Add, Mul, Neg};

use braid_core::{BraidWord, Generator, Permutation};
use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};

/// Dependence of a matrix entry on the strand variable `t` of its generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Coefficient {
    /// The constant `1`.
    One,
    /// `t`.
    T,
    /// `-t`.
    NegT,
    /// `t⁻¹`.
    InvT,
    /// `-t⁻¹`.
    NegInvT,
}

impl Coefficient {
    /// Returns true for the entries produced by dividing by `t`.
    pub fn is_inverse(self) -> bool {
        matches!(self, Coefficient::InvT | Coefficient::NegInvT)
    }
}

/// The row in which a generator matrix differs from the identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorRow {
    /// Row index, `|g| - 1`.
    pub row: usize,
    /// Index into the permuted evaluation vector holding this generator's `t`.
    pub strand: usize,
    /// `(column, coefficient)` pairs replacing the identity row.
    pub entries: Vec<(usize, Coefficient)>,
}

/// Describes the non-identity row of `CB(g)`.
///
/// Positive `b_i` reads `(t_i, -t_i, 1)` on columns `i-2..=i`, `b_i⁻¹` reads
/// `(1, -t_{i+1}⁻¹, t_{i+1}⁻¹)`. For `|g| = 1` the leading column does not exist.
/// Returns `None` for the zero sentinel.
pub fn generator_row(generator: Generator) -> Option<GeneratorRow> {
    if generator == 0 {
        return None;
    }
    let a = generator.unsigned_abs() as usize;
    let row = a - 1;
    let (strand, entries) = if generator > 0 {
        let entries = if a == 1 {
            vec![(0, Coefficient::NegT), (1, Coefficient::One)]
        } else {
            vec![
                (row - 1, Coefficient::T),
                (row, Coefficient::NegT),
                (row + 1, Coefficient::One),
            ]
        };
        (a - 1, entries)
    } else {
        let entries = if a == 1 {
            vec![(0, Coefficient::NegInvT), (1, Coefficient::InvT)]
        } else {
            vec![
                (row - 1, Coefficient::One),
                (row, Coefficient::NegInvT),
                (row + 1, Coefficient::InvT),
            ]
        };
        (a, entries)
    };
    Some(GeneratorRow {
        row,
        strand,
        entries,
    })
}

fn gcd(a: &BigInt, b: &BigInt) -> BigInt {
    let mut a = a.abs();
    let mut b = b.abs();
    while !b.is_zero() {
        let t = &a % &b;
        a = b;
        b = t;
    }
    a
}

/// Exact rational number in lowest terms with a positive denominator.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rational {
    num: BigInt,
    den: BigInt,
}

impl Rational {
    /// Builds `num / den`. Returns `None` when `den` is zero.
    pub fn new(num: BigInt, den: BigInt) -> Option<Self> {
        if den.is_zero() {
            return None;
        }
        let (num, den) = if den.is_negative() {
            (-num, -den)
        } else {
            (num, den)
        };
        let g = gcd(&num, &den);
        if g.is_one() || g.is_zero() {
            return Some(Self { num, den });
        }
        Some(Self {
            num: &num / &g,
            den: &den / &g,
        })
    }

    /// Embeds an integer.
    pub fn from_integer(value: i64) -> Self {
        Self {
            num: BigInt::from(value),
            den: BigInt::one(),
        }
    }

    /// `0`.
    pub fn zero() -> Self {
        Self::from_integer(0)
    }

    /// `1`.
    pub fn one() -> Self {
        Self::from_integer(1)
    }

    /// Returns true for `0`.
    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    /// Returns true if the denominator is `1`.
    pub fn is_integer(&self) -> bool {
        self.den.is_one()
    }

    /// Numerator.
    pub fn numerator(&self) -> &BigInt {
        &self.num
    }

    /// Denominator, always positive.
    pub fn denominator(&self) -> &BigInt {
        &self.den
    }

    /// Multiplicative inverse, `None` for zero.
    pub fn recip(&self) -> Option<Self> {
        Self::new(self.den.clone(), self.num.clone())
    }

    fn from_parts(num: BigInt, den: BigInt) -> Self {
        // Denominators are products of positive denominators here.
        Self::new(num, den).unwrap_or_else(Self::zero)
    }
}

impl Add for &Rational {
    type Output = Rational;

    fn add(self, other: &Rational) -> Rational {
        Rational::from_parts(
            &self.num * &other.den + &self.den * &other.num,
            &self.den * &other.den,
        )
    }
}

impl Mul for &Rational {
    type Output = Rational;

    fn mul(self, other: &Rational) -> Rational {
        Rational::from_parts(&self.num * &other.num, &self.den * &other.den)
    }
}

impl Neg for &Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational {
            num: -&self.num,
            den: self.den.clone(),
        }
    }
}

/// Square matrix over `ℚ`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RationalMatrix {
    size: usize,
    entries: Vec<Rational>,
}

impl RationalMatrix {
    /// Zero matrix.
    pub fn zero(size: usize) -> Self {
        Self {
            size,
            entries: vec![Rational::zero(); size * size],
        }
    }

    /// Identity matrix.
    pub fn identity(size: usize) -> Self {
        let mut m = Self::zero(size);
        for i in 0..size {
            m.entries[i * size + i] = Rational::one();
        }
        m
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Entry at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> &Rational {
        &self.entries[row * self.size + col]
    }

    /// Returns true if every entry is an integer.
    pub fn is_integral(&self) -> bool {
        self.entries.iter().all(Rational::is_integer)
    }

    /// Matrix product `self * rhs`.
    pub fn mul(&self, rhs: &Self) -> Self {
        assert_eq!(self.size, rhs.size, "matrix size mismatch");
        let n = self.size;
        let mut out = Self::zero(n);
        for i in 0..n {
            for k in 0..n {
                let a = self.get(i, k);
                if a.is_zero() {
                    continue;
                }
                for j in 0..n {
                    let b = rhs.get(k, j);
                    if b.is_zero() {
                        continue;
                    }
                    let idx = i * n + j;
                    out.entries[idx] = &out.entries[idx] + &(a * b);
                }
            }
        }
        out
    }
}

/// Errors raised when evaluating a Burau matrix at integer points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BurauError {
    /// A negative generator needs `1/t` for a strand whose value is zero.
    #[error("evaluation value for strand {strand} is zero")]
    ZeroEvaluation {
        /// Strand index in the permuted evaluation vector.
        strand: usize,
    },
}

/// `CB(g)` for `B_degree` with strand variables substituted by `values`.
///
/// Generator `0` yields the zero matrix.
pub fn generator_matrix(
    generator: Generator,
    values: &[i64],
    degree: usize,
) -> Result<RationalMatrix, BurauError> {
    let Some(row) = generator_row(generator) else {
        return Ok(RationalMatrix::zero(degree));
    };
    let t = Rational::from_integer(values[row.strand]);
    let t_inv = if row.entries.iter().any(|(_, c)| c.is_inverse()) {
        t.recip().ok_or(BurauError::ZeroEvaluation { strand: row.strand })?
    } else {
        Rational::one()
    };

    let mut m = RationalMatrix::identity(degree);
    let base = row.row * degree;
    m.entries[base + row.row] = Rational::zero();
    for (col, coefficient) in row.entries {
        m.entries[base + col] = match coefficient {
            Coefficient::One => Rational::one(),
            Coefficient::T => t.clone(),
            Coefficient::NegT => -&t,
            Coefficient::InvT => t_inv.clone(),
            Coefficient::NegInvT => -&t_inv,
        };
    }
    Ok(m)
}

/// Evaluates the colored Burau matrix of `word` processing generators left to right.
///
/// Each generator matrix is built from `values` permuted by the projection of
/// the prefix read so far, and multiplied onto the right.
pub fn left_fold(word: &BraidWord, values: &[i64]) -> Result<RationalMatrix, BurauError> {
    let degree = word.degree();
    assert_eq!(values.len(), degree, "evaluation vector length mismatch");
    let mut matrix = RationalMatrix::identity(degree);
    let mut prefix = Permutation::identity(degree);
    for &g in word.generators() {
        let permuted = prefix.apply_to_sequence(values);
        matrix = matrix.mul(&generator_matrix(g, &permuted, degree)?);
        prefix = prefix.compose(&braid_core::project_permutation(&[g], degree));
    }
    Ok(matrix)
}

/// Evaluates the same matrix as [`left_fold`] processing generators right to left.
///
/// The projection of the suffix is accumulated from the right; the prefix
/// permutation for each generator is recovered as `π_word ∘ π_suffix⁻¹`.
pub fn right_fold(word: &BraidWord, values: &[i64]) -> Result<RationalMatrix, BurauError> {
    let degree = word.degree();
    assert_eq!(values.len(), degree, "evaluation vector length mismatch");
    let whole = word.permutation();
    let mut suffix = Permutation::identity(degree);
    let mut matrix = RationalMatrix::identity(degree);
    for &g in word.generators().iter().rev() {
        suffix = braid_core::project_permutation(&[g], degree).compose(&suffix);
        let prefix = whole.compose(&suffix.inverse());
        let permuted = prefix.apply_to_sequence(values);
        matrix = generator_matrix(g, &permuted, degree)?.mul(&matrix);
    }
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    const VALUES: [i64; 6] = [3, 5, 7, 2, 11, 13];

    fn word(degree: usize, gens: &[Generator]) -> BraidWord {
        BraidWord::new(degree, gens.to_vec()).unwrap()
    }

    #[test]
    fn rational_normalizes_sign_and_gcd() {
        let r = Rational::new(BigInt::from(6), BigInt::from(-4)).unwrap();
        assert_eq!(r.numerator(), &BigInt::from(-3));
        assert_eq!(r.denominator(), &BigInt::from(2));
        assert!(Rational::new(BigInt::one(), BigInt::zero()).is_none());
        assert!(Rational::zero().recip().is_none());
    }

    #[test]
    fn generator_rows_at_edges() {
        let first = generator_row(1).unwrap();
        assert_eq!(first.row, 0);
        assert_eq!(first.strand, 0);
        assert_eq!(first.entries, vec![(0, Coefficient::NegT), (1, Coefficient::One)]);

        let inv = generator_row(-3).unwrap();
        assert_eq!(inv.row, 2);
        assert_eq!(inv.strand, 3);
        assert_eq!(
            inv.entries,
            vec![
                (1, Coefficient::One),
                (2, Coefficient::NegInvT),
                (3, Coefficient::InvT)
            ]
        );
        assert!(generator_row(0).is_none());
    }

    #[test]
    fn zero_generator_is_zero_matrix() {
        let m = generator_matrix(0, &VALUES, 6).unwrap();
        assert_eq!(m, RationalMatrix::zero(6));
    }

    #[test]
    fn inverse_generator_needs_nonzero_value() {
        let values = [3, 0, 7];
        assert_eq!(
            generator_matrix(-1, &values, 3),
            Err(BurauError::ZeroEvaluation { strand: 1 })
        );
        assert!(generator_matrix(1, &values, 3).is_ok());
    }

    #[test]
    fn word_times_inverse_folds_to_identity() {
        let w = word(6, &[1, -3, 2, 5, -4, 2, 2]);
        let product = w.concatenate(&w.inverse());
        assert_eq!(left_fold(&product, &VALUES).unwrap(), RationalMatrix::identity(6));
    }

    #[test]
    fn braid_relation_holds() {
        for i in 1..5 {
            let lhs = left_fold(&word(6, &[i, i + 1, i]), &VALUES).unwrap();
            let rhs = left_fold(&word(6, &[i + 1, i, i + 1]), &VALUES).unwrap();
            assert_eq!(lhs, rhs, "i={i}");
        }
    }

    #[test]
    fn positive_words_stay_integral() {
        let m = left_fold(&word(6, &[1, 2, 3, 4, 5, 1, 3]), &VALUES).unwrap();
        assert!(m.is_integral());
        let m = left_fold(&word(6, &[-2]), &VALUES).unwrap();
        assert!(!m.is_integral());
    }

    #[test]
    fn left_and_right_folds_agree() {
        let mut rng = ChaCha20Rng::from_seed([9u8; 32]);
        for _ in 0..25 {
            let w = BraidWord::random(&mut rng, 6, 0..=14).unwrap();
            assert_eq!(
                left_fold(&w, &VALUES).unwrap(),
                right_fold(&w, &VALUES).unwrap(),
                "word {w}"
            );
        }
    }
}
