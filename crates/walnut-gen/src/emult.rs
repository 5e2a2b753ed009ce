//! E-Multiplication: the one-sided action of braid words on `(matrix, permutation)`
//! pairs over GF(2^k).

use braid_core::{BraidWord, Generator, Permutation};
use serde::{Deserialize, Serialize};

use crate::burau::{generator_row, Coefficient};
use crate::error::WalnutError;
use crate::field::{FieldElement, FieldError, GaloisField};
use crate::matrix::FieldMatrix;

/// Strand values substituted for the colored Burau variables, as field elements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvaluationContext {
    field: GaloisField,
    values: Vec<FieldElement>,
}

impl EvaluationContext {
    /// Interprets `t_values` as elements of `field`, one per strand.
    pub fn new(field: GaloisField, t_values: &[u32]) -> Result<Self, FieldError> {
        let values = t_values
            .iter()
            .map(|&t| field.element(t))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { field, values })
    }

    /// Number of strands.
    pub fn degree(&self) -> usize {
        self.values.len()
    }

    /// Field the action is computed in.
    pub fn field(&self) -> &GaloisField {
        &self.field
    }

    /// Unpermuted strand values.
    pub fn values(&self) -> &[FieldElement] {
        &self.values
    }

    /// Strand values conjugated by `sigma`: entry `k` is `values[sigma(k)]`.
    pub fn permuted(&self, sigma: &Permutation) -> Vec<FieldElement> {
        sigma.apply_to_sequence(&self.values)
    }
}

/// A point of the E-Multiplication orbit: an `N×N` field matrix and a permutation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepresentationState {
    /// Accumulated matrix.
    pub matrix: FieldMatrix,
    /// Accumulated permutation.
    pub permutation: Permutation,
}

impl RepresentationState {
    /// The trivial state `(I, id)`.
    pub fn identity(degree: usize) -> Self {
        Self {
            matrix: FieldMatrix::identity(degree),
            permutation: Permutation::identity(degree),
        }
    }

    /// Number of strands.
    pub fn degree(&self) -> usize {
        self.matrix.size()
    }

    fn check(&self, context: &EvaluationContext) -> Result<(), WalnutError> {
        let n = context.degree();
        if self.matrix.size() != n || self.permutation.len() != n {
            return Err(WalnutError::params(format!(
                "state of size {}x{} with permutation of length {} does not match degree {n}",
                self.matrix.size(),
                self.matrix.size(),
                self.permutation.len()
            )));
        }
        if !self.matrix.is_over(context.field()) {
            return Err(WalnutError::params("state matrix has entries outside the field"));
        }
        Ok(())
    }
}

/// Builds the field matrix of a single generator for the strand values `permuted`.
///
/// Entries that divide by `t` use the GF(2^k) inverse; signs vanish in
/// characteristic 2. Generator `0` yields the zero matrix.
pub fn generator_field_matrix(
    generator: Generator,
    permuted: &[FieldElement],
    field: &GaloisField,
) -> Result<FieldMatrix, FieldError> {
    let degree = permuted.len();
    let Some(row) = generator_row(generator) else {
        return Ok(FieldMatrix::zero(degree));
    };
    let mut m = FieldMatrix::identity(degree);
    m.set(row.row, row.row, FieldElement::ZERO);
    for (col, value) in row_values(&row.entries, permuted[row.strand], field)? {
        m.set(row.row, col, value);
    }
    Ok(m)
}

fn row_values(
    entries: &[(usize, Coefficient)],
    t: FieldElement,
    field: &GaloisField,
) -> Result<Vec<(usize, FieldElement)>, FieldError> {
    let needs_inverse = entries.iter().any(|(_, c)| c.is_inverse());
    let t_inv = if needs_inverse {
        field.inverse(t)?
    } else {
        FieldElement::ONE
    };
    Ok(entries
        .iter()
        .map(|&(col, c)| {
            let value = match c {
                Coefficient::One => FieldElement::ONE,
                Coefficient::T | Coefficient::NegT => t,
                Coefficient::InvT | Coefficient::NegInvT => t_inv,
            };
            (col, value)
        })
        .collect())
}

fn check_word(word: &BraidWord, degree: usize) -> Result<(), WalnutError> {
    if let Some(&generator) = word
        .generators()
        .iter()
        .find(|g| g.unsigned_abs() as usize >= degree)
    {
        return Err(braid_core::BraidError::InvalidDegree { generator, degree }.into());
    }
    Ok(())
}

/// Applies one generator to `state` in place.
///
/// `CB(g)` differs from the identity in row `r` only, so `M·CB(g)` keeps every
/// column of `M` and adds column `r` scaled by the row entries.
fn act_generator(
    state: &mut RepresentationState,
    generator: Generator,
    context: &EvaluationContext,
) -> Result<(), FieldError> {
    let field = context.field();
    let Some(row) = generator_row(generator) else {
        state.matrix = FieldMatrix::zero(context.degree());
        return Ok(());
    };
    let t = context.values()[state.permutation.apply(row.strand)];
    let values = row_values(&row.entries, t, field)?;

    let n = state.matrix.size();
    let pivot: Vec<FieldElement> = (0..n).map(|i| state.matrix.get(i, row.row)).collect();
    for i in 0..n {
        state.matrix.set(i, row.row, FieldElement::ZERO);
    }
    for (col, value) in values {
        for (i, &p) in pivot.iter().enumerate() {
            let acc = state.matrix.get(i, col);
            state.matrix.set(i, col, field.add(acc, field.mul(p, value)));
        }
    }

    state.permutation = state
        .permutation
        .compose(&Permutation::transposition(row.row, row.row + 1, n));
    Ok(())
}

/// Computes `state ⋆ word`.
///
/// Each generator `g` right-multiplies the matrix by `CB(g)` built from the strand
/// values permuted by the current permutation `σ`, then replaces `σ` by `σ ∘ s_g`.
pub fn e_multiply(
    state: &RepresentationState,
    word: &BraidWord,
    context: &EvaluationContext,
) -> Result<RepresentationState, WalnutError> {
    state.check(context)?;
    check_word(word, context.degree())?;
    let mut out = state.clone();
    for &g in word.generators() {
        act_generator(&mut out, g, context)?;
    }
    Ok(out)
}

/// Reference implementation of [`e_multiply`] using full matrix products.
pub fn e_multiply_dense(
    state: &RepresentationState,
    word: &BraidWord,
    context: &EvaluationContext,
) -> Result<RepresentationState, WalnutError> {
    state.check(context)?;
    check_word(word, context.degree())?;
    let degree = context.degree();
    let field = context.field();
    let mut matrix = state.matrix.clone();
    let mut permutation = state.permutation.clone();
    for &g in word.generators() {
        let permuted = context.permuted(&permutation);
        matrix = matrix.mul(&generator_field_matrix(g, &permuted, field)?, field);
        permutation = permutation.compose(&braid_core::project_permutation(&[g], degree));
    }
    Ok(RepresentationState {
        matrix,
        permutation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    const T_VALUES: [u32; 8] = [6, 1, 1, 9, 19, 14, 29, 30];

    fn context() -> EvaluationContext {
        EvaluationContext::new(GaloisField::new(5).unwrap(), &T_VALUES).unwrap()
    }

    fn word(gens: &[Generator]) -> BraidWord {
        BraidWord::new(8, gens.to_vec()).unwrap()
    }

    fn random_state(rng: &mut ChaCha20Rng, ctx: &EvaluationContext) -> RepresentationState {
        let w = BraidWord::random(rng, 8, 10..=20).unwrap();
        let mut state = RepresentationState::identity(8);
        state.matrix = FieldMatrix::random(rng, 8, ctx.field());
        e_multiply(&state, &w, ctx).unwrap()
    }

    #[test]
    fn column_update_matches_dense_product() {
        let ctx = context();
        let mut rng = ChaCha20Rng::from_seed([3u8; 32]);
        for _ in 0..20 {
            let state = random_state(&mut rng, &ctx);
            let w = BraidWord::random(&mut rng, 8, 0..=40).unwrap();
            assert_eq!(
                e_multiply(&state, &w, &ctx).unwrap(),
                e_multiply_dense(&state, &w, &ctx).unwrap()
            );
        }
    }

    #[test]
    fn generator_and_inverse_cancel() {
        let ctx = context();
        let id = RepresentationState::identity(8);
        for g in 1..8 {
            assert_eq!(e_multiply(&id, &word(&[g, -g]), &ctx).unwrap(), id, "g={g}");
            assert_eq!(e_multiply(&id, &word(&[-g, g]), &ctx).unwrap(), id, "g={g}");
        }
    }

    #[test]
    fn braid_relations_hold() {
        let ctx = context();
        let id = RepresentationState::identity(8);
        for i in 1..7 {
            assert_eq!(
                e_multiply(&id, &word(&[i, i + 1, i]), &ctx).unwrap(),
                e_multiply(&id, &word(&[i + 1, i, i + 1]), &ctx).unwrap()
            );
        }
        for i in 1..8i32 {
            for j in 1..8i32 {
                if (i - j).abs() > 1 {
                    assert_eq!(
                        e_multiply(&id, &word(&[i, j]), &ctx).unwrap(),
                        e_multiply(&id, &word(&[j, i]), &ctx).unwrap()
                    );
                }
            }
        }
    }

    #[test]
    fn action_is_associative_over_concatenation() {
        let ctx = context();
        let mut rng = ChaCha20Rng::from_seed([5u8; 32]);
        let state = random_state(&mut rng, &ctx);
        let a = BraidWord::random(&mut rng, 8, 10..=30).unwrap();
        let b = BraidWord::random(&mut rng, 8, 10..=30).unwrap();
        let stepwise = e_multiply(&e_multiply(&state, &a, &ctx).unwrap(), &b, &ctx).unwrap();
        assert_eq!(e_multiply(&state, &a.concatenate(&b), &ctx).unwrap(), stepwise);
    }

    #[test]
    fn permutation_tracks_projection() {
        let ctx = context();
        let mut rng = ChaCha20Rng::from_seed([6u8; 32]);
        let w = BraidWord::random(&mut rng, 8, 20..=20).unwrap();
        let out = e_multiply(&RepresentationState::identity(8), &w, &ctx).unwrap();
        assert_eq!(out.permutation, w.permutation());
    }

    #[test]
    fn negative_generator_on_zero_value_fails() {
        let ctx = EvaluationContext::new(GaloisField::new(5).unwrap(), &[3, 0, 5, 7, 9]).unwrap();
        let id = RepresentationState::identity(5);
        let w = BraidWord::new(5, vec![-1]).unwrap();
        assert!(matches!(
            e_multiply(&id, &w, &ctx),
            Err(WalnutError::Field(FieldError::DivisionByZero))
        ));
        assert!(e_multiply(&id, &BraidWord::new(5, vec![1]).unwrap(), &ctx).is_ok());
    }

    #[test]
    fn rejects_mismatched_degree() {
        let ctx = context();
        let id = RepresentationState::identity(8);
        let w = BraidWord::new(10, vec![9]).unwrap();
        assert!(matches!(
            e_multiply(&id, &w, &ctx),
            Err(WalnutError::Braid(_))
        ));
        let small = RepresentationState::identity(5);
        assert!(matches!(
            e_multiply(&small, &word(&[1]), &ctx),
            Err(WalnutError::InvalidParams { .. })
        ));
    }

    #[test]
    fn zero_sentinel_matrix() {
        let ctx = context();
        let m = generator_field_matrix(0, ctx.values(), ctx.field()).unwrap();
        assert_eq!(m, FieldMatrix::zero(8));
    }
}
