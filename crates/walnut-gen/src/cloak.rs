//! Cloaking elements: words that act trivially on a fixed representation state.

use braid_core::{BraidWord, Generator};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::emult::{EvaluationContext, RepresentationState};
use crate::error::WalnutError;
use crate::field::FieldElement;

/// Bounds for the randomized cloak search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloakConfig {
    /// Candidate words drawn before giving up.
    pub max_attempts: usize,
    /// Shortest conjugating word, as a multiple of the degree.
    pub min_length_factor: usize,
    /// Longest conjugating word, as a multiple of the degree.
    pub max_length_factor: usize,
}

impl Default for CloakConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10_000,
            min_length_factor: 5,
            max_length_factor: 10,
        }
    }
}

/// Returns the first two strands in `1..degree-1` whose value is `1`.
pub fn find_t_ones(
    context: &EvaluationContext,
    degree: usize,
) -> Result<(usize, usize), WalnutError> {
    if context.degree() != degree {
        return Err(WalnutError::params(format!(
            "evaluation context has {} entries, expected {degree}",
            context.degree()
        )));
    }
    let mut ones = context
        .values()
        .iter()
        .enumerate()
        .take(degree.saturating_sub(1))
        .skip(1)
        .filter(|(_, v)| **v == FieldElement::ONE)
        .map(|(i, _)| i);
    match (ones.next(), ones.next()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(WalnutError::NoTOnesAvailable),
    }
}

/// Searches for a cloak `v` with `state ⋆ v = state`.
///
/// Draws random words `w` until the projection of `w` carries strands
/// `seed - 1` and `seed` onto the preimages under `σ` of the two t-one strands.
/// Then `b_seed²` sees `t = 1` twice, which is the identity in characteristic 2,
/// and the cloak is `w · b_seed² · w⁻¹`.
pub fn generate_cloak<R: RngCore + CryptoRng>(
    rng: &mut R,
    state: &RepresentationState,
    context: &EvaluationContext,
    seed_generator: usize,
    config: &CloakConfig,
) -> Result<BraidWord, WalnutError> {
    let degree = context.degree();
    if seed_generator < 1 || seed_generator >= degree {
        return Err(WalnutError::params(format!(
            "cloak seed generator {seed_generator} outside [1, {}]",
            degree.saturating_sub(1)
        )));
    }
    if state.permutation.len() != degree {
        return Err(WalnutError::params(format!(
            "state permutation has length {}, expected {degree}",
            state.permutation.len()
        )));
    }
    if config.min_length_factor > config.max_length_factor {
        return Err(WalnutError::params("cloak length factors are inverted"));
    }
    let (a, b) = find_t_ones(context, degree)?;
    let sigma_inv = state.permutation.inverse();
    let (target_a, target_b) = (sigma_inv.apply(a), sigma_inv.apply(b));
    let lengths = config.min_length_factor * degree..=config.max_length_factor * degree;

    for attempt in 1..=config.max_attempts {
        let w = BraidWord::random(rng, degree, lengths.clone())?;
        let pi = w.permutation();
        if pi.apply(seed_generator - 1) == target_a && pi.apply(seed_generator) == target_b {
            let seed = seed_generator as Generator;
            let square = BraidWord::new(degree, vec![seed, seed])?;
            let cloak = w.concatenate(&square).concatenate(&w.inverse());
            debug!(attempt, length = cloak.len(), "cloak found");
            return Ok(cloak);
        }
    }

    warn!(attempts = config.max_attempts, "cloak search exhausted");
    Err(WalnutError::CloakSearchExhausted {
        attempts: config.max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emult::e_multiply;
    use crate::field::GaloisField;
    use crate::matrix::FieldMatrix;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    const T_VALUES: [u32; 8] = [6, 1, 1, 9, 19, 14, 29, 30];

    fn context(values: &[u32]) -> EvaluationContext {
        EvaluationContext::new(GaloisField::new(5).unwrap(), values).unwrap()
    }

    #[test]
    fn finds_interior_t_ones() {
        assert_eq!(find_t_ones(&context(&T_VALUES), 8).unwrap(), (1, 2));
        let spread = [6, 3, 1, 9, 1, 14, 1, 30];
        assert_eq!(find_t_ones(&context(&spread), 8).unwrap(), (2, 4));
    }

    #[test]
    fn edge_strands_do_not_count() {
        let edges = [1, 3, 1, 9, 19, 14, 29, 1];
        assert!(matches!(
            find_t_ones(&context(&edges), 8),
            Err(WalnutError::NoTOnesAvailable)
        ));
        assert!(matches!(
            find_t_ones(&context(&T_VALUES), 9),
            Err(WalnutError::InvalidParams { .. })
        ));
    }

    #[test]
    fn cloak_fixes_trivial_state() {
        let ctx = context(&T_VALUES);
        let mut rng = ChaCha20Rng::from_seed([11u8; 32]);
        let id = RepresentationState::identity(8);
        for seed in 1..8 {
            let v = generate_cloak(&mut rng, &id, &ctx, seed, &CloakConfig::default()).unwrap();
            assert!(v.len() >= 2 + 2 * 40);
            assert_eq!(e_multiply(&id, &v, &ctx).unwrap(), id, "seed {seed}");
        }
    }

    #[test]
    fn cloak_fixes_arbitrary_state() {
        let ctx = context(&T_VALUES);
        let mut rng = ChaCha20Rng::from_seed([12u8; 32]);
        for _ in 0..5 {
            let w = BraidWord::random(&mut rng, 8, 30..=40).unwrap();
            let mut start = RepresentationState::identity(8);
            start.matrix = FieldMatrix::random(&mut rng, 8, ctx.field());
            let state = e_multiply(&start, &w, &ctx).unwrap();
            let v = generate_cloak(&mut rng, &state, &ctx, 3, &CloakConfig::default()).unwrap();
            assert_eq!(e_multiply(&state, &v, &ctx).unwrap(), state);
        }
    }

    #[test]
    fn bounded_search_reports_exhaustion() {
        let ctx = context(&T_VALUES);
        let mut rng = ChaCha20Rng::from_seed([13u8; 32]);
        let config = CloakConfig {
            max_attempts: 0,
            ..CloakConfig::default()
        };
        let id = RepresentationState::identity(8);
        assert!(matches!(
            generate_cloak(&mut rng, &id, &ctx, 3, &config),
            Err(WalnutError::CloakSearchExhausted { attempts: 0 })
        ));
    }

    #[test]
    fn rejects_seed_outside_degree() {
        let ctx = context(&T_VALUES);
        let mut rng = ChaCha20Rng::from_seed([14u8; 32]);
        let id = RepresentationState::identity(8);
        for seed in [0, 8] {
            assert!(matches!(
                generate_cloak(&mut rng, &id, &ctx, seed, &CloakConfig::default()),
                Err(WalnutError::InvalidParams { .. })
            ));
        }
    }
}
