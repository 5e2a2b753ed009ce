//! Stochastic rewriting of braid words.
//!
//! A word is moved into an alternate generating system `y_i` attached to a
//! partition of the strands, perturbed there with the relations of that system,
//! moved back to Artin generators, and then perturbed again with the far
//! commutation and braid relations. Every step preserves the group element, so
//! the E-Multiplication image of the word never changes.

use braid_core::{free_reduce, inverse_word, BraidWord, Generator};
use rand::{CryptoRng, Rng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::WalnutError;

/// Number of interval correspondences tried on each extracted pair.
pub const CORRESPONDENCE_COUNT: u8 = 10;

/// Partition of `degree - 1` into consecutive blocks of at least three generators.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Partition {
    parts: Vec<usize>,
}

impl Partition {
    /// Validates `parts` against the braid degree.
    pub fn new(parts: Vec<usize>, degree: usize) -> Result<Self, WalnutError> {
        let expected_sum = degree.saturating_sub(1);
        if parts.is_empty()
            || parts.iter().any(|&p| p < 3)
            || parts.iter().sum::<usize>() != expected_sum
        {
            return Err(WalnutError::InvalidPartition {
                parts,
                expected_sum,
            });
        }
        Ok(Self { parts })
    }

    /// Splits `degree - 1` into parts of three, the last part taking the remainder.
    pub fn for_degree(degree: usize) -> Result<Self, WalnutError> {
        let total = degree.saturating_sub(1);
        if total < 3 {
            return Self::new(vec![total], degree);
        }
        let mut parts = vec![3; total / 3];
        if let Some(last) = parts.last_mut() {
            *last += total % 3;
        }
        Self::new(parts, degree)
    }

    /// Block sizes.
    pub fn parts(&self) -> &[usize] {
        &self.parts
    }

    /// Braid degree the partition belongs to.
    pub fn degree(&self) -> usize {
        self.parts.iter().sum::<usize>() + 1
    }

    /// The boundary sequence `R[0] = 1`, `R[i] = R[i-1] + parts[i-1]`.
    pub fn boundaries(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.parts.len() + 1);
        out.push(1);
        for &part in &self.parts {
            let last = out[out.len() - 1];
            out.push(last + part);
        }
        out
    }
}

/// The `y` generating system of a partition.
///
/// Inside the block `[R_μ, R_{μ+1})`, `y_i = b_i b_{i+1} … b_{R_{μ+1}-1}`, so the
/// last generator of a block is its own `y` and `b_i = y_i y_{i+1}⁻¹` elsewhere.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct YSystem {
    blocks: Vec<(Generator, Generator)>,
    y_in_artin: Vec<Vec<Generator>>,
    artin_in_y: Vec<Vec<Generator>>,
}

impl YSystem {
    /// Builds the system for `partition`.
    pub fn new(partition: &Partition) -> Self {
        let r = partition.boundaries();
        let mut blocks = Vec::with_capacity(partition.parts().len());
        let mut y_in_artin = Vec::new();
        let mut artin_in_y = Vec::new();
        for window in r.windows(2) {
            let (lo, hi) = (window[0] as Generator, window[1] as Generator);
            blocks.push((lo, hi));
            for i in lo..hi {
                y_in_artin.push((i..hi).collect());
                artin_in_y.push(if i + 1 < hi { vec![i, -(i + 1)] } else { vec![i] });
            }
        }
        Self {
            blocks,
            y_in_artin,
            artin_in_y,
        }
    }

    /// `(lo, hi)` bounds of every block.
    pub fn blocks(&self) -> &[(Generator, Generator)] {
        &self.blocks
    }

    /// Rewrites an Artin word in `y` generators.
    pub fn to_y(&self, word: &[Generator]) -> Vec<Generator> {
        substitute(word, &self.artin_in_y)
    }

    /// Rewrites a `y` word in Artin generators.
    pub fn to_artin(&self, word: &[Generator]) -> Vec<Generator> {
        substitute(word, &self.y_in_artin)
    }

    /// Tries the correspondences in order on the pair `(x, y)`.
    ///
    /// Returns the 1-based number of the first correspondence that matches in any
    /// block, with its three-letter replacement.
    pub fn rewrite_pair<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        x: Generator,
        y: Generator,
    ) -> Option<(u8, [Generator; 3])> {
        (1..=CORRESPONDENCE_COUNT).find_map(|id| {
            self.blocks
                .iter()
                .find_map(|&(lo, hi)| correspondence(id, rng, x, y, lo, hi))
                .map(|out| (id, out))
        })
    }
}

fn substitute(word: &[Generator], table: &[Vec<Generator>]) -> Vec<Generator> {
    let mut out = Vec::with_capacity(word.len() * 2);
    for &g in word {
        let image = &table[g.unsigned_abs() as usize - 1];
        if g > 0 {
            out.extend_from_slice(image);
        } else {
            out.extend(inverse_word(image));
        }
    }
    free_reduce(&out)
}

/// Correspondence `id` on the pair `y_x y_y` (negative entries are inverses)
/// within the block `[lo, hi)`, whose top generator is `hi - 1`.
///
/// All ten follow from `y_j y_i = y_i y_{j-1} y_top⁻¹` for `lo ≤ i < j < hi`.
fn correspondence<R: Rng + ?Sized>(
    id: u8,
    rng: &mut R,
    x: Generator,
    y: Generator,
    lo: Generator,
    hi: Generator,
) -> Option<[Generator; 3]> {
    let top = hi - 1;
    match id {
        1 if lo <= y && y < x && x < hi => Some([y, x - 1, -top]),
        2 if lo <= x && x < y + 1 && y + 1 < hi => Some([y + 1, x, top]),
        3 if -y + 1 == hi && lo < x + 1 && x + 1 < hi => {
            let i = rng.gen_range(lo..=x);
            Some([-i, x + 1, i])
        }
        4 if y + 1 == hi && lo <= x && x < hi - 1 => {
            let j = rng.gen_range(x + 1..=hi - 1);
            Some([-j, x, j - 1])
        }
        5 if lo <= -x && -x < y && y < hi => Some([y - 1, -top, x]),
        6 if lo <= y && y < -x && -x < hi => Some([y, top, x + 1]),
        7 if hi == -x + 1 && lo <= -y && -y < hi - 1 => {
            let j = rng.gen_range(-y + 1..=hi - 1);
            Some([-(j - 1), y, j])
        }
        8 if hi == x + 1 && lo < -y + 1 && -y + 1 < hi => {
            let i = rng.gen_range(lo..=-y);
            Some([-i, y - 1, i])
        }
        9 if lo <= -y && -y < -x + 1 && -x + 1 < hi => Some([-top, y, x - 1]),
        10 if lo <= -x && -x < -y && -y < hi => Some([top, y + 1, x]),
        _ => None,
    }
}

/// Swaps two Artin generators that are at least two strands apart.
pub fn commute_far(pair: &[Generator]) -> Option<Vec<Generator>> {
    match *pair {
        [a, b] if a.unsigned_abs().abs_diff(b.unsigned_abs()) > 1 => Some(vec![b, a]),
        _ => None,
    }
}

/// Replaces `b_i b_j b_i` by `b_j b_i b_j` when `|i - j| = 1` (same sign).
pub fn apply_braid_relation(triple: &[Generator]) -> Option<Vec<Generator>> {
    match *triple {
        [a, b, c] if a == c && (a - b).abs() == 1 => Some(vec![b, a, b]),
        _ => None,
    }
}

/// Rewriter settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteConfig {
    /// Repetitions of each of the three rewriting stages.
    pub passes: usize,
    /// Shortest block a word is split into.
    pub min_block: usize,
    /// Longest block a word is split into.
    pub max_block: usize,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            passes: 3,
            min_block: 5,
            max_block: 10,
        }
    }
}

/// Randomized, relation-preserving word rewriter for a fixed partition.
#[derive(Clone, Debug)]
pub struct StochasticRewriter {
    degree: usize,
    system: YSystem,
    config: RewriteConfig,
}

impl StochasticRewriter {
    /// Creates a rewriter for the braid group the partition belongs to.
    pub fn new(partition: &Partition, config: RewriteConfig) -> Result<Self, WalnutError> {
        if config.min_block == 0 || config.min_block > config.max_block {
            return Err(WalnutError::params(format!(
                "rewrite block range {}..={} is empty or zero",
                config.min_block, config.max_block
            )));
        }
        Ok(Self {
            degree: partition.degree(),
            system: YSystem::new(partition),
            config,
        })
    }

    /// The underlying `y` system.
    pub fn system(&self) -> &YSystem {
        &self.system
    }

    /// Returns a word equal to `word` in the braid group.
    pub fn rewrite<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        word: &BraidWord,
    ) -> Result<BraidWord, WalnutError> {
        let word = word.with_degree(self.degree)?;

        let mut current = self.system.to_y(word.generators());
        for pass in 0..self.config.passes {
            let (next, applied) = self.pass(rng, &current, 2, |rng, pair| {
                self.system
                    .rewrite_pair(rng, pair[0], pair[1])
                    .map(|(_, out)| out.to_vec())
            });
            debug!(stage = "y", pass, applied, length = next.len(), "rewrite pass");
            current = next;
        }

        current = self.system.to_artin(&current);
        for pass in 0..self.config.passes {
            let (next, applied) = self.pass(rng, &current, 2, |_, pair| commute_far(pair));
            debug!(stage = "commute", pass, applied, length = next.len(), "rewrite pass");
            current = next;
        }
        for pass in 0..self.config.passes {
            let (next, applied) = self.pass(rng, &current, 3, |_, triple| {
                apply_braid_relation(triple)
            });
            debug!(stage = "braid", pass, applied, length = next.len(), "rewrite pass");
            current = next;
        }

        Ok(BraidWord::new(self.degree, current)?)
    }

    /// Splits `word` into random blocks, offers one random `width`-letter window
    /// of each block to `replace`, splices any replacement, and free-reduces.
    fn pass<R, F>(
        &self,
        rng: &mut R,
        word: &[Generator],
        width: usize,
        mut replace: F,
    ) -> (Vec<Generator>, usize)
    where
        R: RngCore + CryptoRng,
        F: FnMut(&mut R, &[Generator]) -> Option<Vec<Generator>>,
    {
        let mut out = Vec::with_capacity(word.len() + word.len() / 2);
        let mut applied = 0usize;
        let mut pos = 0usize;
        while pos < word.len() {
            let len = rng.gen_range(self.config.min_block..=self.config.max_block);
            let block = &word[pos..(pos + len).min(word.len())];
            pos += block.len();
            if block.len() < width {
                out.extend_from_slice(block);
                continue;
            }
            let start = rng.gen_range(0..=block.len() - width);
            match replace(rng, &block[start..start + width]) {
                Some(replacement) => {
                    applied += 1;
                    out.extend_from_slice(&block[..start]);
                    out.extend(replacement);
                    out.extend_from_slice(&block[start + width..]);
                }
                None => out.extend_from_slice(block),
            }
        }
        (free_reduce(&out), applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emult::{e_multiply, EvaluationContext, RepresentationState};
    use crate::field::GaloisField;
    use crate::matrix::FieldMatrix;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    const T_VALUES: [u32; 8] = [6, 1, 1, 9, 19, 14, 29, 30];

    fn context() -> EvaluationContext {
        EvaluationContext::new(GaloisField::new(5).unwrap(), &T_VALUES).unwrap()
    }

    fn reference_system() -> YSystem {
        YSystem::new(&Partition::new(vec![3, 4], 8).unwrap())
    }

    fn test_state(rng: &mut ChaCha20Rng, ctx: &EvaluationContext) -> RepresentationState {
        let mut state = RepresentationState::identity(8);
        state.matrix = FieldMatrix::random(rng, 8, ctx.field());
        let w = BraidWord::random(rng, 8, 15..=15).unwrap();
        e_multiply(&state, &w, ctx).unwrap()
    }

    fn image(
        state: &RepresentationState,
        word: &[Generator],
        ctx: &EvaluationContext,
    ) -> RepresentationState {
        e_multiply(state, &BraidWord::new(8, word.to_vec()).unwrap(), ctx).unwrap()
    }

    #[test]
    fn partition_validation() {
        assert_eq!(Partition::new(vec![3, 4], 8).unwrap().boundaries(), vec![1, 4, 8]);
        assert!(matches!(
            Partition::new(vec![2, 5], 8),
            Err(WalnutError::InvalidPartition { expected_sum: 7, .. })
        ));
        assert!(Partition::new(vec![3, 3], 8).is_err());
        assert!(Partition::new(vec![], 1).is_err());
    }

    #[test]
    fn default_partitions() {
        assert_eq!(Partition::for_degree(8).unwrap().parts(), &[3, 4]);
        assert_eq!(Partition::for_degree(10).unwrap().parts(), &[3, 3, 3]);
        assert_eq!(Partition::for_degree(12).unwrap().parts(), &[3, 3, 5]);
        assert_eq!(Partition::for_degree(4).unwrap().parts(), &[3]);
        assert!(Partition::for_degree(3).is_err());
    }

    #[test]
    fn y_system_of_reference_partition() {
        let system = reference_system();
        assert_eq!(system.blocks(), &[(1, 4), (4, 8)]);
        assert_eq!(system.to_artin(&[1]), vec![1, 2, 3]);
        assert_eq!(system.to_artin(&[5]), vec![5, 6, 7]);
        assert_eq!(system.to_y(&[2]), vec![2, -3]);
        assert_eq!(system.to_y(&[3]), vec![3]);
        assert_eq!(system.to_y(&[-4]), vec![5, -4]);
    }

    #[test]
    fn y_conversion_round_trips() {
        let system = reference_system();
        let mut rng = ChaCha20Rng::from_seed([31u8; 32]);
        for _ in 0..50 {
            let w = BraidWord::random(&mut rng, 8, 5..=30).unwrap().free_reduce();
            assert_eq!(system.to_artin(&system.to_y(w.generators())), w.generators());
        }
    }

    #[test]
    fn every_correspondence_preserves_the_image() {
        let ctx = context();
        let system = reference_system();
        let mut rng = ChaCha20Rng::from_seed([32u8; 32]);
        let state = test_state(&mut rng, &ctx);
        let letters: Vec<Generator> = (-7..=7).filter(|&g| g != 0).collect();
        let mut fired = [0usize; CORRESPONDENCE_COUNT as usize];
        for &x in &letters {
            for &y in &letters {
                for _ in 0..3 {
                    let Some((id, out)) = system.rewrite_pair(&mut rng, x, y) else {
                        continue;
                    };
                    fired[usize::from(id) - 1] += 1;
                    assert_eq!(
                        image(&state, &system.to_artin(&[x, y]), &ctx),
                        image(&state, &system.to_artin(&out), &ctx),
                        "correspondence {id} on ({x}, {y}) -> {out:?}"
                    );
                }
            }
        }
        assert!(fired.iter().all(|&count| count > 0), "fired: {fired:?}");
    }

    #[test]
    fn correspondence_nine_fires() {
        let system = reference_system();
        let mut rng = ChaCha20Rng::from_seed([33u8; 32]);
        assert_eq!(system.rewrite_pair(&mut rng, -6, -4), Some((9, [-7, -4, -7])));
    }

    #[test]
    fn unmatched_pairs_are_left_alone() {
        let system = reference_system();
        let mut rng = ChaCha20Rng::from_seed([34u8; 32]);
        // A block boundary separates 3 and 5.
        assert_eq!(system.rewrite_pair(&mut rng, 3, 5), None);
    }

    #[test]
    fn local_relations() {
        assert_eq!(commute_far(&[1, -3]), Some(vec![-3, 1]));
        assert_eq!(commute_far(&[2, -3]), None);
        assert_eq!(apply_braid_relation(&[2, 3, 2]), Some(vec![3, 2, 3]));
        assert_eq!(apply_braid_relation(&[-4, -3, -4]), Some(vec![-3, -4, -3]));
        assert_eq!(apply_braid_relation(&[2, -3, 2]), None);
    }

    #[test]
    fn rewriting_preserves_the_image() {
        let ctx = context();
        let partition = Partition::new(vec![3, 4], 8).unwrap();
        let rewriter = StochasticRewriter::new(&partition, RewriteConfig::default()).unwrap();
        let mut rng = ChaCha20Rng::from_seed([35u8; 32]);
        let state = test_state(&mut rng, &ctx);
        let mut changed = 0;
        for _ in 0..30 {
            let w = BraidWord::random(&mut rng, 8, 20..=120).unwrap().free_reduce();
            let rewritten = rewriter.rewrite(&mut rng, &w).unwrap();
            if rewritten != w {
                changed += 1;
            }
            assert_eq!(
                e_multiply(&state, &w, &ctx).unwrap(),
                e_multiply(&state, &rewritten, &ctx).unwrap()
            );
        }
        assert!(changed > 0);
    }

    fn generators_strategy() -> impl Strategy<Value = Vec<Generator>> {
        proptest::collection::vec(
            (1..=7i32, any::<bool>()).prop_map(|(g, neg)| if neg { -g } else { g }),
            0..80,
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn rewrite_keeps_e_multiplication_image(
            generators in generators_strategy(),
            seed in any::<u64>(),
        ) {
            let ctx = context();
            let partition = Partition::new(vec![3, 4], 8).unwrap();
            let rewriter = StochasticRewriter::new(&partition, RewriteConfig::default()).unwrap();
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let state = test_state(&mut rng, &ctx);
            let w = BraidWord::new(8, generators).unwrap();
            let rewritten = rewriter.rewrite(&mut rng, &w).unwrap();
            prop_assert_eq!(rewritten.degree(), 8);
            prop_assert_eq!(rewritten.permutation(), w.permutation());
            prop_assert_eq!(
                e_multiply(&state, &w, &ctx).unwrap(),
                e_multiply(&state, &rewritten, &ctx).unwrap()
            );
        }

        #[test]
        fn y_round_trip_is_free_reduction(generators in generators_strategy()) {
            let system = reference_system();
            prop_assert_eq!(
                system.to_artin(&system.to_y(&generators)),
                free_reduce(&generators)
            );
        }
    }

    #[test]
    fn rejects_words_beyond_partition_degree() {
        let partition = Partition::new(vec![3, 4], 8).unwrap();
        let rewriter = StochasticRewriter::new(&partition, RewriteConfig::default()).unwrap();
        let mut rng = ChaCha20Rng::from_seed([36u8; 32]);
        let w = BraidWord::new(10, vec![9]).unwrap();
        assert!(matches!(
            rewriter.rewrite(&mut rng, &w),
            Err(WalnutError::Braid(_))
        ));
        let bad = RewriteConfig {
            min_block: 0,
            ..RewriteConfig::default()
        };
        assert!(StochasticRewriter::new(&partition, bad).is_err());
    }
}
