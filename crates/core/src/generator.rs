//! Random content for the four mini-games.
//!
//! Every function is pure apart from the caller-supplied RNG, so a seeded
//! `StdRng` makes rounds reproducible.

use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

use crate::model::{MathProblem, Operation, PatternRound, PatternRule, SequenceRound, TapGrid};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GenerationError {
    #[error(
        "found only {found} of {wanted} distractors for {answer} within ±{spread} after {attempts} attempts"
    )]
    Exhausted {
        answer: i64,
        spread: i64,
        wanted: usize,
        found: usize,
        attempts: u32,
    },
}

/// Offset window for pattern distractors.
pub const DISTRACTOR_SPREAD: i64 = 10;

/// Sampling budget per offset window.
pub const DISTRACTOR_ATTEMPTS: u32 = 256;

/// How many times the window doubles before falling back to a linear scan.
const MAX_WIDENINGS: u32 = 3;

const DISTRACTORS: usize = 3;

//
// ─── NUMBER TAP ────────────────────────────────────────────────────────────────
//

/// Uniform permutation of `1..=size`.
pub fn tap_grid<R: Rng + ?Sized>(size: u32, rng: &mut R) -> TapGrid {
    let mut tiles: Vec<u32> = (1..=size).collect();
    tiles.shuffle(rng);
    TapGrid::from_tiles(tiles)
}

//
// ─── MATH SPRINT ───────────────────────────────────────────────────────────────
//

/// Random problem whose answer is always an exact, non-negative integer.
///
/// Operand ranges per operator:
/// - add: `[1, 20] + [1, 20]`
/// - subtract: `[10, 29] - [1, 10]`
/// - multiply: `[1, 10] × [1, 10]`
/// - divide: `(d × q) ÷ d` with `d, q` in `[2, 9]`
pub fn math_problem<R: Rng + ?Sized>(rng: &mut R) -> MathProblem {
    let operation = Operation::ALL[rng.random_range(0..Operation::ALL.len())];
    match operation {
        Operation::Add => {
            let lhs = rng.random_range(1..=20);
            let rhs = rng.random_range(1..=20);
            MathProblem::exact(lhs, operation, rhs, lhs + rhs)
        }
        Operation::Subtract => {
            let lhs = rng.random_range(10..=29);
            let rhs = rng.random_range(1..=10);
            MathProblem::exact(lhs, operation, rhs, lhs - rhs)
        }
        Operation::Multiply => {
            let lhs = rng.random_range(1..=10);
            let rhs = rng.random_range(1..=10);
            MathProblem::exact(lhs, operation, rhs, lhs * rhs)
        }
        Operation::Divide => {
            let divisor = rng.random_range(2..=9);
            let quotient = rng.random_range(2..=9);
            MathProblem::exact(divisor * quotient, operation, divisor, quotient)
        }
    }
}

//
// ─── MEMORY ────────────────────────────────────────────────────────────────────
//

/// Sequence length for `level` (1-based) when level 1 starts at `start_length`.
#[must_use]
pub fn memory_length(start_length: usize, level: u32) -> usize {
    let extra = usize::try_from(level.saturating_sub(1)).unwrap_or(usize::MAX);
    start_length.saturating_add(extra)
}

/// `len` independent digits in `1..=9`.
pub fn memory_sequence<R: Rng + ?Sized>(len: usize, rng: &mut R) -> SequenceRound {
    let digits = (0..len).map(|_| rng.random_range(1..=9u8)).collect();
    SequenceRound::from_digits(digits)
}

//
// ─── PATTERN MATCH ─────────────────────────────────────────────────────────────
//

/// Random four-term pattern with three shown terms and four shuffled options.
pub fn pattern_round<R: Rng + ?Sized>(rng: &mut R) -> PatternRound {
    let rule = PatternRule::ALL[rng.random_range(0..PatternRule::ALL.len())];
    let start = rng.random_range(1..=10);
    let step = match rule {
        PatternRule::Arithmetic => rng.random_range(1..=5),
        PatternRule::Geometric => rng.random_range(2..=4),
        PatternRule::Alternating => rng.random_range(1..=4),
    };
    let terms = rule.terms(start, step, 4);
    let shown = [terms[0], terms[1], terms[2]];
    let answer = terms[3];

    let distractors = distractors(answer, rng);
    let mut options = [answer, distractors[0], distractors[1], distractors[2]];
    options.shuffle(rng);

    PatternRound::new(rule, shown, answer, options)
}

/// Three unique positive distractors for `answer`.
///
/// Samples within ±`DISTRACTOR_SPREAD`, doubling the window whenever a
/// window's budget runs out, then scans upwards from the answer.
pub fn distractors<R: Rng + ?Sized>(answer: i64, rng: &mut R) -> [i64; 3] {
    distractors_within(answer, DISTRACTOR_SPREAD, MAX_WIDENINGS, rng)
}

fn distractors_within<R: Rng + ?Sized>(
    answer: i64,
    spread: i64,
    widenings: u32,
    rng: &mut R,
) -> [i64; 3] {
    let mut spread = spread.max(1);
    for _ in 0..=widenings {
        match sample_distractors(answer, spread, DISTRACTOR_ATTEMPTS, rng) {
            Ok(found) => return found,
            Err(GenerationError::Exhausted { .. }) => spread = spread.saturating_mul(2),
        }
    }
    scan_distractors(answer)
}

/// Rejection-samples distractors `answer + offset` with `offset` in
/// `[-spread, spread] \ {0}`, keeping positive, unique values.
///
/// # Errors
///
/// Returns `GenerationError::Exhausted` if `attempts` draws do not produce
/// three distractors.
pub fn sample_distractors<R: Rng + ?Sized>(
    answer: i64,
    spread: i64,
    attempts: u32,
    rng: &mut R,
) -> Result<[i64; 3], GenerationError> {
    let spread = spread.max(1);
    let mut found: Vec<i64> = Vec::with_capacity(DISTRACTORS);
    for _ in 0..attempts {
        let offset = rng.random_range(-spread..=spread);
        let candidate = answer.saturating_add(offset);
        if offset == 0 || candidate <= 0 || found.contains(&candidate) {
            continue;
        }
        found.push(candidate);
        if found.len() == DISTRACTORS {
            return Ok([found[0], found[1], found[2]]);
        }
    }
    Err(GenerationError::Exhausted {
        answer,
        spread,
        wanted: DISTRACTORS,
        found: found.len(),
        attempts,
    })
}

fn scan_distractors(answer: i64) -> [i64; 3] {
    let mut out = [0; 3];
    let mut next = answer.max(0);
    for slot in &mut out {
        next += 1;
        if next == answer {
            next += 1;
        }
        *slot = next;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn tap_grid_is_a_permutation() {
        let mut rng = rng(1);
        for size in [2, 9, 25, 64] {
            let grid = tap_grid(size, &mut rng);
            let mut tiles = grid.tiles().to_vec();
            tiles.sort_unstable();
            assert_eq!(tiles, (1..=size).collect::<Vec<_>>());
            assert_eq!(grid.size(), size);
        }
    }

    #[test]
    fn math_problems_evaluate_to_their_answer() {
        let mut rng = rng(2);
        let mut seen = HashSet::new();
        for _ in 0..2_000 {
            let p = math_problem(&mut rng);
            seen.insert(p.operation());
            assert_eq!(p.operation().evaluate(p.lhs(), p.rhs()), Some(p.answer()));
            if p.operation() == Operation::Divide {
                assert_eq!(p.lhs() % p.rhs(), 0);
                assert!((2..=9).contains(&p.rhs()));
                assert!((2..=9).contains(&p.answer()));
            }
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn memory_sequences_use_digits_one_to_nine() {
        let mut rng = rng(3);
        let round = memory_sequence(40, &mut rng);
        assert_eq!(round.len(), 40);
        assert!(round.digits().iter().all(|d| (1..=9).contains(d)));
    }

    #[test]
    fn memory_length_grows_by_one_per_level() {
        assert_eq!(memory_length(3, 1), 3);
        assert_eq!(memory_length(3, 2), 4);
        assert_eq!(memory_length(3, 10), 12);
        assert_eq!(memory_length(3, 0), 3);
    }

    #[test]
    fn pattern_candidates_are_distinct_positive_and_contain_answer_once() {
        let mut rng = rng(4);
        for _ in 0..2_000 {
            let round = pattern_round(&mut rng);
            let options = round.options();
            let unique: HashSet<_> = options.iter().collect();
            assert_eq!(unique.len(), 4);
            assert!(options.iter().all(|v| *v > 0));
            assert_eq!(options.iter().filter(|v| **v == round.answer()).count(), 1);
        }
    }

    #[test]
    fn pattern_answer_continues_the_shown_terms() {
        let mut rng = rng(5);
        for _ in 0..500 {
            let round = pattern_round(&mut rng);
            let [a, b, c] = round.shown();
            let expected = match round.rule() {
                PatternRule::Arithmetic => c + (b - a),
                PatternRule::Geometric => c * (b / a),
                PatternRule::Alternating => b,
            };
            assert_eq!(round.answer(), expected);
        }
    }

    #[test]
    fn sampling_reports_exhaustion_when_window_is_too_small() {
        let mut rng = rng(6);
        let err = sample_distractors(1, 1, 64, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::Exhausted { answer: 1, spread: 1, found: 1, .. }
        ));
    }

    #[test]
    fn widening_recovers_from_a_small_window() {
        let mut rng = rng(7);
        let found = distractors_within(1, 1, 3, &mut rng);
        assert!(found.iter().all(|v| *v > 1));
        let unique: HashSet<_> = found.iter().collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn scan_is_the_last_resort() {
        let mut rng = rng(8);
        assert_eq!(distractors_within(1, 1, 0, &mut rng).len(), 3);
        assert_eq!(scan_distractors(1), [2, 3, 4]);
        assert_eq!(scan_distractors(-5), [1, 2, 3]);
    }
}
