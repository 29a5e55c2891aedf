use serde::{Deserialize, Serialize};
use std::fmt;

//
// ─── TAP GRID ──────────────────────────────────────────────────────────────────
//

/// Shuffled tiles for the tap-in-order game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapGrid {
    tiles: Vec<u32>,
}

impl TapGrid {
    pub(crate) fn from_tiles(tiles: Vec<u32>) -> Self {
        Self { tiles }
    }

    #[must_use]
    pub fn tiles(&self) -> &[u32] {
        &self.tiles
    }

    /// Number of tiles, which is also the last value to tap.
    #[must_use]
    pub fn size(&self) -> u32 {
        u32::try_from(self.tiles.len()).unwrap_or(u32::MAX)
    }
}

//
// ─── ARITHMETIC ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
    ];

    /// Exact, non-negative result of `lhs op rhs`, if there is one.
    #[must_use]
    pub fn evaluate(self, lhs: u32, rhs: u32) -> Option<u32> {
        match self {
            Operation::Add => lhs.checked_add(rhs),
            Operation::Subtract => lhs.checked_sub(rhs),
            Operation::Multiply => lhs.checked_mul(rhs),
            Operation::Divide => {
                if rhs == 0 || lhs % rhs != 0 {
                    None
                } else {
                    Some(lhs / rhs)
                }
            }
        }
    }

    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Operation::Add => '+',
            Operation::Subtract => '-',
            Operation::Multiply => '×',
            Operation::Divide => '÷',
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One math-sprint question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MathProblem {
    lhs: u32,
    rhs: u32,
    operation: Operation,
    answer: u32,
}

impl MathProblem {
    /// Builds a problem, or `None` when the expression has no exact
    /// non-negative integer result.
    #[must_use]
    pub fn new(lhs: u32, operation: Operation, rhs: u32) -> Option<Self> {
        let answer = operation.evaluate(lhs, rhs)?;
        Some(Self {
            lhs,
            rhs,
            operation,
            answer,
        })
    }

    /// Trusted constructor for operands the generator already checked.
    pub(crate) fn exact(lhs: u32, operation: Operation, rhs: u32, answer: u32) -> Self {
        debug_assert_eq!(operation.evaluate(lhs, rhs), Some(answer));
        Self {
            lhs,
            rhs,
            operation,
            answer,
        }
    }

    #[must_use]
    pub fn lhs(&self) -> u32 {
        self.lhs
    }

    #[must_use]
    pub fn rhs(&self) -> u32 {
        self.rhs
    }

    #[must_use]
    pub fn operation(&self) -> Operation {
        self.operation
    }

    #[must_use]
    pub fn answer(&self) -> u32 {
        self.answer
    }

    #[must_use]
    pub fn is_answer(&self, value: i64) -> bool {
        value == i64::from(self.answer)
    }
}

impl fmt::Display for MathProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} = ?", self.lhs, self.operation, self.rhs)
    }
}

//
// ─── MEMORY SEQUENCE ───────────────────────────────────────────────────────────
//

/// Digits (1..=9) the player must repeat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRound {
    digits: Vec<u8>,
}

impl SequenceRound {
    pub(crate) fn from_digits(digits: Vec<u8>) -> Self {
        Self { digits }
    }

    #[must_use]
    pub fn digits(&self) -> &[u8] {
        &self.digits
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.digits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<u8> {
        self.digits.get(index).copied()
    }
}

//
// ─── PATTERN ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PatternRule {
    /// Constant difference.
    Arithmetic,
    /// Constant ratio.
    Geometric,
    /// Alternately add and subtract the same step.
    Alternating,
}

impl PatternRule {
    pub const ALL: [PatternRule; 3] = [
        PatternRule::Arithmetic,
        PatternRule::Geometric,
        PatternRule::Alternating,
    ];

    /// First `len` terms of the rule starting at `start` with parameter `step`
    /// (difference or ratio).
    #[must_use]
    pub fn terms(self, start: i64, step: i64, len: usize) -> Vec<i64> {
        let mut terms = Vec::with_capacity(len);
        let mut current = start;
        for i in 0..len {
            terms.push(current);
            current = match self {
                PatternRule::Arithmetic => current + step,
                PatternRule::Geometric => current * step,
                PatternRule::Alternating if i % 2 == 0 => current + step,
                PatternRule::Alternating => current - step,
            };
        }
        terms
    }
}

/// Three visible terms, a hidden fourth, and four shuffled candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternRound {
    rule: PatternRule,
    shown: [i64; 3],
    answer: i64,
    options: [i64; 4],
}

impl PatternRound {
    pub(crate) fn new(rule: PatternRule, shown: [i64; 3], answer: i64, options: [i64; 4]) -> Self {
        Self {
            rule,
            shown,
            answer,
            options,
        }
    }

    #[must_use]
    pub fn rule(&self) -> PatternRule {
        self.rule
    }

    #[must_use]
    pub fn shown(&self) -> [i64; 3] {
        self.shown
    }

    #[must_use]
    pub fn answer(&self) -> i64 {
        self.answer
    }

    #[must_use]
    pub fn options(&self) -> [i64; 4] {
        self.options
    }

    #[must_use]
    pub fn offers(&self, value: i64) -> bool {
        self.options.contains(&value)
    }
}
