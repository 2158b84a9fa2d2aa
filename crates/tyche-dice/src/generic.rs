//! Plain `NdS` dice, Fudge dice, and compound expressions mixing both.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::{DiceError, DieSource, join};

static TERM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d*)[dD](\d+|[fF])$").expect("term pattern compiles"));

// ---------------------------------------------------------------------------
// Single rolls
// ---------------------------------------------------------------------------

/// `n` dice of `sides` faces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericRoll {
    pub sides: u32,
    pub dice: Vec<u32>,
}

impl GenericRoll {
    pub fn total(&self) -> u32 {
        self.dice.iter().sum()
    }
}

impl fmt::Display for GenericRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", join(&self.dice))
    }
}

pub fn generic(
    src: &mut (impl DieSource + ?Sized),
    n: u32,
    sides: u32,
) -> Result<GenericRoll, DiceError> {
    if sides == 0 {
        return Err(DiceError::ZeroSides);
    }
    Ok(GenericRoll {
        sides,
        dice: src.roll_pool(n, sides),
    })
}

/// `n` Fudge dice, each −1, 0 or +1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FudgeRoll {
    pub dice: Vec<i32>,
}

impl FudgeRoll {
    pub fn total(&self) -> i32 {
        self.dice.iter().sum()
    }
}

impl fmt::Display for FudgeRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.total() {
            0 => write!(f, "0"),
            t if t > 0 => write!(f, "+{t}"),
            t => write!(f, "{t}"),
        }
    }
}

pub fn fudge(src: &mut (impl DieSource + ?Sized), n: u32) -> FudgeRoll {
    FudgeRoll {
        dice: (0..n).map(|_| src.roll(3) as i32 - 2).collect(),
    }
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

/// One term of an expression: `3d6`, `d20`, `4dF`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term {
    Dice { n: u32, sides: u32 },
    Fudge { n: u32 },
}

impl Term {
    /// Number of dice this term rolls.
    pub fn dice(&self) -> u32 {
        match *self {
            Term::Dice { n, .. } | Term::Fudge { n } => n,
        }
    }
}

impl FromStr for Term {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DiceError::InvalidExpression(s.to_string());
        let caps = TERM.captures(s).ok_or_else(invalid)?;
        let n = match &caps[1] {
            "" => 1,
            digits => digits.parse().map_err(|_| invalid())?,
        };
        let sides = &caps[2];
        if sides.eq_ignore_ascii_case("f") {
            return Ok(Term::Fudge { n });
        }
        match sides.parse().map_err(|_| invalid())? {
            0 => Err(DiceError::ZeroSides),
            sides => Ok(Term::Dice { n, sides }),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Dice { n, sides } => write!(f, "{n}d{sides}"),
            Term::Fudge { n } => write!(f, "{n}dF"),
        }
    }
}

/// A rolled term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermRoll {
    Dice(GenericRoll),
    Fudge(FudgeRoll),
}

impl fmt::Display for TermRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TermRoll::Dice(roll) => write!(f, "{roll}"),
            TermRoll::Fudge(roll) => write!(f, "{roll}"),
        }
    }
}

/// Terms separated by whitespace or commas, e.g. `2d6, 4dF d20`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    terms: Vec<Term>,
}

impl Expression {
    pub fn parse(input: &str) -> Result<Self, DiceError> {
        let terms = input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<Term>, _>>()?;
        if terms.is_empty() {
            return Err(DiceError::InvalidExpression(input.to_string()));
        }
        Ok(Self { terms })
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Dice across all terms, for enforcing a pool cap.
    pub fn total_dice(&self) -> u64 {
        self.terms.iter().map(|t| u64::from(t.dice())).sum()
    }

    pub fn roll(&self, src: &mut (impl DieSource + ?Sized)) -> ExpressionRoll {
        let parts = self
            .terms
            .iter()
            .map(|term| match *term {
                Term::Dice { n, sides } => TermRoll::Dice(GenericRoll {
                    sides,
                    dice: src.roll_pool(n, sides),
                }),
                Term::Fudge { n } => TermRoll::Fudge(fudge(&mut *src, n)),
            })
            .collect();
        ExpressionRoll { parts }
    }
}

impl FromStr for Expression {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A rolled expression; shows its parts joined with `"; "`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionRoll {
    pub parts: Vec<TermRoll>,
}

impl fmt::Display for ExpressionRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{part}")?;
        }
        Ok(())
    }
}
