//! World of Darkness family: success-counting d10 pools.

use std::fmt;

use super::count;
use crate::{DiceError, DieSource, join};

// ---------------------------------------------------------------------------
// Old World of Darkness
// ---------------------------------------------------------------------------

/// How an oWoD roll came out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwodOutcome {
    /// No successes at all, and at least one 1 among the rolled pool.
    Botch,
    /// Net successes after 1s cancel, never negative.
    Successes(u32),
}

/// An oWoD pool roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwodRoll {
    /// Every die rolled, bonus dice included, sorted ascending.
    pub dice: Vec<u32>,
    pub outcome: OwodOutcome,
}

impl fmt::Display for OwodRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            OwodOutcome::Botch => write!(f, "Botch! ({})", join(&self.dice)),
            OwodOutcome::Successes(n) => write!(f, "{n} ({})", join(&self.dice)),
        }
    }
}

/// Rolls `dice` d10 against `difficulty`.
///
/// A specialized roll earns a bonus die for every natural 10, and bonus
/// 10s earn more bonus dice. Spending willpower adds one automatic
/// success. Each natural 1 in the rolled pool then cancels a success;
/// bonus dice never cancel. With no successes before cancellation and
/// at least one 1, the roll botches.
pub fn owod(
    src: &mut (impl DieSource + ?Sized),
    dice: u32,
    difficulty: u32,
    specialized: bool,
    willpower: bool,
) -> OwodRoll {
    let mut pool = src.roll_pool(dice, 10);
    pool.sort_unstable();
    let ones = count(&pool, |d| d == 1);

    if specialized {
        let mut tens = count(&pool, |d| d == 10);
        while tens > 0 {
            let mut bonus = src.roll_pool(tens, 10);
            bonus.sort_unstable();
            tens = count(&bonus, |d| d == 10);
            pool.extend(bonus);
        }
    }
    pool.sort_unstable();

    let successes = count(&pool, |d| d >= difficulty) + u32::from(willpower);
    let outcome = if successes == 0 && ones > 0 {
        OwodOutcome::Botch
    } else {
        OwodOutcome::Successes(successes.saturating_sub(ones))
    };

    OwodRoll {
        dice: pool,
        outcome,
    }
}

// ---------------------------------------------------------------------------
// New World of Darkness
// ---------------------------------------------------------------------------

/// How an nWoD roll came out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NwodOutcome {
    /// A chance die came up 1.
    CriticalFailure,
    Failure,
    Success(u32),
}

/// An nWoD pool roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NwodRoll {
    /// The pool in the order it was built: the initial dice sorted, then
    /// each batch of roll-again dice.
    pub dice: Vec<u32>,
    /// `true` if the pool was empty and a single chance die was rolled.
    pub chance: bool,
    pub outcome: NwodOutcome,
}

impl fmt::Display for NwodRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dice = join(&self.dice);
        match self.outcome {
            NwodOutcome::CriticalFailure => write!(f, "Critical failure! ({dice})"),
            NwodOutcome::Failure => write!(f, "Failure ({dice})"),
            NwodOutcome::Success(n) => write!(f, "Success {n} ({dice})"),
        }
    }
}

/// Rolls an nWoD pool of `dice` d10.
///
/// Dice at 8 or more succeed. Every die at or above `again` adds another
/// die, repeatedly. A rote roll rerolls each initial failure once.
/// An empty pool becomes a single chance die: only a 10 succeeds, only
/// 10s roll again, and a 1 is a critical failure.
///
/// # Errors
/// [`DiceError::InvalidAgain`] if `again` is not 8, 9, or 10.
pub fn nwod(
    src: &mut (impl DieSource + ?Sized),
    dice: u32,
    again: u32,
    rote: bool,
) -> Result<NwodRoll, DiceError> {
    if !(8..=10).contains(&again) {
        return Err(DiceError::InvalidAgain(again));
    }

    let chance = dice < 1;
    let (dice, threshold, again) = if chance { (1, 10, 10) } else { (dice, 8, again) };

    let mut pool = src.roll_pool(dice, 10);
    pool.sort_unstable();

    if chance && pool[0] == 1 {
        return Ok(NwodRoll {
            dice: pool,
            chance,
            outcome: NwodOutcome::CriticalFailure,
        });
    }

    if rote {
        for die in pool.iter_mut().filter(|d| **d < threshold) {
            *die = src.roll(10);
        }
    }

    let mut again_count = count(&pool, |d| d >= again);
    while again_count > 0 {
        let mut batch = src.roll_pool(again_count, 10);
        batch.sort_unstable();
        again_count = count(&batch, |d| d >= again);
        pool.extend(batch);
    }

    let successes = count(&pool, |d| d >= threshold);
    let outcome = if successes == 0 {
        NwodOutcome::Failure
    } else {
        NwodOutcome::Success(successes)
    };

    Ok(NwodRoll {
        dice: pool,
        chance,
        outcome,
    })
}

// ---------------------------------------------------------------------------
// Exalted
// ---------------------------------------------------------------------------

/// How an Exalted roll came out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExaltedOutcome {
    /// No successes; carries the number of 1s.
    Botch(u32),
    Failure,
    Successes(u32),
}

/// An Exalted pool roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExaltedRoll {
    /// Sorted ascending.
    pub dice: Vec<u32>,
    pub outcome: ExaltedOutcome,
}

impl fmt::Display for ExaltedRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            ExaltedOutcome::Botch(ones) => write!(f, "Botch (x{ones})"),
            ExaltedOutcome::Failure => write!(f, "Failure."),
            ExaltedOutcome::Successes(n) => write!(f, "{n} successes."),
        }
    }
}

/// Rolls `dice` d10: 7 or more is a success and a 10 is worth two.
pub fn exalted(src: &mut (impl DieSource + ?Sized), dice: u32) -> ExaltedRoll {
    let mut pool = src.roll_pool(dice, 10);
    pool.sort_unstable();

    let successes = count(&pool, |d| d >= 7) + count(&pool, |d| d == 10);
    let ones = count(&pool, |d| d == 1);
    let outcome = match (successes, ones) {
        (0, 0) => ExaltedOutcome::Failure,
        (0, ones) => ExaltedOutcome::Botch(ones),
        (n, _) => ExaltedOutcome::Successes(n),
    };

    ExaltedRoll {
        dice: pool,
        outcome,
    }
}
