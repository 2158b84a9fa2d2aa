//! d10 systems that aren't Storyteller pools: Qin, Heaven & Earth, L5R.

use std::cmp::Ordering;
use std::fmt;

use super::count;
use crate::{DiceError, DieSource, join};

// ---------------------------------------------------------------------------
// Qin
// ---------------------------------------------------------------------------

/// A Qin roll: one yin die against one yang die.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QinRoll {
    pub yin: u32,
    pub yang: u32,
}

impl QinRoll {
    /// Absolute difference between the two dice.
    pub fn value(&self) -> u32 {
        self.yin.abs_diff(self.yang)
    }

    pub fn aspect(&self) -> &'static str {
        match self.yin.cmp(&self.yang) {
            Ordering::Greater => "yin",
            Ordering::Less => "yang",
            Ordering::Equal => "balanced",
        }
    }
}

impl fmt::Display for QinRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.value(), self.aspect())
    }
}

pub fn qin(src: &mut (impl DieSource + ?Sized)) -> QinRoll {
    let yin = src.roll(10);
    let yang = src.roll(10);
    QinRoll { yin, yang }
}

// ---------------------------------------------------------------------------
// Heaven & Earth
// ---------------------------------------------------------------------------

/// A Heaven & Earth roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeavenEarthRoll {
    /// Final dice, in pool order.
    pub dice: Vec<u32>,
    /// Dice at 7 or above, with 10s counting twice.
    pub hits: u32,
    pub passing: u32,
    pub rerolls_used: u32,
    /// Unspent budget out of `|earth|`.
    pub rerolls_left: u32,
}

impl HeavenEarthRoll {
    pub fn passed(&self) -> bool {
        self.hits >= self.passing
    }
}

impl fmt::Display for HeavenEarthRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dice = join(&self.dice);
        match self.hits.cmp(&self.passing) {
            Ordering::Equal => write!(f, "Pass ({dice})")?,
            Ordering::Greater => write!(f, "Pass +{} ({dice})", self.hits - self.passing)?,
            Ordering::Less => write!(f, "Fail -{} ({dice})", self.passing - self.hits)?,
        }
        match self.rerolls_left {
            0 => Ok(()),
            1 => write!(f, " (1 reroll left)"),
            n => write!(f, " ({n} rerolls left)"),
        }
    }
}

/// Rolls `heaven` d10 and spends up to `|earth|` rerolls on them, one die
/// at a time.
///
/// Positive earth rerolls the first die under 7; negative earth rerolls
/// the first die at 7 or above. Spending stops early once no die
/// qualifies.
pub fn heaven_earth(
    src: &mut (impl DieSource + ?Sized),
    heaven: u32,
    earth: i32,
    passing: u32,
) -> HeavenEarthRoll {
    let mut dice = src.roll_pool(heaven, 10);
    let budget = earth.unsigned_abs();
    let qualifies = |d: u32| if earth >= 0 { d < 7 } else { d >= 7 };

    let mut used = 0;
    while used < budget {
        let Some(slot) = dice.iter_mut().find(|d| qualifies(**d)) else {
            break;
        };
        *slot = src.roll(10);
        used += 1;
    }

    let hits = count(&dice, |d| d >= 7) + count(&dice, |d| d == 10);
    HeavenEarthRoll {
        dice,
        hits,
        passing,
        rerolls_used: used,
        rerolls_left: budget - used,
    }
}

// ---------------------------------------------------------------------------
// Legend of the Five Rings
// ---------------------------------------------------------------------------

/// A roll-and-keep roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct L5rRoll {
    /// One total per die after explosions, highest first.
    pub totals: Vec<u32>,
    pub kept: u32,
    pub target: u32,
    /// Sum of the kept totals minus the target number.
    pub margin: i64,
}

impl L5rRoll {
    pub fn succeeded(&self) -> bool {
        self.margin >= 0
    }
}

impl fmt::Display for L5rRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let totals = join(&self.totals);
        if self.succeeded() {
            write!(f, "{} ({totals})", self.margin)
        } else {
            write!(f, "Failure ({totals})")
        }
    }
}

/// Rolls `pool` d10, keeps the best `keep`, and compares with `target`.
///
/// A 10 explodes (roll again and add, repeatedly) unless `unskilled`.
/// With `emphasis`, a die's first 1 is rerolled until it isn't a 1.
pub fn l5r(
    src: &mut (impl DieSource + ?Sized),
    pool: u32,
    keep: u32,
    target: u32,
    unskilled: bool,
    emphasis: bool,
) -> Result<L5rRoll, DiceError> {
    if keep == 0 {
        return Err(DiceError::NothingKept);
    }

    let mut totals: Vec<u32> = (0..pool)
        .map(|_| {
            let mut face = src.roll(10);
            while emphasis && face == 1 {
                face = src.roll(10);
            }
            let mut total = face;
            while !unskilled && face == 10 {
                face = src.roll(10);
                total += face;
            }
            total
        })
        .collect();
    totals.sort_unstable_by(|a, b| b.cmp(a));

    let kept: u32 = totals.iter().take(keep as usize).sum();
    Ok(L5rRoll {
        totals,
        kept: keep,
        target,
        margin: i64::from(kept) - i64::from(target),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScriptedDice;

    #[test]
    fn test_qin_aspects() {
        let mut dice = ScriptedDice::new([8, 3, 2, 9, 5, 5]);
        assert_eq!(qin(&mut dice).to_string(), "5 (yin)");
        assert_eq!(qin(&mut dice).to_string(), "7 (yang)");
        assert_eq!(qin(&mut dice).to_string(), "0 (balanced)");
    }

    #[test]
    fn test_heaven_earth_no_earth() {
        let mut dice = ScriptedDice::new([7, 10, 3]);
        let roll = heaven_earth(&mut dice, 3, 0, 1);
        assert_eq!(roll.hits, 3);
        assert_eq!(roll.to_string(), "Pass +2 (7, 10, 3)");
    }

    #[test]
    fn test_heaven_earth_exact_pass() {
        let mut dice = ScriptedDice::new([8, 2]);
        let roll = heaven_earth(&mut dice, 2, 0, 1);
        assert_eq!(roll.to_string(), "Pass (8, 2)");
    }

    #[test]
    fn test_heaven_earth_positive_earth_rerolls_first_low_die() {
        // [2, 9, 4]: reroll index 0 -> 3, again index 0 -> 8, then index 2.
        let mut dice = ScriptedDice::new([2, 9, 4, 3, 8, 1]);
        let roll = heaven_earth(&mut dice, 3, 3, 3);
        assert_eq!(roll.dice, vec![8, 9, 1]);
        assert_eq!(roll.rerolls_used, 3);
        assert_eq!(roll.to_string(), "Fail -1 (8, 9, 1)");
    }

    #[test]
    fn test_heaven_earth_stops_when_nothing_qualifies() {
        let mut dice = ScriptedDice::new([5, 8, 7]);
        let roll = heaven_earth(&mut dice, 2, 4, 1);
        assert_eq!(roll.dice, vec![7, 8]);
        assert_eq!(roll.rerolls_used, 1);
        assert_eq!(roll.rerolls_left, 3);
        assert_eq!(roll.to_string(), "Pass +1 (7, 8) (3 rerolls left)");
    }

    #[test]
    fn test_heaven_earth_single_reroll_left() {
        let mut dice = ScriptedDice::new([9]);
        let roll = heaven_earth(&mut dice, 1, 1, 1);
        assert_eq!(roll.to_string(), "Pass (9) (1 reroll left)");
    }

    #[test]
    fn test_heaven_earth_negative_earth_rerolls_high_dice() {
        // [10, 3, 7]: -2 rerolls index 0 -> 2, then index 2 -> 5.
        let mut dice = ScriptedDice::new([10, 3, 7, 2, 5]);
        let roll = heaven_earth(&mut dice, 3, -2, 1);
        assert_eq!(roll.dice, vec![2, 3, 5]);
        assert_eq!(roll.rerolls_left, 0);
        assert_eq!(roll.to_string(), "Fail -1 (2, 3, 5)");
    }

    #[test]
    fn test_l5r_keeps_highest() {
        let mut dice = ScriptedDice::new([3, 8, 5]);
        let roll = l5r(&mut dice, 3, 2, 10, false, false).unwrap();
        assert_eq!(roll.totals, vec![8, 5, 3]);
        assert_eq!(roll.to_string(), "3 (8, 5, 3)");
    }

    #[test]
    fn test_l5r_exact_target_is_zero_margin() {
        let mut dice = ScriptedDice::new([4, 6]);
        let roll = l5r(&mut dice, 2, 2, 10, false, false).unwrap();
        assert_eq!(roll.to_string(), "0 (6, 4)");
    }

    #[test]
    fn test_l5r_failure() {
        let mut dice = ScriptedDice::new([2, 3]);
        let roll = l5r(&mut dice, 2, 1, 15, false, false).unwrap();
        assert_eq!(roll.to_string(), "Failure (3, 2)");
    }

    #[test]
    fn test_l5r_tens_explode() {
        let mut dice = ScriptedDice::new([10, 10, 4, 6]);
        let roll = l5r(&mut dice, 2, 1, 20, false, false).unwrap();
        assert_eq!(roll.totals, vec![24, 6]);
        assert_eq!(roll.margin, 4);
    }

    #[test]
    fn test_l5r_unskilled_tens_stay() {
        let mut dice = ScriptedDice::new([10, 6]);
        let roll = l5r(&mut dice, 2, 1, 5, true, false).unwrap();
        assert_eq!(roll.totals, vec![10, 6]);
    }

    #[test]
    fn test_l5r_emphasis_rerolls_ones() {
        let mut dice = ScriptedDice::new([1, 1, 7, 4]);
        let roll = l5r(&mut dice, 2, 2, 0, false, true).unwrap();
        assert_eq!(roll.totals, vec![7, 4]);
    }

    #[test]
    fn test_l5r_keep_more_than_rolled() {
        let mut dice = ScriptedDice::new([5]);
        let roll = l5r(&mut dice, 1, 3, 5, false, false).unwrap();
        assert_eq!(roll.margin, 0);
    }

    #[test]
    fn test_l5r_keep_zero_rejected() {
        let mut dice = ScriptedDice::new([]);
        assert_eq!(
            l5r(&mut dice, 3, 0, 5, false, false),
            Err(DiceError::NothingKept)
        );
    }
}
