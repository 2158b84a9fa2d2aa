//! d6 systems: Orkworld, Wushu, Shadowrun, In Nomine.

use std::collections::BTreeMap;
use std::fmt;

use super::count;
use crate::{DieSource, join};

// ---------------------------------------------------------------------------
// Orkworld
// ---------------------------------------------------------------------------

/// An Orkworld roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrkRoll {
    /// In draw order.
    pub dice: Vec<u32>,
    /// One combined score per distinct face, highest first.
    pub scores: Vec<u32>,
}

impl fmt::Display for OrkRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", join(&self.scores))
    }
}

/// Rolls `dice` d6 and scores each distinct face `k` rolled `c` times as
/// `c + k − 1`.
pub fn orkworld(src: &mut (impl DieSource + ?Sized), dice: u32) -> OrkRoll {
    let pool = src.roll_pool(dice, 6);
    let mut faces: BTreeMap<u32, u32> = BTreeMap::new();
    for &d in &pool {
        *faces.entry(d).or_default() += 1;
    }
    let mut scores: Vec<u32> = faces.iter().map(|(&k, &c)| c + k - 1).collect();
    scores.sort_unstable_by(|a, b| b.cmp(a));
    OrkRoll {
        dice: pool,
        scores,
    }
}

// ---------------------------------------------------------------------------
// Wushu
// ---------------------------------------------------------------------------

/// A Wushu roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WushuRoll {
    pub dice: Vec<u32>,
    /// Dice at or under the trait.
    pub successes: u32,
}

impl fmt::Display for WushuRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.successes)
    }
}

/// Rolls `dice` d6 and counts those at or under `trait_value`.
pub fn wushu(src: &mut (impl DieSource + ?Sized), dice: u32, trait_value: u32) -> WushuRoll {
    let pool = src.roll_pool(dice, 6);
    let successes = count(&pool, |d| d <= trait_value);
    WushuRoll {
        dice: pool,
        successes,
    }
}

// ---------------------------------------------------------------------------
// Shadowrun
// ---------------------------------------------------------------------------

/// Face used to pad a Shadowrun pool with hits carried over from an
/// earlier roll. It always hits and is never a 1.
pub const LEFTOVER_HIT: u32 = 7;

/// How a Shadowrun roll came out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadowrunOutcome {
    /// A glitch with no hits.
    CriticalGlitch,
    /// Hits, but more than half the dice were 1s.
    Glitch(u32),
    Hits(u32),
}

/// A Shadowrun pool roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowrunRoll {
    /// Every die shown, leftover padding included, sorted ascending.
    pub dice: Vec<u32>,
    pub hits: u32,
    pub outcome: ShadowrunOutcome,
}

impl ShadowrunRoll {
    /// `true` for both kinds of glitch.
    pub fn is_glitch(&self) -> bool {
        !matches!(self.outcome, ShadowrunOutcome::Hits(_))
    }
}

impl fmt::Display for ShadowrunRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dice = join(&self.dice);
        match self.outcome {
            ShadowrunOutcome::CriticalGlitch => write!(f, "Critical glitch! ({dice})"),
            ShadowrunOutcome::Glitch(n) => write!(f, "{n} hits and a glitch. ({dice})"),
            ShadowrunOutcome::Hits(n) => write!(f, "{n} hits. ({dice})"),
        }
    }
}

/// Rolls a Shadowrun pool of `pool` d6 and scores it.
///
/// `leftover` pads the pool with [`LEFTOVER_HIT`] dice. With the rule of
/// six, every 6 adds another die, repeatedly. A 5 or 6 is a hit; more
/// than half the dice showing 1 is a glitch.
pub fn shadowrun(
    src: &mut (impl DieSource + ?Sized),
    pool: u32,
    leftover: u32,
    rule_of_six: bool,
) -> ShadowrunRoll {
    let mut dice = src.roll_pool(pool, 6);
    if rule_of_six {
        let mut sixes = count(&dice, |d| d == 6);
        while sixes > 0 {
            let more = src.roll_pool(sixes, 6);
            sixes = count(&more, |d| d == 6);
            dice.extend(more);
        }
    }
    dice.extend(std::iter::repeat_n(LEFTOVER_HIT, leftover as usize));
    dice.sort_unstable();
    score_shadowrun(dice)
}

/// Scores an already-rolled Shadowrun pool.
pub(crate) fn score_shadowrun(dice: Vec<u32>) -> ShadowrunRoll {
    let glitch = count(&dice, |d| d == 1) as usize * 2 > dice.len();
    let hits = count(&dice, |d| d >= 5);
    let outcome = match (glitch, hits) {
        (true, 0) => ShadowrunOutcome::CriticalGlitch,
        (true, n) => ShadowrunOutcome::Glitch(n),
        (false, n) => ShadowrunOutcome::Hits(n),
    };
    ShadowrunRoll {
        dice,
        hits,
        outcome,
    }
}

// ---------------------------------------------------------------------------
// In Nomine
// ---------------------------------------------------------------------------

/// How an In Nomine roll came out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InNomineOutcome {
    /// All three dice came up 1.
    DivineIntervention,
    /// All three dice came up 6.
    InfernalIntervention,
    Success,
    Failure,
}

/// An In Nomine roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InNomineRoll {
    /// The two d6 compared against the skill.
    pub dice: [u32; 2],
    /// The check digit.
    pub check: u32,
    pub outcome: InNomineOutcome,
}

impl fmt::Display for InNomineRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            InNomineOutcome::DivineIntervention => write!(f, "Divine intervention!"),
            InNomineOutcome::InfernalIntervention => write!(f, "Infernal intervention!"),
            InNomineOutcome::Success => write!(f, "Success. ({})", self.check),
            InNomineOutcome::Failure => write!(f, "Failure. ({})", self.check),
        }
    }
}

/// Rolls 2d6 against `skill`, plus a d6 check digit.
pub fn in_nomine(src: &mut (impl DieSource + ?Sized), skill: i32) -> InNomineRoll {
    let dice = [src.roll(6), src.roll(6)];
    let check = src.roll(6);
    let sum = dice[0] + dice[1];
    let outcome = match sum + check {
        3 => InNomineOutcome::DivineIntervention,
        18 => InNomineOutcome::InfernalIntervention,
        _ if sum as i32 <= skill => InNomineOutcome::Success,
        _ => InNomineOutcome::Failure,
    };
    InNomineRoll {
        dice,
        check,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScriptedDice;

    #[test]
    fn test_orkworld_groups_by_face() {
        // Faces: 3 x2, 5 x1, 6 x3 -> 4, 5, 8.
        let mut dice = ScriptedDice::new([3, 6, 5, 6, 3, 6]);
        let roll = orkworld(&mut dice, 6);
        assert_eq!(roll.scores, vec![8, 5, 4]);
        assert_eq!(roll.to_string(), "8, 5, 4");
    }

    #[test]
    fn test_orkworld_equal_scores_both_listed() {
        // 1 x3 -> 3; 3 x1 -> 3.
        let mut dice = ScriptedDice::new([1, 1, 1, 3]);
        assert_eq!(orkworld(&mut dice, 4).to_string(), "3, 3");
    }

    #[test]
    fn test_wushu_counts_under_trait() {
        let mut dice = ScriptedDice::new([1, 4, 5, 6, 2]);
        let roll = wushu(&mut dice, 5, 4);
        assert_eq!(roll.to_string(), "3");
    }

    #[test]
    fn test_shadowrun_hits() {
        let mut dice = ScriptedDice::new([5, 2, 6, 3]);
        let roll = shadowrun(&mut dice, 4, 0, false);
        assert_eq!(roll.to_string(), "2 hits. (2, 3, 5, 6)");
    }

    #[test]
    fn test_shadowrun_glitch_with_hits() {
        let mut dice = ScriptedDice::new([1, 1, 1, 5]);
        let roll = shadowrun(&mut dice, 4, 0, false);
        assert_eq!(roll.to_string(), "1 hits and a glitch. (1, 1, 1, 5)");
    }

    #[test]
    fn test_shadowrun_exactly_half_ones_is_not_a_glitch() {
        let mut dice = ScriptedDice::new([1, 1, 3, 4]);
        let roll = shadowrun(&mut dice, 4, 0, false);
        assert_eq!(roll.outcome, ShadowrunOutcome::Hits(0));
    }

    #[test]
    fn test_shadowrun_critical_glitch() {
        let mut dice = ScriptedDice::new([1, 1, 2]);
        let roll = shadowrun(&mut dice, 3, 0, false);
        assert_eq!(roll.to_string(), "Critical glitch! (1, 1, 2)");
    }

    #[test]
    fn test_shadowrun_leftover_dilutes_glitch() {
        // Two 1s out of three rolled would glitch; two padding dice make
        // it two out of five.
        let mut dice = ScriptedDice::new([1, 1, 4]);
        let roll = shadowrun(&mut dice, 3, 2, false);
        assert_eq!(roll.to_string(), "2 hits. (1, 1, 4, 7, 7)");
    }

    #[test]
    fn test_shadowrun_rule_of_six() {
        // Initial [6, 6, 2]; then [6, 1]; then [3].
        let mut dice = ScriptedDice::new([6, 6, 2, 6, 1, 3]);
        let roll = shadowrun(&mut dice, 3, 0, true);
        assert_eq!(roll.dice, vec![1, 2, 3, 6, 6, 6]);
        assert_eq!(roll.hits, 3);
    }

    #[test]
    fn test_shadowrun_empty_pool() {
        let mut dice = ScriptedDice::new([]);
        assert_eq!(shadowrun(&mut dice, 0, 0, false).to_string(), "0 hits. ()");
    }

    #[test]
    fn test_in_nomine_interventions_checked_first() {
        let mut dice = ScriptedDice::new([1, 1, 1]);
        assert_eq!(in_nomine(&mut dice, 12).to_string(), "Divine intervention!");
        let mut dice = ScriptedDice::new([6, 6, 6]);
        assert_eq!(in_nomine(&mut dice, 12).to_string(), "Infernal intervention!");
    }

    #[test]
    fn test_in_nomine_success_and_failure() {
        let mut dice = ScriptedDice::new([3, 4, 2]);
        assert_eq!(in_nomine(&mut dice, 7).to_string(), "Success. (2)");
        let mut dice = ScriptedDice::new([3, 4, 2]);
        assert_eq!(in_nomine(&mut dice, 6).to_string(), "Failure. (2)");
    }
}
