//! d20 systems: Alternity and Pendragon.

use std::fmt;

use crate::{DiceError, DieSource};

// ---------------------------------------------------------------------------
// Alternity
// ---------------------------------------------------------------------------

/// Grade of an Alternity check, worst first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AlternityOutcome {
    /// The control die came up 20.
    CriticalFailure,
    Failure,
    Ordinary,
    Good,
    Amazing,
}

/// An Alternity roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlternityRoll {
    /// The d20 control die.
    pub control: u32,
    /// Signed contribution of the situation die, if one was rolled.
    pub situation: i32,
    /// Control plus situation.
    pub total: i32,
    pub outcome: AlternityOutcome,
}

impl fmt::Display for AlternityRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.outcome {
            AlternityOutcome::CriticalFailure => return write!(f, "Critical Failure!"),
            AlternityOutcome::Failure => "Failure",
            AlternityOutcome::Ordinary => "Ordinary",
            AlternityOutcome::Good => "Good",
            AlternityOutcome::Amazing => "Amazing",
        };
        write!(f, "{label} ({})", self.total)
    }
}

/// Rolls the situation die for `step`: negative steps subtract, positive
/// steps add.
fn situation_die(src: &mut (impl DieSource + ?Sized), step: i32) -> Result<i32, DiceError> {
    // (sign, count, sides)
    let (sign, dice, sides) = match step {
        -4 => (-1, 1, 12),
        -3 => (-1, 1, 8),
        -2 => (-1, 1, 6),
        -1 => (-1, 1, 4),
        0 => return Ok(0),
        1 => (1, 1, 4),
        2 => (1, 1, 6),
        3 => (1, 1, 8),
        4 => (1, 1, 12),
        5 => (1, 1, 20),
        6 => (1, 2, 20),
        _ => return Err(DiceError::StepOutOfRange(step)),
    };
    let sum: u32 = src.roll_pool(dice, sides).iter().sum();
    Ok(sign * sum as i32)
}

/// Rolls an Alternity check against `skill` with situation step
/// `situation` (−4 to 6).
///
/// A natural 20 on the control die fails critically before any situation
/// die is rolled. Otherwise each threshold that holds overrides the one
/// before: over the skill fails, at or under is Ordinary, at or under half
/// is Good, at or under a quarter is Amazing.
pub fn alternity(
    src: &mut (impl DieSource + ?Sized),
    skill: i32,
    situation: i32,
) -> Result<AlternityRoll, DiceError> {
    if !(-4..=6).contains(&situation) {
        return Err(DiceError::StepOutOfRange(situation));
    }

    let control = src.roll(20);
    if control == 20 {
        return Ok(AlternityRoll {
            control,
            situation: 0,
            total: 20,
            outcome: AlternityOutcome::CriticalFailure,
        });
    }

    let modifier = situation_die(src, situation)?;
    let total = control as i32 + modifier;
    let mut outcome = AlternityOutcome::Failure;
    if total <= skill {
        outcome = AlternityOutcome::Ordinary;
    }
    if total <= skill.div_euclid(2) {
        outcome = AlternityOutcome::Good;
    }
    if total <= skill.div_euclid(4) {
        outcome = AlternityOutcome::Amazing;
    }

    Ok(AlternityRoll {
        control,
        situation: modifier,
        total,
        outcome,
    })
}

// ---------------------------------------------------------------------------
// Pendragon
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendragonOutcome {
    /// The die matched the target exactly.
    Critical,
    /// A natural 20 that wasn't a critical.
    Fumble,
    Success,
    Failure,
}

/// A Pendragon roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendragonRoll {
    pub roll: u32,
    /// Skill plus modifiers.
    pub target: i32,
    pub outcome: PendragonOutcome,
}

impl fmt::Display for PendragonRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.outcome {
            PendragonOutcome::Critical => "Critical success!",
            PendragonOutcome::Fumble => "Fumble!",
            PendragonOutcome::Success => "Success",
            PendragonOutcome::Failure => "Failure",
        };
        write!(f, "{label} ({})", self.roll)
    }
}

/// Rolls a d20 against `skill + modifiers`, saturating at the `i32` bounds.
pub fn pendragon(src: &mut (impl DieSource + ?Sized), skill: i32, modifiers: i32) -> PendragonRoll {
    let roll = src.roll(20);
    let target = skill.saturating_add(modifiers);
    let value = roll as i32;
    let outcome = if value == target {
        PendragonOutcome::Critical
    } else if roll == 20 {
        PendragonOutcome::Fumble
    } else if value < target {
        PendragonOutcome::Success
    } else {
        PendragonOutcome::Failure
    };
    PendragonRoll {
        roll,
        target,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScriptedDice;

    #[test]
    fn test_alternity_step_range() {
        let mut dice = ScriptedDice::new([]);
        assert_eq!(
            alternity(&mut dice, 10, 7),
            Err(DiceError::StepOutOfRange(7))
        );
        assert_eq!(
            alternity(&mut dice, 10, -5),
            Err(DiceError::StepOutOfRange(-5))
        );
        assert_eq!(
            DiceError::StepOutOfRange(7).to_string(),
            "Situation step out of range"
        );
    }

    #[test]
    fn test_alternity_natural_twenty_ignores_situation() {
        // Only the control die is drawn.
        let mut dice = ScriptedDice::new([20]);
        let roll = alternity(&mut dice, 30, -4).unwrap();
        assert_eq!(roll.to_string(), "Critical Failure!");
        assert_eq!(dice.drawn(), 1);
    }

    #[test]
    fn test_alternity_grades() {
        let cases = [
            (15, "Failure (15)"),
            (12, "Ordinary (12)"),
            (6, "Good (6)"),
            (3, "Amazing (3)"),
        ];
        for (control, expected) in cases {
            let mut dice = ScriptedDice::new([control]);
            assert_eq!(alternity(&mut dice, 12, 0).unwrap().to_string(), expected);
        }
    }

    #[test]
    fn test_alternity_negative_step_subtracts() {
        // 14 - d6(5) = 9, at or under 10.
        let mut dice = ScriptedDice::new([14, 5]);
        let roll = alternity(&mut dice, 10, -2).unwrap();
        assert_eq!(roll.situation, -5);
        assert_eq!(roll.to_string(), "Ordinary (9)");
    }

    #[test]
    fn test_alternity_step_six_rolls_two_d20() {
        let mut dice = ScriptedDice::new([2, 7, 9]);
        let roll = alternity(&mut dice, 10, 6).unwrap();
        assert_eq!(roll.total, 18);
        assert_eq!(roll.outcome, AlternityOutcome::Failure);
    }

    #[test]
    fn test_alternity_odd_skill_floors_thresholds() {
        // Skill 9: Good at 4 or less, Amazing at 2 or less.
        let mut dice = ScriptedDice::new([5, 4, 3, 2]);
        assert_eq!(alternity(&mut dice, 9, 0).unwrap().outcome, AlternityOutcome::Ordinary);
        assert_eq!(alternity(&mut dice, 9, 0).unwrap().outcome, AlternityOutcome::Good);
        assert_eq!(alternity(&mut dice, 9, 0).unwrap().outcome, AlternityOutcome::Good);
        assert_eq!(alternity(&mut dice, 9, 0).unwrap().outcome, AlternityOutcome::Amazing);
    }

    #[test]
    fn test_pendragon_outcomes() {
        let mut dice = ScriptedDice::new([12, 20, 5, 16]);
        assert_eq!(pendragon(&mut dice, 10, 2).to_string(), "Critical success! (12)");
        assert_eq!(pendragon(&mut dice, 10, 2).to_string(), "Fumble! (20)");
        assert_eq!(pendragon(&mut dice, 10, 2).to_string(), "Success (5)");
        assert_eq!(pendragon(&mut dice, 10, 2).to_string(), "Failure (16)");
    }

    #[test]
    fn test_pendragon_twenty_on_target_twenty_is_critical() {
        let mut dice = ScriptedDice::new([20]);
        assert_eq!(pendragon(&mut dice, 18, 2).outcome, PendragonOutcome::Critical);
    }

    #[test]
    fn test_pendragon_huge_target_saturates() {
        let mut dice = ScriptedDice::new([5]);
        let roll = pendragon(&mut dice, i32::MAX, 1);
        assert_eq!(roll.target, i32::MAX);
        assert_eq!(roll.outcome, PendragonOutcome::Success);
    }
}
