//! Unisystem step table: Buffy the Vampire Slayer and All Flesh Must Be
//! Eaten.

use std::fmt;

use crate::{DieSource, join};

/// Maps a d10 + skill total to success levels.
///
/// | Total | Levels |
/// |---|---|
/// | ≤ 8 | 0 |
/// | 9–16 | ⌈(total − 8) / 2⌉ |
/// | 17–20 | 5 |
/// | ≥ 21 | ⌈(total − 20) / 3⌉ + 5 |
pub fn step_value(total: i32) -> u32 {
    match total {
        ..=8 => 0,
        9..=16 => ((total - 8 + 1) / 2) as u32,
        17..=20 => 5,
        _ => ((total - 20 + 2) / 3) as u32 + 5,
    }
}

/// A step-table roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRoll {
    /// The first d10.
    pub die: u32,
    /// Follow-up dice from exploding 10s or imploding 1s.
    pub luck: Vec<u32>,
    /// Skill plus the adjusted die.
    pub total: i32,
    /// Success levels from [`step_value`].
    pub levels: u32,
}

impl fmt::Display for StepRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.luck.is_empty() {
            write!(f, "{} (Total: {})", self.levels, self.total)
        } else {
            write!(
                f,
                "{} (Total: {}, roll of luck {})",
                self.levels,
                self.total,
                join(&self.luck)
            )
        }
    }
}

/// Buffy: one d10 plus `skill`. The total saturates at the `i32` bounds.
pub fn btvs(src: &mut (impl DieSource + ?Sized), skill: i32) -> StepRoll {
    let die = src.roll(10);
    let total = skill.saturating_add(die as i32);
    StepRoll {
        die,
        luck: Vec::new(),
        total,
        levels: step_value(total),
    }
}

/// All Flesh: one d10 plus `skill`, where a 10 or a 1 starts a roll of
/// luck.
///
/// On a 10, keep rolling while the dice come up 10; each follow-up adds
/// `roll − 5` when positive. On a 1 (including a 1 that ends a chain of
/// 10s), keep rolling while the dice come up 1; each follow-up subtracts
/// `5 − roll` when the roll is under 5, plus one more for every 1. The
/// very first penalty from a bare 1 costs one extra point.
pub fn allflesh(src: &mut (impl DieSource + ?Sized), skill: i32) -> StepRoll {
    let first = src.roll(10);
    let mut die = first as i32;
    let mut adjusted = die;
    let mut luck = Vec::new();

    while die == 10 {
        let next = src.roll(10);
        luck.push(next);
        adjusted += (next as i32 - 5).max(0);
        die = next as i32;
    }

    while die == 1 {
        let next = src.roll(10);
        luck.push(next);
        let mut penalty = (next as i32 - 5).min(0);
        if penalty < 0 && adjusted == die {
            adjusted -= 1;
        }
        if next == 1 {
            penalty -= 1;
        }
        die = next as i32;
        adjusted += penalty;
    }

    let total = skill.saturating_add(adjusted);
    StepRoll {
        die: first,
        luck,
        total,
        levels: step_value(total),
    }
}
