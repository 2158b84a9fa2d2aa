//! Initiative ordering.
//!
//! Both variants take `(name, value)` pairs in the order the players were
//! listed and return them sorted so the first entry acts first.

use std::fmt;

use crate::systems::score_shadowrun;
use crate::{DieSource, join};

// ---------------------------------------------------------------------------
// Old World of Darkness
// ---------------------------------------------------------------------------

/// One actor's oWoD initiative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwodInitiative {
    pub name: String,
    /// d10 plus the modifier.
    pub total: i32,
    pub modifier: i32,
}

impl fmt::Display for OwodInitiative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.name, self.total, self.modifier)
    }
}

/// A full initiative order, shown comma-joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order<T>(pub Vec<T>);

impl<T: fmt::Display> fmt::Display for Order<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", join(&self.0))
    }
}

/// Rolls d10 + modifier for each actor. Highest total goes first; ties go
/// to the higher modifier, then to whoever was listed first.
pub fn owod_initiative(
    src: &mut (impl DieSource + ?Sized),
    actors: &[(String, i32)],
) -> Order<OwodInitiative> {
    let mut order: Vec<OwodInitiative> = actors
        .iter()
        .map(|(name, modifier)| OwodInitiative {
            name: name.clone(),
            total: (src.roll(10) as i32).saturating_add(*modifier),
            modifier: *modifier,
        })
        .collect();
    order.sort_by(|a, b| (b.total, b.modifier).cmp(&(a.total, a.modifier)));
    Order(order)
}

// ---------------------------------------------------------------------------
// Shadowrun
// ---------------------------------------------------------------------------

/// Glitch marker on a Shadowrun initiative score. Variant order is the
/// tie-break order: a clean roll beats a critical glitch beats a glitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum GlitchTag {
    Clean,
    CriticalGlitch,
    Glitch,
}

impl fmt::Display for GlitchTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlitchTag::Clean => Ok(()),
            GlitchTag::CriticalGlitch => write!(f, "cg"),
            GlitchTag::Glitch => write!(f, "g"),
        }
    }
}

/// One actor's Shadowrun initiative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowrunInitiative {
    pub name: String,
    /// Hits plus the initiative attribute.
    pub score: u32,
    pub tag: GlitchTag,
}

impl fmt::Display for ShadowrunInitiative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}{}", self.name, self.score, self.tag)
    }
}

/// Rolls each actor's attribute as a Shadowrun pool and scores it as hits
/// plus the attribute. Highest score goes first; ties go to the clean
/// roll, then to whoever was listed first.
pub fn shadowrun_initiative(
    src: &mut (impl DieSource + ?Sized),
    actors: &[(String, u32)],
) -> Order<ShadowrunInitiative> {
    let mut order: Vec<ShadowrunInitiative> = actors
        .iter()
        .map(|(name, attribute)| {
            let roll = score_shadowrun(src.roll_pool(*attribute, 6));
            let tag = match (roll.is_glitch(), roll.hits) {
                (false, _) => GlitchTag::Clean,
                (true, 0) => GlitchTag::CriticalGlitch,
                (true, _) => GlitchTag::Glitch,
            };
            ShadowrunInitiative {
                name: name.clone(),
                score: roll.hits.saturating_add(*attribute),
                tag,
            }
        })
        .collect();
    order.sort_by(|a, b| b.score.cmp(&a.score).then(a.tag.cmp(&b.tag)));
    Order(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScriptedDice;

    fn actors<T: Copy>(list: &[(&str, T)]) -> Vec<(String, T)> {
        list.iter().map(|&(n, v)| (n.to_string(), v)).collect()
    }

    #[test]
    fn test_owod_sorted_by_total_then_modifier() {
        // alice 3+5=8, bob 6+2=8, carol 1+9=10
        let mut dice = ScriptedDice::new([3, 6, 1]);
        let order = owod_initiative(
            &mut dice,
            &actors(&[("alice", 5), ("bob", 2), ("carol", 9)]),
        );
        assert_eq!(order.to_string(), "carol: 10 (9), alice: 8 (5), bob: 8 (2)");
    }

    #[test]
    fn test_owod_full_tie_keeps_listed_order() {
        let mut dice = ScriptedDice::new([4, 4]);
        let order = owod_initiative(&mut dice, &actors(&[("zed", 3), ("amy", 3)]));
        assert_eq!(order.to_string(), "zed: 7 (3), amy: 7 (3)");
    }

    #[test]
    fn test_shadowrun_scores_and_tags() {
        // ann: [5, 6, 2] -> 2 hits + 3
        // ben: [1, 1, 2] -> critical glitch, 0 + 3
        // cat: [1, 1, 5] -> glitch, 1 + 3
        let mut dice = ScriptedDice::new([5, 6, 2, 1, 1, 2, 1, 1, 5]);
        let order = shadowrun_initiative(
            &mut dice,
            &actors(&[("ann", 3), ("ben", 3), ("cat", 3)]),
        );
        assert_eq!(order.to_string(), "ann: 5, cat: 4g, ben: 3cg");
    }

    #[test]
    fn test_shadowrun_clean_beats_tagged_on_equal_score() {
        // gus: [1, 1, 5] -> 4g; hal: [5, 2, 2] -> 4.
        let mut dice = ScriptedDice::new([1, 1, 5, 5, 2, 2]);
        let order = shadowrun_initiative(&mut dice, &actors(&[("gus", 3), ("hal", 3)]));
        assert_eq!(order.to_string(), "hal: 4, gus: 4g");
    }

    #[test]
    fn test_shadowrun_critical_glitch_beats_glitch_on_equal_score() {
        // ivy: attribute 4, [1, 1, 1, 5] -> 1 hit, glitch -> 5g
        // jo: attribute 5, [1, 1, 1, 2, 3] -> critical glitch -> 5cg
        let mut dice = ScriptedDice::new([1, 1, 1, 5, 1, 1, 1, 2, 3]);
        let order = shadowrun_initiative(&mut dice, &actors(&[("ivy", 4), ("jo", 5)]));
        assert_eq!(order.to_string(), "jo: 5cg, ivy: 5g");
    }

    #[test]
    fn test_shadowrun_equal_entries_keep_listed_order() {
        let mut dice = ScriptedDice::new([3, 4, 3, 4]);
        let order = shadowrun_initiative(&mut dice, &actors(&[("b", 2), ("a", 2)]));
        assert_eq!(order.to_string(), "b: 2, a: 2");
    }

    #[test]
    fn test_owod_huge_modifier_saturates() {
        let mut dice = ScriptedDice::new([5, 2]);
        let order = owod_initiative(&mut dice, &actors(&[("ann", i32::MAX), ("ben", 1)]));
        assert_eq!(order.to_string(), "ann: 2147483647 (2147483647), ben: 3 (1)");
    }
}
