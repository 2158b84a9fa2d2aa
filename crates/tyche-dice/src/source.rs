//! Where die faces come from.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A uniform die-roll primitive.
///
/// Resolution functions draw every face through this trait, so tests can
/// script exact rolls and production can use a real RNG.
pub trait DieSource {
    /// Rolls one die with `sides` faces, returning a value in
    /// `1..=sides`.
    fn roll(&mut self, sides: u32) -> u32;

    /// Rolls `count` dice with `sides` faces, in draw order.
    fn roll_pool(&mut self, count: u32, sides: u32) -> Vec<u32> {
        (0..count).map(|_| self.roll(sides)).collect()
    }
}

impl<T: DieSource + ?Sized> DieSource for &mut T {
    fn roll(&mut self, sides: u32) -> u32 {
        (**self).roll(sides)
    }
}

impl<T: DieSource + ?Sized> DieSource for Box<T> {
    fn roll(&mut self, sides: u32) -> u32 {
        (**self).roll(sides)
    }
}

// ---------------------------------------------------------------------------
// RngDice
// ---------------------------------------------------------------------------

/// A [`DieSource`] backed by a `rand` RNG.
#[derive(Debug, Clone)]
pub struct RngDice<R = StdRng> {
    rng: R,
}

impl RngDice<StdRng> {
    /// Seeds from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// A reproducible sequence for the given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RngDice<R> {
    /// Wraps an existing RNG.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> DieSource for RngDice<R> {
    fn roll(&mut self, sides: u32) -> u32 {
        self.rng.random_range(1..=sides.max(1))
    }
}

// ---------------------------------------------------------------------------
// ScriptedDice
// ---------------------------------------------------------------------------

/// A [`DieSource`] that replays a fixed list of faces, ignoring `sides`.
///
/// # Panics
/// `roll` panics once the script runs out. A test that draws more dice
/// than it scripted is a broken test.
#[cfg(any(test, feature = "testing"))]
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    faces: std::collections::VecDeque<u32>,
    drawn: usize,
}

#[cfg(any(test, feature = "testing"))]
impl ScriptedDice {
    /// Replays `faces` in order.
    pub fn new(faces: impl IntoIterator<Item = u32>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
            drawn: 0,
        }
    }

    /// How many faces have been drawn.
    pub fn drawn(&self) -> usize {
        self.drawn
    }

    /// How many scripted faces are left.
    pub fn remaining(&self) -> usize {
        self.faces.len()
    }
}

#[cfg(any(test, feature = "testing"))]
impl DieSource for ScriptedDice {
    fn roll(&mut self, _sides: u32) -> u32 {
        let Some(face) = self.faces.pop_front() else {
            panic!("scripted dice exhausted after {} draws", self.drawn);
        };
        self.drawn += 1;
        face
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_dice_in_range() {
        let mut dice = RngDice::seeded(42);
        for sides in [1, 2, 6, 10, 20, 100] {
            for _ in 0..200 {
                let v = dice.roll(sides);
                assert!((1..=sides).contains(&v), "d{sides} rolled {v}");
            }
        }
    }

    #[test]
    fn test_rng_dice_deterministic_with_seed() {
        let mut a = RngDice::seeded(99);
        let mut b = RngDice::seeded(99);
        assert_eq!(a.roll_pool(20, 10), b.roll_pool(20, 10));
    }

    #[test]
    fn test_scripted_dice_replays_in_order() {
        let mut dice = ScriptedDice::new([3, 1, 4]);
        assert_eq!(dice.roll_pool(3, 6), vec![3, 1, 4]);
        assert_eq!(dice.drawn(), 3);
        assert_eq!(dice.remaining(), 0);
    }

    #[test]
    #[should_panic(expected = "scripted dice exhausted")]
    fn test_scripted_dice_panics_when_exhausted() {
        let mut dice = ScriptedDice::new([1]);
        dice.roll(6);
        dice.roll(6);
    }

    #[test]
    fn test_trait_object_source() {
        let mut boxed: Box<dyn DieSource> = Box::new(ScriptedDice::new([5, 6]));
        assert_eq!(boxed.roll_pool(2, 6), vec![5, 6]);
    }
}
