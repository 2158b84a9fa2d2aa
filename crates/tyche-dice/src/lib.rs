//! Dice resolution for tabletop role-playing games.
//!
//! Every supported game system is a plain function that takes a
//! [`DieSource`] and the player's parameters and returns a typed result.
//! Each result keeps the raw dice that produced it, and its `Display`
//! impl renders the reply line the bot sends back.
//!
//! ```rust
//! use tyche_dice::{RngDice, systems};
//!
//! let mut dice = RngDice::seeded(7);
//! let roll = systems::exalted(&mut dice, 6);
//! assert_eq!(roll.dice.len(), 6);
//! println!("{roll}");
//! ```
//!
//! # Modules
//!
//! - [`systems`]: one resolution function per game system
//! - [`generic`]: `NdS` and Fudge dice, and compound expressions
//! - [`initiative`]: initiative ordering for oWoD and Shadowrun
//! - [`cards`]: a 52-card deck with per-player hands

mod error;
mod source;

pub mod cards;
pub mod generic;
pub mod initiative;
pub mod systems;

pub use error::DiceError;
#[cfg(any(test, feature = "testing"))]
pub use source::ScriptedDice;
pub use source::{DieSource, RngDice};

/// Joins values with `", "`, the format every result uses to show its
/// dice.
pub(crate) fn join<T: std::fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
