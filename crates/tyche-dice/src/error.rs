//! Error types for dice resolution.

use crate::cards::Card;

/// Errors from rolling dice or handling cards.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiceError {
    /// A die was asked to have no faces.
    #[error("a die needs at least one side")]
    ZeroSides,

    /// nWoD roll-again threshold outside 8..=10.
    #[error("roll-again threshold must be 8, 9 or 10, not {0}")]
    InvalidAgain(u32),

    /// Alternity situation step outside the table.
    #[error("Situation step out of range")]
    StepOutOfRange(i32),

    /// L5R keep count of zero.
    #[error("must keep at least one die")]
    NothingKept,

    /// A dice expression term didn't parse.
    #[error("can't read dice expression {0:?}")]
    InvalidExpression(String),

    /// A card name didn't parse.
    #[error("no such card {0:?}")]
    InvalidCard(String),

    /// A deal asked for more cards than the deck holds.
    #[error("only {remaining} cards left, can't deal {requested}")]
    NotEnoughCards { requested: usize, remaining: usize },

    /// A discard named a card the player doesn't hold.
    #[error("{player} isn't holding {card}")]
    NotInHand { player: String, card: Card },
}
