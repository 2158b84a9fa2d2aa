//! A tabletop RPG dice bot for chat rooms.
//!
//! [`DiceBot`] implements [`tyche::BotLogic`]: it rolls for a dozen game
//! systems, deals cards, and keeps a small account book of aliases,
//! points and who wants to be invited when a game starts.
//!
//! ```text
//! mode owod            → Mode set: owod
//! roll 5 at 6          → 2 (1, 2, 6, 7, 9)
//! roll 2d6 4dF         → 3, 5; +1
//! who is Kit?          → Kit (kit@example.net), 3 points
//! ```

mod bot;
mod mode;
mod roll;
mod social;
mod table;

pub mod store;

pub use bot::{DEFAULT_MAX_DICE, DiceBot};
pub use mode::{Mode, UnknownMode};
pub use roll::{resolve, roll_initiative};
pub use social::split_words;
pub use store::{Account, JsonFileStore, MemoryStore, PendingLink, Store, StoreError};
