//! A single 52-card deck dealt into named hands.
//!
//! Every card is always in exactly one place: the deck, one player's hand,
//! or the discard count. [`CardGame::total`] checks that.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::{DiceError, DieSource};

/// Cards in a full deck.
pub const DECK_SIZE: usize = 52;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    fn letter(self) -> char {
        match self {
            Suit::Clubs => 'C',
            Suit::Diamonds => 'D',
            Suit::Hearts => 'H',
            Suit::Spades => 'S',
        }
    }
}

/// Card rank, 2 through ace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rank(u8);

impl Rank {
    pub const JACK: Rank = Rank(11);
    pub const QUEEN: Rank = Rank(12);
    pub const KING: Rank = Rank(13);
    pub const ACE: Rank = Rank(14);

    /// `None` outside 2..=14.
    pub fn new(value: u8) -> Option<Self> {
        (2..=14).contains(&value).then_some(Rank(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = Rank> {
        (2..=14).map(Rank)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            11 => write!(f, "J"),
            12 => write!(f, "Q"),
            13 => write!(f, "K"),
            14 => write!(f, "A"),
            n => write!(f, "{n}"),
        }
    }
}

/// A playing card, written rank then suit letter: `QH`, `10S`, `2C`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit.letter())
    }
}

impl FromStr for Card {
    type Err = DiceError;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DiceError::InvalidCard(s.to_string());
        let upper = s.trim().to_ascii_uppercase();
        let mut chars = upper.chars();
        let suit = match chars.next_back().ok_or_else(invalid)? {
            'C' => Suit::Clubs,
            'D' => Suit::Diamonds,
            'H' => Suit::Hearts,
            'S' => Suit::Spades,
            _ => return Err(invalid()),
        };
        let rank = match chars.as_str() {
            "J" => Rank::JACK,
            "Q" => Rank::QUEEN,
            "K" => Rank::KING,
            "A" => Rank::ACE,
            digits => digits
                .parse::<u8>()
                .ok()
                .and_then(Rank::new)
                .filter(|r| r.value() <= 10)
                .ok_or_else(invalid)?,
        };
        Ok(Card { rank, suit })
    }
}

/// All 52 cards in suit-then-rank order.
pub fn full_deck() -> Vec<Card> {
    Suit::ALL
        .iter()
        .flat_map(|&suit| Rank::all().map(move |rank| Card { rank, suit }))
        .collect()
}

// ---------------------------------------------------------------------------
// CardGame
// ---------------------------------------------------------------------------

/// A shuffled deck and the hands dealt from it.
#[derive(Debug, Clone, Default)]
pub struct CardGame {
    deck: Vec<Card>,
    hands: BTreeMap<String, Vec<Card>>,
    discarded: usize,
}

impl CardGame {
    /// A fresh deck shuffled with Fisher-Yates, drawing each swap index
    /// from `src`.
    ///
    /// Hand-rolled rather than `SliceRandom::shuffle` so the order comes
    /// from the same [`DieSource`] as every other roll, scripted dice
    /// included.
    pub fn shuffled(src: &mut (impl DieSource + ?Sized)) -> Self {
        let mut deck = full_deck();
        for i in (1..deck.len()).rev() {
            let j = src.roll(i as u32 + 1) as usize - 1;
            deck.swap(i, j.min(i));
        }
        Self {
            deck,
            hands: BTreeMap::new(),
            discarded: 0,
        }
    }

    /// Moves `n` cards from the end of the deck into `player`'s hand and
    /// returns them.
    pub fn deal(&mut self, player: &str, n: usize) -> Result<Vec<Card>, DiceError> {
        if n > self.deck.len() {
            return Err(DiceError::NotEnoughCards {
                requested: n,
                remaining: self.deck.len(),
            });
        }
        let dealt: Vec<Card> = self.deck.split_off(self.deck.len() - n);
        self.hands
            .entry(player.to_string())
            .or_default()
            .extend(dealt.iter().copied());
        Ok(dealt)
    }

    /// Discards one card from `player`'s hand, or the whole hand when
    /// `card` is `None`. Returns how many cards went.
    pub fn discard(&mut self, player: &str, card: Option<Card>) -> Result<usize, DiceError> {
        let Some(card) = card else {
            let gone = self.hands.remove(player).map_or(0, |hand| hand.len());
            self.discarded += gone;
            return Ok(gone);
        };
        let not_in_hand = || DiceError::NotInHand {
            player: player.to_string(),
            card,
        };
        let hand = self.hands.get_mut(player).ok_or_else(not_in_hand)?;
        let pos = hand.iter().position(|c| *c == card).ok_or_else(not_in_hand)?;
        hand.remove(pos);
        if hand.is_empty() {
            self.hands.remove(player);
        }
        self.discarded += 1;
        Ok(1)
    }

    /// `player`'s cards in the order they were dealt; empty if none.
    pub fn hand(&self, player: &str) -> &[Card] {
        self.hands.get(player).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn players(&self) -> impl Iterator<Item = &str> {
        self.hands.keys().map(String::as_str)
    }

    /// Cards left in the deck.
    pub fn remaining(&self) -> usize {
        self.deck.len()
    }

    pub fn discarded_count(&self) -> usize {
        self.discarded
    }

    /// Deck plus hands plus discards. Always [`DECK_SIZE`].
    pub fn total(&self) -> usize {
        self.deck.len() + self.hands.values().map(Vec::len).sum::<usize>() + self.discarded
    }
}

/// Formats a hand for a reply: `QH, 10S, 2C`, or `no cards`.
pub fn show_hand(cards: &[Card]) -> String {
    if cards.is_empty() {
        "no cards".to_string()
    } else {
        crate::join(cards)
    }
}
