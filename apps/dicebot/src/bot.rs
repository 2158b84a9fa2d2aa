//! The dice bot itself.

use tyche::prelude::*;
use tyche_dice::cards::CardGame;
use tyche_dice::{DieSource, RngDice};

use crate::store::Store;
use crate::{Mode, roll, social, table};

/// Pools larger than this are refused unless configured otherwise.
pub const DEFAULT_MAX_DICE: u32 = 100;

/// A tabletop RPG dice bot.
///
/// ```rust,ignore
/// let bot = DiceBot::new(MemoryStore::new())
///     .mode(Mode::Owod)
///     .rooms(vec!["ooc@rooms.example.net".parse()?]);
/// ```
pub struct DiceBot {
    pub(crate) mode: Mode,
    pub(crate) max_dice: u32,
    pub(crate) dice: Box<dyn DieSource>,
    pub(crate) store: Box<dyn Store>,
    pub(crate) cards: Option<CardGame>,
    rooms: Vec<Jid>,
}

impl DiceBot {
    /// A bot in the default mode, rolling from the OS entropy source.
    pub fn new(store: impl Store + 'static) -> Self {
        Self {
            mode: Mode::default(),
            max_dice: DEFAULT_MAX_DICE,
            dice: Box::new(RngDice::from_entropy()),
            store: Box::new(store),
            cards: None,
            rooms: Vec::new(),
        }
    }

    /// Replaces the die source.
    pub fn dice(mut self, dice: impl DieSource + 'static) -> Self {
        self.dice = Box::new(dice);
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn max_dice(mut self, max_dice: u32) -> Self {
        self.max_dice = max_dice;
        self
    }

    /// Rooms to join on connect.
    pub fn rooms(mut self, rooms: Vec<Jid>) -> Self {
        self.rooms = rooms;
        self
    }

    pub fn current_mode(&self) -> Mode {
        self.mode
    }

    pub fn store(&self) -> &dyn Store {
        &*self.store
    }

    /// The card game in progress, if any.
    pub fn cards(&self) -> Option<&CardGame> {
        self.cards.as_ref()
    }
}

impl BotLogic for DiceBot {
    fn register(router: &mut Router<Handler<Self>>) -> Result<(), RouterError> {
        router.register(
            r"[Mm]ode\b",
            "mode [list|NAME]: show, list or set the game mode.",
            roll::mode,
        )?;
        router.register(
            r"[Rr]oll\b",
            "roll ARGS: roll dice for the current mode. \
             owod: # at # [s] [w]; nwod: # [#] [r]; exalted, btvs, allflesh, orkworld, \
             innomine: #; qin: (nothing); wushu: # over #; alternity: #, [-]#; \
             pendragon: # [-]#; shadowrun: # [#] [s]; h+e: # [-]# [#]; \
             l5r: #k# at # [u] [e]. Any mode: NdS or NdF terms, e.g. 2d6 d20 4dF.",
            roll::roll,
        )?;
        router.register(
            r"[Ii]nit\b",
            "init NAME:VALUE...: roll initiative (owod and shadowrun modes).",
            roll::init,
        )?;
        router.register(
            r"[Aa]ccount\b",
            "account [-q] [-j] ALIASES...: set your aliases, privately. \
             Quote multi-word aliases. -q: ignore the batsignal. \
             -j: the arguments are your other addresses.",
            social::account,
        )?;
        router.register(
            r"[Ww]ho is\b",
            "who is NAME?: look someone up by alias or address.",
            social::who_is,
        )?;
        router.register(
            r"(?i)batsignal\??$",
            "batsignal[?]: invite everyone listening to this room, or list them.",
            social::batsignal,
        )?;
        router.register(
            r"!\b",
            "!y or !n: confirm or deny another identity's claim on you.",
            social::confirm,
        )?;
        router.register(
            r"[Gg]ive\b",
            "give ALIAS N points: adjust someone's points.",
            social::give,
        )?;
        router.register(
            r"[Ss]huffle\b",
            "shuffle: start a card game with a fresh deck.",
            table::shuffle,
        )?;
        router.register(
            r"[Dd]eal\b",
            "deal N [to PLAYER]: deal cards, sent privately.",
            table::deal,
        )?;
        router.register(r"[Rr]eveal\b", "reveal: show your hand to everyone.", table::reveal)?;
        router.register(r"[Pp]eek\b", "peek: see your hand, privately.", table::peek)?;
        router.register(
            r"[Dd]iscard\b",
            "discard CARD|all: discard a card (e.g. QH, 10S) or your whole hand.",
            table::discard,
        )?;
        router.register(r"[Ff]inish\b", "finish: end the card game.", table::finish)?;
        Ok(())
    }

    fn on_connect(&mut self, ctx: &mut Context<'_>) {
        for room in &self.rooms {
            match ctx.join(room) {
                Ok(()) => tracing::info!(%room, "joining configured room"),
                Err(e) => tracing::warn!(%room, error = %e, "can't join configured room"),
            }
        }
    }
}
