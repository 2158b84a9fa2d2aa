//! The card table: `shuffle`, `deal`, `reveal`, `peek`, `discard` and
//! `finish`.
//!
//! There is one game per bot. Players are known by [`Command::player_key`];
//! hands are sent to them privately.

use std::sync::LazyLock;

use regex::Regex;
use tyche::prelude::*;
use tyche_dice::cards::{Card, CardGame, show_hand};

use crate::DiceBot;

static DEAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)(?: to (\S+))?$").expect("deal pattern compiles")
});

const DEAL_USAGE: &str = "Usage: deal N [to PLAYER]";

fn no_game() -> CommandError {
    CommandError::refused("No game in progress.  Try 'shuffle'.")
}

fn game(bot: &mut DiceBot) -> Result<&mut CardGame, CommandError> {
    bot.cards.as_mut().ok_or_else(no_game)
}

/// The sender's player key and private address.
fn me(cmd: &Command) -> Option<(String, Jid)> {
    Some((cmd.player_key()?, cmd.private_target()?))
}

/// Resolves `name` to a player key and private address. In a room the
/// name is a nickname there; elsewhere it must be an address.
fn player(cmd: &Command, name: &str) -> Result<(String, Jid), CommandError> {
    match cmd.room() {
        Some(room) => Ok((name.to_string(), room.with_resource(name))),
        None => {
            let jid = name.parse::<Jid>().map_err(CommandError::malformed)?.bare();
            Ok((jid.to_string(), jid))
        }
    }
}

fn hand_note(game: &CardGame, key: &str) -> String {
    format!("Your hand: {}", show_hand(game.hand(key)))
}

pub(crate) fn shuffle(bot: &mut DiceBot, _ctx: &mut Context<'_>, cmd: &Command) -> Reply {
    let replaced = bot.cards.is_some();
    let game = CardGame::shuffled(&mut *bot.dice);
    let remaining = game.remaining();
    bot.cards = Some(game);
    tracing::debug!(from = ?cmd.sender(), replaced, "deck shuffled");
    Ok(Some(format!("Shuffled. {remaining} cards in the deck.")))
}

pub(crate) fn deal(bot: &mut DiceBot, ctx: &mut Context<'_>, cmd: &Command) -> Reply {
    let Some(caps) = DEAL.captures(cmd.args()) else {
        return Ok(Some(DEAL_USAGE.to_string()));
    };
    let n: usize = caps[1].parse().map_err(CommandError::malformed)?;
    let (key, target) = match caps.get(2) {
        Some(name) => player(cmd, name.as_str())?,
        None => match me(cmd) {
            Some(me) => me,
            None => return Ok(None),
        },
    };

    let game = game(bot)?;
    game.deal(&key, n)?;
    ctx.send_private(target, hand_note(game, &key));
    let plural = if n == 1 { "" } else { "s" };
    Ok(Some(format!(
        "Dealt {n} card{plural} to {key}. {} left in the deck.",
        game.remaining()
    )))
}

pub(crate) fn reveal(bot: &mut DiceBot, _ctx: &mut Context<'_>, cmd: &Command) -> Reply {
    let Some((key, _)) = me(cmd) else {
        return Ok(None);
    };
    let game = game(bot)?;
    Ok(Some(format!("{key} shows: {}", show_hand(game.hand(&key)))))
}

pub(crate) fn peek(bot: &mut DiceBot, ctx: &mut Context<'_>, cmd: &Command) -> Reply {
    let Some((key, target)) = me(cmd) else {
        return Ok(None);
    };
    let game = game(bot)?;
    ctx.send_private(target, hand_note(game, &key));
    Ok(None)
}

pub(crate) fn discard(bot: &mut DiceBot, _ctx: &mut Context<'_>, cmd: &Command) -> Reply {
    let Some((key, _)) = me(cmd) else {
        return Ok(None);
    };
    let card = match cmd.args() {
        "" => return Ok(Some("Usage: discard CARD|all".to_string())),
        "all" => None,
        name => Some(name.parse::<Card>()?),
    };
    let gone = game(bot)?.discard(&key, card)?;
    let plural = if gone == 1 { "" } else { "s" };
    Ok(Some(format!("Discarded {gone} card{plural}.")))
}

pub(crate) fn finish(bot: &mut DiceBot, _ctx: &mut Context<'_>, _cmd: &Command) -> Reply {
    match bot.cards.take() {
        Some(_) => Ok(Some("Game over.".to_string())),
        None => Err(no_game()),
    }
}
