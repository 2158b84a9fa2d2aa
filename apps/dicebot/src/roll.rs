//! `mode`, `roll` and `init`.
//!
//! Each mode has its own argument grammar. When the mode's grammar does
//! not match, `roll` falls back to a generic expression such as
//! `2d6 d20 4dF`.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tyche::prelude::*;
use tyche_dice::generic::Expression;
use tyche_dice::{DieSource, initiative, systems};

use crate::{DiceBot, Mode};

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("roll pattern compiles")
}

static OWOD: LazyLock<Regex> = LazyLock::new(|| pattern(r"^(\d+) at (\d+)( s)?( w)?$"));
static NWOD: LazyLock<Regex> = LazyLock::new(|| pattern(r"^(\d+)( \d+)?( r)?$"));
static SINGLE: LazyLock<Regex> = LazyLock::new(|| pattern(r"^(\d+)$"));
static WUSHU: LazyLock<Regex> = LazyLock::new(|| pattern(r"^(\d+) over (\d+)$"));
static ALTERNITY: LazyLock<Regex> = LazyLock::new(|| pattern(r"^(\d+), (-?\d+)$"));
static PENDRAGON: LazyLock<Regex> = LazyLock::new(|| pattern(r"^(\d+) (-?\d+)$"));
static SHADOWRUN: LazyLock<Regex> = LazyLock::new(|| pattern(r"^(\d+)( \d+)?( s)?$"));
static HEAVEN_EARTH: LazyLock<Regex> = LazyLock::new(|| pattern(r"^(\d+) (-?\d+)( \d+)?$"));
static L5R: LazyLock<Regex> = LazyLock::new(|| pattern(r"^(\d+)k(\d+) at (\d+)( u)?( e)?$"));
static ACTORS: LazyLock<Regex> = LazyLock::new(|| pattern(r"^(\w+:\d+)( \w+:\d+)*$"));

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub(crate) fn mode(bot: &mut DiceBot, _ctx: &mut Context<'_>, cmd: &Command) -> Reply {
    let reply = match cmd.args() {
        "" => bot.mode.to_string(),
        "list" => Mode::names().join(", "),
        name => match name.parse::<Mode>() {
            Ok(mode) => {
                tracing::info!(from = ?cmd.sender(), %mode, "mode changed");
                bot.mode = mode;
                format!("Mode set: {mode}")
            }
            Err(_) => "No such mode.".to_string(),
        },
    };
    Ok(Some(reply))
}

pub(crate) fn roll(bot: &mut DiceBot, _ctx: &mut Context<'_>, cmd: &Command) -> Reply {
    let reply = resolve(bot.mode, cmd.args(), bot.max_dice, &mut *bot.dice)?;
    Ok(Some(reply))
}

pub(crate) fn init(bot: &mut DiceBot, _ctx: &mut Context<'_>, cmd: &Command) -> Reply {
    roll_initiative(bot.mode, cmd.args(), bot.max_dice, &mut *bot.dice)
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Parses `text` as a number, reporting failures as bad values.
fn num<T>(text: &str) -> Result<T, CommandError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    text.trim().parse().map_err(CommandError::malformed)
}

/// The optional group `i`, trimmed.
fn opt<'t>(caps: &Captures<'t>, i: usize) -> Option<&'t str> {
    caps.get(i).map(|m| m.as_str().trim())
}

fn flag(caps: &Captures<'_>, i: usize) -> bool {
    caps.get(i).is_some()
}

fn cap_pool(dice: u64, max_dice: u32) -> Result<(), CommandError> {
    if dice > u64::from(max_dice) {
        return Err(CommandError::malformed(format_args!(
            "{dice} dice is too many, the limit is {max_dice}"
        )));
    }
    Ok(())
}

/// Rolls `args` under `mode`'s rules and renders the result.
pub fn resolve(
    mode: Mode,
    args: &str,
    max_dice: u32,
    src: &mut dyn DieSource,
) -> Result<String, CommandError> {
    if let Some(result) = resolve_mode(mode, args, max_dice, src)? {
        return Ok(result);
    }
    let expr = Expression::parse(args)?;
    cap_pool(expr.total_dice(), max_dice)?;
    Ok(expr.roll(src).to_string())
}

/// The roll under `mode`'s own grammar, or `None` if `args` doesn't fit
/// it.
fn resolve_mode(
    mode: Mode,
    args: &str,
    max_dice: u32,
    src: &mut dyn DieSource,
) -> Result<Option<String>, CommandError> {
    let grammar: &Regex = match mode {
        Mode::Owod => &*OWOD,
        Mode::Nwod => &*NWOD,
        Mode::Exalted | Mode::Btvs | Mode::AllFlesh | Mode::Orkworld | Mode::InNomine => {
            &*SINGLE
        }
        Mode::Qin => {
            return Ok(args.is_empty().then(|| systems::qin(src).to_string()));
        }
        Mode::Wushu => &*WUSHU,
        Mode::Alternity => &*ALTERNITY,
        Mode::Pendragon => &*PENDRAGON,
        Mode::Shadowrun => &*SHADOWRUN,
        Mode::HeavenEarth => &*HEAVEN_EARTH,
        Mode::L5r => &*L5R,
    };
    let Some(caps) = grammar.captures(args) else {
        return Ok(None);
    };

    let result = match mode {
        Mode::Owod => {
            let dice: u32 = num(&caps[1])?;
            cap_pool(dice.into(), max_dice)?;
            systems::owod(src, dice, num(&caps[2])?, flag(&caps, 3), flag(&caps, 4)).to_string()
        }
        Mode::Nwod => {
            let dice: u32 = num(&caps[1])?;
            cap_pool(dice.into(), max_dice)?;
            let again = opt(&caps, 2).map(num).transpose()?.unwrap_or(10);
            systems::nwod(src, dice, again, flag(&caps, 3))?.to_string()
        }
        Mode::Exalted => {
            let dice: u32 = num(&caps[1])?;
            cap_pool(dice.into(), max_dice)?;
            systems::exalted(src, dice).to_string()
        }
        Mode::Btvs => systems::btvs(src, num(&caps[1])?).to_string(),
        Mode::AllFlesh => systems::allflesh(src, num(&caps[1])?).to_string(),
        Mode::Orkworld => {
            let dice: u32 = num(&caps[1])?;
            cap_pool(dice.into(), max_dice)?;
            systems::orkworld(src, dice).to_string()
        }
        Mode::InNomine => systems::in_nomine(src, num(&caps[1])?).to_string(),
        Mode::Wushu => {
            let dice: u32 = num(&caps[1])?;
            cap_pool(dice.into(), max_dice)?;
            systems::wushu(src, dice, num(&caps[2])?).to_string()
        }
        Mode::Alternity => systems::alternity(src, num(&caps[1])?, num(&caps[2])?)?.to_string(),
        Mode::Pendragon => systems::pendragon(src, num(&caps[1])?, num(&caps[2])?).to_string(),
        Mode::Shadowrun => {
            let pool: u32 = num(&caps[1])?;
            let leftover: u32 = opt(&caps, 2).map(num).transpose()?.unwrap_or(0);
            cap_pool(u64::from(pool) + u64::from(leftover), max_dice)?;
            systems::shadowrun(src, pool, leftover, flag(&caps, 3)).to_string()
        }
        Mode::HeavenEarth => {
            let heaven: u32 = num(&caps[1])?;
            cap_pool(heaven.into(), max_dice)?;
            let passing = opt(&caps, 3).map(num).transpose()?.unwrap_or(1);
            systems::heaven_earth(src, heaven, num(&caps[2])?, passing).to_string()
        }
        Mode::L5r => {
            let pool: u32 = num(&caps[1])?;
            cap_pool(pool.into(), max_dice)?;
            systems::l5r(
                src,
                pool,
                num(&caps[2])?,
                num(&caps[3])?,
                flag(&caps, 4),
                flag(&caps, 5),
            )?
            .to_string()
        }
        Mode::Qin => return Ok(None),
    };
    Ok(Some(result))
}

/// Rolls initiative for `name:value` pairs. Only oWoD and Shadowrun have
/// initiative rules; anything else gets no answer.
pub fn roll_initiative(
    mode: Mode,
    args: &str,
    max_dice: u32,
    src: &mut dyn DieSource,
) -> Result<Option<String>, CommandError> {
    if !matches!(mode, Mode::Owod | Mode::Shadowrun) || !ACTORS.is_match(args) {
        return Ok(None);
    }
    let pairs: Vec<(&str, &str)> = args
        .split_whitespace()
        .filter_map(|actor| actor.split_once(':'))
        .collect();

    let order = if mode == Mode::Owod {
        let actors = pairs
            .iter()
            .map(|&(name, value)| Ok((name.to_string(), num::<i32>(value)?)))
            .collect::<Result<Vec<_>, CommandError>>()?;
        initiative::owod_initiative(src, &actors).to_string()
    } else {
        let actors = pairs
            .iter()
            .map(|&(name, value)| {
                let attribute: u32 = num(value)?;
                cap_pool(attribute.into(), max_dice)?;
                Ok((name.to_string(), attribute))
            })
            .collect::<Result<Vec<_>, CommandError>>()?;
        initiative::shadowrun_initiative(src, &actors).to_string()
    };
    Ok(Some(order))
}
