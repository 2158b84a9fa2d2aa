//! Accounts and the commands built on them: `account`, `!`, `who is`,
//! `batsignal` and `give`.

use clap::Parser;
use tyche::prelude::*;

use crate::DiceBot;
use crate::store::{Account, PendingLink, StoreError};

impl From<StoreError> for CommandError {
    fn from(err: StoreError) -> Self {
        tracing::warn!(error = %err, "store failure");
        CommandError::fault(err)
    }
}

/// Options for `account`.
#[derive(Debug, Parser)]
#[command(name = "account", disable_help_flag = true, disable_version_flag = true)]
struct AccountArgs {
    /// Ignore the batsignal.
    #[arg(short = 'q')]
    quiet: bool,

    /// Treat the names as other addresses of this user.
    #[arg(short = 'j')]
    jids: bool,

    names: Vec<String>,
}

/// Splits `line` on whitespace, keeping quoted runs together.
///
/// Single and double quotes both group; a backslash outside single
/// quotes escapes the next character.
pub fn split_words(line: &str) -> Result<Vec<String>, CommandError> {
    let mut words = Vec::new();
    let mut word = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some('\''), c) => word.push(c),
            (_, '\\') => {
                let escaped = chars
                    .next()
                    .ok_or_else(|| CommandError::malformed("trailing backslash"))?;
                word.push(escaped);
                in_word = true;
            }
            (Some(_), c) => word.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut word));
                    in_word = false;
                }
            }
            (None, c) => {
                word.push(c);
                in_word = true;
            }
        }
    }
    if quote.is_some() {
        return Err(CommandError::malformed("unclosed quote"));
    }
    if in_word {
        words.push(word);
    }
    Ok(words)
}

/// The first line of a clap error, without its `error: ` prefix.
fn clap_summary(err: &clap::Error) -> String {
    let text = err.to_string();
    let line = text.lines().next().unwrap_or_default();
    line.strip_prefix("error: ").unwrap_or(line).to_string()
}

fn bare_sender(cmd: &Command) -> Option<Jid> {
    cmd.sender().map(Jid::bare)
}

// ---------------------------------------------------------------------------
// account
// ---------------------------------------------------------------------------

pub(crate) fn account(bot: &mut DiceBot, ctx: &mut Context<'_>, cmd: &Command) -> Reply {
    if cmd.is_groupchat() {
        return Ok(Some("Please use this in a private chat.".to_string()));
    }
    let Some(owner) = bare_sender(cmd) else {
        return Ok(None);
    };
    if cmd.args().is_empty() {
        return Ok(None);
    }

    let words = split_words(cmd.args())?;
    let opts = AccountArgs::try_parse_from(std::iter::once("account".to_string()).chain(words))
        .map_err(|e| CommandError::malformed(clap_summary(&e)))?;

    let owner_key = owner.to_string();
    let mut account = bot
        .store
        .account(&owner_key)?
        .unwrap_or_else(|| Account::new(&owner_key));
    account.batsignal = !opts.quiet;

    if !opts.jids {
        if !opts.names.is_empty() {
            account.aliases = opts.names;
        }
        let reply = account.to_string();
        bot.store.save_account(account)?;
        return Ok(Some(reply));
    }

    if opts.names.is_empty() {
        return Err(CommandError::malformed("-j needs at least one address"));
    }
    let others = opts
        .names
        .iter()
        .map(|name| name.parse::<Jid>().map(|j| j.bare()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(CommandError::malformed)?;

    bot.store.save_account(account)?;
    let request = format!(
        "{owner} claims you are another Jabber identity of theirs; if this is false, \
         ignore this message or reply with !n.  If it is true, reply with !y."
    );
    for other in others {
        bot.store.save_pending(PendingLink {
            primary: owner_key.clone(),
            additional: other.to_string(),
        })?;
        tracing::info!(%owner, %other, "identity link requested");
        ctx.send_private(other, request.clone());
    }
    Ok(Some("Message sent to other identity.".to_string()))
}

// ---------------------------------------------------------------------------
// ! (confirm a link)
// ---------------------------------------------------------------------------

pub(crate) fn confirm(bot: &mut DiceBot, _ctx: &mut Context<'_>, cmd: &Command) -> Reply {
    let Some(additional) = bare_sender(cmd) else {
        return Ok(None);
    };
    let additional = additional.to_string();
    let Some(link) = bot.store.remove_pending(&additional)? else {
        return Ok(Some("Are you IMing me from the right account?".to_string()));
    };

    let approved = cmd.line().trim_matches('!').eq_ignore_ascii_case("y");
    let primary = if approved {
        bot.store.account(&link.primary)?
    } else {
        None
    };
    let Some(mut primary) = primary else {
        return Ok(Some("Sorry to trouble you.".to_string()));
    };
    if !primary.linked_jids.iter().any(|j| *j == additional) {
        primary.linked_jids.push(additional.clone());
    }
    tracing::info!(primary = %primary.jid, %additional, "identity linked");
    bot.store.save_account(primary)?;
    Ok(Some("Thank you!".to_string()))
}

// ---------------------------------------------------------------------------
// who is
// ---------------------------------------------------------------------------

pub(crate) fn who_is(bot: &mut DiceBot, _ctx: &mut Context<'_>, cmd: &Command) -> Reply {
    let query = cmd.args().trim_end_matches('?').trim();
    if query.is_empty() {
        return Ok(None);
    }
    let found = bot.store.who_is(query)?;
    if found.is_empty() {
        return Err(CommandError::UnknownEntity);
    }
    Ok(Some(
        found
            .iter()
            .map(Account::to_string)
            .collect::<Vec<_>>()
            .join("\n"),
    ))
}

// ---------------------------------------------------------------------------
// batsignal
// ---------------------------------------------------------------------------

pub(crate) fn batsignal(bot: &mut DiceBot, ctx: &mut Context<'_>, cmd: &Command) -> Reply {
    let Some(room) = cmd.room() else {
        return Ok(Some("Only use this from a Jabber room.".to_string()));
    };
    let listening: Vec<Account> = bot
        .store
        .accounts()?
        .into_iter()
        .filter(|a| a.batsignal)
        .collect();

    if cmd.line().ends_with('?') {
        let list = listening
            .iter()
            .map(Account::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        return Ok((!list.is_empty()).then_some(list));
    }

    for account in &listening {
        match account.jid.parse::<Jid>() {
            Ok(to) => ctx.send(Message::invite(to, &room)),
            Err(e) => tracing::warn!(jid = %account.jid, error = %e, "unaddressable account"),
        }
    }
    tracing::info!(%room, invited = listening.len(), "batsignal");
    Ok(None)
}

// ---------------------------------------------------------------------------
// give
// ---------------------------------------------------------------------------

pub(crate) fn give(bot: &mut DiceBot, _ctx: &mut Context<'_>, cmd: &Command) -> Reply {
    let words: Vec<&str> = cmd.line().split_whitespace().collect();
    let &[_, alias, amount, _] = words.as_slice() else {
        return Ok(None);
    };
    let Ok(amount) = amount.parse::<i64>() else {
        return Ok(None);
    };
    let Some(mut account) = bot.store.find_by_alias(alias)? else {
        return Err(CommandError::UnknownEntity);
    };
    account.points = account.points.saturating_add(amount);
    let over = account.points > 9000;
    bot.store.save_account(account)?;
    Ok(Some(
        if over { "WHAT?  OVER 9000!?" } else { "OK." }.to_string(),
    ))
}
