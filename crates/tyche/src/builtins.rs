//! Commands every bot understands: `join`, `leave` and `help`.

use tyche_protocol::Jid;

use crate::{BotLogic, Command, Context, Handler, Reply, Router, RouterError};

const JOIN_USAGE: &str = "Usage: join room@service";
const LEAVE_USAGE: &str = "Usage: leave room@service";

/// Registers the built-ins ahead of any application command.
pub(crate) fn register<L: BotLogic>(router: &mut Router<Handler<L>>) -> Result<(), RouterError> {
    router.register(r"[Jj]oin\b", "join room@service: join a chat room.", join::<L>)?;
    router.register(r"[Ll]eave\b", "leave room@service: leave a chat room.", leave::<L>)?;
    router.register(
        r"[Hh]elp\b",
        "help [command]: list commands, or explain one.",
        help::<L>,
    )?;
    Ok(())
}

/// `room@service`, and nothing else.
fn parse_room(args: &str) -> Option<Jid> {
    let (node, domain) = args.split_once('@')?;
    if node.is_empty() || domain.is_empty() || domain.contains('@') || args.contains(' ') {
        return None;
    }
    args.parse::<Jid>().ok().map(|room| room.bare())
}

fn join<L>(_: &mut L, ctx: &mut Context<'_>, cmd: &Command) -> Reply {
    let Some(room) = parse_room(cmd.args()) else {
        return Ok(Some(JOIN_USAGE.to_string()));
    };
    ctx.join(&room)?;
    Ok(Some("Will attempt to join.  See you there.".to_string()))
}

fn leave<L>(_: &mut L, ctx: &mut Context<'_>, cmd: &Command) -> Reply {
    let Some(room) = parse_room(cmd.args()) else {
        return Ok(Some(LEAVE_USAGE.to_string()));
    };
    ctx.leave(&room)?;
    Ok(Some("Left.".to_string()))
}

fn help<L>(_: &mut L, ctx: &mut Context<'_>, cmd: &Command) -> Reply {
    let topic = cmd.args();
    if topic.is_empty() {
        let mut out = String::from("Available commands: ");
        for name in ctx.help().listing() {
            out.push_str("\n * ");
            out.push_str(&name);
        }
        out.push_str("\nRun 'help command' for more information on any command.");
        return Ok(Some(out));
    }
    Ok(Some(
        ctx.help()
            .help_for(topic)
            .map_or_else(|| "No such command.".to_string(), str::to_string),
    ))
}
