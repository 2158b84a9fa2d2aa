//! The [`BotLogic`] trait: the single extension point for applications.

use crate::{Command, CommandError, Context, Router, RouterError};

/// What a handler returns: a reply line, no reply, or a failure whose
/// text becomes the reply.
pub type Reply = Result<Option<String>, CommandError>;

/// A command handler. Plain function pointers keep the table `'static`
/// and let every handler borrow the application mutably.
pub type Handler<L> = fn(&mut L, &mut Context<'_>, &Command) -> Reply;

/// Application behaviour plugged into the bot.
///
/// # Example
///
/// ```rust
/// use tyche::prelude::*;
///
/// #[derive(Default)]
/// struct Counter {
///     hits: u32,
/// }
///
/// impl BotLogic for Counter {
///     fn register(router: &mut Router<Handler<Self>>) -> Result<(), RouterError> {
///         router.register(r"[Cc]ount\b", "Count up by one.", |bot, _ctx, _cmd| {
///             bot.hits += 1;
///             Ok(Some(bot.hits.to_string()))
///         })
///     }
/// }
/// ```
pub trait BotLogic: Sized + 'static {
    /// Adds the application's commands. The built-in `join`, `leave` and
    /// `help` are registered first and so take precedence.
    fn register(router: &mut Router<Handler<Self>>) -> Result<(), RouterError>;

    /// Called once after the bot has authenticated and announced itself.
    fn on_connect(&mut self, _ctx: &mut Context<'_>) {}

    /// Called every `periodic_every` idle ticks.
    fn periodic(&mut self, _ctx: &mut Context<'_>) {}
}
