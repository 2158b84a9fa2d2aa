//! Ordered, regex-keyed command table.
//!
//! Patterns are tried in registration order and the first one that
//! matches at the start of the command line wins. Matching is anchored on
//! the left only, so `roll` matches both `roll 3d6` and `rolling`; a
//! pattern that needs a word boundary must carry its own `\b`.

use regex::Regex;

use crate::RouterError;

/// One registered command.
pub struct Route<H> {
    pattern: String,
    regex: Regex,
    help: String,
    handler: H,
}

impl<H> Route<H> {
    /// The pattern as registered.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Usage text shown by `help <command>`.
    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// The part of `text` after the matched command word, trimmed.
    pub fn args<'t>(&self, text: &'t str) -> &'t str {
        match self.regex.find(text) {
            Some(m) => text[m.end()..].trim(),
            None => text.trim(),
        }
    }

    /// The command as a user would type it, or `None` for patterns that
    /// don't reduce to a single word (alternations).
    pub fn display_name(&self) -> Option<String> {
        display_name(&self.pattern)
    }
}

/// Turns `[Rr]oll\b` into `roll`.
fn display_name(pattern: &str) -> Option<String> {
    if pattern.contains('|') {
        return None;
    }
    let mut p = pattern.strip_prefix("(?i)").unwrap_or(pattern);
    loop {
        let before = p.len();
        for suffix in [r"\b", "$", r"\??"] {
            p = p.strip_suffix(suffix).unwrap_or(p);
        }
        if p.len() == before {
            break;
        }
    }

    let chars: Vec<char> = p.chars().collect();
    let mut name = String::with_capacity(p.len());
    let mut i = 0;
    while i < chars.len() {
        // A two-letter case class like [Rr].
        if let &['[', upper, lower, ']', ..] = &chars[i..] {
            if upper.to_ascii_lowercase() == lower && upper != lower {
                name.push(lower);
                i += 4;
                continue;
            }
        }
        name.push(chars[i]);
        i += 1;
    }
    Some(name)
}

/// What the built-in `help` command needs from the command table.
pub trait HelpIndex {
    /// Display names of every listable command, sorted.
    fn listing(&self) -> Vec<String>;

    /// Usage text of the command `text` would run.
    fn help_for(&self, text: &str) -> Option<&str>;
}

/// The command table.
pub struct Router<H> {
    routes: Vec<Route<H>>,
}

impl<H> Router<H> {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Appends a command. Later registrations never shadow earlier ones.
    ///
    /// # Errors
    /// Returns [`RouterError::InvalidPattern`] if `pattern` is not a valid
    /// regular expression.
    pub fn register(
        &mut self,
        pattern: &str,
        help: &str,
        handler: H,
    ) -> Result<(), RouterError> {
        let regex = Regex::new(&format!("^(?:{pattern})")).map_err(|source| {
            RouterError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;
        tracing::trace!(pattern, "command registered");
        self.routes.push(Route {
            pattern: pattern.to_string(),
            regex,
            help: help.to_string(),
            handler,
        });
        Ok(())
    }

    /// The first route whose pattern matches the start of `text`.
    pub fn lookup(&self, text: &str) -> Option<&Route<H>> {
        self.routes.iter().find(|route| route.regex.is_match(text))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route<H>> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> HelpIndex for Router<H> {
    fn listing(&self) -> Vec<String> {
        let mut names: Vec<String> = self.routes.iter().filter_map(Route::display_name).collect();
        names.sort();
        names.dedup();
        names
    }

    fn help_for(&self, text: &str) -> Option<&str> {
        self.lookup(text).map(Route::help)
    }
}
