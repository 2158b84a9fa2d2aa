//! Game modes: which rules `roll` and `init` follow.

use std::fmt;
use std::str::FromStr;

/// The game system the bot is rolling for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    Owod,
    #[default]
    Nwod,
    Exalted,
    Btvs,
    AllFlesh,
    Qin,
    Orkworld,
    Wushu,
    Alternity,
    InNomine,
    Pendragon,
    Shadowrun,
    HeavenEarth,
    L5r,
}

impl Mode {
    pub const ALL: [Mode; 14] = [
        Mode::Owod,
        Mode::Nwod,
        Mode::Exalted,
        Mode::Btvs,
        Mode::AllFlesh,
        Mode::Qin,
        Mode::Orkworld,
        Mode::Wushu,
        Mode::Alternity,
        Mode::InNomine,
        Mode::Pendragon,
        Mode::Shadowrun,
        Mode::HeavenEarth,
        Mode::L5r,
    ];

    /// The name players type after `mode`.
    pub fn name(self) -> &'static str {
        match self {
            Mode::Owod => "owod",
            Mode::Nwod => "nwod",
            Mode::Exalted => "exalted",
            Mode::Btvs => "btvs",
            Mode::AllFlesh => "allflesh",
            Mode::Qin => "qin",
            Mode::Orkworld => "orkworld",
            Mode::Wushu => "wushu",
            Mode::Alternity => "alternity",
            Mode::InNomine => "innomine",
            Mode::Pendragon => "pendragon",
            Mode::Shadowrun => "shadowrun",
            Mode::HeavenEarth => "h+e",
            Mode::L5r => "l5r",
        }
    }

    /// Every mode name, sorted.
    pub fn names() -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Self::ALL.iter().map(|m| m.name()).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no such mode {0:?}")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| UnknownMode(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_parse_back() {
        for mode in Mode::ALL {
            assert_eq!(mode.name().parse::<Mode>(), Ok(mode));
        }
        assert!("dnd".parse::<Mode>().is_err());
        assert!("OWOD".parse::<Mode>().is_err());
    }

    #[test]
    fn test_names_sorted() {
        let names = Mode::names();
        assert_eq!(names.first(), Some(&"allflesh"));
        assert_eq!(names.last(), Some(&"wushu"));
        assert_eq!(names.len(), Mode::ALL.len());
    }
}
