//! Chat addresses.
//!
//! An address has the shape `node@domain/resource`, where only the domain
//! is mandatory. For a room occupant the node is the room name, the domain
//! is the conference service, and the resource is the occupant's nickname.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// A parsed chat address.
///
/// Serialized as its plain string form, e.g. `"ooc@rooms.example.net/Tyche"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Jid {
    node: Option<String>,
    domain: String,
    resource: Option<String>,
}

impl Jid {
    /// Builds a bare `node@domain` address.
    pub fn bare_from(node: &str, domain: &str) -> Self {
        Self {
            node: Some(node.to_string()),
            domain: domain.to_string(),
            resource: None,
        }
    }

    /// The part before `@`, if any.
    pub fn node(&self) -> Option<&str> {
        self.node.as_deref()
    }

    /// The server or service part.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The part after `/`, if any. For room occupants this is the
    /// nickname.
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    /// Returns `true` if there is no resource part.
    pub fn is_bare(&self) -> bool {
        self.resource.is_none()
    }

    /// Returns a copy without the resource part.
    pub fn bare(&self) -> Jid {
        Jid {
            node: self.node.clone(),
            domain: self.domain.clone(),
            resource: None,
        }
    }

    /// Returns a copy with the resource replaced.
    pub fn with_resource(&self, resource: &str) -> Jid {
        Jid {
            node: self.node.clone(),
            domain: self.domain.clone(),
            resource: Some(resource.to_string()),
        }
    }
}

impl FromStr for Jid {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |why| ProtocolError::InvalidJid(s.to_string(), why);

        let s_trim = s.trim();
        let (head, resource) = match s_trim.split_once('/') {
            Some((_, "")) => return Err(invalid("empty resource")),
            Some((head, res)) => (head, Some(res.to_string())),
            None => (s_trim, None),
        };

        let (node, domain) = match head.split_once('@') {
            Some(("", _)) => return Err(invalid("empty node")),
            Some((node, domain)) => (Some(node.to_string()), domain),
            None => (None, head),
        };

        if domain.is_empty() {
            return Err(invalid("empty domain"));
        }
        if domain.contains('@') || domain.chars().any(char::is_whitespace) {
            return Err(invalid("malformed domain"));
        }

        Ok(Jid {
            node,
            domain: domain.to_string(),
            resource,
        })
    }
}

impl TryFrom<String> for Jid {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Jid> for String {
    fn from(jid: Jid) -> Self {
        jid.to_string()
    }
}

impl fmt::Display for Jid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(node) = &self.node {
            write!(f, "{node}@")?;
        }
        write!(f, "{}", self.domain)?;
        if let Some(resource) = &self.resource {
            write!(f, "/{resource}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_address() {
        let jid: Jid = "ooc@rooms.example.net/Tyche".parse().unwrap();
        assert_eq!(jid.node(), Some("ooc"));
        assert_eq!(jid.domain(), "rooms.example.net");
        assert_eq!(jid.resource(), Some("Tyche"));
        assert!(!jid.is_bare());
    }

    #[test]
    fn test_parse_domain_only() {
        let jid: Jid = "example.net".parse().unwrap();
        assert_eq!(jid.node(), None);
        assert_eq!(jid.to_string(), "example.net");
    }

    #[test]
    fn test_resource_may_contain_slash_and_at() {
        let jid: Jid = "room@svc/nick/with@odd".parse().unwrap();
        assert_eq!(jid.resource(), Some("nick/with@odd"));
        assert_eq!(jid.bare().to_string(), "room@svc");
    }

    #[test]
    fn test_rejects_malformed() {
        assert!("".parse::<Jid>().is_err());
        assert!("@svc".parse::<Jid>().is_err());
        assert!("room@".parse::<Jid>().is_err());
        assert!("room@svc/".parse::<Jid>().is_err());
        assert!("a@b@c".parse::<Jid>().is_err());
    }

    #[test]
    fn test_bare_and_with_resource() {
        let jid = Jid::bare_from("kit", "example.net");
        assert!(jid.is_bare());
        let full = jid.with_resource("laptop");
        assert_eq!(full.to_string(), "kit@example.net/laptop");
        assert_eq!(full.bare(), jid);
    }

    #[test]
    fn test_serializes_as_string() {
        let jid: Jid = "kit@example.net/home".parse().unwrap();
        let json = serde_json::to_string(&jid).unwrap();
        assert_eq!(json, r#""kit@example.net/home""#);
        let back: Jid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, jid);
    }
}
