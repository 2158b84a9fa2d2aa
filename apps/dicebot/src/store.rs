//! Accounts, aliases and pending identity links.
//!
//! Handlers go through the [`Store`] trait. [`MemoryStore`] keeps
//! everything in process; [`JsonFileStore`] rewrites one JSON file after
//! every change.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One user, keyed by bare address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub jid: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Other addresses confirmed as the same person.
    #[serde(default)]
    pub linked_jids: Vec<String>,
    /// Receives `batsignal` invitations.
    pub batsignal: bool,
    #[serde(default)]
    pub points: i64,
}

impl Account {
    /// A new account, opted in to the batsignal.
    pub fn new(jid: impl Into<String>) -> Self {
        Self {
            jid: jid.into(),
            aliases: Vec::new(),
            linked_jids: Vec::new(),
            batsignal: true,
            points: 0,
        }
    }

    pub fn has_alias(&self, name: &str) -> bool {
        self.aliases.iter().any(|a| same_name(a, name))
    }

    /// Whether `query` names this account by address, alias or linked
    /// address. Case-insensitive.
    pub fn answers_to(&self, query: &str) -> bool {
        same_name(&self.jid, query)
            || self.has_alias(query)
            || self.linked_jids.iter().any(|j| same_name(j, query))
    }
}

/// Compares full Unicode lowercase forms, so `Zoë` and `ZOË` match.
fn same_name(a: &str, b: &str) -> bool {
    a.chars().flat_map(char::to_lowercase).eq(b.chars().flat_map(char::to_lowercase))
}

impl fmt::Display for Account {
    /// `Kit a.k.a. Kitty (kit@example.net), 3 points`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.aliases.is_empty() {
            f.write_str("No-name")?;
        } else {
            f.write_str(&self.aliases.join(" a.k.a. "))?;
        }
        let plural = if self.points.abs() == 1 { "" } else { "s" };
        write!(f, " ({}), {} point{plural}", self.jid, self.points)
    }
}

/// A claim by `primary` that `additional` is also theirs, waiting for
/// `additional` to confirm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingLink {
    pub primary: String,
    pub additional: String,
}

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode store: {0}")]
    Encode(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Persistence for the social commands.
///
/// Every mutating call commits on its own; there are no transactions
/// spanning calls.
pub trait Store {
    fn account(&self, jid: &str) -> Result<Option<Account>, StoreError>;

    /// All accounts, ordered by address.
    fn accounts(&self) -> Result<Vec<Account>, StoreError>;

    /// Inserts or replaces the account with the same address.
    fn save_account(&mut self, account: Account) -> Result<(), StoreError>;

    /// The pending link awaiting confirmation from `additional`.
    fn pending(&self, additional: &str) -> Result<Option<PendingLink>, StoreError>;

    /// Inserts or replaces the link keyed by its additional address.
    fn save_pending(&mut self, link: PendingLink) -> Result<(), StoreError>;

    fn remove_pending(&mut self, additional: &str) -> Result<Option<PendingLink>, StoreError>;

    /// The first account with alias `name`, ignoring case.
    fn find_by_alias(&self, name: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts()?.into_iter().find(|a| a.has_alias(name)))
    }

    /// Every account `query` names; see [`Account::answers_to`].
    fn who_is(&self, query: &str) -> Result<Vec<Account>, StoreError> {
        Ok(self
            .accounts()?
            .into_iter()
            .filter(|a| a.answers_to(query))
            .collect())
    }
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn account(&self, jid: &str) -> Result<Option<Account>, StoreError> {
        (**self).account(jid)
    }

    fn accounts(&self) -> Result<Vec<Account>, StoreError> {
        (**self).accounts()
    }

    fn save_account(&mut self, account: Account) -> Result<(), StoreError> {
        (**self).save_account(account)
    }

    fn pending(&self, additional: &str) -> Result<Option<PendingLink>, StoreError> {
        (**self).pending(additional)
    }

    fn save_pending(&mut self, link: PendingLink) -> Result<(), StoreError> {
        (**self).save_pending(link)
    }

    fn remove_pending(&mut self, additional: &str) -> Result<Option<PendingLink>, StoreError> {
        (**self).remove_pending(additional)
    }
}

/// The whole store as one serializable value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    accounts: BTreeMap<String, Account>,
    #[serde(default)]
    pending: BTreeMap<String, PendingLink>,
}

impl StoreData {
    fn account(&self, jid: &str) -> Option<Account> {
        self.accounts.get(jid).cloned()
    }

    fn accounts(&self) -> Vec<Account> {
        self.accounts.values().cloned().collect()
    }

    fn save_account(&mut self, account: Account) {
        self.accounts.insert(account.jid.clone(), account);
    }

    fn pending(&self, additional: &str) -> Option<PendingLink> {
        self.pending.get(additional).cloned()
    }

    fn save_pending(&mut self, link: PendingLink) {
        self.pending.insert(link.additional.clone(), link);
    }

    fn remove_pending(&mut self, additional: &str) -> Option<PendingLink> {
        self.pending.remove(additional)
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// A store that forgets everything at exit.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: StoreData,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn account(&self, jid: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.data.account(jid))
    }

    fn accounts(&self) -> Result<Vec<Account>, StoreError> {
        Ok(self.data.accounts())
    }

    fn save_account(&mut self, account: Account) -> Result<(), StoreError> {
        self.data.save_account(account);
        Ok(())
    }

    fn pending(&self, additional: &str) -> Result<Option<PendingLink>, StoreError> {
        Ok(self.data.pending(additional))
    }

    fn save_pending(&mut self, link: PendingLink) -> Result<(), StoreError> {
        self.data.save_pending(link);
        Ok(())
    }

    fn remove_pending(&mut self, additional: &str) -> Result<Option<PendingLink>, StoreError> {
        Ok(self.data.remove_pending(additional))
    }
}

// ---------------------------------------------------------------------------
// JsonFileStore
// ---------------------------------------------------------------------------

/// A store kept in one pretty-printed JSON file.
///
/// The file is read once on open and rewritten in full after every
/// mutation, through a temporary file renamed over the original.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    data: StoreData,
}

impl JsonFileStore {
    /// Opens the store at `path`. A missing file is an empty store; it is
    /// created on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let data = match std::fs::read_to_string(&path) {
            Ok(s) => serde_json::from_str(&s).map_err(|source| StoreError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoreData::default(),
            Err(source) => return Err(StoreError::Read { path, source }),
        };
        tracing::debug!(path = %path.display(), "store opened");
        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), StoreError> {
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let s = serde_json::to_string_pretty(&self.data)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, s).map_err(write_err)?;
        std::fs::rename(&tmp, &self.path).map_err(write_err)?;
        Ok(())
    }
}

impl Store for JsonFileStore {
    fn account(&self, jid: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.data.account(jid))
    }

    fn accounts(&self) -> Result<Vec<Account>, StoreError> {
        Ok(self.data.accounts())
    }

    fn save_account(&mut self, account: Account) -> Result<(), StoreError> {
        self.data.save_account(account);
        self.save()
    }

    fn pending(&self, additional: &str) -> Result<Option<PendingLink>, StoreError> {
        Ok(self.data.pending(additional))
    }

    fn save_pending(&mut self, link: PendingLink) -> Result<(), StoreError> {
        self.data.save_pending(link);
        self.save()
    }

    fn remove_pending(&mut self, additional: &str) -> Result<Option<PendingLink>, StoreError> {
        let removed = self.data.remove_pending(additional);
        if removed.is_some() {
            self.save()?;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kit() -> Account {
        Account {
            aliases: vec!["Kit".into(), "Kitty".into()],
            linked_jids: vec!["kit@work.example.com".into()],
            points: 3,
            ..Account::new("kit@example.net")
        }
    }

    #[test]
    fn test_account_display() {
        assert_eq!(
            kit().to_string(),
            "Kit a.k.a. Kitty (kit@example.net), 3 points"
        );
        let mut anon = Account::new("ash@example.net");
        assert_eq!(anon.to_string(), "No-name (ash@example.net), 0 points");
        anon.points = -1;
        assert_eq!(anon.to_string(), "No-name (ash@example.net), -1 point");
    }

    #[test]
    fn test_answers_to_any_name_ignoring_case() {
        let kit = kit();
        assert!(kit.answers_to("KIT@example.net"));
        assert!(kit.answers_to("kitty"));
        assert!(kit.answers_to("Kit@Work.example.com"));
        assert!(!kit.answers_to("Ash"));
    }

    #[test]
    fn test_memory_store_lookups() {
        let mut store = MemoryStore::new();
        store.save_account(kit()).unwrap();
        store.save_account(Account::new("ash@example.net")).unwrap();

        assert_eq!(store.accounts().unwrap().len(), 2);
        assert_eq!(
            store.find_by_alias("KITTY").unwrap().map(|a| a.jid),
            Some("kit@example.net".to_string())
        );
        assert!(store.find_by_alias("nobody").unwrap().is_none());
        assert_eq!(store.who_is("ash@example.net").unwrap().len(), 1);
    }

    #[test]
    fn test_alias_lookup_folds_non_ascii_case() {
        let mut store = MemoryStore::new();
        store
            .save_account(Account {
                aliases: vec!["Zoë".into()],
                ..Account::new("zoe@example.net")
            })
            .unwrap();

        assert_eq!(
            store.find_by_alias("ZOË").unwrap().map(|a| a.jid),
            Some("zoe@example.net".to_string())
        );
        assert_eq!(store.who_is("zoË").unwrap().len(), 1);
        assert!(store.find_by_alias("ZOE").unwrap().is_none());
    }

    #[test]
    fn test_pending_links_are_keyed_by_additional_address() {
        let mut store = MemoryStore::new();
        let link = PendingLink {
            primary: "kit@example.net".into(),
            additional: "kit@work.example.com".into(),
        };
        store.save_pending(link.clone()).unwrap();
        assert_eq!(store.pending("kit@work.example.com").unwrap(), Some(link.clone()));
        assert_eq!(store.remove_pending("kit@work.example.com").unwrap(), Some(link));
        assert_eq!(store.pending("kit@work.example.com").unwrap(), None);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        assert!(store.accounts().unwrap().is_empty());
        store.save_account(kit()).unwrap();
        store
            .save_pending(PendingLink {
                primary: "kit@example.net".into(),
                additional: "kit@home.example.org".into(),
            })
            .unwrap();
        drop(store);

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.account("kit@example.net").unwrap(), Some(kit()));
        assert!(store.pending("kit@home.example.org").unwrap().is_some());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_file_store_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("accounts.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.save_account(Account::new("ash@example.net")).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_file_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.json");
        std::fs::write(&path, "not json").unwrap();

        let err = JsonFileStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
    }
}
