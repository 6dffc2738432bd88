//! Persistent address book mapping e-mail addresses to display names.
//!
//! Two tiers: names a person confirmed (`.emaildb`) and names previously
//! guessed from an address (`.guessemaildb`). Lookups consult the
//! confirmed tier first. The conversion engine only reads through the
//! [`NameLookup`] capability; writing the store back is the caller's move.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use changelog::NameLookup;
use thiserror::Error;
use tracing::warn;

/// File holding confirmed names.
pub const CONFIRMED_FILE: &str = ".emaildb";
/// File holding guessed names.
pub const GUESSED_FILE: &str = ".guessemaildb";

/// Errors that can occur when loading or saving the address book
#[derive(Error, Debug)]
pub enum AddressBookError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}: {1}")]
    WithContext(String, Box<AddressBookError>),
}

impl AddressBookError {
    /// Add context to an error
    #[must_use]
    pub fn with_context<C: Into<String>>(self, context: C) -> Self {
        Self::WithContext(context.into(), Box::new(self))
    }

    /// Get a user-friendly message for command line display
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::IoError(e) => format!("Address book file operation failed: {e}"),
            Self::WithContext(ctx, err) => format!("{ctx}: {}", err.user_message()),
        }
    }
}

/// Type alias for Result with `AddressBookError`
pub type Result<T> = std::result::Result<T, AddressBookError>;

/// Two-tier e-mail → display-name store backed by plain text files, one
/// `<email> <name>` pair per line, addresses lower-cased.
#[derive(Debug, Default)]
pub struct AddressBook {
    directory: Option<PathBuf>,
    confirmed: HashMap<String, String>,
    guessed: HashMap<String, String>,
}

impl AddressBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load both tiers from `directory`. Missing files are treated as
    /// empty tiers; malformed lines are skipped with a warning.
    ///
    /// # Errors
    /// Returns an error when a file exists but cannot be read.
    pub fn load(directory: impl Into<PathBuf>) -> Result<Self> {
        let directory = directory.into();
        let confirmed = read_tier(&directory.join(CONFIRMED_FILE))
            .map_err(|e| e.with_context("loading confirmed names"))?;
        let guessed = read_tier(&directory.join(GUESSED_FILE))
            .map_err(|e| e.with_context("loading guessed names"))?;
        Ok(Self {
            directory: Some(directory),
            confirmed,
            guessed,
        })
    }

    /// Record a confirmed name, replacing any guess for the address.
    pub fn insert(&mut self, email: &str, name: impl Into<String>) {
        let email = email.to_lowercase();
        self.guessed.remove(&email);
        self.confirmed.insert(email, name.into());
    }

    /// Record a guessed name. Confirmed names are never displaced.
    pub fn record_guess(&mut self, email: &str, name: impl Into<String>) {
        let email = email.to_lowercase();
        if !self.confirmed.contains_key(&email) {
            self.guessed.insert(email, name.into());
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.confirmed.is_empty() && self.guessed.is_empty()
    }

    /// Write both tiers back to the directory they were loaded from.
    ///
    /// # Errors
    /// Returns an error when the store was not loaded from a directory or
    /// a file cannot be written.
    pub fn save(&self) -> Result<()> {
        let directory = self.directory.as_deref().ok_or_else(|| {
            AddressBookError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "address book has no backing directory",
            ))
        })?;
        write_tier(&directory.join(CONFIRMED_FILE), &self.confirmed)?;
        write_tier(&directory.join(GUESSED_FILE), &self.guessed)?;
        Ok(())
    }
}

impl NameLookup for AddressBook {
    fn lookup(&self, email: &str) -> Option<String> {
        let email = email.to_lowercase();
        self.confirmed
            .get(&email)
            .or_else(|| self.guessed.get(&email))
            .cloned()
    }
}

fn read_tier(path: &Path) -> Result<HashMap<String, String>> {
    let mut names = HashMap::new();
    if !path.exists() {
        return Ok(names);
    }
    let content = fs::read_to_string(path)?;
    for line in content.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        match line.split_once(' ') {
            Some((email, name)) if !name.is_empty() => {
                names.insert(email.to_lowercase(), name.to_string());
            }
            _ => warn!("skipping malformed address book line {line:?} in {path:?}"),
        }
    }
    Ok(names)
}

fn write_tier(path: &Path, names: &HashMap<String, String>) -> Result<()> {
    let mut entries: Vec<_> = names.iter().collect();
    entries.sort();
    let mut file = fs::File::create(path)?;
    for (email, name) in entries {
        writeln!(file, "{email} {name}")?;
    }
    Ok(())
}
