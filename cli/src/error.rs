use thiserror::Error;

/// Errors surfaced by the conversion frontend
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Changelog error: {0}")]
    Changelog(#[from] changelog::ChangelogError),

    #[error("Address book error: {0}")]
    AddressBook(#[from] addressbook::AddressBookError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Can not determine format for {0}")]
    UnknownFormat(String),

    #[error("Invalid mail address {0:?}")]
    InvalidEmailList(String),
}

/// Type alias for Result with `CliError`
pub type Result<T> = std::result::Result<T, CliError>;

impl CliError {
    /// Get a user-friendly message for command line display
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Changelog(e) => e.user_message(),
            Self::AddressBook(e) => e.user_message(),
            Self::IoError(e) => format!("File operation failed: {e}"),
            Self::UnknownFormat(name) => format!(
                "Can not determine format for {name} (expected a .changes or .changelog file, or -i/-o)"
            ),
            Self::InvalidEmailList(part) => {
                format!("Invalid mail address {part:?} (expected \"NAME <adr>[, ...]\")")
            }
        }
    }
}
