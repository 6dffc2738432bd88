use thiserror::Error;

/// Errors that can occur when working with changelogs
#[derive(Error, Debug)]
pub enum ChangelogError {
    #[error("Invalid changelog format at line ~{0}: {1}")]
    Parse(usize, String),

    #[error("{0}")]
    Other(String),

    #[error("{0}: {1}")]
    WithContext(String, Box<ChangelogError>),
}

/// Type alias for Result with `ChangelogError`
pub type Result<T> = std::result::Result<T, ChangelogError>;

impl ChangelogError {
    /// Add context to an error
    #[must_use]
    pub fn with_context<C: Into<String>>(self, context: C) -> Self {
        Self::WithContext(context.into(), Box::new(self))
    }

    /// Get a user-friendly message for command line display
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Parse(line, msg) => {
                format!("Invalid changelog format at line ~{line}: {msg}")
            }
            Self::Other(msg) => msg.clone(),
            Self::WithContext(ctx, err) => format!("{ctx}: {}", err.user_message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_carries_line_number() {
        let err = ChangelogError::Parse(12, "unexpected line start \"x\"".to_string());
        assert!(err.to_string().contains("line ~12"));
        assert!(err.user_message().contains("unexpected line start"));
    }

    #[test]
    fn context_wraps_message() {
        let err = ChangelogError::Other("boom".to_string()).with_context("parsing input");
        assert_eq!(err.user_message(), "parsing input: boom");
    }
}
