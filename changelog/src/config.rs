/// Configuration options for a conversion run: document-wide overrides and
/// parsing behavior.
///
/// Overrides, when set, win over values guessed from entry text at render
/// time. Values actually parsed from the input are never overridden.
#[derive(Debug, Clone)]
pub struct Config {
    /// Package name for entries that do not name one themselves.
    pub package: Option<String>,
    /// Author display name, skipping address-book lookup when set.
    pub author: Option<String>,
    /// Distribution/channel name used for the Debian header line.
    pub distribution: String,
    /// Urgency level for entries whose text matches no urgency keyword.
    pub urgency: Option<String>,
    /// Seed version used by the back-fill walk when no entry supplies one.
    pub initial_version: String,
    /// Join continuation lines and re-flow paragraphs instead of keeping
    /// the input's own line breaks.
    pub rewrap: bool,
    /// Accepted for compatibility with older callers; currently relaxes no
    /// parsing rule.
    pub tolerant: bool,
    /// Stop after this many entries (0 = no limit), discarding the rest of
    /// the input.
    pub max_entries: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            package: None,
            author: None,
            distribution: "stable".to_string(),
            urgency: None,
            initial_version: "?-0".to_string(),
            rewrap: false,
            tolerant: false,
            max_entries: 0,
        }
    }
}
