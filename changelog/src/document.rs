use crate::config::Config;
use crate::dialect::{Dialect, RPM_SEPARATOR};
use crate::entry::Entry;
use crate::error::Result;
use crate::name::NameLookup;
use crate::version::{decrement_release, increment_release};

/// A whole changelog: the ordered entries (most recent first, matching the
/// on-disk convention of both dialects) plus the document-wide overrides
/// and the optional name-lookup collaborator.
pub struct Document {
    config: Config,
    name_source: Option<Box<dyn NameLookup>>,
    pub entries: Vec<Entry>,
}

impl Document {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            name_source: None,
            entries: Vec::new(),
        }
    }

    /// Attach the address-book collaborator consulted for display names.
    #[must_use]
    pub fn with_name_source(mut self, source: Box<dyn NameLookup>) -> Self {
        self.name_source = Some(source);
        self
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse a whole input stream in the given dialect, appending its
    /// entries. A failed entry parse aborts the run; no entries from the
    /// failing chunk onwards are kept.
    ///
    /// # Errors
    /// Propagates the first parse error with its approximate line number.
    pub fn parse(&mut self, input: &str, dialect: Dialect) -> Result<()> {
        match dialect {
            Dialect::Rpm => self.parse_rpm(input),
            Dialect::Deb => self.parse_deb(input),
        }
    }

    /// RPM chunking: the dashed separator starts a new chunk (and stays at
    /// its head, the entry scanner consumes it).
    fn parse_rpm(&mut self, input: &str) -> Result<()> {
        let names = self.name_source.as_deref();
        let mut buf = String::new();
        let mut start = 1;
        let mut chunks = 0usize;
        for (index, line) in input.lines().enumerate() {
            let lineno = index + 1;
            if line == RPM_SEPARATOR {
                if rpm_chunk_has_content(&buf) {
                    self.entries
                        .push(Entry::parse_rpm(&buf, &self.config, names, start)?);
                }
                buf.clear();
                chunks += 1;
                if self.config.max_entries > 0 && chunks > self.config.max_entries {
                    return Ok(());
                }
            }
            if buf.is_empty() {
                start = lineno;
            }
            buf.push_str(line);
            buf.push('\n');
        }
        if rpm_chunk_has_content(&buf) {
            self.entries
                .push(Entry::parse_rpm(&buf, &self.config, names, start)?);
        }
        Ok(())
    }

    /// Debian chunking: any non-blank, non-indented line starts a new
    /// chunk (it is the next entry's header).
    fn parse_deb(&mut self, input: &str) -> Result<()> {
        let mut buf = String::new();
        let mut start = 1;
        let mut chunks = 0usize;
        for (index, line) in input.lines().enumerate() {
            let lineno = index + 1;
            if !line.is_empty() && !line.starts_with(' ') {
                if chunk_has_content(&buf) {
                    self.entries
                        .push(Entry::parse_deb(&buf, &self.config, start)?);
                }
                buf.clear();
                chunks += 1;
                if self.config.max_entries > 0 && chunks > self.config.max_entries {
                    return Ok(());
                }
            }
            if buf.is_empty() {
                start = lineno;
            }
            buf.push_str(line);
            buf.push('\n');
        }
        if chunk_has_content(&buf) {
            self.entries
                .push(Entry::parse_deb(&buf, &self.config, start)?);
        }
        Ok(())
    }

    /// Render the whole document in the given dialect. Debian output first
    /// back-fills versions and package names that entries are missing.
    pub fn render(&mut self, dialect: Dialect) -> String {
        match dialect {
            Dialect::Rpm => self.entries.iter().map(Entry::format_rpm).collect(),
            Dialect::Deb => {
                self.back_fill();
                self.entries.iter().map(Entry::format_deb).collect()
            }
        }
    }

    /// Fill in missing versions and package names, walking from the oldest
    /// entry to the newest. A missing version is anchored on the nearest
    /// newer entry that carried one (its release component stepped down by
    /// the entry distance); without such an anchor it is the next-older
    /// version (or the configured seed) stepped up by one. Package names
    /// inherit the nearest name known at that point of the walk.
    fn back_fill(&mut self) {
        let explicit: Vec<Option<String>> =
            self.entries.iter().map(|e| e.version.clone()).collect();
        let mut last_version = self.config.initial_version.clone();
        let mut last_package: Option<String> = None;
        for index in (0..self.entries.len()).rev() {
            if self.entries[index].version.is_none() {
                let newer = (0..index)
                    .rev()
                    .find_map(|j| explicit[j].as_deref().map(|v| (index - j, v)));
                let filled = newer
                    .and_then(|(distance, version)| decrement_release(version, distance as u64))
                    .unwrap_or_else(|| increment_release(&last_version));
                self.entries[index].version = Some(filled);
            }
            if let Some(package) = &last_package {
                if self.entries[index].package.is_none() {
                    self.entries[index].package = Some(package.clone());
                }
            } else {
                last_package = self.entries[index].package.clone();
            }
            if let Some(version) = &self.entries[index].version {
                last_version = version.clone();
            }
        }
    }
}

fn rpm_chunk_has_content(buf: &str) -> bool {
    buf.lines().any(|l| l != RPM_SEPARATOR && !l.trim().is_empty())
}

fn chunk_has_content(buf: &str) -> bool {
    buf.lines().any(|l| !l.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rpm_two_entries() -> String {
        "\
-------------------------------------------------------------------
Thu Jan  4 11:22:33 CET 2018 - kurt@garloff.de

- Update to libfoo-1.3:
  * upstream bugfixes

-------------------------------------------------------------------
Mon Jan  1 09:00:00 CET 2018 - jane.doe@example.com

- Polish documentation
"
        .to_string()
    }

    #[test]
    fn rpm_documents_split_on_the_separator() {
        let mut doc = Document::new(Config::default());
        doc.parse(&rpm_two_entries(), Dialect::Rpm).unwrap();
        assert_eq!(doc.entries.len(), 2);
        assert_eq!(doc.entries[0].email, "kurt@garloff.de");
        assert_eq!(doc.entries[1].email, "jane.doe@example.com");
    }

    #[test]
    fn entry_cap_discards_the_rest() {
        let mut doc = Document::new(Config {
            max_entries: 1,
            ..Config::default()
        });
        doc.parse(&rpm_two_entries(), Dialect::Rpm).unwrap();
        assert_eq!(doc.entries.len(), 1);
        assert_eq!(doc.entries[0].email, "kurt@garloff.de");
    }

    #[test]
    fn back_fill_decrements_from_the_newer_entry() {
        let text = "\
-------------------------------------------------------------------
Thu Jan  4 11:22:33 CET 2018 - kurt@garloff.de

- Update to foo 1.2-3

-------------------------------------------------------------------
Mon Jan  1 09:00:00 CET 2018 - jane.doe@example.com

- Polish documentation
";
        let mut doc = Document::new(Config {
            initial_version: "1.2-0".to_string(),
            ..Config::default()
        });
        doc.parse(text, Dialect::Rpm).unwrap();
        assert_eq!(doc.entries[0].version.as_deref(), Some("1.2-3"));
        assert_eq!(doc.entries[1].version, None);
        doc.render(Dialect::Deb);
        // anchored on the newer entry, not on the unused seed
        assert_eq!(doc.entries[1].version.as_deref(), Some("1.2-2"));
    }

    #[test]
    fn back_fill_propagates_the_package_forward() {
        let text = "\
-------------------------------------------------------------------
Thu Jan  4 11:22:33 CET 2018 - kurt@garloff.de

- Polish documentation

-------------------------------------------------------------------
Mon Jan  1 09:00:00 CET 2018 - jane.doe@example.com

- Update to libfoo-1.3:
  * upstream bugfixes
";
        let mut doc = Document::new(Config::default());
        doc.parse(text, Dialect::Rpm).unwrap();
        doc.render(Dialect::Deb);
        // the oldest entry recovered libfoo 1.3-1; the newer one gets the
        // incremented release and inherits the package name
        assert_eq!(doc.entries[1].version.as_deref(), Some("1.3-1"));
        assert_eq!(doc.entries[0].version.as_deref(), Some("1.3-2"));
        assert_eq!(doc.entries[0].package.as_deref(), Some("libfoo"));
    }

    #[test]
    fn back_fill_increments_the_seed_without_newer_context() {
        let text = "\
-------------------------------------------------------------------
Mon Jan  1 09:00:00 UTC 2018 - jane.doe@example.com

- Polish documentation
";
        let mut doc = Document::new(Config {
            initial_version: "1.2-0".to_string(),
            ..Config::default()
        });
        doc.parse(text, Dialect::Rpm).unwrap();
        doc.render(Dialect::Deb);
        assert_eq!(doc.entries[0].version.as_deref(), Some("1.2-1"));
    }

    #[test]
    fn overrides_win_over_guesses() {
        let mut doc = Document::new(Config {
            package: Some("mypkg".to_string()),
            author: Some("Override Name".to_string()),
            distribution: "unstable".to_string(),
            urgency: Some("high".to_string()),
            ..Config::default()
        });
        doc.parse(&rpm_two_entries(), Dialect::Rpm).unwrap();
        let entry = &doc.entries[1];
        assert_eq!(entry.package.as_deref(), Some("mypkg"));
        assert_eq!(entry.author, "Override Name");
        assert_eq!(entry.distribution, "unstable");
        assert_eq!(entry.urgency.as_deref(), Some("high"));
    }

    #[test]
    fn malformed_chunk_aborts_with_position() {
        let text = "\
-------------------------------------------------------------------
Thu Jan  4 11:22:33 CET 2018 - kurt@garloff.de

* bad marker for this dialect
";
        let mut doc = Document::new(Config::default());
        let err = doc.parse(text, Dialect::Rpm).unwrap_err();
        match err {
            crate::error::ChangelogError::Parse(line, _) => assert_eq!(line, 4),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
