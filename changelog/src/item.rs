use crate::dialect::{DEB_HEAD, DEB_SUB, DEB_WIDTH, RPM_HEAD, RPM_SUB, RPM_WIDTH};
use crate::error::{ChangelogError, Result};
use crate::wrap::wrap;

/// One bullet of a changelog entry: a head paragraph plus any sub-bullets,
/// in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    pub head: String,
    pub sub_items: Vec<String>,
}

/// Scanner state for a single item block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    InHead,
    InSub,
}

impl Item {
    pub fn new(head: impl Into<String>, sub_items: Vec<String>) -> Self {
        Self {
            head: head.into(),
            sub_items,
        }
    }

    /// Parse one RPM-dialect block (`- ` head, `  * ` sub-items).
    ///
    /// # Errors
    /// Returns a parse error when a line does not match any expected
    /// marker, referencing its approximate position in the input.
    pub fn parse_rpm(block: &str, rewrap: bool, tolerant: bool, base_line: usize) -> Result<Self> {
        Self::parse_block(block, RPM_HEAD, RPM_SUB, None, rewrap, tolerant, base_line)
    }

    /// Parse one Debian-dialect block (`  * ` head, `    - ` sub-items).
    ///
    /// # Errors
    /// Returns a parse error when a line does not match any expected
    /// marker, referencing its approximate position in the input.
    pub fn parse_deb(block: &str, rewrap: bool, tolerant: bool, base_line: usize) -> Result<Self> {
        Self::parse_block(block, DEB_HEAD, DEB_SUB, None, rewrap, tolerant, base_line)
    }

    /// Parse a legacy Debian block whose sub-items are indented without the
    /// dash marker (four spaces, continuations five).
    ///
    /// # Errors
    /// Returns a parse error when a line does not match any expected
    /// marker, referencing its approximate position in the input.
    pub fn parse_deb_unmarked(
        block: &str,
        rewrap: bool,
        tolerant: bool,
        base_line: usize,
    ) -> Result<Self> {
        Self::parse_block(block, DEB_HEAD, "    ", Some("     "), rewrap, tolerant, base_line)
    }

    /// Two-state line scanner over one block: IN_HEAD collects the head
    /// paragraph, IN_SUB collects sub-items. `continuation` defaults to
    /// spaces matching the sub-marker's width. The `tolerant` flag is
    /// accepted for API compatibility and relaxes nothing.
    fn parse_block(
        block: &str,
        head_marker: &str,
        sub_marker: &str,
        continuation: Option<&str>,
        rewrap: bool,
        _tolerant: bool,
        base_line: usize,
    ) -> Result<Self> {
        if !block.starts_with(head_marker) {
            return Err(ChangelogError::Parse(
                base_line,
                format!(
                    "block should start with {head_marker:?}, got {:?}",
                    prefix_of(block, head_marker.len())
                ),
            ));
        }
        let head_width = head_marker.len();
        let sub_width = sub_marker.len();
        let default_continuation = " ".repeat(sub_width);
        let continuation = continuation.unwrap_or(&default_continuation);
        let continuation_width = continuation.len();

        let mut state = ScanState::InHead;
        let mut head = String::new();
        let mut sub = String::new();
        let mut sub_items = Vec::new();

        for (offset, line) in block.lines().enumerate() {
            let lineno = base_line + offset;
            match state {
                ScanState::InHead => {
                    if line.starts_with(sub_marker) {
                        state = ScanState::InSub;
                        sub = line[sub_width..].to_string();
                    } else if is_indent(line, head_width) {
                        if rewrap {
                            head.push_str(&line[head_width - 1..]);
                        } else {
                            head.push('\n');
                            head.push_str(line);
                        }
                    } else if line.starts_with(head_marker) {
                        head.push_str(&line[head_width..]);
                    } else {
                        return Err(ChangelogError::Parse(
                            lineno,
                            format!("unexpected line start {:?}", prefix_of(line, sub_width)),
                        ));
                    }
                }
                ScanState::InSub => {
                    if line.starts_with(continuation) {
                        if rewrap {
                            sub.push_str(&line[continuation_width - 1..]);
                        } else {
                            sub.push('\n');
                            sub.push_str(line);
                        }
                    } else if line.starts_with(sub_marker) {
                        sub_items.push(std::mem::take(&mut sub));
                        sub = line[sub_width..].to_string();
                    } else {
                        return Err(ChangelogError::Parse(
                            lineno,
                            format!(
                                "unexpected sub-item line start {:?}",
                                prefix_of(line, sub_width)
                            ),
                        ));
                    }
                }
            }
        }
        if !sub.is_empty() {
            sub_items.push(sub);
        }
        Ok(Self { head, sub_items })
    }

    /// True if the head or any sub-item contains one of the keywords.
    #[must_use]
    pub fn contains_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|keyword| {
            self.head.contains(keyword) || self.sub_items.iter().any(|s| s.contains(keyword))
        })
    }

    fn render(&self, head_marker: &str, sub_marker: &str, width: usize) -> String {
        let mut out = String::with_capacity(self.head.len() + 32);
        out.push_str(head_marker);
        out.push_str(&wrap(&self.head, head_marker.len(), width));
        for sub in &self.sub_items {
            out.push('\n');
            out.push_str(sub_marker);
            out.push_str(&wrap(sub, sub_marker.len(), width));
        }
        out
    }

    /// Render in the RPM dialect at its column budget.
    #[must_use]
    pub fn format_rpm(&self) -> String {
        self.render(RPM_HEAD, RPM_SUB, RPM_WIDTH)
    }

    /// Render in the Debian dialect at its column budget.
    #[must_use]
    pub fn format_deb(&self) -> String {
        self.render(DEB_HEAD, DEB_SUB, DEB_WIDTH)
    }
}

fn is_indent(line: &str, width: usize) -> bool {
    line.len() >= width && line.as_bytes()[..width].iter().all(|&b| b == b' ')
}

fn prefix_of(text: &str, n: usize) -> String {
    text.chars().take(n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_head_and_sub_items() {
        let block = "- Update to 2.0\n  * drop obsolete patch\n  * refresh build flags\n";
        let item = Item::parse_rpm(block, false, false, 1).unwrap();
        assert_eq!(item.head, "Update to 2.0");
        assert_eq!(item.sub_items, vec!["drop obsolete patch", "refresh build flags"]);
    }

    #[test]
    fn head_continuation_keeps_breaks_by_default() {
        let block = "- Fix the frobnicator\n  in the corner case\n";
        let item = Item::parse_rpm(block, false, false, 1).unwrap();
        assert_eq!(item.head, "Fix the frobnicator\n  in the corner case");
    }

    #[test]
    fn head_continuation_joins_when_rewrapping() {
        let block = "- Fix the frobnicator\n  in the corner case\n";
        let item = Item::parse_rpm(block, true, false, 1).unwrap();
        assert_eq!(item.head, "Fix the frobnicator in the corner case");
    }

    #[test]
    fn sub_item_continuations_are_attached() {
        let block = "  * Fix CVE-2020-0001\n    - patch backported from the\n      upstream fix\n";
        let item = Item::parse_deb(block, true, false, 1).unwrap();
        assert_eq!(item.head, "Fix CVE-2020-0001");
        assert_eq!(item.sub_items, vec!["patch backported from the upstream fix"]);
    }

    #[test]
    fn unmarked_sub_items_parse_in_legacy_blocks() {
        let block = "  * Fix boot hang\n    seen on older kernels\n";
        let item = Item::parse_deb_unmarked(block, true, false, 1).unwrap();
        assert_eq!(item.head, "Fix boot hang");
        assert_eq!(item.sub_items, vec!["seen on older kernels"]);
    }

    #[test]
    fn bad_block_start_reports_the_line() {
        let err = Item::parse_rpm("* wrong marker\n", false, false, 7).unwrap_err();
        match err {
            ChangelogError::Parse(line, msg) => {
                assert_eq!(line, 7);
                assert!(msg.contains("should start with"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn bad_continuation_reports_the_line() {
        let block = "- head\nbad line\n";
        let err = Item::parse_rpm(block, false, false, 10).unwrap_err();
        match err {
            ChangelogError::Parse(line, _) => assert_eq!(line, 11),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn format_then_parse_round_trips() {
        let item = Item::new("Fix bug in foo", vec!["also in bar".to_string()]);
        let rendered = item.format_rpm();
        assert_eq!(rendered, "- Fix bug in foo\n  * also in bar");
        let reparsed = Item::parse_rpm(&rendered, false, false, 1).unwrap();
        assert_eq!(reparsed, item);
    }
}
