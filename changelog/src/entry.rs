use chrono::{DateTime, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use tracing::warn;

use crate::config::Config;
use crate::dialect::{
    DEB_HEAD, DEB_STAMP, DEB_TRAILER, RPM_HEAD, RPM_SEPARATOR, RPM_STAMP, RPM_STAMP_PARSE,
};
use crate::error::{ChangelogError, Result};
use crate::item::Item;
use crate::name::{guess_display_name, NameLookup};
use crate::timezone;
use crate::utils::{
    package_version_pattern, URGENCY_CLASSES, URGENCY_DEFAULT, VERSION_DASH_PATTERN,
    VERSION_LABEL_PATTERN, VERSION_RELEASE_PATTERN, VERSION_TAGGED_PATTERN,
    VERSION_UPDATE_PATTERN,
};

/// One changelog entry: header/trailer metadata plus its items in order.
///
/// After a successful parse `date` and `email` are always populated.
/// `version` and `package` stay `None` when the input dialect does not
/// carry them (RPM) and nothing in the item text gives them away; the
/// document-level back-fill pass resolves them before Debian rendering.
#[derive(Debug, Clone)]
pub struct Entry {
    pub date: DateTime<Tz>,
    pub email: String,
    pub author: String,
    pub package: Option<String>,
    pub version: Option<String>,
    pub distribution: String,
    pub urgency: Option<String>,
    pub items: Vec<Item>,
}

impl Entry {
    /// Parse one RPM `.changes` entry section. Fields the dialect does not
    /// carry are seeded from `config` and otherwise recovered from the
    /// item text afterwards.
    ///
    /// # Errors
    /// Returns a parse error when the header cannot be split into
    /// timestamp and e-mail, the timestamp does not match the stamp
    /// layout, or an item block is malformed.
    pub fn parse_rpm(
        block: &str,
        config: &Config,
        names: Option<&dyn NameLookup>,
        base_line: usize,
    ) -> Result<Self> {
        let mut date: Option<DateTime<Tz>> = None;
        let mut email: Option<String> = None;
        let mut author = config.author.clone();
        let mut items = Vec::new();
        let mut buf = String::new();
        let mut buf_start = base_line;

        for (offset, line) in block.lines().enumerate() {
            let lineno = base_line + offset;
            if line == RPM_SEPARATOR {
                if email.is_some() {
                    break;
                }
                continue;
            }
            if email.is_none() {
                let (stamp, mail) = line.split_once(" - ").ok_or_else(|| {
                    ChangelogError::Parse(
                        lineno,
                        format!("could not split date - email in {line:?}"),
                    )
                })?;
                let mail = mail.trim();
                let (zone_name, naive) = parse_rpm_stamp(stamp, lineno)?;
                let tz = timezone::find_by_abbreviation(zone_name, &naive, mail);
                date = Some(localize(tz, naive));
                if author.is_none() {
                    author = Some(resolve_author(mail, names));
                }
                email = Some(mail.to_string());
                continue;
            }
            if line.is_empty() {
                if !buf.is_empty() {
                    items.push(Item::parse_rpm(&buf, config.rewrap, config.tolerant, buf_start)?);
                    buf.clear();
                }
                continue;
            }
            if line.starts_with(RPM_HEAD) && !buf.is_empty() {
                items.push(Item::parse_rpm(&buf, config.rewrap, config.tolerant, buf_start)?);
                buf.clear();
            }
            if buf.is_empty() {
                buf_start = lineno;
            }
            buf.push_str(line);
            buf.push('\n');
        }
        if !buf.is_empty() {
            items.push(Item::parse_rpm(&buf, config.rewrap, config.tolerant, buf_start)?);
        }

        let email = email.ok_or_else(|| {
            ChangelogError::Parse(base_line, "entry has no header line".to_string())
        })?;
        let date = date.ok_or_else(|| {
            ChangelogError::Parse(base_line, "entry has no header line".to_string())
        })?;
        let mut entry = Self {
            date,
            author: author.unwrap_or_else(|| guess_display_name(&email)),
            email,
            package: config.package.clone(),
            version: None,
            distribution: config.distribution.clone(),
            urgency: config.urgency.clone(),
            items,
        };
        if entry.version.is_none() {
            entry.guess_version_and_package();
        }
        if entry.urgency.is_none() {
            entry.urgency = Some(entry.classify_urgency().to_string());
        }
        Ok(entry)
    }

    /// Parse one Debian changelog entry section: header line, item blocks,
    /// signer trailer. Everything the header and trailer carry is taken
    /// verbatim; `config` only supplies defaults for fields the parse does
    /// not determine.
    ///
    /// # Errors
    /// Returns a parse error when the header or trailer is malformed, the
    /// trailer is missing, or an item block is malformed.
    pub fn parse_deb(block: &str, config: &Config, base_line: usize) -> Result<Self> {
        let mut header: Option<DebHeader> = None;
        let mut trailer: Option<DebTrailer> = None;
        let mut items = Vec::new();
        let mut buf = String::new();
        let mut buf_start = base_line;

        for (offset, line) in block.lines().enumerate() {
            let lineno = base_line + offset;
            if !line.is_empty() && !line.starts_with(' ') {
                if trailer.is_some() {
                    break;
                }
                if header.is_some() {
                    return Err(ChangelogError::Parse(
                        lineno,
                        format!("unexpected line before trailer: {line:?}"),
                    ));
                }
                header = Some(parse_deb_header(line, lineno)?);
                continue;
            }
            if line.is_empty() {
                if !buf.is_empty() {
                    items.push(Item::parse_deb(&buf, config.rewrap, config.tolerant, buf_start)?);
                    buf.clear();
                }
                continue;
            }
            if line.starts_with(DEB_HEAD) && !buf.is_empty() {
                items.push(Item::parse_deb(&buf, config.rewrap, config.tolerant, buf_start)?);
                buf.clear();
            }
            if line.starts_with(DEB_TRAILER) {
                trailer = Some(parse_deb_trailer(line, lineno)?);
                break;
            }
            if buf.is_empty() {
                buf_start = lineno;
            }
            buf.push_str(line);
            buf.push('\n');
        }
        if !buf.is_empty() {
            items.push(Item::parse_deb(&buf, config.rewrap, config.tolerant, buf_start)?);
        }

        let header = header.ok_or_else(|| {
            ChangelogError::Parse(base_line, "entry has no header line".to_string())
        })?;
        let trailer = trailer.ok_or_else(|| {
            ChangelogError::Parse(base_line, "entry has no signer trailer".to_string())
        })?;
        Ok(Self {
            date: trailer.date,
            email: trailer.email,
            author: trailer.author,
            package: Some(header.package),
            version: Some(header.version),
            distribution: header.distribution,
            urgency: Some(header.urgency),
            items,
        })
    }

    /// Scan the item heads for a version (and, when absent, a package
    /// name), walking the recovery patterns most specific first. A version
    /// without a release suffix is completed with `-1`.
    fn guess_version_and_package(&mut self) {
        let package_pattern = self
            .package
            .as_deref()
            .and_then(|p| package_version_pattern(p).ok());
        let mut found: Option<(String, Option<String>)> = None;
        for item in &self.items {
            let line = item.head.as_str();
            let captures = VERSION_TAGGED_PATTERN
                .captures(line)
                .or_else(|| package_pattern.as_ref().and_then(|re| re.captures(line)))
                .or_else(|| VERSION_DASH_PATTERN.captures(line))
                .or_else(|| VERSION_UPDATE_PATTERN.captures(line))
                .or_else(|| VERSION_LABEL_PATTERN.captures(line))
                .or_else(|| VERSION_RELEASE_PATTERN.captures(line));
            let Some(matched) = captures.as_ref().and_then(|c| c.get(1)) else {
                continue;
            };
            let mut version = matched.as_str().trim_end_matches('.').to_string();
            let package = if self.package.is_none() {
                infer_package(line, &version)
            } else {
                None
            };
            if !version.contains('-') {
                version.push_str("-1");
            }
            found = Some((version, package));
            break;
        }
        if let Some((version, package)) = found {
            self.version = Some(version);
            if self.package.is_none() {
                self.package = package;
            }
        }
    }

    /// Classify urgency from the keyword classes, highest priority first
    /// across all items.
    fn classify_urgency(&self) -> &'static str {
        for (level, keywords) in URGENCY_CLASSES.iter().copied() {
            if self.items.iter().any(|item| item.contains_any(keywords)) {
                return level;
            }
        }
        URGENCY_DEFAULT
    }

    /// Render in the RPM dialect: separator, stamp header, items.
    #[must_use]
    pub fn format_rpm(&self) -> String {
        let mut out = String::with_capacity(256);
        out.push_str(RPM_SEPARATOR);
        out.push('\n');
        out.push_str(&blank_padded_day(self.date.format(RPM_STAMP).to_string(), 8));
        out.push_str(" - ");
        out.push_str(&self.email);
        out.push_str("\n\n");
        for item in &self.items {
            out.push_str(&item.format_rpm());
            out.push('\n');
        }
        out.push('\n');
        out
    }

    /// Render in the Debian dialect: header line, items, signer trailer.
    #[must_use]
    pub fn format_deb(&self) -> String {
        let mut out = String::with_capacity(256);
        out.push_str(&format!(
            "{} ({}) {}; urgency={}\n\n",
            self.package.as_deref().unwrap_or("?"),
            self.version.as_deref().unwrap_or("?"),
            self.distribution,
            self.urgency.as_deref().unwrap_or(URGENCY_DEFAULT),
        ));
        for item in &self.items {
            out.push_str(&item.format_deb());
            out.push('\n');
        }
        out.push_str("\n -- ");
        out.push_str(&self.author);
        out.push_str(" <");
        out.push_str(&self.email);
        out.push_str(">  ");
        out.push_str(&blank_padded_day(self.date.format(DEB_STAMP).to_string(), 5));
        out.push_str("\n\n");
        out
    }
}

struct DebHeader {
    package: String,
    version: String,
    distribution: String,
    urgency: String,
}

struct DebTrailer {
    author: String,
    email: String,
    date: DateTime<Tz>,
}

/// Split an RPM header stamp into its zone abbreviation and the remaining
/// naive timestamp; a space-padded single-digit day or hour is accepted.
fn parse_rpm_stamp<'a>(stamp: &'a str, lineno: usize) -> Result<(&'a str, NaiveDateTime)> {
    let mut tokens: Vec<&str> = stamp.split_whitespace().collect();
    if tokens.len() < 3 {
        return Err(ChangelogError::Parse(
            lineno,
            format!("malformed timestamp {stamp:?}"),
        ));
    }
    let zone_name = tokens.remove(tokens.len() - 2);
    let naive = NaiveDateTime::parse_from_str(&tokens.join(" "), RPM_STAMP_PARSE)
        .map_err(|e| ChangelogError::Parse(lineno, format!("bad timestamp {stamp:?}: {e}")))?;
    Ok((zone_name, naive))
}

/// `<package> (<version>) <distribution>; urgency=<level>`
fn parse_deb_header(line: &str, lineno: usize) -> Result<DebHeader> {
    let fields: Vec<&str> = line.split(' ').collect();
    if fields.len() != 4 {
        return Err(ChangelogError::Parse(
            lineno,
            format!("malformed entry header {line:?}"),
        ));
    }
    let version = fields[1]
        .strip_prefix('(')
        .and_then(|v| v.strip_suffix(')'))
        .ok_or_else(|| {
            ChangelogError::Parse(lineno, format!("version missing parentheses in {line:?}"))
        })?;
    let distribution = fields[2].strip_suffix(';').unwrap_or(fields[2]);
    let urgency = fields[3].strip_prefix("urgency=").ok_or_else(|| {
        ChangelogError::Parse(lineno, format!("missing urgency in {line:?}"))
    })?;
    Ok(DebHeader {
        package: fields[0].to_string(),
        version: version.to_string(),
        distribution: distribution.to_string(),
        urgency: urgency.to_string(),
    })
}

/// ` -- <name> <<email>>  <stamp ±HHMM>`; the stamp's offset picks the
/// stored zone, non-UTC times convert to that zone's local representation.
fn parse_deb_trailer(line: &str, lineno: usize) -> Result<DebTrailer> {
    let lt = line.find('<').ok_or_else(|| {
        ChangelogError::Parse(lineno, format!("no email address in trailer {line:?}"))
    })?;
    let gt = line.find('>').filter(|&g| g > lt).ok_or_else(|| {
        ChangelogError::Parse(lineno, format!("no email address in trailer {line:?}"))
    })?;
    let author = line[DEB_TRAILER.len()..lt].trim_end().to_string();
    let email = line[lt + 1..gt].to_string();
    let stamp = line[gt + 1..].trim_start();
    let fixed = DateTime::parse_from_str(stamp, DEB_STAMP)
        .map_err(|e| ChangelogError::Parse(lineno, format!("bad trailer timestamp {stamp:?}: {e}")))?;
    let offset = stamp.get(stamp.len().saturating_sub(5)..).unwrap_or("");
    let tz = timezone::find_by_offset(offset, &fixed.naive_local(), &email);
    Ok(DebTrailer {
        author,
        email,
        date: fixed.with_timezone(&tz),
    })
}

fn resolve_author(email: &str, names: Option<&dyn NameLookup>) -> String {
    match names {
        Some(source) => source.lookup(email).unwrap_or_else(|| {
            let guessed = guess_display_name(email);
            warn!("no name on record for {email}, guessing {guessed:?}");
            guessed
        }),
        None => guess_display_name(email),
    }
}

fn localize(tz: Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive).earliest() {
        Some(date) => date,
        // wall-clock times inside a DST gap do not exist in the zone
        None => Tz::UTC.from_utc_datetime(&naive).with_timezone(&tz),
    }
}

/// strftime zero-pads single-digit days; both dialects want a space at the
/// fixed position where that digit lands.
fn blank_padded_day(mut stamp: String, position: usize) -> String {
    if stamp.as_bytes().get(position) == Some(&b'0') {
        stamp.replace_range(position..=position, " ");
    }
    stamp
}

/// Find the word preceding the matched version in a head line and strip
/// the separator character joining them.
fn infer_package(line: &str, version: &str) -> Option<String> {
    let idx = line.find(version)?;
    if idx == 0 {
        return None;
    }
    let before = &line[..idx];
    let start = before.rfind(' ').map_or(0, |p| p + 1);
    let end = idx - 1;
    if start >= end || !line.is_char_boundary(end) {
        return None;
    }
    Some(line[start..end].to_string())
}
