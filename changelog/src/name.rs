use std::collections::HashMap;

/// Lookup capability for resolving an e-mail address to a display name,
/// typically backed by an address book. The engine only ever reads through
/// this; recording newly guessed names is the implementor's business.
pub trait NameLookup {
    /// Returns the display name on record for `email`, if any.
    fn lookup(&self, email: &str) -> Option<String>;
}

impl NameLookup for HashMap<String, String> {
    fn lookup(&self, email: &str) -> Option<String> {
        self.get(&email.to_lowercase()).cloned()
    }
}

/// Title-cases `text` at the start and after every `.` or `-`.
fn capitalize_segments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut boundary = true;
    for ch in text.chars() {
        if boundary {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        boundary = ch == '.' || ch == '-';
    }
    out
}

/// Derive a display name from an e-mail address when none is on record.
///
/// `firstname.lastname@domain` becomes `Firstname Lastname`; otherwise the
/// local part and the first domain label are combined, so
/// `kurt@garloff.de` becomes `Kurt Garloff`.
#[must_use]
pub fn guess_display_name(email: &str) -> String {
    let (local, domain) = email.split_once('@').unwrap_or((email, ""));
    let local = capitalize_segments(local);
    let names: Vec<&str> = local.split('.').collect();
    if names.len() > 1 {
        return names.join(" ");
    }
    let domain = capitalize_segments(domain);
    let label = domain.split('.').next().unwrap_or("");
    format!("{local} {label}").trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_local_part_becomes_first_last() {
        assert_eq!(guess_display_name("jane.doe@example.com"), "Jane Doe");
    }

    #[test]
    fn bare_local_part_borrows_the_domain() {
        assert_eq!(guess_display_name("kurt@garloff.de"), "Kurt Garloff");
    }

    #[test]
    fn hyphens_title_case_too() {
        assert_eq!(guess_display_name("jean-luc@starfleet.org"), "Jean-Luc Starfleet");
    }

    #[test]
    fn lookup_is_keyed_on_lowercased_address() {
        let mut book = HashMap::new();
        book.insert("jane.doe@example.com".to_string(), "Jane D.".to_string());
        assert_eq!(book.lookup("Jane.Doe@Example.com").as_deref(), Some("Jane D."));
        assert_eq!(book.lookup("nobody@example.com"), None);
    }
}
