//! End-to-end conversion tests: whole documents in, whole documents out.

use changelog::{Config, Dialect, Document};

const RPM_DOC: &str = "\
-------------------------------------------------------------------
Thu Jan  4 11:22:33 CET 2018 - kurt@garloff.de

- Update to libfoo-1.2:
  * upstream bugfixes
- Fix build on ppc64le

-------------------------------------------------------------------
Mon Jan  1 09:00:00 PST 2018 - jane.doe@example.com

- Polish documentation
";

#[test]
fn rpm_to_deb_preserves_items_and_back_fills_versions() {
    let mut doc = Document::new(Config::default());
    doc.parse(RPM_DOC, Dialect::Rpm).unwrap();
    assert_eq!(doc.entries.len(), 2);

    let out = doc.render(Dialect::Deb);

    // newest entry: version recovered from its own text
    assert!(out.contains("libfoo (1.2-1) stable; urgency=low"), "got:\n{out}");
    // items keep their text and order
    let update = out.find("  * Update to libfoo-1.2:").unwrap();
    let sub = out.find("    - upstream bugfixes").unwrap();
    let fix = out.find("  * Fix build on ppc64le").unwrap();
    assert!(update < sub && sub < fix);
    // older entry: back-filled one release below the newer one
    assert!(out.contains("(1.2-0) stable; urgency=low"), "got:\n{out}");
    // trailer offsets match each entry's zone at its date
    assert!(
        out.contains(" -- Kurt Garloff <kurt@garloff.de>  Thu,  4 Jan 2018 11:22:33 +0100"),
        "got:\n{out}"
    );
    assert!(
        out.contains(" -- Jane Doe <jane.doe@example.com>  Mon,  1 Jan 2018 09:00:00 -0800"),
        "got:\n{out}"
    );
}

#[test]
fn deb_to_rpm_round_trip_restores_the_release_note_layout() {
    let deb = "\
libfoo (1.2-1) stable; urgency=low

  * Update to 1.2
    - upstream bugfixes

 -- Kurt Garloff <kurt@garloff.de>  Thu, 04 Jan 2018 11:22:33 +0100

libfoo (1.1-1) stable; urgency=low

  * Initial packaging

 -- Jane Doe <jane.doe@example.com>  Mon, 01 Jan 2018 09:00:00 +0000
";
    let mut doc = Document::new(Config::default());
    doc.parse(deb, Dialect::Deb).unwrap();
    assert_eq!(doc.entries.len(), 2);

    let out = doc.render(Dialect::Rpm);
    let separator =
        "-------------------------------------------------------------------";
    assert_eq!(out.matches(separator).count(), 2);
    // the +0100 January stamp resolves to a CET zone
    assert!(
        out.contains("Thu Jan  4 11:22:33 CET 2018 - kurt@garloff.de"),
        "got:\n{out}"
    );
    assert!(out.contains("- Update to 1.2\n  * upstream bugfixes"), "got:\n{out}");
}

#[test]
fn urgency_precedence_spans_items_within_an_entry() {
    let text = "\
-------------------------------------------------------------------
Thu Jan  4 11:22:33 UTC 2018 - jane.doe@example.com

- tighten security checks
- Fix CVE-2020-0001
";
    let mut doc = Document::new(Config::default());
    doc.parse(text, Dialect::Rpm).unwrap();
    assert_eq!(doc.entries[0].urgency.as_deref(), Some("high"));
}

#[test]
fn rewrap_joins_continuation_lines() {
    let text = "\
-------------------------------------------------------------------
Thu Jan  4 11:22:33 UTC 2018 - jane.doe@example.com

- Fix a bug that only shows
  up on alternate Tuesdays
";
    let mut doc = Document::new(Config {
        rewrap: true,
        ..Config::default()
    });
    doc.parse(text, Dialect::Rpm).unwrap();
    assert_eq!(
        doc.entries[0].items[0].head,
        "Fix a bug that only shows up on alternate Tuesdays"
    );
}

#[test]
fn malformed_documents_abort_without_entries_from_the_bad_chunk() {
    let text = "\
-------------------------------------------------------------------
Thu Jan  4 11:22:33 UTC 2018 - kurt@garloff.de

- A fine entry

-------------------------------------------------------------------
this line is not a header at all
";
    let mut doc = Document::new(Config::default());
    let err = doc.parse(text, Dialect::Rpm).unwrap_err();
    assert!(err.to_string().contains("line ~"), "got: {err}");
    // the first chunk parsed before the failure surfaced
    assert_eq!(doc.entries.len(), 1);
}
