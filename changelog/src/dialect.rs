/// Separator line between RPM `.changes` entries.
pub const RPM_SEPARATOR: &str =
    "-------------------------------------------------------------------";

/// Item head marker in the RPM dialect.
pub const RPM_HEAD: &str = "- ";
/// Sub-item marker in the RPM dialect.
pub const RPM_SUB: &str = "  * ";
/// Stamp layout of the RPM header line (parsed without the zone token).
pub const RPM_STAMP_PARSE: &str = "%a %b %d %H:%M:%S %Y";
/// Stamp layout of the RPM header line as rendered.
pub const RPM_STAMP: &str = "%a %b %d %H:%M:%S %Z %Y";
/// Line width for RPM item bodies.
pub const RPM_WIDTH: usize = 68;

/// Item head marker in the Debian dialect.
pub const DEB_HEAD: &str = "  * ";
/// Sub-item marker in the Debian dialect.
pub const DEB_SUB: &str = "    - ";
/// Signer marker opening the Debian trailer line.
pub const DEB_TRAILER: &str = " -- ";
/// Stamp layout of the Debian trailer line.
pub const DEB_STAMP: &str = "%a, %d %b %Y %H:%M:%S %z";
/// Line width for Debian item bodies.
pub const DEB_WIDTH: usize = 70;

/// The two changelog dialects the engine reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// RPM `.changes` release notes: dashed separators, `<stamp> - <email>`
    /// headers, `- `/`  * ` item markers.
    Rpm,
    /// Debian changelogs: `package (version) distribution; urgency=level`
    /// headers, `  * `/`    - ` item markers, signed trailer.
    Deb,
}
