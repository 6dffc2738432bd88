use changelog::Dialect;
use clap::{Parser, ValueEnum};

#[derive(Parser)]
#[command(name = "chconv")]
#[command(
    author,
    about = "Convert changelogs between the RPM .changes and Debian changelog formats"
)]
pub struct Cli {
    /// Input file, or - for stdin
    pub input: String,

    /// Output file, or - for stdout
    pub output: String,

    /// Override input format detection
    #[clap(short = 'i', long, value_enum)]
    pub infmt: Option<Format>,

    /// Override output format detection
    #[clap(short = 'o', long, value_enum)]
    pub outfmt: Option<Format>,

    /// Rewrap changelog entries to fill the line width
    #[clap(short, long, default_value_t = false)]
    pub rewrap: bool,

    /// Tolerate non-standard formatting (accepted for compatibility with
    /// older callers, currently relaxes nothing)
    #[clap(short, long, default_value_t = false)]
    pub tolerant: bool,

    /// Maximum number of entries to process (default: all)
    #[clap(short, long, default_value_t = 0)]
    pub maxent: usize,

    /// Initial version x.y-r seeding the version back-fill
    #[clap(short = 'V', long = "version", default_value = "?-0")]
    pub initial_version: String,

    /// Author name (default: look up or guess from the address)
    #[clap(short, long)]
    pub author: Option<String>,

    /// Name list "NAME <adr>[, NAME <adr> ...]" fed to the name lookup
    #[clap(short, long)]
    pub emails: Option<String>,

    /// Use ~/.emaildb and ~/.guessemaildb for names
    #[clap(short = 'E', long, default_value_t = false)]
    pub emaildb: bool,

    /// Override the distribution name
    #[clap(short, long, default_value = "stable")]
    pub distro: String,

    /// Package name (default: derive from the file names)
    #[clap(short = 'n', long)]
    pub pkgname: Option<String>,
}

/// Changelog formats the converter reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// RPM .changes release notes
    Rpm,
    /// Debian changelog
    Deb,
}

impl From<Format> for Dialect {
    fn from(format: Format) -> Self {
        match format {
            Format::Rpm => Self::Rpm,
            Format::Deb => Self::Deb,
        }
    }
}
