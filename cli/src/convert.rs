use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use addressbook::AddressBook;
use changelog::{Config, Document, NameLookup};
use tracing::warn;

use crate::cli::{Cli, Format};
use crate::error::{CliError, Result};

/// Run one conversion: read the input stream, parse it in the input
/// format, render the output format, write the output stream.
pub fn execute(cli: &Cli) -> Result<()> {
    let input_format = resolve_format(cli.infmt, &cli.input)
        .ok_or_else(|| CliError::UnknownFormat(cli.input.clone()))?;
    let output_format = resolve_format(cli.outfmt, &cli.output)
        .ok_or_else(|| CliError::UnknownFormat(cli.output.clone()))?;

    let package = cli
        .pkgname
        .clone()
        .or_else(|| file_stem(&cli.input))
        .or_else(|| file_stem(&cli.output));
    if package.is_none() && input_format == Format::Rpm {
        warn!("can not determine a package name, Debian headers will be incomplete");
    }

    let config = Config {
        package,
        author: cli.author.clone().filter(|a| !a.is_empty()),
        distribution: cli.distro.clone(),
        urgency: None,
        initial_version: cli.initial_version.clone(),
        rewrap: cli.rewrap,
        tolerant: cli.tolerant,
        max_entries: cli.maxent,
    };
    let mut document = Document::new(config);
    if let Some(source) = build_name_source(cli)? {
        document = document.with_name_source(source);
    }

    let text = read_input(&cli.input)?;
    document.parse(&text, input_format.into())?;
    let rendered = document.render(output_format.into());
    write_output(&cli.output, &rendered)?;
    Ok(())
}

/// Explicit format flag, otherwise detection by file extension.
fn resolve_format(explicit: Option<Format>, path: &str) -> Option<Format> {
    explicit.or_else(|| {
        if path.ends_with(".changes") {
            Some(Format::Rpm)
        } else if path.ends_with(".changelog") {
            Some(Format::Deb)
        } else {
            None
        }
    })
}

fn file_stem(path: &str) -> Option<String> {
    if path == "-" {
        return None;
    }
    let path = Path::new(path);
    // only a real extension marks the stem as a package name
    path.extension()?;
    Some(path.file_stem()?.to_string_lossy().into_owned())
}

/// Parse the `-e` list: `NAME <adr>[, NAME <adr> ...]`.
fn parse_email_list(list: &str) -> Result<Vec<(String, String)>> {
    let mut pairs = Vec::new();
    for part in list.split(',') {
        let open = part.find('<');
        let close = part.find('>');
        match (open, close) {
            (Some(open), Some(close)) if close > open => {
                let name = part[..open].trim().to_string();
                let address = part[open + 1..close].to_string();
                pairs.push((address, name));
            }
            _ => return Err(CliError::InvalidEmailList(part.trim().to_string())),
        }
    }
    Ok(pairs)
}

/// Wire up the name lookup: the home-directory address book when `-E` is
/// given, enriched with any `-e` entries. Without either flag the engine
/// falls back to guessing names silently.
fn build_name_source(cli: &Cli) -> Result<Option<Box<dyn NameLookup>>> {
    if cli.emails.is_none() && !cli.emaildb {
        return Ok(None);
    }
    let mut book = if cli.emaildb {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        AddressBook::load(home)?
    } else {
        AddressBook::new()
    };
    if let Some(list) = &cli.emails {
        for (address, name) in parse_email_list(list)? {
            book.insert(&address, name);
        }
    }
    Ok(Some(Box::new(book)))
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

fn write_output(path: &str, rendered: &str) -> Result<()> {
    if path == "-" {
        std::io::stdout().write_all(rendered.as_bytes())?;
    } else {
        std::fs::write(path, rendered)?;
    }
    Ok(())
}
