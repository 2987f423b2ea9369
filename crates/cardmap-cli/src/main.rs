//! `cardmap`: convert contacts between vCard files and structured records.
//!
//! # Usage
//!
//! ```text
//! cardmap to-records contacts.vcf > records.json
//! cardmap from-records records.json --version 3.0 > contacts.vcf
//! cardmap normalize contacts.vcf
//! cardmap --config cardmap.toml inspect contacts.vcf
//! ```
//!
//! Settings come from the optional TOML file, then `CARDMAP_*` environment
//! variables, then command-line flags.

use std::{
  fs,
  path::{Path, PathBuf},
};

use anyhow::{Context as _, Result};
use cardmap_core::{Contact, StructuredRecord};
use cardmap_rows::{BuilderRegistry, GroupMethod, HandlerRegistry};
use cardmap_vcard::{Codec, DEFAULT_PROD_ID, ExtensionTable, Version};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::EnvFilter;

// ─── CLI args ────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "cardmap", about = "Convert contacts between vCard and structured records")]
struct Args {
  /// Path to a TOML config file (version, prod_id, group_method).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Print the structured records of every card as JSON.
  ToRecords {
    /// vCard file with one or more cards.
    input: PathBuf,
  },
  /// Print vCards built from a JSON array of record lists.
  FromRecords {
    input:   PathBuf,
    /// vCard version to write (3.0 or 4.0).
    #[arg(long)]
    version: Option<Version>,
  },
  /// Parse every card and render it again.
  Normalize {
    input:   PathBuf,
    #[arg(long)]
    version: Option<Version>,
  },
  /// Print the parsed contacts as JSON.
  Inspect { input: PathBuf },
}

// ─── Settings ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Settings {
  version:      Version,
  prod_id:      String,
  group_method: GroupMethod,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      version:      Version::default(),
      prod_id:      DEFAULT_PROD_ID.to_string(),
      group_method: GroupMethod::default(),
    }
  }
}

fn load_settings(path: Option<PathBuf>) -> Result<Settings> {
  let mut builder = config::Config::builder();
  if let Some(path) = path {
    builder = builder.add_source(config::File::from(path).required(false));
  }
  builder
    .add_source(config::Environment::with_prefix("CARDMAP"))
    .build()
    .context("failed to read configuration")?
    .try_deserialize()
    .context("failed to deserialise settings")
}

// ─── Commands ────────────────────────────────────────────────────────────────

/// Parse every card in `path`, skipping (and logging) broken ones.
fn read_contacts(codec: &Codec, path: &Path) -> Result<Vec<Contact>> {
  let input = fs::read_to_string(path)
    .with_context(|| format!("reading {}", path.display()))?;
  let mut contacts = Vec::new();
  for (i, result) in codec.parse_many(&input).into_iter().enumerate() {
    match result {
      Ok(contact) => contacts.push(contact),
      Err(e) => warn!(card = i, error = %e, "skipping vCard"),
    }
  }
  info!(count = contacts.len(), path = %path.display(), "parsed vCards");
  Ok(contacts)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
  let json = serde_json::to_string_pretty(value).context("serialising JSON")?;
  println!("{json}");
  Ok(())
}

fn run(args: Args) -> Result<()> {
  let settings = load_settings(args.config)?;
  let codec = Codec::new(ExtensionTable::standard()).with_prod_id(settings.prod_id);

  match args.command {
    Command::ToRecords { input } => {
      let builders = BuilderRegistry::new(settings.group_method);
      let records: Vec<Vec<StructuredRecord>> = read_contacts(&codec, &input)?
        .iter()
        .map(|c| builders.build_all(c))
        .collect();
      print_json(&records)
    }

    Command::FromRecords { input, version } => {
      let raw = fs::read_to_string(&input)
        .with_context(|| format!("reading {}", input.display()))?;
      let cards: Vec<Vec<StructuredRecord>> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing records in {}", input.display()))?;
      let handlers = HandlerRegistry::new(settings.group_method);
      let version = version.unwrap_or(settings.version);
      for records in cards {
        let contact = handlers.to_contact(records);
        print!("{}", codec.render(&contact, version));
      }
      Ok(())
    }

    Command::Normalize { input, version } => {
      let version = version.unwrap_or(settings.version);
      for contact in read_contacts(&codec, &input)? {
        print!("{}", codec.render(&contact, version));
      }
      Ok(())
    }

    Command::Inspect { input } => print_json(&read_contacts(&codec, &input)?),
  }
}

// ─── Entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  run(Args::parse())
}
