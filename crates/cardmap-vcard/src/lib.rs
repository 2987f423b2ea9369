//! vCard 3.0 / 4.0 codec for cardmap.
//!
//! Converts between vCard text and [`cardmap_core::Contact`]. Vendor
//! properties (phonetic names, Apple dates and labels, `X-SIP`, the
//! address-book-server group properties) are not part of the base grammar;
//! they are registered through an [`ExtensionTable`] handed to the
//! [`Codec`] at construction.
//!
//! # Quick start
//!
//! ```no_run
//! use cardmap_vcard::{Codec, Version};
//!
//! let codec = Codec::default();
//! let vcard = "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:Alice Smith\r\nEND:VCARD\r\n";
//! let contact = codec.parse(vcard).unwrap();
//! println!("{}", codec.render(&contact, Version::V3));
//! ```

pub mod error;
pub mod extension;
mod line;
mod parse;
mod serialize;

use std::{fmt, str::FromStr};

use cardmap_core::Contact;
pub use error::{Error, Result};
pub use extension::{CustomProperty, ExtensionTable, ExtensionValue, Target};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// PRODID written unless the caller sets another one.
pub const DEFAULT_PROD_ID: &str = concat!("-//cardmap//", env!("CARGO_PKG_VERSION"), "//EN");

// ─── Version ─────────────────────────────────────────────────────────────────

/// vCard version to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Version {
  V3,
  #[default]
  V4,
}

impl Version {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::V3 => "3.0",
      Self::V4 => "4.0",
    }
  }
}

impl fmt::Display for Version {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Version {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim() {
      "3.0" | "3" => Ok(Self::V3),
      "4.0" | "4" => Ok(Self::V4),
      other => Err(Error::UnsupportedVersion(other.to_string())),
    }
  }
}

impl Serialize for Version {
  fn serialize<S: Serializer>(
    &self,
    serializer: S,
  ) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(self.as_str())
  }
}

impl<'de> Deserialize<'de> for Version {
  fn deserialize<D: Deserializer<'de>>(
    deserializer: D,
  ) -> std::result::Result<Self, D::Error> {
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
  }
}

// ─── Codec ───────────────────────────────────────────────────────────────────

/// Parses and renders vCards with a fixed set of custom properties.
#[derive(Debug, Clone)]
pub struct Codec {
  extensions: ExtensionTable,
  prod_id:    String,
}

impl Codec {
  pub fn new(extensions: ExtensionTable) -> Self {
    Self {
      extensions,
      prod_id: DEFAULT_PROD_ID.to_string(),
    }
  }

  /// Use `prod_id` as PRODID; an empty string omits the property.
  pub fn with_prod_id(mut self, prod_id: impl Into<String>) -> Self {
    self.prod_id = prod_id.into();
    self
  }

  pub fn extensions(&self) -> &ExtensionTable { &self.extensions }

  /// Parse the first vCard in `input`.
  ///
  /// Fails only when there is no `BEGIN:VCARD … END:VCARD` envelope;
  /// properties that cannot be mapped are dropped or kept as unknown.
  pub fn parse(&self, input: &str) -> Result<Contact> {
    parse::parse_one(input, &self.extensions)
  }

  /// Parse every vCard in `input`. A broken block yields `Err` in its
  /// position without affecting the ones before it.
  pub fn parse_many(&self, input: &str) -> Vec<Result<Contact>> {
    parse::parse_many(input, &self.extensions)
  }

  /// Render `contact` as a vCard string (CRLF line endings, folded at 75
  /// octets).
  pub fn render(&self, contact: &Contact, version: Version) -> String {
    serialize::render(contact, version, &self.extensions, &self.prod_id)
  }
}

impl Default for Codec {
  fn default() -> Self { Self::new(ExtensionTable::standard()) }
}

// ─── Round-trip tests ────────────────────────────────────────────────────────
