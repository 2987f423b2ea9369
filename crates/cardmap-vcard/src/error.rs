//! Error types for the cardmap-vcard codec.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("vCard missing BEGIN/END:VCARD envelope")]
  MissingEnvelope,

  #[error("malformed content-line: {0}")]
  MalformedContentLine(String),

  #[error("invalid {name} value: {reason}")]
  InvalidExtensionValue { name: String, reason: String },

  #[error("unsupported vCard version: {0}")]
  UnsupportedVersion(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
