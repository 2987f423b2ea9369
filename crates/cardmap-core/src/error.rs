//! Error types for `cardmap-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid date: {0:?}")]
  InvalidDate(String),

  #[error("unknown data kind: {0:?}")]
  UnknownDataKind(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
