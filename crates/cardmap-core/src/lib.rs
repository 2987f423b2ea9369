//! Core types for the cardmap contact mapping engine.
//!
//! Holds the canonical [`Contact`] model, the vCard `TYPE` vocabularies, the
//! structured-record form and the taxonomy that maps one onto the other.
//! Free of I/O; the record handlers and the vCard codec live in their own
//! crates.

pub mod contact;
pub mod date;
pub mod error;
pub mod record;
pub mod taxonomy;
pub mod types;

pub use contact::{Contact, LabeledProperty};
pub use date::{EventDate, PartialDate};
pub use error::{Error, Result};
pub use record::{DataKind, StructuredRecord, Value};
