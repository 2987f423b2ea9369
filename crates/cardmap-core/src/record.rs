//! Structured records: the kind-tagged key/value rows an address-book store
//! groups contact data into.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

// ─── DataKind ────────────────────────────────────────────────────────────────

/// What a record describes. Each kind has its own handler and builder.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
  Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DataKind {
  StructuredName,
  Nickname,
  Phone,
  Email,
  StructuredPostal,
  Organization,
  Website,
  Im,
  SipAddress,
  Event,
  Relation,
  Note,
  Photo,
  GroupMembership,
}

impl DataKind {
  /// Every kind, in the order builders run.
  pub const ALL: &'static [Self] = &[
    Self::StructuredName,
    Self::Nickname,
    Self::Phone,
    Self::Email,
    Self::StructuredPostal,
    Self::Organization,
    Self::Website,
    Self::Im,
    Self::SipAddress,
    Self::Event,
    Self::Relation,
    Self::Note,
    Self::Photo,
    Self::GroupMembership,
  ];

  /// Must match the `rename_all = "snake_case"` serde tags above.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::StructuredName => "structured_name",
      Self::Nickname => "nickname",
      Self::Phone => "phone",
      Self::Email => "email",
      Self::StructuredPostal => "structured_postal",
      Self::Organization => "organization",
      Self::Website => "website",
      Self::Im => "im",
      Self::SipAddress => "sip_address",
      Self::Event => "event",
      Self::Relation => "relation",
      Self::Note => "note",
      Self::Photo => "photo",
      Self::GroupMembership => "group_membership",
    }
  }
}

impl fmt::Display for DataKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for DataKind {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .iter()
      .copied()
      .find(|k| k.as_str() == s)
      .ok_or_else(|| Error::UnknownDataKind(s.to_string()))
  }
}

// ─── Field names ─────────────────────────────────────────────────────────────

/// Field names used inside records.
pub mod field {
  // structured name
  pub const DISPLAY_NAME: &str = "display_name";
  pub const GIVEN_NAME: &str = "given_name";
  pub const MIDDLE_NAME: &str = "middle_name";
  pub const FAMILY_NAME: &str = "family_name";
  pub const PREFIX: &str = "prefix";
  pub const SUFFIX: &str = "suffix";
  pub const PHONETIC_GIVEN_NAME: &str = "phonetic_given_name";
  pub const PHONETIC_MIDDLE_NAME: &str = "phonetic_middle_name";
  pub const PHONETIC_FAMILY_NAME: &str = "phonetic_family_name";

  // shared
  pub const TYPE: &str = "type";
  pub const LABEL: &str = "label";
  pub const IS_PRIMARY: &str = "is_primary";
  pub const IS_SUPER_PRIMARY: &str = "is_super_primary";

  pub const NAME: &str = "name";
  pub const NUMBER: &str = "number";
  pub const ADDRESS: &str = "address";
  pub const URL: &str = "url";

  // instant messaging
  pub const DATA: &str = "data";
  pub const PROTOCOL: &str = "protocol";
  pub const CUSTOM_PROTOCOL: &str = "custom_protocol";
  pub const SIP_ADDRESS: &str = "sip_address";

  pub const START_DATE: &str = "start_date";

  // organization
  pub const COMPANY: &str = "company";
  pub const DEPARTMENT: &str = "department";
  pub const TITLE: &str = "title";
  pub const JOB_DESCRIPTION: &str = "job_description";

  pub const NOTE: &str = "note";
  pub const PHOTO: &str = "photo";
  pub const GROUP_TITLE: &str = "group_title";

  // postal
  pub const STREET: &str = "street";
  pub const POBOX: &str = "pobox";
  pub const NEIGHBORHOOD: &str = "neighborhood";
  pub const CITY: &str = "city";
  pub const REGION: &str = "region";
  pub const POSTCODE: &str = "postcode";
  pub const COUNTRY: &str = "country";
  pub const FORMATTED_ADDRESS: &str = "formatted_address";
}

// ─── Value ───────────────────────────────────────────────────────────────────

/// A single field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
  Integer(i64),
  Text(String),
  Blob(Vec<u8>),
}

impl From<&str> for Value {
  fn from(s: &str) -> Self { Self::Text(s.to_string()) }
}

impl From<String> for Value {
  fn from(s: String) -> Self { Self::Text(s) }
}

impl From<i64> for Value {
  fn from(n: i64) -> Self { Self::Integer(n) }
}

impl From<Vec<u8>> for Value {
  fn from(b: Vec<u8>) -> Self { Self::Blob(b) }
}

// ─── StructuredRecord ────────────────────────────────────────────────────────

/// One row of contact data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredRecord {
  pub kind:   DataKind,
  #[serde(default)]
  pub fields: BTreeMap<String, Value>,
}

impl StructuredRecord {
  pub fn new(kind: DataKind) -> Self {
    Self {
      kind,
      fields: BTreeMap::new(),
    }
  }

  /// Builder-style setter.
  pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
    self.fields.insert(key.to_string(), value.into());
    self
  }

  /// Like [`StructuredRecord::with`], but skips `None`.
  pub fn with_opt<V: Into<Value>>(self, key: &str, value: Option<V>) -> Self {
    match value {
      Some(v) => self.with(key, v),
      None => self,
    }
  }

  /// Text value of `key`. Empty strings count as absent.
  pub fn text(&self, key: &str) -> Option<&str> {
    match self.fields.get(key) {
      Some(Value::Text(s)) if !s.is_empty() => Some(s),
      _ => None,
    }
  }

  /// Integer value of `key`; numeric text is accepted too.
  pub fn integer(&self, key: &str) -> Option<i64> {
    match self.fields.get(key) {
      Some(Value::Integer(n)) => Some(*n),
      Some(Value::Text(s)) => s.trim().parse().ok(),
      _ => None,
    }
  }

  pub fn blob(&self, key: &str) -> Option<&[u8]> {
    match self.fields.get(key) {
      Some(Value::Blob(b)) if !b.is_empty() => Some(b),
      _ => None,
    }
  }

  /// True when `key` holds a non-zero integer.
  pub fn flag(&self, key: &str) -> bool {
    self.integer(key).is_some_and(|n| n != 0)
  }

  /// Drop text fields holding the empty string.
  pub fn without_empty_text(mut self) -> Self {
    self
      .fields
      .retain(|_, v| !matches!(v, Value::Text(s) if s.is_empty()));
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_text_is_absent() {
    let r = StructuredRecord::new(DataKind::Phone)
      .with(field::NUMBER, "")
      .with(field::LABEL, "Boat");
    assert_eq!(r.text(field::NUMBER), None);
    assert_eq!(r.text(field::LABEL), Some("Boat"));

    let r = r.without_empty_text();
    assert!(!r.fields.contains_key(field::NUMBER));
  }

  #[test]
  fn integers_accept_numeric_text() {
    let r = StructuredRecord::new(DataKind::Phone)
      .with(field::TYPE, "4")
      .with(field::IS_PRIMARY, 1);
    assert_eq!(r.integer(field::TYPE), Some(4));
    assert!(r.flag(field::IS_PRIMARY));
    assert!(!r.flag(field::IS_SUPER_PRIMARY));
  }

  #[test]
  fn kind_names_round_trip() {
    for &kind in DataKind::ALL {
      assert_eq!(kind.as_str().parse::<DataKind>().unwrap(), kind);
      let json = serde_json::to_string(&kind).unwrap();
      assert_eq!(json, format!("\"{}\"", kind.as_str()));
    }
    assert!("fax".parse::<DataKind>().is_err());
  }

  #[test]
  fn record_json_shape() {
    let r = StructuredRecord::new(DataKind::Phone)
      .with(field::NUMBER, "+1234")
      .with(field::TYPE, 0);
    let json = serde_json::to_value(&r).unwrap();
    assert_eq!(json["kind"], "phone");
    assert_eq!(json["fields"]["number"], "+1234");
    assert_eq!(json["fields"]["type"], 0);

    let back: StructuredRecord = serde_json::from_value(json).unwrap();
    assert_eq!(back, r);
  }
}
