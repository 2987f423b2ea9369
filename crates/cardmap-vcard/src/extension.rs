//! Vendor properties layered on top of the base vCard grammar.
//!
//! An [`ExtensionTable`] is an immutable list of [`CustomProperty`]
//! definitions handed to the codec at construction. The codec consults it
//! for every property name it does not handle itself, and asks it for the
//! property to write for each [`Target`] when rendering.

use cardmap_core::EventDate;

use crate::error::{Error, Result};

/// Apple labels with fixed meaning.
pub mod apple {
  pub const ANNIVERSARY: &str = "_$!<Anniversary>!$_";
  pub const OTHER: &str = "_$!<Other>!$_";

  pub const ASSISTANT: &str = "_$!<Assistant>!$_";
  pub const BROTHER: &str = "_$!<Brother>!$_";
  pub const CHILD: &str = "_$!<Child>!$_";
  pub const FATHER: &str = "_$!<Father>!$_";
  pub const FRIEND: &str = "_$!<Friend>!$_";
  pub const MANAGER: &str = "_$!<Manager>!$_";
  pub const MOTHER: &str = "_$!<Mother>!$_";
  pub const PARENT: &str = "_$!<Parent>!$_";
  pub const PARTNER: &str = "_$!<Partner>!$_";
  pub const SISTER: &str = "_$!<Sister>!$_";
  pub const SPOUSE: &str = "_$!<Spouse>!$_";

  /// Apple's relation property (vCard 3).
  pub const RELATED_NAMES: &str = "X-ABRELATEDNAMES";
}

// ─── Values ──────────────────────────────────────────────────────────────────

/// Which contact field a custom property feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
  PhoneticGivenName,
  PhoneticMiddleName,
  PhoneticFamilyName,
  CustomDate,
  Label,
  SipAddress,
  ServerKind,
  ServerMember,
}

/// A parsed custom property value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionValue {
  Text(String),
  Date(EventDate),
}

impl ExtensionValue {
  pub fn as_text(&self) -> Option<&str> {
    match self {
      Self::Text(s) => Some(s),
      Self::Date(_) => None,
    }
  }
}

/// One registered property: its reserved name, the field it feeds, and how
/// to read and write its value.
#[derive(Debug, Clone, Copy)]
pub struct CustomProperty {
  pub name:   &'static str,
  pub target: Target,
  pub parse:  fn(&str) -> Result<ExtensionValue>,
  pub render: fn(&ExtensionValue) -> String,
}

// ─── Parse / render rules ────────────────────────────────────────────────────

fn parse_text(s: &str) -> Result<ExtensionValue> {
  Ok(ExtensionValue::Text(s.trim().to_string()))
}

fn parse_non_empty(s: &str) -> Result<ExtensionValue> {
  let s = s.trim();
  if s.is_empty() {
    return Err(Error::InvalidExtensionValue {
      name:   "text".to_string(),
      reason: "empty value".to_string(),
    });
  }
  Ok(ExtensionValue::Text(s.to_string()))
}

fn parse_lowercase(s: &str) -> Result<ExtensionValue> {
  parse_non_empty(s).map(|v| match v {
    ExtensionValue::Text(t) => ExtensionValue::Text(t.to_lowercase()),
    other => other,
  })
}

/// Full date, then partial date, then the raw text.
fn parse_date(s: &str) -> Result<ExtensionValue> {
  Ok(ExtensionValue::Date(EventDate::parse_lenient(s)))
}

fn render_text(v: &ExtensionValue) -> String {
  match v {
    ExtensionValue::Text(s) => s.clone(),
    ExtensionValue::Date(d) => d.to_string(),
  }
}

/// Full dates use the extended `YYYY-MM-DD` form Apple writes.
fn render_date(v: &ExtensionValue) -> String {
  match v {
    ExtensionValue::Date(EventDate::Date(d)) => d.format("%Y-%m-%d").to_string(),
    other => render_text(other),
  }
}

// ─── Table ───────────────────────────────────────────────────────────────────

/// Immutable set of custom properties.
#[derive(Debug, Clone)]
pub struct ExtensionTable {
  properties: Vec<CustomProperty>,
}

impl ExtensionTable {
  /// The empty table: only the base grammar is understood.
  pub fn empty() -> Self {
    Self {
      properties: Vec::new(),
    }
  }

  /// A table holding exactly `properties`. Later entries with a name or
  /// target already present are ignored.
  pub fn new(properties: impl IntoIterator<Item = CustomProperty>) -> Self {
    let mut table: Vec<CustomProperty> = Vec::new();
    for p in properties {
      if table
        .iter()
        .any(|q| q.name.eq_ignore_ascii_case(p.name) || q.target == p.target)
      {
        continue;
      }
      table.push(p);
    }
    Self { properties: table }
  }

  /// Phonetic names, Apple dates and labels, `X-SIP` and the
  /// address-book-server group properties.
  pub fn standard() -> Self {
    Self::new([
      CustomProperty {
        name:   "X-PHONETIC-FIRST-NAME",
        target: Target::PhoneticGivenName,
        parse:  parse_text,
        render: render_text,
      },
      CustomProperty {
        name:   "X-PHONETIC-MIDDLE-NAME",
        target: Target::PhoneticMiddleName,
        parse:  parse_text,
        render: render_text,
      },
      CustomProperty {
        name:   "X-PHONETIC-LAST-NAME",
        target: Target::PhoneticFamilyName,
        parse:  parse_text,
        render: render_text,
      },
      CustomProperty {
        name:   "X-ABDATE",
        target: Target::CustomDate,
        parse:  parse_date,
        render: render_date,
      },
      CustomProperty {
        name:   "X-ABLABEL",
        target: Target::Label,
        parse:  parse_text,
        render: render_text,
      },
      CustomProperty {
        name:   "X-SIP",
        target: Target::SipAddress,
        parse:  parse_non_empty,
        render: render_text,
      },
      CustomProperty {
        name:   "X-ADDRESSBOOKSERVER-KIND",
        target: Target::ServerKind,
        parse:  parse_lowercase,
        render: render_text,
      },
      CustomProperty {
        name:   "X-ADDRESSBOOKSERVER-MEMBER",
        target: Target::ServerMember,
        parse:  parse_non_empty,
        render: render_text,
      },
    ])
  }

  /// Case-insensitive lookup by property name.
  pub fn by_name(&self, name: &str) -> Option<&CustomProperty> {
    self
      .properties
      .iter()
      .find(|p| p.name.eq_ignore_ascii_case(name))
  }

  pub fn by_target(&self, target: Target) -> Option<&CustomProperty> {
    self.properties.iter().find(|p| p.target == target)
  }

  pub fn iter(&self) -> impl Iterator<Item = &CustomProperty> {
    self.properties.iter()
  }

  /// Run `property`'s parse rule; errors carry the property name.
  pub fn parse(&self, property: &CustomProperty, value: &str) -> Result<ExtensionValue> {
    (property.parse)(value).map_err(|e| match e {
      Error::InvalidExtensionValue { reason, .. } => Error::InvalidExtensionValue {
        name: property.name.to_string(),
        reason,
      },
      other => other,
    })
  }
}

impl Default for ExtensionTable {
  fn default() -> Self { Self::standard() }
}
