//! The canonical contact model.
//!
//! [`Contact`] is the pivot between the address-book records and the vCard
//! codec: handlers and the codec parser fill it, builders and the codec
//! renderer read it. Multi-valued fields keep insertion order because both
//! sides treat the first value as the most significant one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  date::EventDate,
  types::{
    AdrType, EmailType, ImppType, NicknameType, RelatedType, TelType, UrlType,
  },
};

// ─── LabeledProperty ─────────────────────────────────────────────────────────

/// A property value plus an optional free-text label.
///
/// The label is only meaningful when the value has no standard type; a
/// recognised type always wins over the label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledProperty<T> {
  pub property: T,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub label:    Option<String>,
}

impl<T> LabeledProperty<T> {
  pub fn new(property: T) -> Self {
    Self {
      property,
      label: None,
    }
  }

  /// Attach `label` as given, unless it is blank.
  pub fn with_label(property: T, label: Option<&str>) -> Self {
    Self {
      property,
      label: label
        .filter(|l| !l.trim().is_empty())
        .map(str::to_string),
    }
  }

  /// Resolve the `(type code, label)` pair a builder writes for this value.
  ///
  /// `standard` maps the value's own type tokens to a code. When it yields
  /// one, the label is dropped. Otherwise a non-blank label gives `custom`
  /// plus the label, and no label at all gives `default`.
  pub fn resolve_type<C>(
    &self,
    standard: impl FnOnce(&T) -> Option<C>,
    custom: C,
    default: C,
  ) -> (C, Option<String>) {
    if let Some(code) = standard(&self.property) {
      return (code, None);
    }
    match self.label.as_deref() {
      Some(label) if !label.trim().is_empty() => (custom, Some(label.to_string())),
      _ => (default, None),
    }
  }
}

// ─── Property values ─────────────────────────────────────────────────────────

/// A telephone number (vCard `TEL`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Telephone {
  pub number: String,
  pub types:  Vec<TelType>,
  /// `PREF` parameter; 1 is most preferred.
  pub pref:   Option<u8>,
}

impl Telephone {
  pub fn new(number: impl Into<String>) -> Self {
    Self {
      number: number.into(),
      ..Self::default()
    }
  }

  pub fn is_preferred(&self) -> bool {
    self.pref.is_some() || self.types.contains(&TelType::Pref)
  }
}

/// An email address (vCard `EMAIL`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
  pub address: String,
  pub types:   Vec<EmailType>,
  pub pref:    Option<u8>,
}

impl Email {
  pub fn new(address: impl Into<String>) -> Self {
    Self {
      address: address.into(),
      ..Self::default()
    }
  }

  pub fn is_preferred(&self) -> bool {
    self.pref.is_some() || self.types.contains(&EmailType::Pref)
  }
}

/// One or more nicknames sharing a single type (vCard `NICKNAME`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nickname {
  pub values: Vec<String>,
  pub kind:   Option<NicknameType>,
}

/// An instant-messaging address (vCard `IMPP`), stored as a URI split into
/// scheme and handle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Impp {
  /// Lower-case URI scheme, e.g. `xmpp` or `sip`.
  pub protocol: String,
  pub handle:   String,
  pub types:    Vec<ImppType>,
  pub pref:     Option<u8>,
}

impl Impp {
  pub fn new(protocol: impl Into<String>, handle: impl Into<String>) -> Self {
    Self {
      protocol: protocol.into().to_lowercase(),
      handle: handle.into(),
      ..Self::default()
    }
  }

  /// Split `scheme:handle`. Returns `None` without a scheme.
  pub fn from_uri(uri: &str) -> Option<Self> {
    let (scheme, handle) = uri.trim().split_once(':')?;
    if scheme.is_empty() {
      return None;
    }
    Some(Self::new(scheme, handle))
  }

  pub fn uri(&self) -> String { format!("{}:{}", self.protocol, self.handle) }

  pub fn is_sip(&self) -> bool { self.protocol.eq_ignore_ascii_case("sip") }
}

/// A postal address (vCard `ADR`). Every component may hold several lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
  pub po_box:      Vec<String>,
  pub extended:    Vec<String>,
  pub street:      Vec<String>,
  /// City or locality.
  pub locality:    Vec<String>,
  pub region:      Vec<String>,
  pub postal_code: Vec<String>,
  pub country:     Vec<String>,
  /// Pre-formatted address text (vCard 4 `LABEL` parameter).
  pub formatted:   Option<String>,
  pub types:       Vec<AdrType>,
}

impl Address {
  pub fn is_empty(&self) -> bool {
    [
      &self.po_box,
      &self.extended,
      &self.street,
      &self.locality,
      &self.region,
      &self.postal_code,
      &self.country,
    ]
    .iter()
    .all(|c| c.iter().all(|l| l.trim().is_empty()))
      && self.formatted.as_deref().is_none_or(|f| f.trim().is_empty())
  }
}

/// A web address (vCard `URL`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Url {
  pub value: String,
  pub types: Vec<UrlType>,
}

/// A related person, by name or URI (vCard `RELATED`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Related {
  pub text:  String,
  pub types: Vec<RelatedType>,
}

// ─── Contact ─────────────────────────────────────────────────────────────────

/// One person, organisation or group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
  pub uid:     Option<String>,
  /// The card describes a group; its members are listed in `members`.
  pub group:   bool,
  /// UIDs of the group's members.
  pub members: Vec<String>,

  pub display_name:         Option<String>,
  pub prefix:               Option<String>,
  pub given_name:           Option<String>,
  pub middle_name:          Option<String>,
  pub family_name:          Option<String>,
  pub suffix:               Option<String>,
  pub phonetic_given_name:  Option<String>,
  pub phonetic_middle_name: Option<String>,
  pub phonetic_family_name: Option<String>,

  pub nickname:        Option<LabeledProperty<Nickname>>,
  /// Organisation name followed by its units, most general first.
  pub organization:    Vec<String>,
  pub job_title:       Option<String>,
  pub job_description: Option<String>,

  pub phone_numbers: Vec<LabeledProperty<Telephone>>,
  pub emails:        Vec<LabeledProperty<Email>>,
  pub impps:         Vec<LabeledProperty<Impp>>,
  pub addresses:     Vec<LabeledProperty<Address>>,
  pub urls:          Vec<LabeledProperty<Url>>,

  pub categories: Vec<String>,
  pub relations:  Vec<Related>,
  pub note:       Option<String>,

  pub birthday:     Option<EventDate>,
  pub anniversary:  Option<EventDate>,
  pub custom_dates: Vec<LabeledProperty<EventDate>>,

  /// JPEG or PNG bytes.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub photo:    Option<Vec<u8>>,
  pub revision: Option<DateTime<Utc>>,

  /// Content lines the codec did not map, kept verbatim for re-emission.
  pub unknown_properties: Vec<String>,
}

impl Contact {
  /// True when no structured-name component, display name included, is set.
  pub fn name_is_empty(&self) -> bool {
    [
      &self.display_name,
      &self.prefix,
      &self.given_name,
      &self.middle_name,
      &self.family_name,
      &self.suffix,
      &self.phonetic_given_name,
      &self.phonetic_middle_name,
      &self.phonetic_family_name,
    ]
    .iter()
    .all(|c| c.as_deref().is_none_or(|s| s.trim().is_empty()))
  }
}
