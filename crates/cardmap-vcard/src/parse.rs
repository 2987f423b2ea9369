//! vCard 3.0 / 4.0 → [`Contact`].
//!
//! Pipeline:
//!   raw &str
//!     └─ unfold_lines()          → Vec<String>
//!          └─ Property::parse()  → Vec<Property>
//!               └─ collect X-ABLABEL per group
//!                    └─ read_property() per line → Contact
//!
//! Anything the reader does not map is kept verbatim in
//! [`Contact::unknown_properties`].

use std::collections::{HashMap, HashSet};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use cardmap_core::{
  Contact, EventDate, LabeledProperty, PartialDate,
  contact::{Address, Email, Impp, Nickname, Related, Telephone, Url},
  types::{
    AdrType, EmailType, ImppType, NicknameType, RelatedType, TelType, UrlType,
    custom::DATE_PARAMETER_OMIT_YEAR,
  },
};
use chrono::{DateTime, Datelike, NaiveDateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
  error::{Error, Result},
  extension::{ExtensionTable, ExtensionValue, Target, apple},
  line::{
    Property, decode_quoted_printable, list_values, structured_values,
    unescape_value, unfold_lines,
  },
};

/// Lines that are consumed without being mapped.
const DROPPED: &[&str] = &["VERSION", "PRODID", "SORT-STRING", "SOURCE", "LABEL"];

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// `Some(trimmed)` when non-empty.
fn opt_str(s: &str) -> Option<String> {
  let s = s.trim();
  (!s.is_empty()).then(|| s.to_string())
}

/// Strip `urn:uuid:` from a UID or member reference.
pub(crate) fn uri_to_uid(uri: &str) -> Option<String> {
  let uri = uri.trim();
  let uid = match uri.get(..9) {
    Some(prefix) if prefix.eq_ignore_ascii_case("urn:uuid:") => &uri[9..],
    _ => uri,
  };
  opt_str(uid)
}

fn text_value(prop: &Property) -> String {
  let raw = if prop.has_param_value("ENCODING", "QUOTED-PRINTABLE") {
    decode_quoted_printable(&prop.value)
  } else {
    prop.value.clone()
  };
  unescape_value(&raw)
}

fn types_of<T>(prop: &Property, parse: fn(&str) -> T) -> Vec<T> {
  prop.types().iter().map(|t| parse(t)).collect()
}

/// `TYPE` tokens with a vCard 3 `pref` token folded into the preference.
fn types_and_pref<T>(prop: &Property, parse: fn(&str) -> T) -> (Vec<T>, Option<u8>) {
  let tokens = prop.types();
  let pref_token = tokens.iter().any(|t| t == "pref");
  let types = tokens
    .iter()
    .filter(|t| *t != "pref")
    .map(|t| parse(t))
    .collect();
  (types, prop.pref().or(pref_token.then_some(1)))
}

fn join_items(items: Option<&Vec<String>>) -> Option<String> {
  items.and_then(|i| opt_str(&i.join(" ")))
}

/// `REV` in basic (`20240101T120000Z`) or extended (RFC 3339) form.
fn parse_revision(s: &str) -> Option<DateTime<Utc>> {
  let s = s.trim();
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Some(dt.with_timezone(&Utc));
  }
  NaiveDateTime::parse_from_str(s, "%Y%m%dT%H%M%SZ")
    .ok()
    .map(|dt| dt.and_utc())
}

/// `PHOTO` bytes from `ENCODING=b` or a `data:` URI.
fn photo_bytes(prop: &Property) -> Option<Vec<u8>> {
  let value: String = prop.value.chars().filter(|c| !c.is_whitespace()).collect();
  let encoded = if prop.has_param_value("ENCODING", "b")
    || prop.has_param_value("ENCODING", "BASE64")
  {
    value.as_str()
  } else {
    let data = value.strip_prefix("data:")?;
    let (meta, payload) = data.split_once(',')?;
    if !meta.ends_with(";base64") {
      return None;
    }
    payload
  };
  match STANDARD.decode(encoded) {
    Ok(bytes) => Some(bytes),
    Err(e) => {
      warn!(error = %e, "ignoring PHOTO with invalid base64 data");
      None
    }
  }
}

/// Read a `BDAY`/`ANNIVERSARY`/`X-ABDATE` date. vCard 3 year-less dates
/// carry a placeholder year plus `X-APPLE-OMIT-YEAR`.
fn with_omitted_year(prop: &Property, date: EventDate) -> EventDate {
  let Some(omit) = prop.param(DATE_PARAMETER_OMIT_YEAR) else {
    return date;
  };
  match date {
    EventDate::Date(d) if omit.trim() == d.year().to_string() => {
      EventDate::Partial(PartialDate::month_day(d.month(), d.day()))
    }
    other => other,
  }
}

fn read_date(prop: &Property) -> Option<EventDate> {
  let value = text_value(prop);
  let date = if prop.has_param_value("VALUE", "text") {
    EventDate::Text(value.trim().to_string())
  } else {
    match EventDate::parse(&value) {
      Ok(date) => date,
      Err(e) => {
        warn!(property = %prop.name, error = %e, "ignoring invalid date");
        return None;
      }
    }
  };
  Some(with_omitted_year(prop, date))
}

/// Relation tokens for an Apple `X-ABRELATEDNAMES` label.
fn apple_relation_types(label: &str) -> Vec<RelatedType> {
  match label {
    apple::ASSISTANT => vec![RelatedType::Assistant, RelatedType::CoWorker],
    apple::BROTHER => vec![RelatedType::Brother, RelatedType::Sibling],
    apple::CHILD => vec![RelatedType::Child],
    apple::FATHER => vec![RelatedType::Father, RelatedType::Parent],
    apple::FRIEND => vec![RelatedType::Friend],
    apple::MANAGER => vec![RelatedType::Manager, RelatedType::CoWorker],
    apple::MOTHER => vec![RelatedType::Mother, RelatedType::Parent],
    apple::SISTER => vec![RelatedType::Sister, RelatedType::Sibling],
    apple::PARENT => vec![RelatedType::Parent],
    apple::PARTNER => vec![RelatedType::Partner],
    apple::SPOUSE => vec![RelatedType::Spouse],
    other => other
      .split(',')
      .map(str::trim)
      .filter(|t| !t.is_empty())
      .map(RelatedType::parse)
      .collect(),
  }
}

// ─── Reader ──────────────────────────────────────────────────────────────────

struct Reader<'a> {
  table:       &'a ExtensionTable,
  contact:     Contact,
  /// `X-ABLABEL` values keyed by lower-cased group.
  labels:      HashMap<String, String>,
  used_labels: HashSet<String>,
}

impl<'a> Reader<'a> {
  fn new(table: &'a ExtensionTable, props: &[(Property, &str)]) -> Self {
    let mut labels = HashMap::new();
    if let Some(label_prop) = table.by_target(Target::Label) {
      for (prop, _) in props {
        if !prop.name.eq_ignore_ascii_case(label_prop.name) {
          continue;
        }
        let Some(group) = &prop.group else { continue };
        if let Ok(ExtensionValue::Text(label)) =
          table.parse(label_prop, &text_value(prop))
          && !label.is_empty()
        {
          labels.entry(group.to_lowercase()).or_insert(label);
        }
      }
    }
    Self {
      table,
      contact: Contact::default(),
      labels,
      used_labels: HashSet::new(),
    }
  }

  /// The `X-ABLABEL` sharing `prop`'s group, marked as consumed.
  fn take_label(&mut self, prop: &Property) -> Option<String> {
    let group = prop.group.as_ref()?.to_lowercase();
    let label = self.labels.get(&group)?.clone();
    self.used_labels.insert(group);
    Some(label)
  }

  fn labeled<T>(&mut self, prop: &Property, value: T) -> LabeledProperty<T> {
    let label = self.take_label(prop);
    LabeledProperty::with_label(value, label.as_deref())
  }

  /// Map one property. Returns `false` when it should be kept as unknown.
  fn read(&mut self, prop: &Property) -> bool {
    match prop.name.as_str() {
      name if DROPPED.contains(&name) => {}

      "UID" => self.contact.uid = uri_to_uid(&text_value(prop)),
      "KIND" => self.contact.group = text_value(prop).trim().eq_ignore_ascii_case("group"),
      "MEMBER" => self.contact.members.extend(uri_to_uid(&prop.value)),
      "REV" => self.contact.revision = parse_revision(&prop.value),

      // ── Name ───────────────────────────────────────────────────────────────
      "FN" => self.contact.display_name = opt_str(&text_value(prop)),
      "N" => {
        // family;given;additional;prefix;suffix
        let parts = structured_values(&prop.value);
        self.contact.family_name = join_items(parts.first());
        self.contact.given_name = join_items(parts.get(1));
        self.contact.middle_name = join_items(parts.get(2));
        self.contact.prefix = join_items(parts.get(3));
        self.contact.suffix = join_items(parts.get(4));
      }
      "NICKNAME" => {
        let nickname = Nickname {
          values: list_values(&prop.value),
          kind:   prop.types().first().map(|t| NicknameType::parse(t)),
        };
        if !nickname.values.is_empty() {
          let nickname = self.labeled(prop, nickname);
          self.contact.nickname = Some(nickname);
        }
      }
      "CATEGORIES" => {
        for category in list_values(&prop.value) {
          if !self.contact.categories.contains(&category) {
            self.contact.categories.push(category);
          }
        }
      }

      // ── Organisation ───────────────────────────────────────────────────────
      "ORG" => {
        self.contact.organization = structured_values(&prop.value)
          .into_iter()
          .filter_map(|unit| opt_str(&unit.join(",")))
          .collect();
      }
      "TITLE" => self.contact.job_title = opt_str(&text_value(prop)),
      "ROLE" => self.contact.job_description = opt_str(&text_value(prop)),

      // ── Communication ──────────────────────────────────────────────────────
      "TEL" => {
        let value = text_value(prop);
        let number = value.trim();
        let number = number.strip_prefix("tel:").unwrap_or(number);
        if number.is_empty() {
          return true;
        }
        let (types, pref) = types_and_pref(prop, TelType::parse);
        let tel = Telephone {
          number: number.to_string(),
          types,
          pref,
        };
        let tel = self.labeled(prop, tel);
        self.contact.phone_numbers.push(tel);
      }
      "EMAIL" => {
        let Some(address) = opt_str(&text_value(prop)) else {
          return true;
        };
        let (types, pref) = types_and_pref(prop, EmailType::parse);
        let email = Email {
          address,
          types,
          pref,
        };
        let email = self.labeled(prop, email);
        self.contact.emails.push(email);
      }
      "IMPP" => {
        let Some(mut impp) = Impp::from_uri(&text_value(prop)) else {
          warn!(value = %prop.value, "ignoring IMPP without URI scheme");
          return true;
        };
        (impp.types, impp.pref) = types_and_pref(prop, ImppType::parse);
        let impp = self.labeled(prop, impp);
        self.contact.impps.push(impp);
      }
      "URL" => {
        let Some(value) = opt_str(&text_value(prop)) else {
          return true;
        };
        let url = Url {
          value,
          types: types_of(prop, UrlType::parse),
        };
        let url = self.labeled(prop, url);
        self.contact.urls.push(url);
      }
      "ADR" => {
        // pobox;ext;street;locality;region;code;country
        let mut parts = structured_values(&prop.value).into_iter();
        let mut next = || parts.next().unwrap_or_default();
        let address = Address {
          po_box:      next(),
          extended:    next(),
          street:      next(),
          locality:    next(),
          region:      next(),
          postal_code: next(),
          country:     next(),
          formatted:   prop.param("LABEL").and_then(|l| opt_str(&unescape_value(l))),
          types:       types_of(prop, AdrType::parse),
        };
        if !address.is_empty() {
          let address = self.labeled(prop, address);
          self.contact.addresses.push(address);
        }
      }

      // ── Dates ──────────────────────────────────────────────────────────────
      // An unreadable date never replaces one already read.
      "BDAY" => {
        if let Some(date) = read_date(prop) {
          self.contact.birthday = Some(date);
        }
      }
      "ANNIVERSARY" => {
        if let Some(date) = read_date(prop) {
          self.contact.anniversary = Some(date);
        }
      }

      // ── Relations ──────────────────────────────────────────────────────────
      "RELATED" => {
        let Some(text) = opt_str(&text_value(prop)) else {
          return true;
        };
        self.contact.relations.push(Related {
          text,
          types: types_of(prop, RelatedType::parse),
        });
      }
      apple::RELATED_NAMES => {
        let Some(text) = opt_str(&text_value(prop)) else {
          return true;
        };
        let types = match self.take_label(prop) {
          Some(label) => apple_relation_types(&label),
          None => types_of(prop, RelatedType::parse),
        };
        self.contact.relations.push(Related { text, types });
      }

      // ── Misc ───────────────────────────────────────────────────────────────
      "NOTE" => {
        if let Some(note) = opt_str(&text_value(prop)) {
          self.contact.note = Some(match self.contact.note.take() {
            Some(existing) => format!("{existing}\n\n\n{note}"),
            None => note,
          });
        }
      }
      "PHOTO" => {
        if self.contact.photo.is_some() {
          return true;
        }
        match photo_bytes(prop) {
          Some(bytes) => self.contact.photo = Some(bytes),
          // Photo by reference; nothing to download it with.
          None => return false,
        }
      }

      _ => return self.read_extension(prop),
    }
    true
  }

  fn read_extension(&mut self, prop: &Property) -> bool {
    let table = self.table;
    let Some(custom) = table.by_name(&prop.name) else {
      return false;
    };
    if custom.target == Target::Label {
      // Labels are resolved through their group; unused ones are kept.
      return prop
        .group
        .as_ref()
        .is_some_and(|g| self.labels.contains_key(&g.to_lowercase()));
    }

    let value = match table.parse(custom, &text_value(prop)) {
      Ok(value) => value,
      Err(e) => {
        warn!(error = %e, "ignoring custom property");
        return true;
      }
    };

    match (custom.target, value) {
      (Target::PhoneticGivenName, ExtensionValue::Text(t)) => {
        self.contact.phonetic_given_name = opt_str(&t)
      }
      (Target::PhoneticMiddleName, ExtensionValue::Text(t)) => {
        self.contact.phonetic_middle_name = opt_str(&t)
      }
      (Target::PhoneticFamilyName, ExtensionValue::Text(t)) => {
        self.contact.phonetic_family_name = opt_str(&t)
      }
      (Target::SipAddress, ExtensionValue::Text(t)) => {
        let address = t.strip_prefix("sip:").unwrap_or(&t);
        self.contact.impps.push(LabeledProperty::new(Impp::new("sip", address)));
      }
      (Target::ServerKind, ExtensionValue::Text(t)) => {
        self.contact.group = t == "group"
      }
      (Target::ServerMember, ExtensionValue::Text(t)) => {
        self.contact.members.extend(uri_to_uid(&t))
      }
      (Target::CustomDate, ExtensionValue::Date(date)) => {
        let date = with_omitted_year(prop, date);
        let label = self.take_label(prop).filter(|l| l != apple::OTHER);
        if label.as_deref() == Some(apple::ANNIVERSARY) {
          if self.contact.anniversary.is_none() {
            self.contact.anniversary = Some(date);
          }
        } else {
          self
            .contact
            .custom_dates
            .push(LabeledProperty::with_label(date, label.as_deref()));
        }
      }
      (target, value) => {
        debug!(?target, ?value, "custom property value does not fit its target");
      }
    }
    true
  }

  fn finish(mut self, props: Vec<(Property, &str)>, kept: Vec<usize>) -> Contact {
    let label_name = self.table.by_target(Target::Label).map(|p| p.name);
    for (i, (prop, raw)) in props.iter().enumerate() {
      let unused_label = label_name.is_some_and(|n| prop.name.eq_ignore_ascii_case(n))
        && prop
          .group
          .as_ref()
          .is_some_and(|g| !self.used_labels.contains(&g.to_lowercase()));
      if kept.contains(&i) || unused_label {
        self.contact.unknown_properties.push(raw.to_string());
      }
    }

    if self.contact.uid.is_none() {
      let uid = Uuid::new_v4().to_string();
      warn!(%uid, "vCard without UID, generated one");
      self.contact.uid = Some(uid);
    }
    self.contact
  }
}

// ─── Entry points ────────────────────────────────────────────────────────────

/// Parse a single vCard from `input` (the first `BEGIN`/`END` envelope).
pub fn parse_one(input: &str, table: &ExtensionTable) -> Result<Contact> {
  let lines = unfold_lines(input);

  let start = lines
    .iter()
    .position(|l| l.trim().eq_ignore_ascii_case("BEGIN:VCARD"))
    .ok_or(Error::MissingEnvelope)?;
  let end = lines[start + 1..]
    .iter()
    .position(|l| l.trim().eq_ignore_ascii_case("END:VCARD"))
    .map(|offset| start + 1 + offset)
    .ok_or(Error::MissingEnvelope)?;

  let mut props = Vec::new();
  for line in &lines[start + 1..end] {
    match Property::parse(line) {
      Ok(prop) => props.push((prop, line.as_str())),
      Err(e) => warn!(error = %e, "skipping content line"),
    }
  }

  let mut reader = Reader::new(table, &props);
  let mut kept = Vec::new();
  for (i, (prop, _)) in props.iter().enumerate() {
    if !reader.read(prop) {
      debug!(property = %prop.name, "keeping unknown property");
      kept.push(i);
    }
  }
  Ok(reader.finish(props, kept))
}

/// Split `input` into `BEGIN:VCARD … END:VCARD` blocks and parse each.
///
/// A block without `END:VCARD` yields `Err(MissingEnvelope)` and stops the
/// scan; earlier blocks are unaffected.
pub fn parse_many(input: &str, table: &ExtensionTable) -> Vec<Result<Contact>> {
  let lines = unfold_lines(input);
  let mut results = Vec::new();
  let mut i = 0;

  while i < lines.len() {
    if lines[i].trim().eq_ignore_ascii_case("BEGIN:VCARD") {
      let start = i;
      let rel_end = lines[start + 1..]
        .iter()
        .position(|l| l.trim().eq_ignore_ascii_case("END:VCARD"));

      if let Some(offset) = rel_end {
        let end = start + 1 + offset;
        let card = lines[start..=end].join("\r\n") + "\r\n";
        results.push(parse_one(&card, table));
        i = end + 1;
      } else {
        results.push(Err(Error::MissingEnvelope));
        break;
      }
    } else {
      i += 1;
    }
  }

  results
}

// ─── Tests ───────────────────────────────────────────────────────────────────
