//! [`Contact`] → vCard 4.0 or 3.0.
//!
//! Produces CRLF line endings and folds at 75 octets per RFC 6350 §3.2.
//! Labeled values are written as `itemN.PROP` with a matching
//! `itemN.X-ABLABEL`; the item counter skips groups already used by the
//! contact's unknown properties.

use std::collections::HashSet;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use cardmap_core::{
  Contact, EventDate, LabeledProperty,
  contact::Related,
  types::{
    RelatedType,
    custom::{DATE_PARAMETER_OMIT_YEAR, DATE_PARAMETER_OMIT_YEAR_DEFAULT},
  },
};
use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::{
  Version,
  extension::{ExtensionTable, ExtensionValue, Target, apple},
  line::{Property, escape_value, fold_line, join_structured},
};

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn non_blank(s: &Option<String>) -> Option<&str> {
  s.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Space-separated items of a name component.
fn name_items(s: &Option<String>) -> Vec<String> {
  non_blank(s)
    .map(|s| s.split(' ').filter(|i| !i.is_empty()).map(str::to_string).collect())
    .unwrap_or_default()
}

/// `FN` is mandatory in both versions.
fn formatted_name(contact: &Contact) -> String {
  let organization = contact.organization.join(" / ");
  non_blank(&contact.display_name)
    .or_else(|| (!organization.trim().is_empty()).then_some(organization.as_str()))
    .or_else(|| {
      contact
        .nickname
        .as_ref()
        .and_then(|n| n.property.values.first())
        .map(String::as_str)
    })
    .or_else(|| contact.emails.first().map(|e| e.property.address.as_str()))
    .or_else(|| contact.phone_numbers.first().map(|t| t.property.number.as_str()))
    .or(contact.uid.as_deref())
    .unwrap_or_default()
    .to_string()
}

fn looks_like_uri(s: &str) -> bool {
  match s.split_once(':') {
    Some((scheme, rest)) => {
      !rest.is_empty()
        && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
          .chars()
          .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        && !s.contains(char::is_whitespace)
    }
    None => false,
  }
}

/// Upper-case the first letter.
fn capitalize(s: &str) -> String {
  let mut chars = s.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}

/// Apple label for a vCard 3 relation, checked in this order.
fn apple_relation_label(types: &[RelatedType]) -> Option<&'static str> {
  [
    (RelatedType::Assistant, apple::ASSISTANT),
    (RelatedType::Brother, apple::BROTHER),
    (RelatedType::Child, apple::CHILD),
    (RelatedType::Father, apple::FATHER),
    (RelatedType::Friend, apple::FRIEND),
    (RelatedType::Manager, apple::MANAGER),
    (RelatedType::Mother, apple::MOTHER),
    (RelatedType::Parent, apple::PARENT),
    (RelatedType::Partner, apple::PARTNER),
    (RelatedType::Sister, apple::SISTER),
    (RelatedType::Spouse, apple::SPOUSE),
  ]
  .into_iter()
  .find(|(t, _)| types.contains(t))
  .map(|(_, label)| label)
}

// ─── Writer ──────────────────────────────────────────────────────────────────

struct Writer<'a> {
  version:   Version,
  table:     &'a ExtensionTable,
  out:       String,
  next_item: usize,
  /// Lower-cased groups of the retained unknown lines.
  reserved:  HashSet<String>,
}

impl<'a> Writer<'a> {
  fn new(version: Version, table: &'a ExtensionTable, contact: &Contact) -> Self {
    let reserved = contact
      .unknown_properties
      .iter()
      .filter_map(|line| Property::parse(line).ok())
      .filter_map(|prop| prop.group.map(|g| g.to_lowercase()))
      .collect();
    Self {
      version,
      table,
      out: String::new(),
      next_item: 1,
      reserved,
    }
  }

  fn v4(&self) -> bool { self.version == Version::V4 }

  fn push(&mut self, prop: Property) {
    self.out.push_str(&fold_line(&prop.to_line()));
  }

  fn push_line(&mut self, line: &str) {
    self.out.push_str(&fold_line(line));
  }

  fn next_group(&mut self) -> String {
    loop {
      let group = format!("item{}", self.next_item);
      self.next_item += 1;
      if !self.reserved.contains(&group) {
        return group;
      }
    }
  }

  /// Write `prop`, grouped with an `X-ABLABEL` when `label` is set and a
  /// label property is registered.
  fn push_labeled(&mut self, prop: Property, label: Option<&str>) {
    let label = label.map(str::trim).filter(|l| !l.is_empty());
    let table = self.table;
    match (label, table.by_target(Target::Label)) {
      (Some(label), Some(custom)) => {
        let group = self.next_group();
        let value = (custom.render)(&ExtensionValue::Text(label.to_string()));
        self.push(Property::new(custom.name, escape_value(&value)).with_group(Some(group.clone())));
        self.push(prop.with_group(Some(group)));
      }
      _ => self.push(prop),
    }
  }

  /// Write a registered custom property; unregistered targets are skipped.
  fn push_custom(&mut self, target: Target, value: ExtensionValue) {
    let Some(custom) = self.table.by_target(target) else {
      debug!(?target, "no custom property registered, not written");
      return;
    };
    let value = escape_value(&(custom.render)(&value));
    self.push(Property::new(custom.name, value));
  }

  /// `TYPE` plus preference: `PREF=n` in v4, a `pref` token in v3.
  fn typed(&self, prop: Property, types: Vec<&str>, pref: Option<u8>) -> Property {
    let has_pref_token = types.iter().any(|t| t.eq_ignore_ascii_case("pref"));
    let mut types: Vec<&str> = types
      .into_iter()
      .filter(|t| !t.eq_ignore_ascii_case("pref"))
      .collect();
    if self.v4() {
      let pref = pref.or(has_pref_token.then_some(1));
      let prop = prop.with_types(types);
      match pref {
        Some(p) => prop.with_param("PREF", p.to_string()),
        None => prop,
      }
    } else {
      if pref.is_some() || has_pref_token {
        types.push("pref");
      }
      prop.with_types(types)
    }
  }

  // ── Dates ──────────────────────────────────────────────────────────────────

  /// The date as this version can carry it, plus whether its year is the
  /// placeholder. vCard 3 has neither partial nor text dates.
  fn writable_date(&self, date: &EventDate) -> Option<(EventDate, bool)> {
    match date {
      EventDate::Partial(p) if p.year.is_none() && p.month.is_none() && p.day.is_none() => {
        None
      }
      _ if self.v4() => Some((date.clone(), false)),
      EventDate::Date(_) => Some((date.clone(), false)),
      EventDate::Partial(p) => {
        let (Some(month), Some(day)) = (p.month, p.day) else {
          warn!(date = %date, "vCard 3 cannot express a date without month and day");
          return None;
        };
        let year = p.year.unwrap_or(DATE_PARAMETER_OMIT_YEAR_DEFAULT);
        let Some(full) = NaiveDate::from_ymd_opt(year, month, day) else {
          warn!(date = %date, "ignoring impossible date");
          return None;
        };
        Some((EventDate::Date(full), p.year.is_none()))
      }
      EventDate::Text(t) => {
        warn!(text = %t, "vCard 3 cannot express a text date");
        None
      }
    }
  }

  fn date_property(&self, name: &str, date: &EventDate) -> Option<Property> {
    let (date, omitted) = self.writable_date(date)?;
    let prop = match &date {
      EventDate::Date(d) if self.v4() => Property::new(name, d.format("%Y%m%d").to_string()),
      EventDate::Date(d) => Property::new(name, d.format("%Y-%m-%d").to_string()),
      EventDate::Partial(p) => Property::new(name, p.to_vcard_string()),
      EventDate::Text(t) => Property::new(name, escape_value(t)).with_param("VALUE", "text"),
    };
    Some(with_omit_year(prop, omitted))
  }

  fn push_custom_date(&mut self, date: &EventDate, label: Option<&str>) {
    let table = self.table;
    let Some(custom) = table.by_target(Target::CustomDate) else {
      debug!("no custom date property registered, not written");
      return;
    };
    let Some((date, omitted)) = self.writable_date(date) else {
      return;
    };
    let value = escape_value(&(custom.render)(&ExtensionValue::Date(date)));
    let prop = with_omit_year(Property::new(custom.name, value), omitted);
    self.push_labeled(prop, label);
  }

  // ── Sections ───────────────────────────────────────────────────────────────

  fn kind_and_members(&mut self, contact: &Contact) {
    if !contact.group {
      return;
    }
    if self.v4() {
      self.push(Property::new("KIND", "group"));
      for member in &contact.members {
        self.push(Property::new("MEMBER", format!("urn:uuid:{member}")));
      }
    } else {
      self.push_custom(Target::ServerKind, ExtensionValue::Text("group".to_string()));
      for member in &contact.members {
        self.push_custom(
          Target::ServerMember,
          ExtensionValue::Text(format!("urn:uuid:{member}")),
        );
      }
    }
  }

  fn names(&mut self, contact: &Contact) {
    self.push(Property::new("FN", escape_value(&formatted_name(contact))));

    let mut n = [
      name_items(&contact.family_name),
      name_items(&contact.given_name),
      name_items(&contact.middle_name),
      name_items(&contact.prefix),
      name_items(&contact.suffix),
    ];
    let empty = n.iter().all(Vec::is_empty);
    // Apple shows an empty N on a vCard 3 group as ";;;;".
    if !self.v4() && contact.group && empty {
      n[0] = contact.display_name.iter().cloned().collect();
    }
    if !self.v4() || !empty {
      self.push(Property::new("N", join_structured(&n)));
    }

    for (target, value) in [
      (Target::PhoneticGivenName, &contact.phonetic_given_name),
      (Target::PhoneticMiddleName, &contact.phonetic_middle_name),
      (Target::PhoneticFamilyName, &contact.phonetic_family_name),
    ] {
      if let Some(value) = non_blank(value) {
        self.push_custom(target, ExtensionValue::Text(value.to_string()));
      }
    }

    if let Some(nickname) = &contact.nickname {
      let values = nickname.property.values.iter().map(|v| escape_value(v));
      let prop = Property::new("NICKNAME", values.collect::<Vec<_>>().join(","))
        .with_types(nickname.property.kind.iter().map(|k| k.as_str()));
      self.push_labeled(prop, nickname.label.as_deref());
    }
  }

  fn organization(&mut self, contact: &Contact) {
    if !contact.categories.is_empty() {
      let values: Vec<String> = contact.categories.iter().map(|c| escape_value(c)).collect();
      self.push(Property::new("CATEGORIES", values.join(",")));
    }
    if !contact.organization.is_empty() {
      let units: Vec<Vec<&str>> = contact
        .organization
        .iter()
        .map(|unit| vec![unit.as_str()])
        .collect();
      self.push(Property::new("ORG", join_structured(&units)));
    }
    if let Some(title) = non_blank(&contact.job_title) {
      self.push(Property::new("TITLE", escape_value(title)));
    }
    if let Some(role) = non_blank(&contact.job_description) {
      self.push(Property::new("ROLE", escape_value(role)));
    }
  }

  fn communication(&mut self, contact: &Contact) {
    for LabeledProperty { property: tel, label } in &contact.phone_numbers {
      let types = tel.types.iter().map(|t| t.as_str()).collect();
      let prop = self.typed(Property::new("TEL", escape_value(&tel.number)), types, tel.pref);
      self.push_labeled(prop, label.as_deref());
    }
    for LabeledProperty { property: email, label } in &contact.emails {
      let types = email.types.iter().map(|t| t.as_str()).collect();
      let prop =
        self.typed(Property::new("EMAIL", escape_value(&email.address)), types, email.pref);
      self.push_labeled(prop, label.as_deref());
    }
    for LabeledProperty { property: impp, label } in &contact.impps {
      if impp.handle.trim().is_empty() {
        continue;
      }
      let types = impp.types.iter().map(|t| t.as_str()).collect();
      let prop = self.typed(Property::new("IMPP", escape_value(&impp.uri())), types, impp.pref);
      self.push_labeled(prop, label.as_deref());
    }
    for LabeledProperty { property: url, label } in &contact.urls {
      let prop = Property::new("URL", escape_value(&url.value))
        .with_types(url.types.iter().map(|t| t.as_str()));
      self.push_labeled(prop, label.as_deref());
    }
    for LabeledProperty { property: adr, label } in &contact.addresses {
      let value = join_structured(&[
        adr.po_box.clone(),
        adr.extended.clone(),
        adr.street.clone(),
        adr.locality.clone(),
        adr.region.clone(),
        adr.postal_code.clone(),
        adr.country.clone(),
      ]);
      let mut prop = Property::new("ADR", value);
      if self.v4()
        && let Some(formatted) = non_blank(&adr.formatted)
      {
        prop = prop.with_param("LABEL", formatted);
      }
      let types = adr.types.iter().map(|t| t.as_str()).collect();
      let prop = self.typed(prop, types, None);
      self.push_labeled(prop, label.as_deref());
    }
  }

  fn dates(&mut self, contact: &Contact) {
    if let Some(birthday) = &contact.birthday
      && let Some(prop) = self.date_property("BDAY", birthday)
    {
      self.push(prop);
    }
    if let Some(anniversary) = &contact.anniversary {
      if self.v4() {
        if let Some(prop) = self.date_property("ANNIVERSARY", anniversary) {
          self.push(prop);
        }
      } else {
        self.push_custom_date(anniversary, Some(apple::ANNIVERSARY));
      }
    }
    for date in &contact.custom_dates {
      self.push_custom_date(&date.property, date.label.as_deref());
    }
  }

  fn relation(&mut self, relation: &Related) {
    if relation.text.trim().is_empty() {
      return;
    }
    if self.v4() {
      let mut prop = Property::new("RELATED", escape_value(&relation.text))
        .with_types(relation.types.iter().map(|t| t.as_str()));
      if !looks_like_uri(&relation.text) {
        prop = prop.with_param("VALUE", "text");
      }
      self.push(prop);
      return;
    }

    let mut prop = Property::new(apple::RELATED_NAMES, escape_value(&relation.text));
    // The reader adds `other` to untyped relations.
    let types: Vec<RelatedType> = relation
      .types
      .iter()
      .filter(|t| t.as_str() != "other")
      .cloned()
      .collect();
    let label = match apple_relation_label(&types) {
      Some(label) => Some(label.to_string()),
      None if types.is_empty() => {
        prop = prop.with_param("TYPE", "other");
        None
      }
      None => Some(
        types
          .iter()
          .map(|t| capitalize(t.as_str()))
          .collect::<Vec<_>>()
          .join(", "),
      ),
    };
    self.push_labeled(prop, label.as_deref());
  }

  fn photo(&mut self, photo: &[u8]) {
    let encoded = STANDARD.encode(photo);
    let prop = if self.v4() {
      Property::new("PHOTO", format!("data:image/jpeg;base64,{encoded}"))
    } else {
      Property::new("PHOTO", encoded)
        .with_param("ENCODING", "b")
        .with_param("TYPE", "JPEG")
    };
    self.push(prop);
  }
}

fn with_omit_year(prop: Property, omitted: bool) -> Property {
  if omitted {
    prop.with_param(
      DATE_PARAMETER_OMIT_YEAR,
      DATE_PARAMETER_OMIT_YEAR_DEFAULT.to_string(),
    )
  } else {
    prop
  }
}

// ─── Entry point ─────────────────────────────────────────────────────────────

/// Render `contact` as one vCard of the given version.
pub fn render(
  contact: &Contact,
  version: Version,
  table: &ExtensionTable,
  prod_id: &str,
) -> String {
  let mut w = Writer::new(version, table, contact);

  w.push_line("BEGIN:VCARD");
  w.push_line(&format!("VERSION:{}", version.as_str()));
  if let Some(uid) = non_blank(&contact.uid) {
    w.push(Property::new("UID", escape_value(uid)));
  }
  if !prod_id.is_empty() {
    w.push(Property::new("PRODID", escape_value(prod_id)));
  }

  w.kind_and_members(contact);
  w.names(contact);
  w.organization(contact);
  w.communication(contact);
  w.dates(contact);
  for relation in &contact.relations {
    w.relation(relation);
  }
  if let Some(note) = non_blank(&contact.note) {
    w.push(Property::new("NOTE", escape_value(note)));
  }
  for line in &contact.unknown_properties {
    w.push_line(line);
  }
  if let Some(photo) = &contact.photo {
    w.photo(photo);
  }
  if let Some(rev) = contact.revision {
    w.push(Property::new("REV", rev.format("%Y%m%dT%H%M%SZ").to_string()));
  }

  w.push_line("END:VCARD");
  w.out
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use cardmap_core::{
    PartialDate,
    contact::{Address, Email, Impp, Nickname, Telephone},
    types::{AdrType, EmailType, NicknameType, TelType},
  };

  use super::*;

  fn contact() -> Contact {
    Contact {
      uid: Some("uid-1".to_string()),
      display_name: Some("Jane Doe".to_string()),
      given_name: Some("Jane".to_string()),
      family_name: Some("Doe".to_string()),
      ..Contact::default()
    }
  }

  fn render4(c: &Contact) -> String {
    render(c, Version::V4, &ExtensionTable::standard(), "-//cardmap//EN")
  }

  fn render3(c: &Contact) -> String {
    render(c, Version::V3, &ExtensionTable::standard(), "-//cardmap//EN")
  }

  fn lines(vcard: &str) -> Vec<&str> { vcard.split("\r\n").collect() }

  // ── Envelope ───────────────────────────────────────────────────────────────

  #[test]
  fn envelope_and_header() {
    let out = render4(&contact());
    let lines = lines(&out);
    assert_eq!(lines[0], "BEGIN:VCARD");
    assert_eq!(lines[1], "VERSION:4.0");
    assert_eq!(lines[2], "UID:uid-1");
    assert_eq!(lines[3], "PRODID:-//cardmap//EN");
    assert!(out.ends_with("END:VCARD\r\n"));
  }

  #[test]
  fn formatted_name_fallbacks() {
    let mut c = Contact {
      uid: Some("u".to_string()),
      ..Contact::default()
    };
    assert_eq!(formatted_name(&c), "u");
    c.phone_numbers.push(LabeledProperty::new(Telephone::new("+1")));
    assert_eq!(formatted_name(&c), "+1");
    c.emails.push(LabeledProperty::new(Email::new("a@b.c")));
    assert_eq!(formatted_name(&c), "a@b.c");
    c.organization = vec!["Acme".to_string(), "Lab".to_string()];
    assert_eq!(formatted_name(&c), "Acme / Lab");
    c.display_name = Some("Name".to_string());
    assert_eq!(formatted_name(&c), "Name");
    assert_eq!(formatted_name(&Contact::default()), "");
  }

  // ── Names ──────────────────────────────────────────────────────────────────

  #[test]
  fn structured_name_items() {
    let mut c = contact();
    c.middle_name = Some("Quincy Q.".to_string());
    c.prefix = Some("Dr.".to_string());
    let out = render4(&c);
    assert!(out.contains("\r\nN:Doe;Jane;Quincy,Q.;Dr.;\r\n"));
  }

  #[test]
  fn empty_name_only_in_v3() {
    let c = Contact {
      uid: Some("u".to_string()),
      display_name: Some("Org".to_string()),
      ..Contact::default()
    };
    assert!(!render4(&c).contains("\r\nN:"));
    assert!(render3(&c).contains("\r\nN:;;;;\r\n"));
  }

  #[test]
  fn v3_group_name_uses_display_name() {
    let c = Contact {
      uid: Some("g".to_string()),
      group: true,
      display_name: Some("Family".to_string()),
      members: vec!["m1".to_string()],
      ..Contact::default()
    };
    let out = render3(&c);
    assert!(out.contains("\r\nN:Family;;;;\r\n"));
    assert!(out.contains("\r\nX-ADDRESSBOOKSERVER-KIND:group\r\n"));
    assert!(out.contains("\r\nX-ADDRESSBOOKSERVER-MEMBER:urn:uuid:m1\r\n"));

    let out = render4(&c);
    assert!(out.contains("\r\nKIND:group\r\n"));
    assert!(out.contains("\r\nMEMBER:urn:uuid:m1\r\n"));
  }

  #[test]
  fn phonetic_names_need_registration() {
    let mut c = contact();
    c.phonetic_given_name = Some("Jein".to_string());
    assert!(render4(&c).contains("\r\nX-PHONETIC-FIRST-NAME:Jein\r\n"));
    let out = render(&c, Version::V4, &ExtensionTable::empty(), "");
    assert!(!out.contains("X-PHONETIC"));
    assert!(!out.contains("PRODID"));
  }

  #[test]
  fn nickname_type_and_label() {
    let mut c = contact();
    c.nickname = Some(LabeledProperty::with_label(
      Nickname {
        values: vec!["Jay".to_string(), "J, J".to_string()],
        kind:   Some(NicknameType::ShortName),
      },
      Some("Stage"),
    ));
    let out = render4(&c);
    assert!(out.contains("\r\nitem1.X-ABLABEL:Stage\r\n"));
    assert!(out.contains("\r\nitem1.NICKNAME;TYPE=x-short-name:Jay,J\\, J\r\n"));
  }

  // ── Communication ──────────────────────────────────────────────────────────

  #[test]
  fn tel_pref_per_version() {
    let mut c = contact();
    c.phone_numbers.push(LabeledProperty::new(Telephone {
      number: "+1 555".to_string(),
      types:  vec![TelType::Cell, TelType::Pref],
      pref:   None,
    }));
    assert!(render4(&c).contains("\r\nTEL;TYPE=cell;PREF=1:+1 555\r\n"));
    assert!(render3(&c).contains("\r\nTEL;TYPE=cell,pref:+1 555\r\n"));
  }

  #[test]
  fn labels_skip_reserved_groups() {
    let mut c = contact();
    c.unknown_properties = vec!["item1.X-CUSTOM:kept".to_string()];
    c.emails.push(LabeledProperty::with_label(
      Email {
        address: "jane@example.com".to_string(),
        types:   vec![EmailType::Other("x-school".to_string())],
        pref:    None,
      },
      Some("School"),
    ));
    let out = render4(&c);
    assert!(out.contains("\r\nitem2.X-ABLABEL:School\r\n"));
    assert!(out.contains("\r\nitem2.EMAIL;TYPE=x-school:jane@example.com\r\n"));
    assert!(out.contains("\r\nitem1.X-CUSTOM:kept\r\n"));
  }

  #[test]
  fn impp_and_address() {
    let mut c = contact();
    c.impps.push(LabeledProperty::new(Impp::new("xmpp", "jane@example.com")));
    c.impps.push(LabeledProperty::new(Impp::new("skype", "")));
    c.addresses.push(LabeledProperty::new(Address {
      street: vec!["1 Main St".to_string()],
      locality: vec!["Springfield".to_string()],
      formatted: Some("1 Main St\nSpringfield".to_string()),
      types: vec![AdrType::Home],
      ..Address::default()
    }));
    let out = render4(&c);
    assert!(out.contains("\r\nIMPP:xmpp:jane@example.com\r\n"));
    assert!(!out.contains("skype"));
    assert!(out.contains("\r\nADR;LABEL=1 Main St^nSpringfield;TYPE=home:;;1 Main St;Springfield;;;\r\n"));
    assert!(render3(&c).contains("\r\nADR;TYPE=home:;;1 Main St;Springfield;;;\r\n"));
  }

  // ── Dates ──────────────────────────────────────────────────────────────────

  #[test]
  fn dates_v4() {
    let mut c = contact();
    c.birthday = Some(EventDate::Date(NaiveDate::from_ymd_opt(1990, 5, 12).unwrap()));
    c.anniversary = Some(EventDate::Partial(PartialDate::month_day(8, 20)));
    c.custom_dates.push(LabeledProperty::with_label(
      EventDate::Date(NaiveDate::from_ymd_opt(2001, 9, 3).unwrap()),
      Some("Graduation"),
    ));
    let out = render4(&c);
    assert!(out.contains("\r\nBDAY:19900512\r\n"));
    assert!(out.contains("\r\nANNIVERSARY:--0820\r\n"));
    assert!(out.contains("\r\nitem1.X-ABLABEL:Graduation\r\nitem1.X-ABDATE:2001-09-03\r\n"));
  }

  #[test]
  fn dates_v3() {
    let mut c = contact();
    c.birthday = Some(EventDate::Partial(PartialDate::month_day(2, 29)));
    c.anniversary = Some(EventDate::Date(NaiveDate::from_ymd_opt(2010, 4, 1).unwrap()));
    let out = render3(&c);
    assert!(out.contains("\r\nBDAY;X-APPLE-OMIT-YEAR=1604:1604-02-29\r\n"));
    assert!(out.contains(
      "\r\nitem1.X-ABLABEL:_$!<Anniversary>!$_\r\nitem1.X-ABDATE:2010-04-01\r\n"
    ));
    assert!(!out.contains("ANNIVERSARY:"));
  }

  #[test]
  fn v3_drops_what_it_cannot_express() {
    let mut c = contact();
    c.birthday = Some(EventDate::Text("circa 1800".to_string()));
    c.anniversary = Some(EventDate::Partial(PartialDate {
      year:  Some(1999),
      month: Some(5),
      day:   None,
    }));
    let out = render3(&c);
    assert!(!out.contains("BDAY"));
    assert!(!out.contains("X-ABDATE"));

    let out = render4(&c);
    assert!(out.contains("\r\nBDAY;VALUE=text:circa 1800\r\n"));
    assert!(out.contains("\r\nANNIVERSARY:1999-05\r\n"));
  }

  // ── Relations ──────────────────────────────────────────────────────────────

  #[test]
  fn relations_per_version() {
    let mut c = contact();
    c.relations = vec![
      Related {
        text:  "Tom".to_string(),
        types: vec![RelatedType::Brother, RelatedType::Sibling],
      },
      Related {
        text:  "Ann".to_string(),
        types: vec![RelatedType::Other("godmother".to_string()), RelatedType::Muse],
      },
      Related {
        text:  "urn:uuid:abc".to_string(),
        types: vec![],
      },
    ];
    let out = render4(&c);
    assert!(out.contains("\r\nRELATED;TYPE=brother,sibling;VALUE=text:Tom\r\n"));
    assert!(out.contains("\r\nRELATED:urn:uuid:abc\r\n"));

    let out = render3(&c);
    assert!(out.contains("\r\nitem1.X-ABLABEL:_$!<Brother>!$_\r\nitem1.X-ABRELATEDNAMES:Tom\r\n"));
    assert!(out.contains("\r\nitem2.X-ABLABEL:Godmother\\, Muse\r\nitem2.X-ABRELATEDNAMES:Ann\r\n"));
    assert!(out.contains("\r\nX-ABRELATEDNAMES;TYPE=other:urn:uuid:abc\r\n"));
  }

  // ── Misc ───────────────────────────────────────────────────────────────────

  #[test]
  fn photo_per_version() {
    let mut c = contact();
    c.photo = Some(vec![0xff, 0xd8, 0xff, 0xe0]);
    assert!(render4(&c).contains("\r\nPHOTO:data:image/jpeg;base64,/9j/4A==\r\n"));
    assert!(render3(&c).contains("\r\nPHOTO;ENCODING=b;TYPE=JPEG:/9j/4A==\r\n"));
  }

  #[test]
  fn long_lines_are_folded() {
    let mut c = contact();
    c.note = Some("x".repeat(200));
    let out = render4(&c);
    assert!(out.split("\r\n").all(|l| l.len() <= 75));
    assert!(out.contains("\r\n x"));
  }
}
