//! Handlers: structured record → [`Contact`].
//!
//! Every handler appends to the contact and never fails. A record whose
//! primary field is missing is ignored; a record that cannot be mapped
//! safely is dropped with a warning.

use cardmap_core::{
  Contact, EventDate, LabeledProperty, StructuredRecord,
  contact::{Address, Email, Impp, Nickname, Related, Telephone, Url},
  record::field,
  taxonomy::{email, event, im, nickname, phone, postal, relation, sip, website},
  types::{NicknameType, RelatedType},
};
use tracing::{debug, warn};

use crate::im::protocol_to_uri_scheme;

/// Maps one record into the contact.
pub type Handler = fn(&StructuredRecord, &mut Contact);

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn owned(record: &StructuredRecord, key: &str) -> Option<String> {
  record.text(key).map(str::to_string)
}

/// Resolve a record's `type`/`label` pair.
///
/// The custom code yields the label (if any) and no tokens; any other known
/// code yields its tokens and ignores the label.
fn types_or_label<C: Copy + PartialEq, T>(
  record: &StructuredRecord,
  from_code: fn(i64) -> Option<C>,
  custom: C,
  decode: impl FnOnce(C) -> Vec<T>,
) -> (Vec<T>, Option<String>) {
  match record.integer(field::TYPE).and_then(from_code) {
    Some(code) if code == custom => (
      Vec::new(),
      record
        .text(field::LABEL)
        .filter(|l| !l.trim().is_empty())
        .map(str::to_string),
    ),
    Some(code) => (decode(code), None),
    None => (Vec::new(), None),
  }
}

// ─── Names ───────────────────────────────────────────────────────────────────

pub fn structured_name(record: &StructuredRecord, contact: &mut Contact) {
  const KEYS: &[&str] = &[
    field::DISPLAY_NAME,
    field::PREFIX,
    field::GIVEN_NAME,
    field::MIDDLE_NAME,
    field::FAMILY_NAME,
    field::SUFFIX,
    field::PHONETIC_GIVEN_NAME,
    field::PHONETIC_MIDDLE_NAME,
    field::PHONETIC_FAMILY_NAME,
  ];
  if KEYS.iter().all(|k| record.text(k).is_none()) {
    return;
  }

  contact.display_name = owned(record, field::DISPLAY_NAME);
  contact.prefix = owned(record, field::PREFIX);
  contact.given_name = owned(record, field::GIVEN_NAME);
  contact.middle_name = owned(record, field::MIDDLE_NAME);
  contact.family_name = owned(record, field::FAMILY_NAME);
  contact.suffix = owned(record, field::SUFFIX);
  contact.phonetic_given_name = owned(record, field::PHONETIC_GIVEN_NAME);
  contact.phonetic_middle_name = owned(record, field::PHONETIC_MIDDLE_NAME);
  contact.phonetic_family_name = owned(record, field::PHONETIC_FAMILY_NAME);
}

/// Nicknames accumulate into the single `NICKNAME` property; the first
/// record decides its type and label.
pub fn nickname(record: &StructuredRecord, contact: &mut Contact) {
  let Some(name) = owned(record, field::NAME) else {
    return;
  };

  let (kinds, label): (Vec<NicknameType>, _) = types_or_label(
    record,
    nickname::Code::from_code,
    nickname::Code::Custom,
    |code| nickname::decode(code).into_iter().collect(),
  );
  let kind = kinds.into_iter().next();

  match contact.nickname.as_mut() {
    Some(existing) => {
      if existing.property.kind != kind || existing.label != label {
        debug!(?kind, "nickname type differs from the first nickname's");
      }
      existing.property.values.push(name);
    }
    None => {
      contact.nickname = Some(LabeledProperty {
        property: Nickname {
          values: vec![name],
          kind,
        },
        label,
      });
    }
  }
}

// ─── Communication ───────────────────────────────────────────────────────────

pub fn phone(record: &StructuredRecord, contact: &mut Contact) {
  let Some(number) = owned(record, field::NUMBER) else {
    return;
  };
  let (types, label) = types_or_label(
    record,
    phone::Code::from_code,
    phone::Code::Custom,
    phone::decode,
  );
  let tel = Telephone {
    number,
    types,
    pref: record.flag(field::IS_PRIMARY).then_some(1),
  };
  contact.phone_numbers.push(LabeledProperty { property: tel, label });
}

pub fn email(record: &StructuredRecord, contact: &mut Contact) {
  let Some(address) = owned(record, field::ADDRESS) else {
    return;
  };
  let (types, label) = types_or_label(
    record,
    email::Code::from_code,
    email::Code::Custom,
    email::decode,
  );
  let email = Email {
    address,
    types,
    pref: record.flag(field::IS_PRIMARY).then_some(1),
  };
  contact.emails.push(LabeledProperty {
    property: email,
    label,
  });
}

pub fn im(record: &StructuredRecord, contact: &mut Contact) {
  let Some(handle) = owned(record, field::DATA) else {
    warn!("ignoring IM record without handle");
    return;
  };

  let protocol = record
    .integer(field::PROTOCOL)
    .and_then(im::Protocol::from_code);
  let scheme = match protocol {
    Some(im::Protocol::Custom) => {
      protocol_to_uri_scheme(record.text(field::CUSTOM_PROTOCOL))
    }
    Some(p) => p.scheme().map(str::to_string),
    None => {
      warn!(
        protocol = ?record.integer(field::PROTOCOL),
        "ignoring IM record with unknown protocol"
      );
      return;
    }
  };
  let Some(scheme) = scheme.filter(|s| !s.is_empty()) else {
    warn!(
      custom_protocol = ?record.text(field::CUSTOM_PROTOCOL),
      "ignoring IM record without usable protocol"
    );
    return;
  };

  let (types, label) =
    types_or_label(record, im::Code::from_code, im::Code::Custom, im::decode);
  let mut impp = Impp::new(scheme, handle);
  impp.types = types;
  contact.impps.push(LabeledProperty {
    property: impp,
    label,
  });
}

/// SIP addresses become `sip:` IMPP entries.
pub fn sip_address(record: &StructuredRecord, contact: &mut Contact) {
  let Some(address) = owned(record, field::SIP_ADDRESS) else {
    return;
  };
  let (types, label) = types_or_label(
    record,
    sip::Code::from_code,
    sip::Code::Custom,
    sip::decode,
  );
  let mut impp = Impp::new("sip", address);
  impp.types = types;
  contact.impps.push(LabeledProperty {
    property: impp,
    label,
  });
}

pub fn structured_postal(record: &StructuredRecord, contact: &mut Contact) {
  let lines = |key: &str| -> Vec<String> {
    record
      .text(key)
      .map(|s| s.split('\n').map(str::to_string).collect())
      .unwrap_or_default()
  };

  let (types, label) = types_or_label(
    record,
    postal::Code::from_code,
    postal::Code::Custom,
    postal::decode,
  );
  let address = Address {
    po_box: lines(field::POBOX),
    extended: lines(field::NEIGHBORHOOD),
    street: lines(field::STREET),
    locality: lines(field::CITY),
    region: lines(field::REGION),
    postal_code: lines(field::POSTCODE),
    country: lines(field::COUNTRY),
    formatted: owned(record, field::FORMATTED_ADDRESS),
    types,
  };
  if address.is_empty() {
    return;
  }
  contact.addresses.push(LabeledProperty {
    property: address,
    label,
  });
}

pub fn website(record: &StructuredRecord, contact: &mut Contact) {
  let Some(value) = owned(record, field::URL) else {
    return;
  };
  let (types, label) = types_or_label(
    record,
    website::Code::from_code,
    website::Code::Custom,
    website::decode,
  );
  contact.urls.push(LabeledProperty {
    property: Url { value, types },
    label,
  });
}

// ─── Organisation ────────────────────────────────────────────────────────────

pub fn organization(record: &StructuredRecord, contact: &mut Contact) {
  let company = owned(record, field::COMPANY);
  let department = owned(record, field::DEPARTMENT);
  if company.is_some() || department.is_some() {
    contact.organization = company.into_iter().chain(department).collect();
  }

  if let Some(title) = owned(record, field::TITLE) {
    contact.job_title = Some(title);
  }
  if let Some(description) = owned(record, field::JOB_DESCRIPTION) {
    contact.job_description = Some(description);
  }
}

// ─── Events and relations ────────────────────────────────────────────────────

/// Dates are tried as a full date, then as a partial one; anything else is
/// dropped.
pub fn event(record: &StructuredRecord, contact: &mut Contact) {
  let Some(raw) = record.text(field::START_DATE) else {
    return;
  };
  let date = match EventDate::parse(raw) {
    Ok(date) => date,
    Err(e) => {
      warn!(date = raw, error = %e, "ignoring event with invalid date");
      return;
    }
  };

  let code = record
    .integer(field::TYPE)
    .and_then(event::Code::from_code);
  match code {
    Some(event::Code::Anniversary) => contact.anniversary = Some(date),
    Some(event::Code::Birthday) => contact.birthday = Some(date),
    Some(event::Code::Custom) => contact
      .custom_dates
      .push(LabeledProperty::with_label(date, record.text(field::LABEL))),
    Some(event::Code::Other) | None => {
      contact.custom_dates.push(LabeledProperty::new(date))
    }
  }
}

pub fn relation(record: &StructuredRecord, contact: &mut Contact) {
  let Some(text) = owned(record, field::NAME) else {
    return;
  };

  let code = record
    .integer(field::TYPE)
    .and_then(relation::Code::from_code);
  let types = match code {
    // A custom label may list several relations, e.g. "Godfather, Friend".
    Some(relation::Code::Custom) => record
      .text(field::LABEL)
      .map(|label| {
        label
          .split(',')
          .map(str::trim)
          .filter(|t| !t.is_empty())
          .map(RelatedType::parse)
          .collect()
      })
      .unwrap_or_default(),
    Some(code) => relation::decode(code),
    None => Vec::new(),
  };
  contact.relations.push(Related { text, types });
}

// ─── Misc ────────────────────────────────────────────────────────────────────

pub fn note(record: &StructuredRecord, contact: &mut Contact) {
  let Some(note) = owned(record, field::NOTE) else {
    return;
  };
  contact.note = Some(match contact.note.take() {
    Some(existing) => format!("{existing}\n\n\n{note}"),
    None => note,
  });
}

pub fn photo(record: &StructuredRecord, contact: &mut Contact) {
  if let Some(bytes) = record.blob(field::PHOTO) {
    contact.photo = Some(bytes.to_vec());
  }
}

/// Group memberships are kept as categories.
pub fn group_membership(record: &StructuredRecord, contact: &mut Contact) {
  let Some(title) = owned(record, field::GROUP_TITLE) else {
    return;
  };
  if !contact.categories.contains(&title) {
    contact.categories.push(title);
  }
}

#[cfg(test)]
mod tests {
  use cardmap_core::{
    DataKind, PartialDate,
    types::{EmailType, ImppType, TelType, UrlType},
  };
  use chrono::NaiveDate;

  use super::*;

  fn record(kind: DataKind) -> StructuredRecord { StructuredRecord::new(kind) }

  // ── Phone ──────────────────────────────────────────────────────────────────

  #[test]
  fn phone_custom_label_is_copied() {
    let mut c = Contact::default();
    phone(
      &record(DataKind::Phone)
        .with(field::NUMBER, "+1234")
        .with(field::TYPE, phone::Code::Custom.code())
        .with(field::LABEL, "Boat phone"),
      &mut c,
    );
    let tel = &c.phone_numbers[0];
    assert_eq!(tel.property.number, "+1234");
    assert!(tel.property.types.is_empty());
    assert_eq!(tel.label.as_deref(), Some("Boat phone"));
  }

  #[test]
  fn phone_custom_label_is_verbatim() {
    let mut c = Contact::default();
    for label in ["  Boat phone ", "   "] {
      phone(
        &record(DataKind::Phone)
          .with(field::NUMBER, "+1234")
          .with(field::TYPE, phone::Code::Custom.code())
          .with(field::LABEL, label),
        &mut c,
      );
    }
    assert_eq!(c.phone_numbers[0].label.as_deref(), Some("  Boat phone "));
    assert_eq!(c.phone_numbers[1].label, None);
  }

  #[test]
  fn phone_fax_work_has_both_types() {
    let mut c = Contact::default();
    phone(
      &record(DataKind::Phone)
        .with(field::NUMBER, "+1")
        .with(field::TYPE, phone::Code::FaxWork.code()),
      &mut c,
    );
    let types = &c.phone_numbers[0].property.types;
    assert!(types.contains(&TelType::Fax));
    assert!(types.contains(&TelType::Work));
  }

  #[test]
  fn phone_standard_type_ignores_label() {
    let mut c = Contact::default();
    phone(
      &record(DataKind::Phone)
        .with(field::NUMBER, "+1")
        .with(field::TYPE, phone::Code::Mobile.code())
        .with(field::LABEL, "stale"),
      &mut c,
    );
    assert_eq!(c.phone_numbers[0].property.types, vec![TelType::Cell]);
    assert_eq!(c.phone_numbers[0].label, None);
  }

  #[test]
  fn phone_primary_sets_pref() {
    let mut c = Contact::default();
    phone(
      &record(DataKind::Phone)
        .with(field::NUMBER, "+1")
        .with(field::IS_PRIMARY, 1),
      &mut c,
    );
    assert_eq!(c.phone_numbers[0].property.pref, Some(1));
  }

  #[test]
  fn phone_without_number_is_ignored() {
    let mut c = Contact::default();
    phone(
      &record(DataKind::Phone).with(field::TYPE, phone::Code::Home.code()),
      &mut c,
    );
    phone(&record(DataKind::Phone).with(field::NUMBER, ""), &mut c);
    assert!(c.phone_numbers.is_empty());
  }

  #[test]
  fn phones_keep_their_order() {
    let mut c = Contact::default();
    for n in ["1", "2", "3"] {
      phone(&record(DataKind::Phone).with(field::NUMBER, n), &mut c);
    }
    let numbers: Vec<_> = c
      .phone_numbers
      .iter()
      .map(|p| p.property.number.as_str())
      .collect();
    assert_eq!(numbers, ["1", "2", "3"]);
  }

  // ── Email ──────────────────────────────────────────────────────────────────

  #[test]
  fn email_mobile_type() {
    let mut c = Contact::default();
    email(
      &record(DataKind::Email)
        .with(field::ADDRESS, "a@b.example")
        .with(field::TYPE, email::Code::Mobile.code()),
      &mut c,
    );
    assert_eq!(c.emails[0].property.types, vec![EmailType::Mobile]);
  }

  #[test]
  fn email_custom_without_label_has_neither() {
    let mut c = Contact::default();
    email(
      &record(DataKind::Email)
        .with(field::ADDRESS, "a@b.example")
        .with(field::TYPE, email::Code::Custom.code()),
      &mut c,
    );
    assert!(c.emails[0].property.types.is_empty());
    assert_eq!(c.emails[0].label, None);
  }

  // ── Nickname ───────────────────────────────────────────────────────────────

  #[test]
  fn nickname_types() {
    let mut c = Contact::default();
    nickname(
      &record(DataKind::Nickname)
        .with(field::NAME, "Nick")
        .with(field::TYPE, nickname::Code::MaidenName.code()),
      &mut c,
    );
    let Some(nick) = &c.nickname else {
      panic!("no nickname")
    };
    assert_eq!(nick.property.values, vec!["Nick"]);
    assert_eq!(nick.property.kind, Some(NicknameType::MaidenName));
  }

  #[test]
  fn nicknames_accumulate() {
    let mut c = Contact::default();
    for n in ["Bob", "Bobby"] {
      nickname(
        &record(DataKind::Nickname)
          .with(field::NAME, n)
          .with(field::TYPE, nickname::Code::Custom.code())
          .with(field::LABEL, "Pet name"),
        &mut c,
      );
    }
    let Some(nick) = &c.nickname else {
      panic!("no nickname")
    };
    assert_eq!(nick.property.values, vec!["Bob", "Bobby"]);
    assert_eq!(nick.label.as_deref(), Some("Pet name"));
  }

  // ── IM / SIP ───────────────────────────────────────────────────────────────

  #[test]
  fn im_without_handle_is_dropped() {
    let mut c = Contact::default();
    im(
      &record(DataKind::Im).with(field::PROTOCOL, im::Protocol::Aim.code()),
      &mut c,
    );
    assert!(c.impps.is_empty());
  }

  #[test]
  fn im_legacy_protocol_ignores_custom_protocol() {
    let mut c = Contact::default();
    im(
      &record(DataKind::Im)
        .with(field::DATA, "alice")
        .with(field::PROTOCOL, im::Protocol::Aim.code())
        .with(field::CUSTOM_PROTOCOL, "Something Else"),
      &mut c,
    );
    assert_eq!(c.impps[0].property.uri(), "aim:alice");
  }

  #[test]
  fn im_custom_protocol_becomes_scheme() {
    let mut c = Contact::default();
    im(
      &record(DataKind::Im)
        .with(field::DATA, "@alice:matrix.org")
        .with(field::PROTOCOL, im::Protocol::Custom.code())
        .with(field::CUSTOM_PROTOCOL, "Matrix")
        .with(field::TYPE, im::Code::Home.code()),
      &mut c,
    );
    let impp = &c.impps[0].property;
    assert_eq!(impp.protocol, "matrix");
    assert_eq!(impp.handle, "@alice:matrix.org");
    assert_eq!(impp.types, vec![ImppType::Home]);
  }

  #[test]
  fn im_without_protocol_is_dropped() {
    let mut c = Contact::default();
    im(&record(DataKind::Im).with(field::DATA, "alice"), &mut c);
    im(
      &record(DataKind::Im)
        .with(field::DATA, "alice")
        .with(field::PROTOCOL, im::Protocol::Custom.code()),
      &mut c,
    );
    assert!(c.impps.is_empty());
  }

  #[test]
  fn im_type_other_and_custom() {
    let mut c = Contact::default();
    let base = record(DataKind::Im)
      .with(field::DATA, "alice")
      .with(field::PROTOCOL, im::Protocol::Jabber.code());
    im(&base.clone().with(field::TYPE, im::Code::Other.code()), &mut c);
    im(&base.clone().with(field::TYPE, im::Code::Custom.code()), &mut c);
    im(
      &base
        .with(field::TYPE, im::Code::Custom.code())
        .with(field::LABEL, "Gaming"),
      &mut c,
    );
    assert!(c.impps.iter().all(|i| i.property.types.is_empty()));
    assert_eq!(c.impps[0].label, None);
    assert_eq!(c.impps[1].label, None);
    assert_eq!(c.impps[2].label.as_deref(), Some("Gaming"));
  }

  #[test]
  fn sip_address_becomes_impp() {
    let mut c = Contact::default();
    sip_address(
      &record(DataKind::SipAddress)
        .with(field::SIP_ADDRESS, "alice@sip.example")
        .with(field::TYPE, sip::Code::Work.code()),
      &mut c,
    );
    let impp = &c.impps[0].property;
    assert_eq!(impp.uri(), "sip:alice@sip.example");
    assert_eq!(impp.types, vec![ImppType::Work]);
  }

  // ── Website ────────────────────────────────────────────────────────────────

  #[test]
  fn website_blog() {
    let mut c = Contact::default();
    website(
      &record(DataKind::Website)
        .with(field::URL, "https://blog.example")
        .with(field::TYPE, website::Code::Blog.code()),
      &mut c,
    );
    assert_eq!(c.urls[0].property.types, vec![UrlType::Blog]);
  }

  // ── Postal ─────────────────────────────────────────────────────────────────

  #[test]
  fn postal_splits_lines() {
    let mut c = Contact::default();
    structured_postal(
      &record(DataKind::StructuredPostal)
        .with(field::STREET, "Line 1\nLine 2")
        .with(field::CITY, "Vienna")
        .with(field::TYPE, postal::Code::Custom.code())
        .with(field::LABEL, "Holiday flat"),
      &mut c,
    );
    let addr = &c.addresses[0];
    assert_eq!(addr.property.street, vec!["Line 1", "Line 2"]);
    assert_eq!(addr.property.locality, vec!["Vienna"]);
    assert_eq!(addr.label.as_deref(), Some("Holiday flat"));
  }

  #[test]
  fn empty_postal_is_ignored() {
    let mut c = Contact::default();
    structured_postal(
      &record(DataKind::StructuredPostal)
        .with(field::TYPE, postal::Code::Home.code()),
      &mut c,
    );
    assert!(c.addresses.is_empty());
  }

  // ── Organisation ───────────────────────────────────────────────────────────

  #[test]
  fn organization_fields() {
    let mut c = Contact::default();
    organization(
      &record(DataKind::Organization)
        .with(field::COMPANY, "Acme")
        .with(field::DEPARTMENT, "R&D")
        .with(field::TITLE, "Engineer")
        .with(field::JOB_DESCRIPTION, "Builds things"),
      &mut c,
    );
    assert_eq!(c.organization, vec!["Acme", "R&D"]);
    assert_eq!(c.job_title.as_deref(), Some("Engineer"));
    assert_eq!(c.job_description.as_deref(), Some("Builds things"));
  }

  // ── Event ──────────────────────────────────────────────────────────────────

  #[test]
  fn event_full_date_birthday() {
    let mut c = Contact::default();
    event(
      &record(DataKind::Event)
        .with(field::START_DATE, "1990-05-12")
        .with(field::TYPE, event::Code::Birthday.code()),
      &mut c,
    );
    assert_eq!(
      c.birthday,
      Some(EventDate::Date(NaiveDate::from_ymd_opt(1990, 5, 12).unwrap()))
    );
  }

  #[test]
  fn event_partial_date_anniversary() {
    let mut c = Contact::default();
    event(
      &record(DataKind::Event)
        .with(field::START_DATE, "--05-12")
        .with(field::TYPE, event::Code::Anniversary.code()),
      &mut c,
    );
    assert_eq!(
      c.anniversary,
      Some(EventDate::Partial(PartialDate::month_day(5, 12)))
    );
  }

  #[test]
  fn event_invalid_date_is_dropped() {
    let mut c = Contact::default();
    event(
      &record(DataKind::Event)
        .with(field::START_DATE, "not-a-date")
        .with(field::TYPE, event::Code::Birthday.code()),
      &mut c,
    );
    assert_eq!(c, Contact::default());
  }

  #[test]
  fn event_custom_and_other_go_to_custom_dates() {
    let mut c = Contact::default();
    event(
      &record(DataKind::Event)
        .with(field::START_DATE, "2010-01-01")
        .with(field::TYPE, event::Code::Custom.code())
        .with(field::LABEL, " Graduation "),
      &mut c,
    );
    event(
      &record(DataKind::Event)
        .with(field::START_DATE, "2011-01-01")
        .with(field::TYPE, event::Code::Other.code())
        .with(field::LABEL, "ignored"),
      &mut c,
    );
    assert_eq!(c.custom_dates.len(), 2);
    assert_eq!(c.custom_dates[0].label.as_deref(), Some(" Graduation "));
    assert_eq!(c.custom_dates[1].label, None);
  }

  // ── Relation ───────────────────────────────────────────────────────────────

  #[test]
  fn relation_brother_is_also_sibling() {
    let mut c = Contact::default();
    relation(
      &record(DataKind::Relation)
        .with(field::NAME, "Tom")
        .with(field::TYPE, relation::Code::Brother.code()),
      &mut c,
    );
    assert_eq!(
      c.relations[0].types,
      vec![RelatedType::Brother, RelatedType::Sibling]
    );
  }

  #[test]
  fn relation_custom_label_is_split() {
    let mut c = Contact::default();
    relation(
      &record(DataKind::Relation)
        .with(field::NAME, "Alex")
        .with(field::TYPE, relation::Code::Custom.code())
        .with(field::LABEL, "Godfather, Friend"),
      &mut c,
    );
    assert_eq!(
      c.relations[0].types,
      vec![
        RelatedType::Other("godfather".to_string()),
        RelatedType::Friend
      ]
    );
  }

  // ── Name / note / photo / groups ───────────────────────────────────────────

  #[test]
  fn structured_name_copies_components() {
    let mut c = Contact::default();
    structured_name(
      &record(DataKind::StructuredName)
        .with(field::DISPLAY_NAME, "Dr. Jane Doe")
        .with(field::GIVEN_NAME, "Jane")
        .with(field::FAMILY_NAME, "Doe")
        .with(field::PHONETIC_FAMILY_NAME, "Dough"),
      &mut c,
    );
    assert_eq!(c.display_name.as_deref(), Some("Dr. Jane Doe"));
    assert_eq!(c.given_name.as_deref(), Some("Jane"));
    assert_eq!(c.phonetic_family_name.as_deref(), Some("Dough"));
    assert_eq!(c.prefix, None);
  }

  #[test]
  fn notes_are_joined() {
    let mut c = Contact::default();
    note(&record(DataKind::Note).with(field::NOTE, "one"), &mut c);
    note(&record(DataKind::Note).with(field::NOTE, "two"), &mut c);
    assert_eq!(c.note.as_deref(), Some("one\n\n\ntwo"));
  }

  #[test]
  fn photo_bytes_are_copied() {
    let mut c = Contact::default();
    photo(
      &record(DataKind::Photo).with(field::PHOTO, vec![0xff_u8, 0xd8]),
      &mut c,
    );
    assert_eq!(c.photo, Some(vec![0xff, 0xd8]));
  }

  #[test]
  fn group_titles_become_categories_once() {
    let mut c = Contact::default();
    for _ in 0..2 {
      group_membership(
        &record(DataKind::GroupMembership).with(field::GROUP_TITLE, "Friends"),
        &mut c,
      );
    }
    assert_eq!(c.categories, vec!["Friends"]);
  }
}
