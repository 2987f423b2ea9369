//! Builders: [`Contact`] → structured records.
//!
//! Each builder returns zero or more records for one field group; an empty
//! group simply yields nothing. Type codes are always resolved through
//! [`LabeledProperty::resolve_type`] so the standard-type-over-label rule is
//! applied the same way for every kind.

use cardmap_core::{
  Contact, DataKind, EventDate, StructuredRecord,
  contact::Address,
  record::field,
  taxonomy::{email, event, im, nickname, phone, postal, relation, sip, website},
};
use tracing::warn;

/// Produces the records for one field group.
pub type Builder = fn(&Contact) -> Vec<StructuredRecord>;

fn primary(preferred: bool) -> i64 { i64::from(preferred) }

fn non_blank(s: &Option<String>) -> Option<&str> {
  s.as_deref().filter(|s| !s.trim().is_empty())
}

/// Join multi-line address components with `\n`; `None` when all blank.
fn join_lines(lines: &[String]) -> Option<String> {
  let joined = lines
    .iter()
    .map(|l| l.trim())
    .filter(|l| !l.is_empty())
    .collect::<Vec<_>>()
    .join("\n");
  (!joined.is_empty()).then_some(joined)
}

// ─── Names ───────────────────────────────────────────────────────────────────

/// Emits a record only when at least one name component is set.
pub fn structured_name(contact: &Contact) -> Vec<StructuredRecord> {
  if contact.name_is_empty() {
    return Vec::new();
  }
  vec![
    StructuredRecord::new(DataKind::StructuredName)
      .with_opt(field::DISPLAY_NAME, non_blank(&contact.display_name))
      .with_opt(field::PREFIX, non_blank(&contact.prefix))
      .with_opt(field::GIVEN_NAME, non_blank(&contact.given_name))
      .with_opt(field::MIDDLE_NAME, non_blank(&contact.middle_name))
      .with_opt(field::FAMILY_NAME, non_blank(&contact.family_name))
      .with_opt(field::SUFFIX, non_blank(&contact.suffix))
      .with_opt(
        field::PHONETIC_GIVEN_NAME,
        non_blank(&contact.phonetic_given_name),
      )
      .with_opt(
        field::PHONETIC_MIDDLE_NAME,
        non_blank(&contact.phonetic_middle_name),
      )
      .with_opt(
        field::PHONETIC_FAMILY_NAME,
        non_blank(&contact.phonetic_family_name),
      ),
  ]
}

/// One record per nickname value, all sharing the property's type.
pub fn nickname(contact: &Contact) -> Vec<StructuredRecord> {
  let Some(nick) = &contact.nickname else {
    return Vec::new();
  };

  // A type we cannot map is still "some other name", not the default.
  let default = if nick.property.kind.is_some() {
    nickname::Code::OtherName
  } else {
    nickname::Code::Default
  };
  let (code, label) = nick.resolve_type(
    |n| n.kind.as_ref().and_then(nickname::encode),
    nickname::Code::Custom,
    default,
  );

  nick
    .property
    .values
    .iter()
    .filter(|v| !v.trim().is_empty())
    .map(|v| {
      StructuredRecord::new(DataKind::Nickname)
        .with(field::NAME, v.as_str())
        .with(field::TYPE, code.code())
        .with_opt(field::LABEL, label.clone())
    })
    .collect()
}

// ─── Communication ───────────────────────────────────────────────────────────

pub fn phone(contact: &Contact) -> Vec<StructuredRecord> {
  contact
    .phone_numbers
    .iter()
    .filter(|p| !p.property.number.trim().is_empty())
    .map(|p| {
      let (code, label) = p.resolve_type(
        |t| phone::encode(&t.types),
        phone::Code::Custom,
        phone::Code::Other,
      );
      let preferred = primary(p.property.is_preferred());
      StructuredRecord::new(DataKind::Phone)
        .with(field::NUMBER, p.property.number.as_str())
        .with(field::TYPE, code.code())
        .with_opt(field::LABEL, label)
        .with(field::IS_PRIMARY, preferred)
        .with(field::IS_SUPER_PRIMARY, preferred)
    })
    .collect()
}

pub fn email(contact: &Contact) -> Vec<StructuredRecord> {
  contact
    .emails
    .iter()
    .filter(|e| !e.property.address.trim().is_empty())
    .map(|e| {
      let (code, label) = e.resolve_type(
        |m| email::encode(&m.types),
        email::Code::Custom,
        email::Code::Other,
      );
      let preferred = primary(e.property.is_preferred());
      StructuredRecord::new(DataKind::Email)
        .with(field::ADDRESS, e.property.address.as_str())
        .with(field::TYPE, code.code())
        .with_opt(field::LABEL, label)
        .with(field::IS_PRIMARY, preferred)
        .with(field::IS_SUPER_PRIMARY, preferred)
    })
    .collect()
}

/// Every IMPP entry except `sip:` ones, which go to [`sip_address`].
pub fn im(contact: &Contact) -> Vec<StructuredRecord> {
  contact
    .impps
    .iter()
    .filter(|i| !i.property.is_sip() && !i.property.handle.trim().is_empty())
    .map(|i| {
      let (code, label) = i.resolve_type(
        |m| im::encode(&m.types),
        im::Code::Custom,
        im::Code::Other,
      );
      let protocol = im::Protocol::from_scheme(&i.property.protocol);
      let custom_protocol = (protocol == im::Protocol::Custom)
        .then(|| i.property.protocol.clone());
      StructuredRecord::new(DataKind::Im)
        .with(field::DATA, i.property.handle.as_str())
        .with(field::TYPE, code.code())
        .with_opt(field::LABEL, label)
        .with(field::PROTOCOL, protocol.code())
        .with_opt(field::CUSTOM_PROTOCOL, custom_protocol)
    })
    .collect()
}

/// Only the `sip:` entries of the IMPP list.
pub fn sip_address(contact: &Contact) -> Vec<StructuredRecord> {
  contact
    .impps
    .iter()
    .filter(|i| i.property.is_sip() && !i.property.handle.trim().is_empty())
    .map(|i| {
      let (code, label) = i.resolve_type(
        |m| sip::encode(&m.types),
        sip::Code::Custom,
        sip::Code::Other,
      );
      StructuredRecord::new(DataKind::SipAddress)
        .with(field::SIP_ADDRESS, i.property.handle.as_str())
        .with(field::TYPE, code.code())
        .with_opt(field::LABEL, label)
    })
    .collect()
}

pub fn structured_postal(contact: &Contact) -> Vec<StructuredRecord> {
  contact
    .addresses
    .iter()
    .filter(|a| !a.property.is_empty())
    .map(|a| {
      let addr = &a.property;
      let (code, label) = a.resolve_type(
        |adr| postal::encode(&adr.types),
        postal::Code::Custom,
        postal::Code::Other,
      );
      let formatted = non_blank(&addr.formatted)
        .map(str::to_string)
        .unwrap_or_else(|| format_address(addr));

      StructuredRecord::new(DataKind::StructuredPostal)
        .with(field::FORMATTED_ADDRESS, formatted)
        .with(field::TYPE, code.code())
        .with_opt(field::LABEL, label)
        .with_opt(field::STREET, join_lines(&addr.street))
        .with_opt(field::POBOX, join_lines(&addr.po_box))
        .with_opt(field::NEIGHBORHOOD, join_lines(&addr.extended))
        .with_opt(field::CITY, join_lines(&addr.locality))
        .with_opt(field::REGION, join_lines(&addr.region))
        .with_opt(field::POSTCODE, join_lines(&addr.postal_code))
        .with_opt(field::COUNTRY, join_lines(&addr.country))
    })
    .collect()
}

/// Compose a display address:
///
/// ```text
/// street po.box extended
/// postcode city
/// region
/// COUNTRY
/// ```
fn format_address(addr: &Address) -> String {
  let words = |parts: &[&Vec<String>]| -> String {
    parts
      .iter()
      .filter_map(|p| join_lines(p))
      .map(|p| p.replace('\n', " "))
      .collect::<Vec<_>>()
      .join(" ")
  };

  let mut lines = Vec::new();
  let street = words(&[&addr.street, &addr.po_box, &addr.extended]);
  if !street.is_empty() {
    lines.push(street);
  }
  let locality = words(&[&addr.postal_code, &addr.locality]);
  if !locality.is_empty() {
    lines.push(locality);
  }
  if let Some(region) = join_lines(&addr.region) {
    lines.push(region);
  }
  if let Some(country) = join_lines(&addr.country) {
    lines.push(country.to_uppercase());
  }
  lines.join("\n")
}

pub fn website(contact: &Contact) -> Vec<StructuredRecord> {
  contact
    .urls
    .iter()
    .filter(|u| !u.property.value.trim().is_empty())
    .map(|u| {
      let (code, label) = u.resolve_type(
        |url| website::encode(&url.types),
        website::Code::Custom,
        website::Code::Other,
      );
      StructuredRecord::new(DataKind::Website)
        .with(field::URL, u.property.value.as_str())
        .with(field::TYPE, code.code())
        .with_opt(field::LABEL, label)
    })
    .collect()
}

// ─── Organisation ────────────────────────────────────────────────────────────

/// Company is the first organisation unit; the rest become the department.
pub fn organization(contact: &Contact) -> Vec<StructuredRecord> {
  let mut units = contact
    .organization
    .iter()
    .map(|u| u.trim())
    .filter(|u| !u.is_empty());
  let company = units.next();
  let department = units.collect::<Vec<_>>().join(" / ");
  let department = (!department.is_empty()).then_some(department);

  let title = non_blank(&contact.job_title);
  let description = non_blank(&contact.job_description);

  if company.is_none()
    && department.is_none()
    && title.is_none()
    && description.is_none()
  {
    return Vec::new();
  }

  vec![
    StructuredRecord::new(DataKind::Organization)
      .with_opt(field::COMPANY, company)
      .with_opt(field::DEPARTMENT, department)
      .with_opt(field::TITLE, title)
      .with_opt(field::JOB_DESCRIPTION, description),
  ]
}

// ─── Events and relations ────────────────────────────────────────────────────

/// Render a date the way the address-book store keeps it: `yyyy-MM-dd`, or
/// `--MM-dd` without a year.
fn event_date_string(date: &EventDate) -> Option<String> {
  match date {
    EventDate::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
    EventDate::Partial(p) => p.to_month_day_string(),
    EventDate::Text(_) => None,
  }
}

fn event_record(
  date: &EventDate,
  code: event::Code,
  label: Option<String>,
) -> Option<StructuredRecord> {
  let Some(start) = event_date_string(date) else {
    warn!(%date, "ignoring date without month and day");
    return None;
  };
  Some(
    StructuredRecord::new(DataKind::Event)
      .with(field::TYPE, code.code())
      .with(field::START_DATE, start)
      .with_opt(field::LABEL, label),
  )
}

pub fn event(contact: &Contact) -> Vec<StructuredRecord> {
  let mut records = Vec::new();
  if let Some(birthday) = &contact.birthday {
    records.extend(event_record(birthday, event::Code::Birthday, None));
  }
  if let Some(anniversary) = &contact.anniversary {
    records.extend(event_record(anniversary, event::Code::Anniversary, None));
  }
  for custom in &contact.custom_dates {
    let (code, label) = custom.resolve_type(
      |_| None,
      event::Code::Custom,
      event::Code::Other,
    );
    records.extend(event_record(&custom.property, code, label));
  }
  records
}

/// Capitalise the first letter of every word.
fn capitalize_words(s: &str) -> String {
  s.split(' ')
    .map(|word| {
      let mut chars = word.chars();
      match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
      }
    })
    .collect::<Vec<_>>()
    .join(" ")
}

/// Relations without a specific code are written as custom, with their
/// tokens as the label.
pub fn relation(contact: &Contact) -> Vec<StructuredRecord> {
  contact
    .relations
    .iter()
    .filter(|r| !r.text.trim().is_empty())
    .map(|r| {
      let code = relation::encode(&r.types).unwrap_or(relation::Code::Custom);
      let label = (code == relation::Code::Custom).then(|| {
        if r.types.is_empty() {
          "Other".to_string()
        } else {
          r.types
            .iter()
            .map(|t| capitalize_words(t.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
        }
      });
      StructuredRecord::new(DataKind::Relation)
        .with(field::NAME, r.text.trim())
        .with(field::TYPE, code.code())
        .with_opt(field::LABEL, label)
    })
    .collect()
}

// ─── Misc ────────────────────────────────────────────────────────────────────

pub fn note(contact: &Contact) -> Vec<StructuredRecord> {
  match non_blank(&contact.note) {
    Some(note) => vec![StructuredRecord::new(DataKind::Note).with(field::NOTE, note)],
    None => Vec::new(),
  }
}

pub fn photo(contact: &Contact) -> Vec<StructuredRecord> {
  match contact.photo.as_ref().filter(|p| !p.is_empty()) {
    Some(bytes) => vec![
      StructuredRecord::new(DataKind::Photo)
        .with(field::PHOTO, bytes.clone())
        .with(field::IS_PRIMARY, 1)
        .with(field::IS_SUPER_PRIMARY, 1),
    ],
    None => Vec::new(),
  }
}

/// One membership per category.
pub fn group_membership(contact: &Contact) -> Vec<StructuredRecord> {
  contact
    .categories
    .iter()
    .map(|c| c.trim())
    .filter(|c| !c.is_empty())
    .map(|c| StructuredRecord::new(DataKind::GroupMembership).with(field::GROUP_TITLE, c))
    .collect()
}

#[cfg(test)]
mod tests {
  use cardmap_core::{
    LabeledProperty, PartialDate, Value,
    contact::{Email, Impp, Nickname, Related, Telephone, Url},
    types::{
      AdrType, EmailType, ImppType, NicknameType, RelatedType, TelType, UrlType,
    },
  };
  use chrono::NaiveDate;

  use super::*;

  fn int(r: &StructuredRecord, key: &str) -> i64 {
    r.integer(key).unwrap_or_else(|| panic!("no {key} in {r:?}"))
  }

  fn tel(number: &str, types: Vec<TelType>) -> LabeledProperty<Telephone> {
    LabeledProperty::new(Telephone {
      number: number.to_string(),
      types,
      pref: None,
    })
  }

  // ── Structured name ────────────────────────────────────────────────────────

  #[test]
  fn empty_name_yields_nothing() {
    assert!(structured_name(&Contact::default()).is_empty());

    let c = Contact {
      display_name: Some(" ".to_string()),
      ..Contact::default()
    };
    assert!(structured_name(&c).is_empty());
  }

  #[test]
  fn display_name_alone_yields_a_record() {
    let c = Contact {
      display_name: Some("Acme Corp".to_string()),
      ..Contact::default()
    };
    let records = structured_name(&c);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text(field::DISPLAY_NAME), Some("Acme Corp"));
    assert_eq!(records[0].fields.len(), 1);
  }

  #[test]
  fn one_component_yields_one_record() {
    let c = Contact {
      given_name: Some("Jane".to_string()),
      ..Contact::default()
    };
    let records = structured_name(&c);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text(field::GIVEN_NAME), Some("Jane"));
    assert_eq!(records[0].fields.len(), 1);
  }

  // ── Nickname ───────────────────────────────────────────────────────────────

  #[test]
  fn nickname_values_share_type_and_label() {
    let c = Contact {
      nickname: Some(LabeledProperty {
        property: Nickname {
          values: vec!["A".into(), "B".into(), " ".into(), "C".into()],
          kind:   None,
        },
        label:    Some("Stage name".to_string()),
      }),
      ..Contact::default()
    };
    let records = nickname(&c);
    assert_eq!(records.len(), 3);
    for r in &records {
      assert_eq!(int(r, field::TYPE), nickname::Code::Custom.code());
      assert_eq!(r.text(field::LABEL), Some("Stage name"));
    }
  }

  #[test]
  fn nickname_type_wins_over_label() {
    let c = Contact {
      nickname: Some(LabeledProperty {
        property: Nickname {
          values: vec!["JD".into()],
          kind:   Some(NicknameType::Initials),
        },
        label:    Some("ignored".to_string()),
      }),
      ..Contact::default()
    };
    let records = nickname(&c);
    assert_eq!(int(&records[0], field::TYPE), nickname::Code::Initials.code());
    assert_eq!(records[0].text(field::LABEL), None);
  }

  #[test]
  fn nickname_default_and_other_name() {
    let mut c = Contact {
      nickname: Some(LabeledProperty::new(Nickname {
        values: vec!["N".into()],
        kind:   None,
      })),
      ..Contact::default()
    };
    assert_eq!(int(&nickname(&c)[0], field::TYPE), nickname::Code::Default.code());

    if let Some(n) = c.nickname.as_mut() {
      n.property.kind = Some(NicknameType::Other("x-stage".to_string()));
    }
    assert_eq!(
      int(&nickname(&c)[0], field::TYPE),
      nickname::Code::OtherName.code()
    );
  }

  // ── Phone ──────────────────────────────────────────────────────────────────

  #[test]
  fn phone_types() {
    let cases = [
      (vec![TelType::Cell, TelType::Work], phone::Code::WorkMobile),
      (vec![TelType::Fax, TelType::Home], phone::Code::FaxHome),
      (vec![TelType::Fax], phone::Code::OtherFax),
      (vec![TelType::Pager, TelType::Work], phone::Code::WorkPager),
      (vec![TelType::Voice], phone::Code::Main),
      (vec![TelType::Radio], phone::Code::Radio),
      (vec![], phone::Code::Other),
    ];
    for (types, expected) in cases {
      let c = Contact {
        phone_numbers: vec![tel("+1", types.clone())],
        ..Contact::default()
      };
      let records = phone(&c);
      assert_eq!(int(&records[0], field::TYPE), expected.code(), "{types:?}");
    }
  }

  #[test]
  fn phone_custom_label() {
    let c = Contact {
      phone_numbers: vec![LabeledProperty::with_label(
        Telephone::new("+1234"),
        Some("Boat phone"),
      )],
      ..Contact::default()
    };
    let r = &phone(&c)[0];
    assert_eq!(int(r, field::TYPE), phone::Code::Custom.code());
    assert_eq!(r.text(field::LABEL), Some("Boat phone"));
  }

  #[test]
  fn phone_pref_sets_primary() {
    let mut pref_param = Telephone::new("+1");
    pref_param.pref = Some(1);
    let pref_type = Telephone {
      number: "+2".to_string(),
      types:  vec![TelType::Pref],
      pref:   None,
    };
    let c = Contact {
      phone_numbers: vec![
        LabeledProperty::new(pref_param),
        LabeledProperty::new(pref_type),
        LabeledProperty::new(Telephone::new("+3")),
      ],
      ..Contact::default()
    };
    let records = phone(&c);
    assert_eq!(int(&records[0], field::IS_PRIMARY), 1);
    assert_eq!(int(&records[1], field::IS_SUPER_PRIMARY), 1);
    assert_eq!(int(&records[2], field::IS_PRIMARY), 0);
  }

  #[test]
  fn empty_numbers_are_skipped() {
    let c = Contact {
      phone_numbers: vec![tel(" ", vec![TelType::Home])],
      ..Contact::default()
    };
    assert!(phone(&c).is_empty());
  }

  // ── Email ──────────────────────────────────────────────────────────────────

  #[test]
  fn email_types() {
    let c = Contact {
      emails: vec![
        LabeledProperty::new(Email {
          address: "m@example.com".to_string(),
          types:   vec![EmailType::Mobile],
          pref:    None,
        }),
        LabeledProperty::new(Email::new("o@example.com")),
      ],
      ..Contact::default()
    };
    let records = email(&c);
    assert_eq!(int(&records[0], field::TYPE), email::Code::Mobile.code());
    assert_eq!(int(&records[1], field::TYPE), email::Code::Other.code());
  }

  // ── IM / SIP ───────────────────────────────────────────────────────────────

  fn impp(uri: &str, types: Vec<ImppType>) -> LabeledProperty<Impp> {
    let Some(mut i) = Impp::from_uri(uri) else {
      panic!("bad uri {uri}")
    };
    i.types = types;
    LabeledProperty::new(i)
  }

  #[test]
  fn im_skips_sip_and_sip_keeps_only_sip() {
    let c = Contact {
      impps: vec![
        impp("xmpp:alice@example.com", vec![ImppType::Business]),
        impp("sip:alice@sip.example", vec![ImppType::Home]),
        impp("matrix:@alice:example.org", vec![]),
      ],
      ..Contact::default()
    };

    let ims = im(&c);
    assert_eq!(ims.len(), 2);
    assert_eq!(int(&ims[0], field::PROTOCOL), im::Protocol::Jabber.code());
    assert_eq!(int(&ims[0], field::TYPE), im::Code::Work.code());
    assert_eq!(ims[0].text(field::CUSTOM_PROTOCOL), None);
    assert_eq!(int(&ims[1], field::PROTOCOL), im::Protocol::Custom.code());
    assert_eq!(ims[1].text(field::CUSTOM_PROTOCOL), Some("matrix"));
    assert_eq!(ims[1].text(field::DATA), Some("@alice:example.org"));

    let sips = sip_address(&c);
    assert_eq!(sips.len(), 1);
    assert_eq!(sips[0].text(field::SIP_ADDRESS), Some("alice@sip.example"));
    assert_eq!(int(&sips[0], field::TYPE), sip::Code::Home.code());
  }

  #[test]
  fn sip_label_without_type() {
    let mut sip_entry = impp("sip:bob@example.com", vec![]);
    sip_entry.label = Some("Desk".to_string());
    let c = Contact {
      impps: vec![sip_entry],
      ..Contact::default()
    };
    let r = &sip_address(&c)[0];
    assert_eq!(int(r, field::TYPE), sip::Code::Custom.code());
    assert_eq!(r.text(field::LABEL), Some("Desk"));
  }

  // ── Postal ─────────────────────────────────────────────────────────────────

  #[test]
  fn postal_formats_address() {
    let c = Contact {
      addresses: vec![LabeledProperty::new(Address {
        street: vec!["Main St 1".to_string()],
        postal_code: vec!["1010".to_string()],
        locality: vec!["Vienna".to_string()],
        country: vec!["Austria".to_string()],
        types: vec![AdrType::Work],
        ..Address::default()
      })],
      ..Contact::default()
    };
    let r = &structured_postal(&c)[0];
    assert_eq!(
      r.text(field::FORMATTED_ADDRESS),
      Some("Main St 1\n1010 Vienna\nAUSTRIA")
    );
    assert_eq!(int(r, field::TYPE), postal::Code::Work.code());
    assert_eq!(r.text(field::STREET), Some("Main St 1"));
  }

  #[test]
  fn postal_keeps_given_formatted_text() {
    let c = Contact {
      addresses: vec![LabeledProperty::new(Address {
        street: vec!["Line 1".to_string(), "Line 2".to_string()],
        formatted: Some("As printed".to_string()),
        ..Address::default()
      })],
      ..Contact::default()
    };
    let r = &structured_postal(&c)[0];
    assert_eq!(r.text(field::FORMATTED_ADDRESS), Some("As printed"));
    assert_eq!(r.text(field::STREET), Some("Line 1\nLine 2"));
    assert_eq!(int(r, field::TYPE), postal::Code::Other.code());
  }

  // ── Website ────────────────────────────────────────────────────────────────

  #[test]
  fn website_profile() {
    let c = Contact {
      urls: vec![LabeledProperty::new(Url {
        value: "https://example.com/me".to_string(),
        types: vec![UrlType::Profile],
      })],
      ..Contact::default()
    };
    assert_eq!(int(&website(&c)[0], field::TYPE), website::Code::Profile.code());
  }

  // ── Organisation ───────────────────────────────────────────────────────────

  #[test]
  fn organization_units() {
    let c = Contact {
      organization: vec!["Acme".into(), "R&D".into(), "Lab 3".into()],
      ..Contact::default()
    };
    let r = &organization(&c)[0];
    assert_eq!(r.text(field::COMPANY), Some("Acme"));
    assert_eq!(r.text(field::DEPARTMENT), Some("R&D / Lab 3"));
    assert!(organization(&Contact::default()).is_empty());
  }

  #[test]
  fn organization_title_only() {
    let c = Contact {
      job_title: Some("CEO".to_string()),
      ..Contact::default()
    };
    let records = organization(&c);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text(field::COMPANY), None);
    assert_eq!(records[0].text(field::TITLE), Some("CEO"));
  }

  // ── Event ──────────────────────────────────────────────────────────────────

  #[test]
  fn events() {
    let c = Contact {
      birthday: Some(EventDate::Date(NaiveDate::from_ymd_opt(1990, 5, 12).unwrap())),
      anniversary: Some(EventDate::Partial(PartialDate::month_day(8, 20))),
      custom_dates: vec![
        LabeledProperty::with_label(
          EventDate::Partial(PartialDate::month_day(1, 2)),
          Some("Name day"),
        ),
        LabeledProperty::new(EventDate::Text("sometime".to_string())),
        LabeledProperty::new(EventDate::Partial(PartialDate {
          year:  Some(2000),
          month: None,
          day:   None,
        })),
      ],
      ..Contact::default()
    };
    let records = event(&c);
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].text(field::START_DATE), Some("1990-05-12"));
    assert_eq!(int(&records[0], field::TYPE), event::Code::Birthday.code());
    assert_eq!(records[1].text(field::START_DATE), Some("--08-20"));
    assert_eq!(int(&records[1], field::TYPE), event::Code::Anniversary.code());
    assert_eq!(int(&records[2], field::TYPE), event::Code::Custom.code());
    assert_eq!(records[2].text(field::LABEL), Some("Name day"));
  }

  // ── Relation ───────────────────────────────────────────────────────────────

  #[test]
  fn relation_specific_type_wins() {
    let c = Contact {
      relations: vec![Related {
        text:  "Tom".to_string(),
        types: vec![RelatedType::Sibling, RelatedType::Brother],
      }],
      ..Contact::default()
    };
    let r = &relation(&c)[0];
    assert_eq!(int(r, field::TYPE), relation::Code::Brother.code());
    assert_eq!(r.text(field::LABEL), None);
  }

  #[test]
  fn relation_custom_label_from_types() {
    let c = Contact {
      relations: vec![
        Related {
          text:  "Alex".to_string(),
          types: vec![
            RelatedType::Other("god father".to_string()),
            RelatedType::CoWorker,
          ],
        },
        Related {
          text:  "Sam".to_string(),
          types: vec![],
        },
      ],
      ..Contact::default()
    };
    let records = relation(&c);
    assert_eq!(int(&records[0], field::TYPE), relation::Code::Custom.code());
    assert_eq!(records[0].text(field::LABEL), Some("God Father, Co-worker"));
    assert_eq!(records[1].text(field::LABEL), Some("Other"));
  }

  // ── Misc ───────────────────────────────────────────────────────────────────

  #[test]
  fn blank_note_is_skipped() {
    let c = Contact {
      note: Some("  ".to_string()),
      ..Contact::default()
    };
    assert!(note(&c).is_empty());
  }

  #[test]
  fn photo_record() {
    let c = Contact {
      photo: Some(vec![1, 2, 3]),
      ..Contact::default()
    };
    let records = photo(&c);
    assert_eq!(records[0].fields.get(field::PHOTO), Some(&Value::Blob(vec![1, 2, 3])));
    assert_eq!(int(&records[0], field::IS_PRIMARY), 1);
  }

  #[test]
  fn categories_become_memberships() {
    let c = Contact {
      categories: vec!["Friends".into(), "Work".into()],
      ..Contact::default()
    };
    let records = group_membership(&c);
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].text(field::GROUP_TITLE), Some("Work"));
  }
}
