//! Mapping between [`Contact`] and the structured records of an address-book
//! store.
//!
//! A [`HandlerRegistry`] folds records into a contact; a [`BuilderRegistry`]
//! expands a contact back into records. Both dispatch on [`DataKind`] through
//! plain function tables, so the set of supported kinds is fixed when the
//! registry is created.

pub mod builder;
pub mod handler;
pub mod im;

use std::collections::HashMap;

use cardmap_core::{Contact, DataKind, StructuredRecord};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub use builder::Builder;
pub use handler::Handler;

// ─── GroupMethod ─────────────────────────────────────────────────────────────

/// How contact groups are represented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupMethod {
  /// Groups are separate cards (`KIND:group` plus `MEMBER`); membership
  /// records are not mapped here.
  #[default]
  GroupVcards,
  /// Group titles travel as `CATEGORIES` of each member.
  Categories,
}

impl GroupMethod {
  fn maps_memberships(self) -> bool { self == Self::Categories }
}

// ─── HandlerRegistry ─────────────────────────────────────────────────────────

/// Record → contact dispatch.
#[derive(Debug, Clone)]
pub struct HandlerRegistry {
  handlers: HashMap<DataKind, Handler>,
}

impl HandlerRegistry {
  pub fn new(group_method: GroupMethod) -> Self {
    let mut handlers: HashMap<DataKind, Handler> = HashMap::from([
      (DataKind::StructuredName, handler::structured_name as Handler),
      (DataKind::Nickname, handler::nickname),
      (DataKind::Phone, handler::phone),
      (DataKind::Email, handler::email),
      (DataKind::StructuredPostal, handler::structured_postal),
      (DataKind::Organization, handler::organization),
      (DataKind::Website, handler::website),
      (DataKind::Im, handler::im),
      (DataKind::SipAddress, handler::sip_address),
      (DataKind::Event, handler::event),
      (DataKind::Relation, handler::relation),
      (DataKind::Note, handler::note),
      (DataKind::Photo, handler::photo),
    ]);
    if group_method.maps_memberships() {
      handlers.insert(DataKind::GroupMembership, handler::group_membership);
    }
    Self { handlers }
  }

  pub fn handles(&self, kind: DataKind) -> bool {
    self.handlers.contains_key(&kind)
  }

  /// Apply a single record. Empty text fields are treated as absent.
  pub fn handle(&self, record: StructuredRecord, contact: &mut Contact) {
    match self.handlers.get(&record.kind) {
      Some(handle) => handle(&record.without_empty_text(), contact),
      None => warn!(kind = %record.kind, "no handler for record"),
    }
  }

  /// Fold every record into `contact`, in order.
  pub fn process(
    &self,
    records: impl IntoIterator<Item = StructuredRecord>,
    contact: &mut Contact,
  ) {
    for record in records {
      self.handle(record, contact);
    }
  }

  /// Build a fresh contact from `records`.
  pub fn to_contact(
    &self,
    records: impl IntoIterator<Item = StructuredRecord>,
  ) -> Contact {
    let mut contact = Contact::default();
    self.process(records, &mut contact);
    contact
  }
}

impl Default for HandlerRegistry {
  fn default() -> Self { Self::new(GroupMethod::default()) }
}

// ─── BuilderRegistry ─────────────────────────────────────────────────────────

/// Contact → record dispatch. Builders run in [`DataKind::ALL`] order.
#[derive(Debug, Clone)]
pub struct BuilderRegistry {
  builders: Vec<(DataKind, Builder)>,
}

impl BuilderRegistry {
  pub fn new(group_method: GroupMethod) -> Self {
    let builders = DataKind::ALL
      .iter()
      .filter_map(|&kind| {
        let build: Builder = match kind {
          DataKind::StructuredName => builder::structured_name,
          DataKind::Nickname => builder::nickname,
          DataKind::Phone => builder::phone,
          DataKind::Email => builder::email,
          DataKind::StructuredPostal => builder::structured_postal,
          DataKind::Organization => builder::organization,
          DataKind::Website => builder::website,
          DataKind::Im => builder::im,
          DataKind::SipAddress => builder::sip_address,
          DataKind::Event => builder::event,
          DataKind::Relation => builder::relation,
          DataKind::Note => builder::note,
          DataKind::Photo => builder::photo,
          DataKind::GroupMembership if group_method.maps_memberships() => {
            builder::group_membership
          }
          DataKind::GroupMembership => return None,
        };
        Some((kind, build))
      })
      .collect();
    Self { builders }
  }

  /// Records of a single kind; empty when the kind has no builder.
  pub fn build(&self, kind: DataKind, contact: &Contact) -> Vec<StructuredRecord> {
    self
      .builders
      .iter()
      .find(|(k, _)| *k == kind)
      .map(|(_, build)| build(contact))
      .unwrap_or_default()
  }

  /// Every record for `contact`.
  pub fn build_all(&self, contact: &Contact) -> Vec<StructuredRecord> {
    self
      .builders
      .iter()
      .flat_map(|(_, build)| build(contact))
      .collect()
  }
}

impl Default for BuilderRegistry {
  fn default() -> Self { Self::new(GroupMethod::default()) }
}
