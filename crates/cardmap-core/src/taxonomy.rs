//! Structured-record type codes and their mapping to vCard `TYPE` tokens.
//!
//! Each data kind gets a submodule with a `Code` enum (the integer constants
//! the address-book store writes into a record's `type` field) and two total
//! functions:
//!
//! - `decode(code)` returns the standard tokens a code stands for. An empty
//!   result means "no standard type"; the caller falls back to the label.
//! - `encode(tokens)` returns the code for the first recognised token, or
//!   `None` when the caller must fall back to the kind's custom code.

use serde::{Deserialize, Serialize};

use crate::types::{
  AdrType, EmailType, ImppType, NicknameType, RelatedType, TelType, UrlType,
};

macro_rules! type_codes {
  (
    $(#[$meta:meta])*
    pub enum $name:ident {
      $( $variant:ident = $code:literal, )*
    }
  ) => {
    $(#[$meta])*
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum $name {
      $( $variant, )*
    }

    impl $name {
      /// Every code, in ascending order of its integer value.
      pub const ALL: &'static [Self] = &[ $( Self::$variant, )* ];

      pub fn code(self) -> i64 {
        match self {
          $( Self::$variant => $code, )*
        }
      }

      pub fn from_code(code: i64) -> Option<Self> {
        match code {
          $( $code => Some(Self::$variant), )*
          _ => None,
        }
      }
    }
  };
}

fn has<T: PartialEq>(types: &[T], t: &T) -> bool { types.contains(t) }

// ─── Phone ───────────────────────────────────────────────────────────────────

pub mod phone {
  use super::*;

  type_codes! {
    pub enum Code {
      Custom = 0,
      Home = 1,
      Mobile = 2,
      Work = 3,
      FaxWork = 4,
      FaxHome = 5,
      Pager = 6,
      Other = 7,
      Callback = 8,
      Car = 9,
      CompanyMain = 10,
      Isdn = 11,
      Main = 12,
      OtherFax = 13,
      Radio = 14,
      Telex = 15,
      TtyTdd = 16,
      WorkMobile = 17,
      WorkPager = 18,
      Assistant = 19,
      Mms = 20,
    }
  }

  /// A single code may stand for two tokens (`FaxWork` → fax + work).
  pub fn decode(code: Code) -> Vec<TelType> {
    match code {
      Code::Home => vec![TelType::Home],
      Code::Mobile => vec![TelType::Cell],
      Code::Work => vec![TelType::Work],
      Code::FaxWork => vec![TelType::Fax, TelType::Work],
      Code::FaxHome => vec![TelType::Fax, TelType::Home],
      Code::Pager => vec![TelType::Pager],
      Code::Callback => vec![TelType::Callback],
      Code::Car => vec![TelType::Car],
      Code::CompanyMain => vec![TelType::CompanyMain],
      Code::Isdn => vec![TelType::Isdn],
      Code::Main => vec![TelType::Voice],
      Code::OtherFax => vec![TelType::Fax],
      Code::Radio => vec![TelType::Radio],
      Code::Telex => vec![TelType::Textphone],
      Code::TtyTdd => vec![TelType::Text],
      Code::WorkMobile => vec![TelType::Cell, TelType::Work],
      Code::WorkPager => vec![TelType::Pager, TelType::Work],
      Code::Assistant => vec![TelType::Assistant],
      Code::Mms => vec![TelType::Mms],
      Code::Custom | Code::Other => vec![],
    }
  }

  pub fn encode(types: &[TelType]) -> Option<Code> {
    let work = has(types, &TelType::Work);
    let home = has(types, &TelType::Home);

    if has(types, &TelType::Cell) {
      return Some(if work { Code::WorkMobile } else { Code::Mobile });
    }
    if has(types, &TelType::Fax) {
      return Some(if home {
        Code::FaxHome
      } else if work {
        Code::FaxWork
      } else {
        Code::OtherFax
      });
    }
    if has(types, &TelType::Pager) {
      return Some(if work { Code::WorkPager } else { Code::Pager });
    }

    const ORDER: &[(TelType, Code)] = &[
      (TelType::Home, Code::Home),
      (TelType::Work, Code::Work),
      (TelType::Callback, Code::Callback),
      (TelType::Car, Code::Car),
      (TelType::CompanyMain, Code::CompanyMain),
      (TelType::Isdn, Code::Isdn),
      (TelType::Radio, Code::Radio),
      (TelType::Assistant, Code::Assistant),
      (TelType::Mms, Code::Mms),
      (TelType::Voice, Code::Main),
      (TelType::Textphone, Code::Telex),
      (TelType::Text, Code::TtyTdd),
    ];
    ORDER
      .iter()
      .find(|(t, _)| has(types, t))
      .map(|(_, code)| *code)
  }
}

// ─── Email ───────────────────────────────────────────────────────────────────

pub mod email {
  use super::*;

  type_codes! {
    pub enum Code {
      Custom = 0,
      Home = 1,
      Work = 2,
      Other = 3,
      Mobile = 4,
    }
  }

  pub fn decode(code: Code) -> Vec<EmailType> {
    match code {
      Code::Home => vec![EmailType::Home],
      Code::Work => vec![EmailType::Work],
      Code::Mobile => vec![EmailType::Mobile],
      Code::Custom | Code::Other => vec![],
    }
  }

  pub fn encode(types: &[EmailType]) -> Option<Code> {
    if has(types, &EmailType::Home) {
      Some(Code::Home)
    } else if has(types, &EmailType::Work) {
      Some(Code::Work)
    } else if has(types, &EmailType::Mobile) {
      Some(Code::Mobile)
    } else {
      None
    }
  }
}

// ─── Nickname ────────────────────────────────────────────────────────────────

pub mod nickname {
  use super::*;

  type_codes! {
    pub enum Code {
      Custom = 0,
      Default = 1,
      OtherName = 2,
      MaidenName = 3,
      ShortName = 4,
      Initials = 5,
    }
  }

  pub fn decode(code: Code) -> Option<NicknameType> {
    match code {
      Code::OtherName => Some(NicknameType::OtherName),
      Code::MaidenName => Some(NicknameType::MaidenName),
      Code::ShortName => Some(NicknameType::ShortName),
      Code::Initials => Some(NicknameType::Initials),
      Code::Custom | Code::Default => None,
    }
  }

  pub fn encode(kind: &NicknameType) -> Option<Code> {
    match kind {
      NicknameType::Initials => Some(Code::Initials),
      NicknameType::MaidenName => Some(Code::MaidenName),
      NicknameType::ShortName => Some(Code::ShortName),
      NicknameType::OtherName => Some(Code::OtherName),
      NicknameType::Other(_) => None,
    }
  }
}

// ─── Website ─────────────────────────────────────────────────────────────────

pub mod website {
  use super::*;

  type_codes! {
    pub enum Code {
      Custom = 0,
      Homepage = 1,
      Blog = 2,
      Profile = 3,
      Home = 4,
      Work = 5,
      Ftp = 6,
      Other = 7,
    }
  }

  pub fn decode(code: Code) -> Vec<UrlType> {
    match code {
      Code::Homepage => vec![UrlType::Homepage],
      Code::Blog => vec![UrlType::Blog],
      Code::Profile => vec![UrlType::Profile],
      Code::Home => vec![UrlType::Home],
      Code::Work => vec![UrlType::Work],
      Code::Ftp => vec![UrlType::Ftp],
      Code::Custom | Code::Other => vec![],
    }
  }

  pub fn encode(types: &[UrlType]) -> Option<Code> {
    types.iter().find_map(|t| match t {
      UrlType::Homepage => Some(Code::Homepage),
      UrlType::Blog => Some(Code::Blog),
      UrlType::Profile => Some(Code::Profile),
      UrlType::Home => Some(Code::Home),
      UrlType::Work => Some(Code::Work),
      UrlType::Ftp => Some(Code::Ftp),
      UrlType::Other(_) => None,
    })
  }
}

// ─── Instant messaging / SIP ─────────────────────────────────────────────────

pub mod im {
  use super::*;

  type_codes! {
    pub enum Code {
      Custom = 0,
      Home = 1,
      Work = 2,
      Other = 3,
    }
  }

  type_codes! {
    /// The legacy fixed-protocol constants plus the generic custom marker.
    pub enum Protocol {
      Custom = -1,
      Aim = 0,
      Msn = 1,
      Yahoo = 2,
      Skype = 3,
      Qq = 4,
      GoogleTalk = 5,
      Icq = 6,
      Jabber = 7,
      Netmeeting = 8,
    }
  }

  impl Protocol {
    /// The URI scheme reserved for a legacy protocol. `None` for
    /// [`Protocol::Custom`], whose scheme comes from the record.
    pub fn scheme(self) -> Option<&'static str> {
      match self {
        Self::Aim => Some("aim"),
        Self::Msn => Some("msn"),
        Self::Yahoo => Some("ymsgr"),
        Self::Skype => Some("skype"),
        Self::Qq => Some("qq"),
        Self::GoogleTalk => Some("google-talk"),
        Self::Icq => Some("icq"),
        Self::Jabber => Some("xmpp"),
        Self::Netmeeting => Some("netmeeting"),
        Self::Custom => None,
      }
    }

    /// Inverse of [`Protocol::scheme`]; unknown schemes give `Custom`.
    pub fn from_scheme(scheme: &str) -> Self {
      Self::ALL
        .iter()
        .copied()
        .find(|p| {
          p.scheme()
            .is_some_and(|s| s.eq_ignore_ascii_case(scheme))
        })
        .unwrap_or(Self::Custom)
    }
  }

  pub fn decode(code: Code) -> Vec<ImppType> {
    match code {
      Code::Home => vec![ImppType::Home],
      Code::Work => vec![ImppType::Work],
      Code::Custom | Code::Other => vec![],
    }
  }

  pub fn encode(types: &[ImppType]) -> Option<Code> {
    types.iter().find_map(|t| match t {
      ImppType::Home | ImppType::Personal => Some(Code::Home),
      ImppType::Work | ImppType::Business => Some(Code::Work),
      _ => None,
    })
  }
}

/// SIP addresses share the IM type codes.
pub mod sip {
  pub use super::im::{Code, decode, encode};
}

// ─── Postal ──────────────────────────────────────────────────────────────────

pub mod postal {
  use super::*;

  type_codes! {
    pub enum Code {
      Custom = 0,
      Home = 1,
      Work = 2,
      Other = 3,
    }
  }

  pub fn decode(code: Code) -> Vec<AdrType> {
    match code {
      Code::Home => vec![AdrType::Home],
      Code::Work => vec![AdrType::Work],
      Code::Custom | Code::Other => vec![],
    }
  }

  pub fn encode(types: &[AdrType]) -> Option<Code> {
    if has(types, &AdrType::Home) {
      Some(Code::Home)
    } else if has(types, &AdrType::Work) {
      Some(Code::Work)
    } else {
      None
    }
  }
}

// ─── Event ───────────────────────────────────────────────────────────────────

pub mod event {
  use super::*;

  type_codes! {
    pub enum Code {
      Custom = 0,
      Anniversary = 1,
      Other = 2,
      Birthday = 3,
    }
  }
}

// ─── Relation ────────────────────────────────────────────────────────────────

pub mod relation {
  use super::*;

  type_codes! {
    pub enum Code {
      Custom = 0,
      Assistant = 1,
      Brother = 2,
      Child = 3,
      DomesticPartner = 4,
      Father = 5,
      Friend = 6,
      Manager = 7,
      Mother = 8,
      Parent = 9,
      Partner = 10,
      ReferredBy = 11,
      Relative = 12,
      Sister = 13,
      Spouse = 14,
    }
  }

  /// Specific codes also carry the generic RFC 6350 relation they imply.
  pub fn decode(code: Code) -> Vec<RelatedType> {
    match code {
      Code::Assistant => vec![RelatedType::Assistant, RelatedType::CoWorker],
      Code::Brother => vec![RelatedType::Brother, RelatedType::Sibling],
      Code::Child => vec![RelatedType::Child],
      Code::DomesticPartner => {
        vec![RelatedType::DomesticPartner, RelatedType::Spouse]
      }
      Code::Father => vec![RelatedType::Father, RelatedType::Parent],
      Code::Friend => vec![RelatedType::Friend],
      Code::Manager => vec![RelatedType::Manager, RelatedType::CoWorker],
      Code::Mother => vec![RelatedType::Mother, RelatedType::Parent],
      Code::Parent => vec![RelatedType::Parent],
      Code::Partner => vec![RelatedType::Partner],
      Code::ReferredBy => vec![RelatedType::ReferredBy],
      Code::Relative => vec![RelatedType::Kin],
      Code::Sister => vec![RelatedType::Sister, RelatedType::Sibling],
      Code::Spouse => vec![RelatedType::Spouse],
      Code::Custom => vec![],
    }
  }

  /// Vendor-specific tokens win over the generic ones they imply.
  pub fn encode(types: &[RelatedType]) -> Option<Code> {
    const ORDER: &[(RelatedType, Code)] = &[
      (RelatedType::Assistant, Code::Assistant),
      (RelatedType::Brother, Code::Brother),
      (RelatedType::DomesticPartner, Code::DomesticPartner),
      (RelatedType::Father, Code::Father),
      (RelatedType::Manager, Code::Manager),
      (RelatedType::Mother, Code::Mother),
      (RelatedType::Partner, Code::Partner),
      (RelatedType::ReferredBy, Code::ReferredBy),
      (RelatedType::Sister, Code::Sister),
      (RelatedType::Child, Code::Child),
      (RelatedType::Friend, Code::Friend),
      (RelatedType::Kin, Code::Relative),
      (RelatedType::Parent, Code::Parent),
      (RelatedType::Spouse, Code::Spouse),
    ];
    ORDER
      .iter()
      .find(|(t, _)| has(types, t))
      .map(|(_, code)| *code)
  }
}
