//! vCard `TYPE` parameter vocabularies.
//!
//! Every property that carries a `TYPE` parameter gets a closed enum of the
//! tokens the mapping engine understands, plus an [`Other`](TelType::Other)
//! escape for anything else. Vendor tokens (`x-…`) are listed alongside the
//! RFC 6350 ones because the address-book store needs them to keep its own
//! type codes across a round trip.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Vendor tokens shared by several vocabularies.
pub mod custom {
  pub const HOME: &str = "home";
  pub const WORK: &str = "work";

  /// Parameter carrying the placeholder year of a year-less date (vCard 3).
  pub const DATE_PARAMETER_OMIT_YEAR: &str = "X-APPLE-OMIT-YEAR";
  /// Placeholder year written when a date has no year.
  pub const DATE_PARAMETER_OMIT_YEAR_DEFAULT: i32 = 1604;
}

macro_rules! type_tokens {
  (
    $(#[$meta:meta])*
    pub enum $name:ident {
      $( $(#[$vmeta:meta])* $variant:ident => $token:literal, )*
    }
  ) => {
    $(#[$meta])*
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub enum $name {
      $( $(#[$vmeta])* $variant, )*
      /// A token without a dedicated variant, stored lower-cased.
      Other(String),
    }

    impl $name {
      /// The lower-case token as it appears in a `TYPE` parameter.
      pub fn as_str(&self) -> &str {
        match self {
          $( Self::$variant => $token, )*
          Self::Other(token) => token,
        }
      }

      /// Case-insensitive lookup; unrecognised tokens become `Other`.
      pub fn parse(token: &str) -> Self {
        let lower = token.trim().to_lowercase();
        match lower.as_str() {
          $( $token => Self::$variant, )*
          _ => Self::Other(lower),
        }
      }

      pub fn is_known(&self) -> bool { !matches!(self, Self::Other(_)) }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
      }
    }

    impl Serialize for $name {
      fn serialize<S: Serializer>(
        &self,
        serializer: S,
      ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
      }
    }

    impl<'de> Deserialize<'de> for $name {
      fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
      ) -> std::result::Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Ok(Self::parse(&token))
      }
    }
  };
}

type_tokens! {
  /// `TEL;TYPE=…`
  pub enum TelType {
    Text => "text",
    Voice => "voice",
    Fax => "fax",
    Cell => "cell",
    Video => "video",
    Pager => "pager",
    Textphone => "textphone",
    Home => "home",
    Work => "work",
    Car => "car",
    Isdn => "isdn",
    Msg => "msg",
    Pref => "pref",
    Assistant => "x-assistant",
    Callback => "x-callback",
    CompanyMain => "x-company_main",
    Mms => "x-mms",
    Radio => "x-radio",
  }
}

type_tokens! {
  /// `EMAIL;TYPE=…`
  pub enum EmailType {
    Home => "home",
    Work => "work",
    Internet => "internet",
    Pref => "pref",
    Mobile => "x-mobile",
  }
}

type_tokens! {
  /// `IMPP;TYPE=…`
  pub enum ImppType {
    Home => "home",
    Work => "work",
    Personal => "personal",
    Business => "business",
    Mobile => "mobile",
    Pref => "pref",
  }
}

type_tokens! {
  /// `ADR;TYPE=…`
  pub enum AdrType {
    Home => "home",
    Work => "work",
    Pref => "pref",
  }
}

type_tokens! {
  /// `URL;TYPE=…`
  pub enum UrlType {
    Home => "home",
    Work => "work",
    Homepage => "x-homepage",
    Blog => "x-blog",
    Profile => "x-profile",
    Ftp => "x-ftp",
  }
}

type_tokens! {
  /// `NICKNAME;TYPE=…`
  pub enum NicknameType {
    Initials => "x-initials",
    MaidenName => "x-maiden-name",
    ShortName => "x-short-name",
    OtherName => "x-other-name",
  }
}

type_tokens! {
  /// `RELATED;TYPE=…`: the RFC 6350 relations followed by the vendor ones
  /// the address book distinguishes.
  pub enum RelatedType {
    Contact => "contact",
    Acquaintance => "acquaintance",
    Friend => "friend",
    Met => "met",
    CoWorker => "co-worker",
    Colleague => "colleague",
    CoResident => "co-resident",
    Neighbor => "neighbor",
    Child => "child",
    Parent => "parent",
    Sibling => "sibling",
    Spouse => "spouse",
    Kin => "kin",
    Muse => "muse",
    Crush => "crush",
    Date => "date",
    Sweetheart => "sweetheart",
    Me => "me",
    Agent => "agent",
    Emergency => "emergency",

    Assistant => "assistant",
    Brother => "brother",
    DomesticPartner => "domestic-partner",
    Father => "father",
    Manager => "manager",
    Mother => "mother",
    Partner => "partner",
    ReferredBy => "referred-by",
    Sister => "sister",
  }
}
