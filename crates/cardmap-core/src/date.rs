//! Full, partial and free-text dates.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A calendar date with any of its components missing, e.g. a birthday
/// whose year is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PartialDate {
  pub year:  Option<i32>,
  pub month: Option<u32>,
  pub day:   Option<u32>,
}

impl PartialDate {
  pub fn month_day(month: u32, day: u32) -> Self {
    Self {
      year:  None,
      month: Some(month),
      day:   Some(day),
    }
  }

  /// Parse the truncated ISO 8601 forms used by contacts:
  /// `--MM-DD`, `--MMDD`, `--MM`, `---DD`, `YYYY-MM` and `YYYY`.
  pub fn parse(s: &str) -> Result<Self> {
    let s = s.trim();
    let invalid = || Error::InvalidDate(s.to_string());
    if !s.is_ascii() {
      return Err(invalid());
    }

    let date = if let Some(day) = s.strip_prefix("---") {
      Self {
        day: Some(number(day, 2).ok_or_else(invalid)?),
        ..Self::default()
      }
    } else if let Some(rest) = s.strip_prefix("--") {
      let (month, day) = match rest.len() {
        2 => (rest, None),
        4 => (&rest[..2], Some(&rest[2..])),
        5 if rest.as_bytes()[2] == b'-' => (&rest[..2], Some(&rest[3..])),
        _ => return Err(invalid()),
      };
      Self {
        year:  None,
        month: Some(number(month, 2).ok_or_else(invalid)?),
        day:   match day {
          Some(d) => Some(number(d, 2).ok_or_else(invalid)?),
          None => None,
        },
      }
    } else {
      let (year, month) = match s.len() {
        4 => (s, None),
        7 if s.as_bytes()[4] == b'-' => (&s[..4], Some(&s[5..])),
        _ => return Err(invalid()),
      };
      Self {
        year:  Some(number(year, 4).ok_or_else(invalid)? as i32),
        month: match month {
          Some(m) => Some(number(m, 2).ok_or_else(invalid)?),
          None => None,
        },
        day:   None,
      }
    };

    if date.month.is_some_and(|m| !(1..=12).contains(&m))
      || date.day.is_some_and(|d| !(1..=31).contains(&d))
    {
      return Err(invalid());
    }
    Ok(date)
  }

  /// The `--MM-dd` form the address-book store expects, if both the month and
  /// the day are known.
  pub fn to_month_day_string(&self) -> Option<String> {
    Some(format!("--{:02}-{:02}", self.month?, self.day?))
  }

  /// RFC 6350 basic format: `--MMDD`, `---DD`, `YYYY-MM` or `YYYY`.
  pub fn to_vcard_string(&self) -> String {
    match (self.year, self.month, self.day) {
      (Some(y), Some(m), Some(d)) => format!("{y:04}{m:02}{d:02}"),
      (Some(y), Some(m), None) => format!("{y:04}-{m:02}"),
      (Some(y), None, _) => format!("{y:04}"),
      (None, Some(m), Some(d)) => format!("--{m:02}{d:02}"),
      (None, Some(m), None) => format!("--{m:02}"),
      (None, None, Some(d)) => format!("---{d:02}"),
      (None, None, None) => String::new(),
    }
  }
}

fn number(s: &str, digits: usize) -> Option<u32> {
  if s.len() == digits && s.bytes().all(|b| b.is_ascii_digit()) {
    s.parse().ok()
  } else {
    None
  }
}

/// The value of a birthday, anniversary or custom date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EventDate {
  Date(NaiveDate),
  Partial(PartialDate),
  /// Free text that is not a date at all, e.g. "circa 1850".
  Text(String),
}

impl EventDate {
  /// Parse a complete date (`YYYY-MM-DD` or `YYYYMMDD`), falling back to a
  /// partial date. Anything else is an error.
  pub fn parse(s: &str) -> Result<Self> {
    let s = s.trim();
    // Ignore a trailing time component.
    let date_part = s.split('T').next().unwrap_or(s);
    for fmt in ["%Y-%m-%d", "%Y%m%d"] {
      if let Ok(d) = NaiveDate::parse_from_str(date_part, fmt) {
        return Ok(Self::Date(d));
      }
    }
    PartialDate::parse(date_part).map(Self::Partial)
  }

  /// Like [`EventDate::parse`] but keeps unparseable input as text.
  pub fn parse_lenient(s: &str) -> Self {
    Self::parse(s).unwrap_or_else(|_| Self::Text(s.trim().to_string()))
  }

  pub fn year(&self) -> Option<i32> {
    match self {
      Self::Date(d) => Some(d.year()),
      Self::Partial(p) => p.year,
      Self::Text(_) => None,
    }
  }
}

impl fmt::Display for EventDate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
      Self::Partial(p) => f.write_str(&p.to_vcard_string()),
      Self::Text(t) => f.write_str(t),
    }
  }
}
