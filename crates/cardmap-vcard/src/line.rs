//! vCard content lines (RFC 6350 §3.3, RFC 2426 §4).
//!
//! ```text
//! [group "."] name *(";" param) ":" value
//! ```
//!
//! Reading goes `unfold_lines()` → [`Property::parse`]; writing goes
//! [`Property::to_line`] → `fold_line()`. Value escaping is left to callers
//! because text, list and structured values escape differently.

use crate::error::{Error, Result};

// ─── Representation ──────────────────────────────────────────────────────────

/// One parameter. Names are upper-cased; values keep their case but lose
/// surrounding quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
  pub name:  String,
  pub value: String,
}

/// One logical (unfolded) content line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
  /// `item1` in `item1.TEL:…`.
  pub group:  Option<String>,
  /// Upper-cased property name.
  pub name:   String,
  pub params: Vec<Param>,
  /// Raw value, still escaped.
  pub value:  String,
}

impl Property {
  pub fn new(name: &str, value: impl Into<String>) -> Self {
    Self {
      group:  None,
      name:   name.to_uppercase(),
      params: Vec::new(),
      value:  value.into(),
    }
  }

  pub fn with_group(mut self, group: Option<String>) -> Self {
    self.group = group;
    self
  }

  pub fn with_param(mut self, name: &str, value: impl Into<String>) -> Self {
    self.params.push(Param {
      name:  name.to_uppercase(),
      value: value.into(),
    });
    self
  }

  /// Adds `TYPE=a,b,…` unless `types` is empty.
  pub fn with_types<I, S>(self, types: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let joined = types
      .into_iter()
      .map(|t| t.as_ref().to_string())
      .collect::<Vec<_>>()
      .join(",");
    if joined.is_empty() {
      self
    } else {
      self.with_param("TYPE", joined)
    }
  }

  /// First value of parameter `name`.
  pub fn param(&self, name: &str) -> Option<&str> {
    self
      .params
      .iter()
      .find(|p| p.name.eq_ignore_ascii_case(name))
      .map(|p| p.value.as_str())
  }

  pub fn has_param_value(&self, name: &str, value: &str) -> bool {
    self
      .params
      .iter()
      .filter(|p| p.name.eq_ignore_ascii_case(name))
      .flat_map(|p| p.value.split(','))
      .any(|v| v.trim().eq_ignore_ascii_case(value))
  }

  /// All `TYPE` values, handling both `TYPE=A,B` and repeated `TYPE=`.
  pub fn types(&self) -> Vec<String> {
    self
      .params
      .iter()
      .filter(|p| p.name.eq_ignore_ascii_case("TYPE"))
      .flat_map(|p| p.value.split(','))
      .map(|t| t.trim().to_lowercase())
      .filter(|t| !t.is_empty())
      .collect()
  }

  /// vCard 4 `PREF=N`.
  pub fn pref(&self) -> Option<u8> {
    self.param("PREF").and_then(|v| v.trim().parse().ok())
  }

  /// Parse an unfolded content line.
  pub fn parse(line: &str) -> Result<Self> {
    let malformed = || Error::MalformedContentLine(line.to_string());
    let colon = find_unquoted(line, ':').ok_or_else(malformed)?;

    let head = &line[..colon];
    let value = line[colon + 1..].to_string();

    let mut tokens = split_unquoted(head, ';').into_iter();
    let name_token = tokens.next().map(str::trim).unwrap_or_default();
    let (group, name) = match name_token.rsplit_once('.') {
      Some((group, name)) => (Some(group.to_string()), name),
      None => (None, name_token),
    };
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
      return Err(malformed());
    }

    let mut params = Vec::new();
    for token in tokens {
      match token.split_once('=') {
        Some((pname, pval)) => params.push(Param {
          name:  pname.trim().to_uppercase(),
          value: decode_caret(pval.trim().trim_matches('"')),
        }),
        // vCard 2.1 bare token: `TEL;CELL:…`
        None if !token.trim().is_empty() => params.push(Param {
          name:  "TYPE".to_string(),
          value: token.trim().to_string(),
        }),
        None => {}
      }
    }

    Ok(Self {
      group,
      name: name.to_uppercase(),
      params,
      value,
    })
  }

  /// Render as one logical line (not folded).
  pub fn to_line(&self) -> String {
    let mut out = String::new();
    if let Some(group) = &self.group {
      out.push_str(group);
      out.push('.');
    }
    out.push_str(&self.name);
    for p in &self.params {
      out.push(';');
      out.push_str(&p.name);
      out.push('=');
      let value = encode_caret(&p.value);
      if value.contains([':', ';']) || (value.contains(',') && p.name != "TYPE") {
        out.push('"');
        out.push_str(&value);
        out.push('"');
      } else {
        out.push_str(&value);
      }
    }
    out.push(':');
    out.push_str(&self.value);
    out
  }
}

// ─── Folding ─────────────────────────────────────────────────────────────────

/// Join CRLF+SP (or LF+SP / LF+HT) continuation lines (RFC 6350 §3.2).
/// Tolerates bare LF line endings.
pub(crate) fn unfold_lines(s: &str) -> Vec<String> {
  let mut lines: Vec<String> = Vec::new();
  for raw in s.split('\n') {
    let line = raw.strip_suffix('\r').unwrap_or(raw);
    if let Some(rest) = line.strip_prefix([' ', '\t']) {
      if let Some(last) = lines.last_mut() {
        last.push_str(rest);
      }
    } else {
      lines.push(line.to_string());
    }
  }
  lines.retain(|l| !l.trim().is_empty());
  lines
}

/// Emit `s` as one logical line, folding at 75 octets with CRLF + SP.
pub(crate) fn fold_line(s: &str) -> String {
  if s.len() <= 75 {
    return format!("{s}\r\n");
  }

  let mut result = String::new();
  let mut pos = 0usize;
  let mut first = true;

  while pos < s.len() {
    // Continuation lines lose one octet to the leading space.
    let limit = if first { 75 } else { 74 };
    let end = if pos + limit >= s.len() {
      s.len()
    } else {
      let mut e = pos + limit;
      while e > pos && !s.is_char_boundary(e) {
        e -= 1;
      }
      if e == pos { pos + 1 } else { e }
    };

    if !first {
      result.push(' ');
    }
    result.push_str(&s[pos..end]);
    result.push_str("\r\n");
    pos = end;
    first = false;
  }

  result
}

// ─── Splitting ───────────────────────────────────────────────────────────────

fn find_unquoted(s: &str, needle: char) -> Option<usize> {
  let mut in_quotes = false;
  for (i, c) in s.char_indices() {
    match c {
      '"' => in_quotes = !in_quotes,
      c if c == needle && !in_quotes => return Some(i),
      _ => {}
    }
  }
  None
}

fn split_unquoted(s: &str, sep: char) -> Vec<&str> {
  let mut result = Vec::new();
  let mut start = 0usize;
  let mut in_quotes = false;
  for (i, c) in s.char_indices() {
    match c {
      '"' => in_quotes = !in_quotes,
      c if c == sep && !in_quotes => {
        result.push(&s[start..i]);
        start = i + 1;
      }
      _ => {}
    }
  }
  result.push(&s[start..]);
  result
}

/// Split an escaped value on `sep`, ignoring backslash-escaped separators.
/// The parts stay escaped.
pub(crate) fn split_escaped(s: &str, sep: char) -> Vec<&str> {
  let mut result = Vec::new();
  let mut start = 0usize;
  let mut escaped = false;
  for (i, c) in s.char_indices() {
    if escaped {
      escaped = false;
    } else if c == '\\' {
      escaped = true;
    } else if c == sep {
      result.push(&s[start..i]);
      start = i + sep.len_utf8();
    }
  }
  result.push(&s[start..]);
  result
}

// ─── Escaping ────────────────────────────────────────────────────────────────

pub(crate) fn unescape_value(s: &str) -> String {
  let mut result = String::with_capacity(s.len());
  let mut chars = s.chars();
  while let Some(c) = chars.next() {
    if c == '\\' {
      match chars.next() {
        Some('n') | Some('N') => result.push('\n'),
        Some(c @ ('\\' | ',' | ';' | ':')) => result.push(c),
        Some(other) => {
          result.push('\\');
          result.push(other);
        }
        None => result.push('\\'),
      }
    } else {
      result.push(c);
    }
  }
  result
}

/// Escape a text value or a list item: `\`, `,`, `;`, newline.
pub(crate) fn escape_value(s: &str) -> String {
  s.replace('\\', "\\\\")
    .replace(',', "\\,")
    .replace(';', "\\;")
    .replace("\r\n", "\\n")
    .replace('\n', "\\n")
}

/// Unescaped items of a comma-separated list value, blanks dropped.
pub(crate) fn list_values(value: &str) -> Vec<String> {
  split_escaped(value, ',')
    .into_iter()
    .map(|v| unescape_value(v).trim().to_string())
    .filter(|v| !v.is_empty())
    .collect()
}

/// Components of a structured value (`N`, `ADR`, `ORG`), each a list of
/// unescaped items.
pub(crate) fn structured_values(value: &str) -> Vec<Vec<String>> {
  split_escaped(value, ';')
    .into_iter()
    .map(list_values)
    .collect()
}

/// Inverse of [`structured_values`].
pub(crate) fn join_structured<S: AsRef<str>>(components: &[Vec<S>]) -> String {
  components
    .iter()
    .map(|items| {
      items
        .iter()
        .map(|i| escape_value(i.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
    })
    .collect::<Vec<_>>()
    .join(";")
}

/// RFC 6868 parameter value encoding.
fn decode_caret(s: &str) -> String {
  let mut result = String::with_capacity(s.len());
  let mut chars = s.chars().peekable();
  while let Some(c) = chars.next() {
    if c == '^' {
      match chars.peek() {
        Some('n') => {
          result.push('\n');
          chars.next();
        }
        Some('\'') => {
          result.push('"');
          chars.next();
        }
        Some('^') => {
          result.push('^');
          chars.next();
        }
        _ => result.push('^'),
      }
    } else {
      result.push(c);
    }
  }
  result
}

fn encode_caret(s: &str) -> String {
  s.replace('^', "^^").replace('\n', "^n").replace('"', "^'")
}

/// Minimal quoted-printable decoder for vCard 2.1/3.0
/// `ENCODING=QUOTED-PRINTABLE`.
pub(crate) fn decode_quoted_printable(s: &str) -> String {
  let bytes = s.as_bytes();
  let mut result: Vec<u8> = Vec::with_capacity(bytes.len());
  let mut i = 0;
  while i < bytes.len() {
    if bytes[i] == b'=' && i + 2 < bytes.len() {
      let hex = (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2]));
      if let (Some(hi), Some(lo)) = hex {
        result.push((hi << 4) | lo);
        i += 3;
        continue;
      }
    }
    result.push(bytes[i]);
    i += 1;
  }
  String::from_utf8_lossy(&result).into_owned()
}

fn hex_digit(b: u8) -> Option<u8> {
  (b as char).to_digit(16).map(|d| d as u8)
}
