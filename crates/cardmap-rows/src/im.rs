//! URI schemes for instant-messaging records.

/// Turn a free-text protocol name into a URI scheme (RFC 3986 §3.1:
/// `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`).
///
/// Leading non-letters are stripped, spaces become `-`, then every
/// character outside `[0-9A-Za-z+,-.]` is dropped and the rest is
/// lower-cased.
pub fn protocol_to_uri_scheme(protocol: Option<&str>) -> Option<String> {
  let s = protocol?;
  let scheme = s
    .trim_start_matches(|c: char| !c.is_ascii_alphabetic())
    .chars()
    .map(|c| if c == ' ' { '-' } else { c })
    .filter(|c| c.is_ascii_alphanumeric() || ('+'..='.').contains(c))
    .collect::<String>()
    .to_lowercase();
  Some(scheme)
}
