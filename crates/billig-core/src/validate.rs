//! Format validation shared by all request handlers.
//!
//! Pure predicates over already-deserialised strings. They are deliberately
//! permissive basic-shape checks, not RFC validators: the goal is to reject
//! garbage before any store access, not to prove deliverability.

/// Device fingerprint: 5–50 chars of `[A-Za-z0-9_-]`.
pub fn is_valid_fingerprint(s: &str) -> bool {
  (5..=50).contains(&s.len())
    && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// First name: letters (accents included), spaces, hyphens, apostrophes;
/// non-empty, at most 50 chars.
pub fn is_valid_name(s: &str) -> bool {
  !s.trim().is_empty()
    && s.chars().count() <= 50
    && s.chars().all(|c| c.is_alphabetic() || c == ' ' || c == '-' || c == '\'' || c == '’')
}

/// Basic email shape: one `@`, non-empty local part, dotted domain, no
/// whitespace; at most 100 chars.
pub fn is_valid_email(s: &str) -> bool {
  if s.len() > 100 || s.chars().any(char::is_whitespace) {
    return false;
  }
  let Some((local, domain)) = s.split_once('@') else {
    return false;
  };
  if local.is_empty() || domain.contains('@') {
    return false;
  }
  let Some((host, tld)) = domain.rsplit_once('.') else {
    return false;
  };
  !host.is_empty() && tld.len() >= 2
}

/// Strip the separators people type into French phone numbers.
pub fn normalize_phone(s: &str) -> String {
  s.chars().filter(|c| !matches!(c, ' ' | '.' | '-')).collect()
}

/// French mobile or landline, after [`normalize_phone`]: `0X` + 8 digits,
/// or `+33X` + 8 digits, with `X` in 1–9.
pub fn is_valid_french_phone(s: &str) -> bool {
  let normalized = normalize_phone(s);
  let digits = if let Some(rest) = normalized.strip_prefix("+33") {
    rest
  } else if let Some(rest) = normalized.strip_prefix('0') {
    rest
  } else {
    return false;
  };
  digits.len() == 9
    && digits.chars().all(|c| c.is_ascii_digit())
    && !digits.starts_with('0')
}

/// Prize-code shape: 6–10 chars of `[A-Z0-9]`.
pub fn is_valid_code(s: &str) -> bool {
  (6..=10).contains(&s.len())
    && s.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fingerprint_bounds_and_charset() {
    assert!(is_valid_fingerprint("abcde12345"));
    assert!(is_valid_fingerprint("a_b-c"));
    assert!(!is_valid_fingerprint("abcd")); // too short
    assert!(!is_valid_fingerprint(&"x".repeat(51)));
    assert!(!is_valid_fingerprint("abc de"));
    assert!(!is_valid_fingerprint("abc😀de"));
  }

  #[test]
  fn names_accept_french_forms() {
    assert!(is_valid_name("Anaïg"));
    assert!(is_valid_name("Jean-Pierre"));
    assert!(is_valid_name("N'Guyen"));
    assert!(is_valid_name("Marie Claire"));
    assert!(!is_valid_name(""));
    assert!(!is_valid_name("   "));
    assert!(!is_valid_name("Bob42"));
    assert!(!is_valid_name(&"a".repeat(51)));
  }

  #[test]
  fn email_basic_shape() {
    assert!(is_valid_email("yann@breizh.bzh"));
    assert!(is_valid_email("a.b+c@sub.example.com"));
    assert!(!is_valid_email("no-at-sign"));
    assert!(!is_valid_email("@example.com"));
    assert!(!is_valid_email("a@nodot"));
    assert!(!is_valid_email("a b@example.com"));
    assert!(!is_valid_email(&format!("{}@example.com", "x".repeat(95))));
  }

  #[test]
  fn french_phone_shapes() {
    assert!(is_valid_french_phone("0612345678"));
    assert!(is_valid_french_phone("06 12 34 56 78"));
    assert!(is_valid_french_phone("06.12.34.56.78"));
    assert!(is_valid_french_phone("02-98-12-34-56"));
    assert!(is_valid_french_phone("+33612345678"));
    assert!(!is_valid_french_phone("0012345678")); // 00 prefix
    assert!(!is_valid_french_phone("061234567")); // too short
    assert!(!is_valid_french_phone("06123456789")); // too long
    assert!(!is_valid_french_phone("0612x45678"));
    assert!(!is_valid_french_phone("12345678"));
  }

  #[test]
  fn code_shape() {
    assert!(is_valid_code("ABC123"));
    assert!(is_valid_code("ABCDEF1234"));
    assert!(!is_valid_code("abc123"));
    assert!(!is_valid_code("ABC12")); // 5 chars
    assert!(!is_valid_code("ABCDEF12345")); // 11 chars
    assert!(!is_valid_code("ABC 123"));
  }
}
