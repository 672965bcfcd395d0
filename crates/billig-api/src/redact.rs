//! PII redaction for server-side logs.
//!
//! Handlers log submissions and contact messages for operational visibility;
//! these helpers run on every personal field before it reaches a log line.

/// Keep the first character of the local part and the domain:
/// `yann@breizh.bzh` → `y***@breizh.bzh`.
pub fn redact_email(email: &str) -> String {
  match email.split_once('@') {
    Some((local, domain)) => {
      let first = local.chars().next().map(String::from).unwrap_or_default();
      format!("{first}***@{domain}")
    }
    None => "***".to_string(),
  }
}

/// Keep only the last two digits: `0612345678` → `********78`.
pub fn redact_phone(phone: &str) -> String {
  let len = phone.chars().count();
  if len <= 2 {
    return "*".repeat(len);
  }
  let tail: String = phone.chars().skip(len - 2).collect();
  format!("{}{tail}", "*".repeat(len - 2))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn email_keeps_first_char_and_domain() {
    assert_eq!(redact_email("yann@breizh.bzh"), "y***@breizh.bzh");
    assert_eq!(redact_email("a@b.fr"), "a***@b.fr");
    assert_eq!(redact_email("not-an-email"), "***");
  }

  #[test]
  fn phone_keeps_last_two_digits() {
    assert_eq!(redact_phone("0612345678"), "********78");
    assert_eq!(redact_phone("78"), "**");
    assert_eq!(redact_phone(""), "");
  }
}
