//! Inbound credential verification.
//!
//! A webhook is called as `/events/{id}?auth={secret}`. The credential must
//! equal the stored secret exactly.

/// Check a supplied credential against the stored secret.
///
/// A missing credential never matches.
pub fn credential_matches(secret: &str, supplied: Option<&str>) -> bool {
    match supplied {
        Some(supplied) if !secret.is_empty() => constant_time_compare(secret, supplied),
        _ => false,
    }
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_matches_exact() {
        assert!(credential_matches("5b1e-secret", Some("5b1e-secret")));
    }

    #[test]
    fn test_credential_mismatch() {
        assert!(!credential_matches("5b1e-secret", Some("5b1e-secreT")));
        assert!(!credential_matches("5b1e-secret", Some("5b1e-secret ")));
        assert!(!credential_matches("5b1e-secret", Some("")));
    }

    #[test]
    fn test_credential_missing() {
        assert!(!credential_matches("5b1e-secret", None));
    }

    #[test]
    fn test_empty_secret_never_matches() {
        assert!(!credential_matches("", Some("")));
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("abc", "abcd"));
    }
}
