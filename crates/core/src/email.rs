//! Email address normalisation.

/// Normalise an email address for storage and lookup.
///
/// Surrounding whitespace is removed and the whole address is lower-cased,
/// so `" Admin@Example.COM "` and `"admin@example.com"` address the same user.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_lowercases() {
        assert_eq!(normalize_email("  Admin@Example.COM "), "admin@example.com");
    }

    #[test]
    fn already_normal_is_unchanged() {
        assert_eq!(normalize_email("a@b.io"), "a@b.io");
    }
}
