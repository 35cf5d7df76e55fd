//! Log sanitization helpers.
//!
//! Provider and daemon responses can echo tokens or large payloads back;
//! these helpers keep debug/error logs short and secret-free.

/// Maximum number of bytes of a body kept in log output.
const TRUNCATE_LIMIT: usize = 256;

/// Number of leading characters of a secret left visible by [`mask_secret`].
const MASK_VISIBLE: usize = 4;

/// Truncate a string for logging.
///
/// Strings within the limit are returned unchanged; longer strings are cut at
/// the last char boundary before the limit and suffixed with the total length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        return s.to_string();
    }

    let cut = s
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= TRUNCATE_LIMIT)
        .last()
        .unwrap_or(0);

    format!("{}... [truncated, total {} bytes]", &s[..cut], s.len())
}

/// Mask an API token, keeping only a short prefix.
///
/// `"abcd1234secret"` becomes `"abcd****"`. Short secrets are fully masked.
pub fn mask_secret(secret: &str) -> String {
    if secret.chars().count() <= MASK_VISIBLE * 2 {
        return "****".to_string();
    }
    let prefix: String = secret.chars().take(MASK_VISIBLE).collect();
    format!("{prefix}****")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_string_unchanged() {
        assert_eq!(truncate_for_log("hello world"), "hello world");
    }

    #[test]
    fn exactly_at_limit() {
        let s = "a".repeat(TRUNCATE_LIMIT);
        assert_eq!(truncate_for_log(&s), s);
    }

    #[test]
    fn over_limit_truncated() {
        let s = "a".repeat(TRUNCATE_LIMIT + 100);
        let result = truncate_for_log(&s);
        assert!(result.starts_with(&"a".repeat(TRUNCATE_LIMIT)));
        assert!(result.ends_with(&format!("total {} bytes]", TRUNCATE_LIMIT + 100)));
    }

    #[test]
    fn multibyte_chars_are_not_split() {
        let s = "é".repeat(200);
        let result = truncate_for_log(&s);
        assert!(result.contains("... [truncated, total 400 bytes]"));
    }

    #[test]
    fn secrets_are_masked() {
        assert_eq!(mask_secret("abcd1234secret"), "abcd****");
        assert_eq!(mask_secret("short"), "****");
        assert_eq!(mask_secret(""), "****");
    }
}
