//! GitHub login validation.

/// Longest login GitHub accepts.
const MAX_USERNAME_LEN: usize = 39;

/// True when `name` is a well-formed GitHub login: 1 to 39 ASCII letters,
/// digits or hyphens, never starting or ending with a hyphen and never
/// containing two hyphens in a row.
pub fn validate_username(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_USERNAME_LEN {
        return false;
    }
    if name.starts_with('-') || name.ends_with('-') || name.contains("--") {
        return false;
    }
    name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}
