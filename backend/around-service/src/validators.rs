/// Input validation for signup
use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9_]+$").expect("hardcoded username regex is invalid - fix source code")
});

/// Lowercase letters, digits and underscores only; at least one character.
pub fn validate_username(username: &str) -> bool {
    USERNAME_REGEX.is_match(username)
}

pub fn validate_password(password: &str) -> bool {
    !password.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(validate_username("alice"));
        assert!(validate_username("user_42"));
        assert!(validate_username("_"));

        assert!(!validate_username(""));
        assert!(!validate_username("Alice"));
        assert!(!validate_username("bad-name"));
        assert!(!validate_username("white space"));
        assert!(!validate_username("émile"));
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("x"));
        assert!(!validate_password(""));
    }
}
