use std::sync::LazyLock;
use regex::Regex;

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z \t\n\x0B\x0C\r]+$").expect("valid name pattern"));
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("valid phone pattern"));
static EMAIL_LOCAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~.-]+$").expect("valid email local pattern"));
static EMAIL_DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$").expect("valid email domain pattern")
});

/// Trims a submitted field. Absent and blank fields get distinct messages.
pub fn required(value: Option<&str>, label: &str, errors: &mut Vec<String>) -> Option<String> {
    match value.map(str::trim) {
        None => {
            errors.push(format!("{} is missing.", label));
            None
        }
        Some("") => {
            errors.push(format!("{} is required.", label));
            None
        }
        Some(v) => Some(v.to_string()),
    }
}

pub fn is_valid_name(name: &str) -> bool {
    NAME_RE.is_match(name)
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

pub fn is_valid_email(email: &str) -> bool {
    if email.len() > 254 {
        return false;
    }
    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };
    if local.is_empty() || local.len() > 64 || local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    EMAIL_LOCAL_RE.is_match(local) && EMAIL_DOMAIN_RE.is_match(domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_rule() {
        assert!(is_valid_name("Ada Lovelace"));
        assert!(is_valid_name("Grace"));
        assert!(!is_valid_name("R2D2"));
        assert!(!is_valid_name("O'Brien"));
        assert!(!is_valid_name(""));
    }

    #[test]
    fn test_name_rule_allows_only_ascii_whitespace() {
        assert!(is_valid_name("Ada\tLovelace"));
        assert!(!is_valid_name("Ada\u{2003}Lovelace"));
        assert!(!is_valid_name("Ada\u{00A0}Lovelace"));
        assert!(!is_valid_name("Ada\u{2028}Lovelace"));
        assert!(!is_valid_name("Zoë"));
    }

    #[test]
    fn test_phone_rule() {
        assert!(is_valid_phone("0123456789"));
        assert!(!is_valid_phone("012345678"));
        assert!(!is_valid_phone("01234567890"));
        assert!(!is_valid_phone("01234-6789"));
        assert!(!is_valid_phone("０１２３４５６７８９"));
    }

    #[test]
    fn test_email_rule() {
        assert!(is_valid_email("jane@example.com"));
        assert!(is_valid_email("first.last+tag@mail.example.org"));
        assert!(!is_valid_email("jane"));
        assert!(!is_valid_email("jane@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("jane..doe@example.com"));
        assert!(!is_valid_email(".jane@example.com"));
        assert!(!is_valid_email("jane@-example.com"));
        assert!(!is_valid_email("ja ne@example.com"));
    }

    #[test]
    fn test_required_distinguishes_missing_from_blank() {
        let mut errors = Vec::new();
        assert_eq!(required(None, "Title", &mut errors), None);
        assert_eq!(required(Some("   "), "Location", &mut errors), None);
        assert_eq!(required(Some("  Hall A "), "Category", &mut errors), Some("Hall A".to_string()));
        assert_eq!(errors, vec!["Title is missing.".to_string(), "Location is required.".to_string()]);
    }
}
