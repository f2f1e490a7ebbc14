use rand::RngCore;
use crate::domain::models::session::SessionData;

pub const CSRF_FAILURE: &str = "Invalid security token. Please try again.";

/// Returns the session's token, generating it on first use.
pub fn issue_token(session: &mut SessionData) -> String {
    if let Some(ref token) = session.csrf_token {
        return token.clone();
    }

    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    let token = hex::encode(bytes);
    session.csrf_token = Some(token.clone());
    token
}

pub fn verify(session: &SessionData, supplied: Option<&str>) -> bool {
    match (session.csrf_token.as_deref(), supplied) {
        (Some(expected), Some(given)) if !expected.is_empty() => {
            constant_time_eq::constant_time_eq(expected.as_bytes(), given.as_bytes())
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn session() -> SessionData {
        SessionData::new(Utc::now() + Duration::hours(1))
    }

    #[test]
    fn test_issue_is_idempotent() {
        let mut s = session();
        let first = issue_token(&mut s);
        let second = issue_token(&mut s);
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
    }

    #[test]
    fn test_sessions_get_distinct_tokens() {
        let mut a = session();
        let mut b = session();
        assert_ne!(issue_token(&mut a), issue_token(&mut b));
    }

    #[test]
    fn test_verify() {
        let mut s = session();
        assert!(!verify(&s, Some("anything")));

        let token = issue_token(&mut s);
        assert!(verify(&s, Some(&token)));
        assert!(!verify(&s, Some("forged")));
        assert!(!verify(&s, Some("")));
        assert!(!verify(&s, None));
    }
}
