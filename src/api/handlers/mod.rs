pub mod admin;
pub mod auth;
pub mod event;
pub mod health;
pub mod registration;

/// Event page URL, falling back to the listing for ids that are not plain identifiers.
pub(crate) fn event_page(id: &str) -> String {
    let id = id.trim();
    if !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        format!("/event?id={}", id)
    } else {
        "/".to_string()
    }
}
