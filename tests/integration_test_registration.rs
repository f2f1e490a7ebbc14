mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{Browser, TestApp};
use event_portal::domain::models::event::EventStatus;
use event_portal::domain::models::registration::RegistrationRequest;
use event_portal::domain::services::registration_service::RegistrationError;

async fn open_event_page(browser: &mut Browser, event_id: &str) -> String {
    let page = browser.get(&format!("/event?id={}", event_id)).await;
    assert_eq!(page.status, StatusCode::OK);
    page.csrf_token()
}

fn request(event_id: &str, name: &str, email: &str, phone: &str) -> RegistrationRequest {
    RegistrationRequest {
        event_id: Some(event_id.to_string()),
        name: Some(name.to_string()),
        email: Some(email.to_string()),
        phone: Some(phone.to_string()),
    }
}

#[tokio::test]
async fn test_successful_registration_flow() {
    let app = TestApp::new().await;
    let event = app.seed_event("Rust Workshop", Utc::now() + Duration::days(3), 20, EventStatus::Open).await;

    let mut browser = app.browser();
    let token = open_event_page(&mut browser, &event.id).await;

    let response = browser.post_form("/register-event", &[
        ("event_id", &event.id),
        ("name", "Ferris Crab"),
        ("email", "ferris@example.com"),
        ("phone", "0123456789"),
        ("csrf_token", &token),
    ]).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/"));
    assert_eq!(app.registration_count(&event.id).await, 1);

    let listing = browser.get("/").await;
    assert!(listing.body.contains("Registration successful!"));
    assert!(listing.body.contains("Seats available: 19 / 20"));

    // Flash messages are read once.
    let again = browser.get("/").await;
    assert!(!again.body.contains("Registration successful!"));
}

#[tokio::test]
async fn test_invalid_fields_are_reported_together() {
    let app = TestApp::new().await;
    let event = app.seed_event("Validation Day", Utc::now() + Duration::days(3), 20, EventStatus::Open).await;

    let mut browser = app.browser();
    let token = open_event_page(&mut browser, &event.id).await;

    let response = browser.post_form("/register-event", &[
        ("event_id", &event.id),
        ("name", "R2-D2"),
        ("email", "not-an-email"),
        ("phone", "12345"),
        ("csrf_token", &token),
    ]).await;
    let expected_back = format!("/event?id={}", event.id);
    assert_eq!(response.location.as_deref(), Some(expected_back.as_str()));
    assert_eq!(app.registration_count(&event.id).await, 0);

    let page = browser.get(&expected_back).await;
    assert!(page.body.contains("Name should only contain letters and spaces."));
    assert!(page.body.contains("Invalid email format."));
    assert!(page.body.contains("Phone number must be exactly 10 digits."));
}

#[tokio::test]
async fn test_missing_and_blank_fields_are_distinguished() {
    let app = TestApp::new().await;
    let event = app.seed_event("Forms 101", Utc::now() + Duration::days(3), 20, EventStatus::Open).await;

    let incomplete = RegistrationRequest {
        event_id: Some(event.id.clone()),
        name: Some("   ".into()),
        email: None,
        phone: Some("".into()),
    };
    let err = app.state.registration_service.register(incomplete, Utc::now()).await.unwrap_err();
    let RegistrationError::Invalid(errors) = err else { panic!("expected validation failure") };
    assert_eq!(errors, vec![
        "Name is required.".to_string(),
        "Email is missing.".to_string(),
        "Phone is required.".to_string(),
    ]);

    let no_event = RegistrationRequest { event_id: None, ..request("", "Ada Lovelace", "ada@example.com", "0123456789") };
    let RegistrationError::Invalid(errors) = app.state.registration_service.register(no_event, Utc::now()).await.unwrap_err() else {
        panic!("expected validation failure");
    };
    assert_eq!(errors, vec!["Event is missing.".to_string()]);
}

#[tokio::test]
async fn test_closed_event_rejects_registration() {
    let app = TestApp::new().await;
    let closed = app.seed_event("Closed Early", Utc::now() + Duration::days(3), 20, EventStatus::Closed).await;
    let past = app.seed_event("Already Happened", Utc::now() - Duration::minutes(10), 20, EventStatus::Open).await;

    for event in [&closed, &past] {
        let result = app.state.registration_service
            .register(request(&event.id, "Late Comer", "late@example.com", "0123456789"), Utc::now())
            .await;
        assert!(matches!(result, Err(RegistrationError::RegistrationClosed)));
        assert_eq!(app.registration_count(&event.id).await, 0);
    }

    let stored = app.state.event_repo.find_by_id(&past.id).await.unwrap().unwrap();
    assert_eq!(stored.status, EventStatus::Closed);
}

#[tokio::test]
async fn test_single_seat_event_fills_up() {
    let app = TestApp::new().await;
    let event = app.seed_event("One Seat Only", Utc::now() + Duration::days(1), 1, EventStatus::Open).await;
    let service = &app.state.registration_service;

    service.register(request(&event.id, "First Person", "first@example.com", "0123456789"), Utc::now()).await.unwrap();

    let overview = app.state.lifecycle.overview(event.clone(), Utc::now()).await.unwrap();
    assert_eq!(overview.seats_available, 0);

    let second = service.register(request(&event.id, "Second Person", "second@example.com", "9876543210"), Utc::now()).await;
    assert!(matches!(second, Err(RegistrationError::EventFull)));
    assert_eq!(app.registration_count(&event.id).await, 1);
}

#[tokio::test]
async fn test_full_event_redirects_back_with_message() {
    let app = TestApp::new().await;
    let event = app.seed_event("Packed Room", Utc::now() + Duration::days(1), 1, EventStatus::Open).await;

    let mut browser = app.browser();
    let token = open_event_page(&mut browser, &event.id).await;
    app.seed_registration(&event.id, "Early Bird").await;

    let response = browser.post_form("/register-event", &[
        ("event_id", &event.id),
        ("name", "Too Late"),
        ("email", "late@example.com"),
        ("phone", "0123456789"),
        ("csrf_token", &token),
    ]).await;
    let back = format!("/event?id={}", event.id);
    assert_eq!(response.location.as_deref(), Some(back.as_str()));

    let page = browser.get(&back).await;
    assert!(page.body.contains("All seats are full for this event."));
    assert_eq!(app.registration_count(&event.id).await, 1);
}

#[tokio::test]
async fn test_forged_csrf_token_changes_nothing() {
    let app = TestApp::new().await;
    let event = app.seed_event("Guarded", Utc::now() + Duration::days(1), 10, EventStatus::Open).await;

    let mut browser = app.browser();
    open_event_page(&mut browser, &event.id).await;

    let response = browser.post_form("/register-event", &[
        ("event_id", &event.id),
        ("name", "Mallory"),
        ("email", "mallory@example.com"),
        ("phone", "0123456789"),
        ("csrf_token", "deadbeef"),
    ]).await;
    assert_eq!(response.location.as_deref(), Some("/"));
    assert_eq!(app.registration_count(&event.id).await, 0);

    let listing = browser.get("/").await;
    assert!(listing.body.contains("Invalid security token. Please try again."));

    // A request without any session gets the same treatment.
    let mut stranger = app.browser();
    stranger.post_form("/register-event", &[
        ("event_id", &event.id),
        ("name", "Mallory"),
        ("email", "mallory@example.com"),
        ("phone", "0123456789"),
    ]).await;
    assert_eq!(app.registration_count(&event.id).await, 0);
}

#[tokio::test]
async fn test_concurrent_registrations_never_overbook() {
    let app = TestApp::new().await;
    let event = app.seed_event("Last Seat", Utc::now() + Duration::days(1), 1, EventStatus::Open).await;

    let mut handles = Vec::new();
    for i in 0..8 {
        let service = app.state.registration_service.clone();
        let req = request(&event.id, "Racing Visitor", &format!("racer{}@example.com", i), "0123456789");
        handles.push(tokio::spawn(async move { service.register(req, Utc::now()).await }));
    }

    let mut confirmed = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => confirmed += 1,
            Err(RegistrationError::EventFull) => {}
            Err(other) => panic!("unexpected failure: {:?}", other),
        }
    }

    assert_eq!(confirmed, 1);
    assert_eq!(app.registration_count(&event.id).await, 1);
}
