mod support;

use sachiva::routes::ApiResponse;
use serde_json::json;
use support::spawn_app;

#[tokio::test]
async fn returns_success_for_valid_input() {
    let app = spawn_app(false).await;

    let response = reqwest::Client::new()
        .post(format!("{}/contact", app.address))
        .json(&json!({
            "name": "John Doe",
            "email": "john@example.com",
            "message": "Hello world",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: ApiResponse = response.json().await.unwrap();
    assert!(body.success);
    assert_eq!(body.message, "Email sent successfully!");
    assert_eq!(app.mailer.sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn accepts_form_encoded_bodies() {
    let app = spawn_app(false).await;

    let response = reqwest::Client::new()
        .post(format!("{}/contact", app.address))
        .form(&[
            ("name", "John Doe"),
            ("email", "john@example.com"),
            ("message", "Hello world"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: ApiResponse = response.json().await.unwrap();
    assert!(body.success);
}

#[tokio::test]
async fn returns_error_for_missing_name() {
    let app = spawn_app(false).await;

    let response = reqwest::Client::new()
        .post(format!("{}/contact", app.address))
        .json(&json!({
            "email": "john@example.com",
            "message": "Hello world",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: ApiResponse = response.json().await.unwrap();
    assert!(!body.success);
    assert_eq!(body.message, "Name is required");
    assert!(app.mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn returns_error_for_invalid_email() {
    let app = spawn_app(false).await;

    let response = reqwest::Client::new()
        .post(format!("{}/contact", app.address))
        .json(&json!({
            "name": "John Doe",
            "email": "invalid-email",
            "message": "Hello world",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: ApiResponse = response.json().await.unwrap();
    assert_eq!(body.message, "Valid email is required");
}

#[tokio::test]
async fn returns_error_for_missing_message() {
    let app = spawn_app(false).await;

    let response = reqwest::Client::new()
        .post(format!("{}/contact", app.address))
        .json(&json!({
            "name": "John Doe",
            "email": "john@example.com",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: ApiResponse = response.json().await.unwrap();
    assert_eq!(body.message, "Message is required");
}

#[tokio::test]
async fn reports_first_error_when_every_field_is_missing() {
    let app = spawn_app(false).await;

    let response = reqwest::Client::new()
        .post(format!("{}/contact", app.address))
        .json(&json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: ApiResponse = response.json().await.unwrap();
    assert_eq!(body.message, "Name is required");
}

#[tokio::test]
async fn rejects_unparsable_bodies() {
    let app = spawn_app(false).await;

    let response = reqwest::Client::new()
        .post(format!("{}/contact", app.address))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: ApiResponse = response.json().await.unwrap();
    assert_eq!(body.message, "Malformed payload");
}

#[tokio::test]
async fn reports_send_failure_with_reason() {
    let app = spawn_app(true).await;

    let response = reqwest::Client::new()
        .post(format!("{}/contact", app.address))
        .json(&json!({
            "name": "John Doe",
            "email": "john@example.com",
            "message": "Hello world",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body: ApiResponse = response.json().await.unwrap();
    assert!(!body.success);
    assert_eq!(body.message, "Something went wrong while sending email!");
    assert!(body.error.unwrap().contains("connection refused"));
}

#[tokio::test]
async fn sanitizes_input_before_composing() {
    let app = spawn_app(false).await;

    let response = reqwest::Client::new()
        .post(format!("{}/contact", app.address))
        .json(&json!({
            "name": "<script>alert(\"xss\")</script>John",
            "email": "john@example.com",
            "message": "<b>Hello</b> world",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);

    let sent = app.mailer.sent.lock().unwrap();
    let message = sent.first().unwrap();
    assert!(!message.subject.contains("<script>"));
    assert!(!message.html_body.contains("<script>"));
    assert!(!message.html_body.contains("<b>"));
    assert!(message.html_body.contains("&lt;b&gt;Hello&lt;/b&gt; world"));
}
