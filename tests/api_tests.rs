use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let conn = mediconnect::db::establish_connection(":memory:").expect("Failed to open database");
    mediconnect::router(conn)
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_json(app: &Router, uri: &str, body: Value) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn register_user(app: &Router, email: &str, password: &str, role: &str) -> Value {
    let response = post_json(
        app,
        "/api/auth/register",
        json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": email,
            "password": password,
            "role": role,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

#[tokio::test]
async fn register_assigns_id_and_hashes_password() {
    let app = spawn_app().await;

    let user = register_user(&app, "a@x.com", "pw1", "PATIENT").await;

    assert!(user["id"].as_i64().unwrap() >= 1);
    assert_eq!(user["email"], "a@x.com");
    assert_eq!(user["role"], "PATIENT");
    assert_eq!(user["validated"], false);
    assert!(user["profilePicturePath"].is_null());

    let stored_password = user["password"].as_str().unwrap();
    assert!(!stored_password.is_empty());
    assert_ne!(stored_password, "pw1");
}

#[tokio::test]
async fn login_round_trip() {
    let app = spawn_app().await;

    let registered = register_user(&app, "a@x.com", "pw1", "PATIENT").await;

    let response = post_json(
        &app,
        "/api/auth/login",
        json!({"email": "a@x.com", "password": "pw1"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let user = body_json(response).await;
    assert_eq!(user["id"], registered["id"]);
    assert_eq!(user["email"], "a@x.com");

    let response = post_json(
        &app,
        "/api/auth/login",
        json!({"email": "a@x.com", "password": "wrong"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let wrong_password_body = body_text(response).await;
    assert_eq!(wrong_password_body, "Invalid credentials");

    let response = post_json(
        &app,
        "/api/auth/login",
        json!({"email": "nobody@x.com", "password": "pw1"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_text(response).await, wrong_password_body);
}

#[tokio::test]
async fn duplicate_email_register_is_a_server_error() {
    let app = spawn_app().await;

    register_user(&app, "a@x.com", "pw1", "PATIENT").await;

    let response = post_json(
        &app,
        "/api/auth/register",
        json!({
            "firstName": "Grace",
            "lastName": "Hopper",
            "email": "a@x.com",
            "password": "pw2",
            "role": "DOCTOR",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn appointment_create_and_list() {
    let app = spawn_app().await;

    let patient = register_user(&app, "patient@x.com", "pw1", "PATIENT").await;
    let doctor = register_user(&app, "doctor@x.com", "pw2", "DOCTOR").await;

    let response = post_json(
        &app,
        "/api/appointments",
        json!({
            "patientId": patient["id"],
            "doctorId": doctor["id"],
            "dateTime": "2026-03-14T09:30:00",
            "durationInMinutes": 30,
            "type": "IN_PERSON",
            "status": "SCHEDULED",
            "notes": "Annual checkup",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    assert!(created["id"].as_i64().unwrap() >= 1);
    assert_eq!(created["dateTime"], "2026-03-14T09:30:00");

    let response = get(&app, "/api/appointments").await;
    assert_eq!(response.status(), StatusCode::OK);
    let listed = body_json(response).await;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], created["id"]);
    assert_eq!(listed[0]["patientId"], patient["id"]);
    assert_eq!(listed[0]["doctorId"], doctor["id"]);
    assert_eq!(listed[0]["type"], "IN_PERSON");
    assert_eq!(listed[0]["status"], "SCHEDULED");
    assert_eq!(listed[0]["notes"], "Annual checkup");
}

#[tokio::test]
async fn record_create_and_list_preserves_file_path_order() {
    let app = spawn_app().await;

    let patient = register_user(&app, "patient@x.com", "pw1", "PATIENT").await;

    let response = post_json(
        &app,
        "/api/records",
        json!({
            "patientId": patient["id"],
            "title": "Blood panel",
            "description": "Routine checkup results",
            "date": "2026-02-01",
            "filePaths": ["scans/one.pdf", "scans/two.pdf", "scans/three.pdf"],
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    assert!(created["id"].as_i64().unwrap() >= 1);

    let response = get(&app, "/api/records").await;
    assert_eq!(response.status(), StatusCode::OK);
    let listed = body_json(response).await;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], created["id"]);
    assert_eq!(listed[0]["date"], "2026-02-01");
    assert_eq!(
        listed[0]["filePaths"],
        json!(["scans/one.pdf", "scans/two.pdf", "scans/three.pdf"])
    );
}

#[tokio::test]
async fn messages_listed_by_sender_or_recipient() {
    let app = spawn_app().await;

    let alice = register_user(&app, "alice@x.com", "pw1", "PATIENT").await;
    let bob = register_user(&app, "bob@x.com", "pw2", "DOCTOR").await;
    let carol = register_user(&app, "carol@x.com", "pw3", "PATIENT").await;

    for (sender, recipient, content) in [
        (&alice, &bob, "Hello doctor"),
        (&bob, &alice, "Hello back"),
        (&bob, &carol, "Unrelated thread"),
    ] {
        let response = post_json(
            &app,
            "/api/messages",
            json!({
                "senderId": sender["id"],
                "recipientId": recipient["id"],
                "content": content,
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let created = body_json(response).await;
        assert!(created["id"].as_i64().unwrap() >= 1);
        assert!(created["timestamp"].is_string());
    }

    let response = get(
        &app,
        &format!("/api/messages?userId={}", alice["id"].as_i64().unwrap()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let messages = body_json(response).await;
    let messages = messages.as_array().unwrap();
    assert_eq!(messages.len(), 2);
    for message in messages {
        assert!(
            message["senderId"] == alice["id"] || message["recipientId"] == alice["id"],
            "message does not involve the queried user: {message}"
        );
    }

    let contents: Vec<&str> = messages
        .iter()
        .map(|m| m["content"].as_str().unwrap())
        .collect();
    assert!(contents.contains(&"Hello doctor"));
    assert!(contents.contains(&"Hello back"));
    assert!(!contents.contains(&"Unrelated thread"));
}
