use crate::auth;
use crate::db::DbConnection;
use crate::models::{NewAppointment, NewMessage, NewRecord, NewUser};
use crate::store;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::error;

#[derive(Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Deserialize)]
pub struct MessagesQuery {
    #[serde(rename = "userId")]
    user_id: i64,
}

fn store_failure(context: &str, err: rusqlite::Error) -> Response {
    error!("{context}: {err}");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
}

pub async fn register(
    State(conn): State<DbConnection>,
    Json(new_user): Json<NewUser>,
) -> impl IntoResponse {
    match auth::register(&conn, &new_user).await {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(err) => store_failure("Failed to register user", err),
    }
}

pub async fn login(
    State(conn): State<DbConnection>,
    Json(login_data): Json<LoginRequest>,
) -> impl IntoResponse {
    match auth::login(&conn, &login_data.email, &login_data.password).await {
        Ok(Some(user)) => (StatusCode::OK, Json(user)).into_response(),
        Ok(None) => (StatusCode::UNAUTHORIZED, "Invalid credentials").into_response(),
        Err(err) => store_failure("Failed to look up user", err),
    }
}

pub async fn list_appointments(State(conn): State<DbConnection>) -> impl IntoResponse {
    match store::list_appointments(&conn).await {
        Ok(appointments) => (StatusCode::OK, Json(appointments)).into_response(),
        Err(err) => store_failure("Failed to fetch appointments", err),
    }
}

pub async fn create_appointment(
    State(conn): State<DbConnection>,
    Json(new_appointment): Json<NewAppointment>,
) -> impl IntoResponse {
    match store::insert_appointment(&conn, &new_appointment).await {
        Ok(appointment) => (StatusCode::OK, Json(appointment)).into_response(),
        Err(err) => store_failure("Failed to create appointment", err),
    }
}

pub async fn list_records(State(conn): State<DbConnection>) -> impl IntoResponse {
    match store::list_records(&conn).await {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(err) => store_failure("Failed to fetch records", err),
    }
}

pub async fn create_record(
    State(conn): State<DbConnection>,
    Json(new_record): Json<NewRecord>,
) -> impl IntoResponse {
    match store::insert_record(&conn, &new_record).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => store_failure("Failed to create record", err),
    }
}

pub async fn messages_for_user(
    State(conn): State<DbConnection>,
    Query(query): Query<MessagesQuery>,
) -> impl IntoResponse {
    match store::messages_for_user(&conn, query.user_id).await {
        Ok(messages) => (StatusCode::OK, Json(messages)).into_response(),
        Err(err) => store_failure("Failed to fetch messages", err),
    }
}

pub async fn send_message(
    State(conn): State<DbConnection>,
    Json(new_message): Json<NewMessage>,
) -> impl IntoResponse {
    match store::insert_message(&conn, &new_message).await {
        Ok(message) => (StatusCode::OK, Json(message)).into_response(),
        Err(err) => store_failure("Failed to send message", err),
    }
}
