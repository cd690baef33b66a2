pub mod auth;
pub mod db;
pub mod handlers;
pub mod models;
pub mod store;

use axum::{
    routing::{get, post},
    Router,
};
use db::DbConnection;
use tower_http::cors::CorsLayer;

pub fn router(conn: DbConnection) -> Router {
    Router::new()
        .route("/api/auth/register", post(handlers::register))
        .route("/api/auth/login", post(handlers::login))
        .route(
            "/api/appointments",
            get(handlers::list_appointments).post(handlers::create_appointment),
        )
        .route(
            "/api/records",
            get(handlers::list_records).post(handlers::create_record),
        )
        .route(
            "/api/messages",
            get(handlers::messages_for_user).post(handlers::send_message),
        )
        .layer(CorsLayer::permissive())
        .with_state(conn)
}
