use mediconnect::db;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let db_path = std::env::var("MEDICONNECT_DB").unwrap_or_else(|_| "mediconnect.db".to_string());
    let addr = std::env::var("MEDICONNECT_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    let conn = db::establish_connection(&db_path).expect("Failed to establish database connection");

    let app = mediconnect::router(conn);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    info!("Server running on http://{addr}");
    axum::serve(listener, app).await.unwrap();
}
