use axum::Router;
use dotenvy::dotenv;
use sqlx::mysql::MySqlPoolOptions;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use calendar_api::config::Config;
use calendar_api::routes::create_routes;
use calendar_api::AppState;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env().expect("Invalid service configuration");

    let pool = MySqlPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Successfully connected to database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    tracing::info!("Migrations run successfully");

    let state = AppState { pool };
    let app: Router = create_routes(state, config.auth_token);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server running at http://{}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
