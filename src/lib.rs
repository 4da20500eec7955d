use sqlx::MySqlPool;

pub mod config;
pub mod db;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub pool: MySqlPool,
}
