// HTTP server setup (Axum + embedded web UI)
pub mod app;
pub mod routes;
pub mod static_files;

pub use app::*;
