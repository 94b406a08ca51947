pub mod axum_http;
pub mod config;
pub mod ejv;
pub mod services;
pub mod tasks;
