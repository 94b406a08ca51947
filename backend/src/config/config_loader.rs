use anyhow::{Ok, Result};
use crates::payments::gateway_client::GatewayClientConfig;

use super::config_model::DotEnvyConfig;

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let backend_server = super::config_model::BackendServer {
        port: std::env::var("SERVER_PORT_BACKEND")
            .expect("SERVER_PORT_BACKEND is invalid")
            .parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .expect("SERVER_BODY_LIMIT is invalid")
            .parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .expect("SERVER_TIMEOUT is invalid")
            .parse()?,
    };

    let database = super::config_model::Database {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL is invalid"),
    };

    let gateway = GatewayClientConfig {
        base_url: std::env::var("GATEWAY_BASE_URL").expect("GATEWAY_BASE_URL is invalid"),
        client_key: std::env::var("GATEWAY_CLIENT_KEY").expect("GATEWAY_CLIENT_KEY is invalid"),
        client_secret: std::env::var("GATEWAY_CLIENT_SECRET")
            .expect("GATEWAY_CLIENT_SECRET is invalid"),
        timeout_secs: std::env::var("GATEWAY_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()?,
    };

    Ok(DotEnvyConfig {
        backend_server,
        database,
        gateway,
    })
}
