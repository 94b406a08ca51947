use anyhow::{Context, Ok, Result};
use chrono::FixedOffset;
use crates::infra::storages::s3::S3Config;
use url::Url;

use super::config_model::DotEnvyConfig;

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let worker_server = super::config_model::WorkerServer {
        port: std::env::var("SERVER_PORT_WORKER")
            .expect("SERVER_PORT_WORKER is invalid")
            .parse()?,
    };

    let database = super::config_model::Database {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL is invalid"),
    };

    let ejv = super::config_model::EjvConfig {
        feeder_number: std::env::var("EJV_FEEDER_NUMBER").expect("EJV_FEEDER_NUMBER is invalid"),
        ministry_prefix: std::env::var("EJV_MINISTRY_PREFIX")
            .expect("EJV_MINISTRY_PREFIX is invalid"),
        message_version: std::env::var("EJV_MESSAGE_VERSION")
            .expect("EJV_MESSAGE_VERSION is invalid"),
        disbursement_desc: std::env::var("EJV_DISBURSEMENT_DESC")
            .expect("EJV_DISBURSEMENT_DESC is invalid"),
        interval_secs: std::env::var("EJV_INTERVAL_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()?,
    };

    let statement_due = super::config_model::StatementDueConfig {
        enabled: std::env::var("STATEMENT_DUE_ENABLED")
            .unwrap_or_else(|_| "false".to_string())
            .parse()?,
        interval_secs: std::env::var("STATEMENT_DUE_INTERVAL_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()?,
    };

    let object_storage = S3Config::new(
        std::env::var("STORAGE_ENDPOINT").expect("STORAGE_ENDPOINT is invalid"),
        std::env::var("STORAGE_REGION").expect("STORAGE_REGION is invalid"),
        std::env::var("STORAGE_BUCKET").expect("STORAGE_BUCKET is invalid"),
        std::env::var("STORAGE_ACCESS_KEY").expect("STORAGE_ACCESS_KEY is invalid"),
        std::env::var("STORAGE_SECRET_KEY").expect("STORAGE_SECRET_KEY is invalid"),
    );

    let queue = super::config_model::QueueConfig {
        endpoint: Url::parse(
            &std::env::var("QUEUE_ENDPOINT").expect("QUEUE_ENDPOINT is invalid"),
        )?,
        source: std::env::var("QUEUE_SOURCE").unwrap_or_else(|_| "payment-jobs".to_string()),
    };

    let offset_hours: i32 = std::env::var("LEGISLATIVE_UTC_OFFSET_HOURS")
        .unwrap_or_else(|_| "-8".to_string())
        .parse()?;
    let legislative_utc_offset = FixedOffset::east_opt(offset_hours * 3600)
        .context("LEGISLATIVE_UTC_OFFSET_HOURS is out of range")?;

    Ok(DotEnvyConfig {
        worker_server,
        database,
        ejv,
        statement_due,
        object_storage,
        queue,
        legislative_utc_offset,
    })
}
