use chrono::FixedOffset;
use crates::infra::storages::s3::S3Config;
use url::Url;

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub worker_server: WorkerServer,
    pub database: Database,
    pub ejv: EjvConfig,
    pub statement_due: StatementDueConfig,
    pub object_storage: S3Config,
    pub queue: QueueConfig,
    /// Offset of the legislative timezone used when deriving local dates
    /// for batch naming and due-date evaluation.
    pub legislative_utc_offset: FixedOffset,
}

#[derive(Debug, Clone)]
pub struct WorkerServer {
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct EjvConfig {
    pub feeder_number: String,
    pub ministry_prefix: String,
    pub message_version: String,
    pub disbursement_desc: String,
    pub interval_secs: u64,
}

#[derive(Debug, Clone)]
pub struct StatementDueConfig {
    pub enabled: bool,
    pub interval_secs: u64,
}

#[derive(Debug, Clone)]
pub struct QueueConfig {
    pub endpoint: Url,
    pub source: String,
}
