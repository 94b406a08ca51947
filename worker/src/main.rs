use anyhow::Result;
use crates::domain::repositories::{
    cfs_accounts::CfsAccountRepository, corp_types::CorpTypeRepository,
    distribution_codes::DistributionCodeRepository, ejv_files::EjvFileRepository,
    events::EventPublisher, invoices::InvoiceRepository,
    non_sufficient_funds::NonSufficientFundsRepository,
    payment_accounts::PaymentAccountRepository, object_storage::ObjectStorage,
    statements::StatementRepository,
};
use crates::events::queue_publisher::QueuePublisher;
use crates::infra::{
    db::{
        postgres::postgres_connection,
        repositories::{
            cfs_accounts::CfsAccountPostgres, corp_types::CorpTypePostgres,
            distribution_codes::DistributionCodePostgres, ejv_files::EjvFilePostgres,
            invoices::InvoicePostgres, non_sufficient_funds::NonSufficientFundsPostgres,
            payment_accounts::PaymentAccountPostgres, statements::StatementPostgres,
        },
    },
    storages::s3::S3ObjectStorage,
};
use std::{sync::Arc, time::Duration};
use tracing::{error, info};
use worker::{
    axum_http, config,
    services::scheduler_loop,
    tasks::{ejv_batch::EjvBatchTask, statement_due::StatementDueTask},
};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(error) = run().await {
        error!("Worker exited with error: {}", error);
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    crates::observability::init_observability("worker")?;

    let dotenvy_env = Arc::new(config::config_loader::load()?);
    info!("ENV has been loaded");

    let postgres_pool = postgres_connection::establish_connection(&dotenvy_env.database.url)?;
    info!("Postgres connection has been established");

    let db_pool_arc = Arc::new(postgres_pool);

    // Shared ports over the ledger store
    let corp_type_repository: Arc<dyn CorpTypeRepository + Send + Sync> =
        Arc::new(CorpTypePostgres::new(Arc::clone(&db_pool_arc)));
    let invoice_repository: Arc<dyn InvoiceRepository + Send + Sync> =
        Arc::new(InvoicePostgres::new(Arc::clone(&db_pool_arc)));
    let distribution_repository: Arc<dyn DistributionCodeRepository + Send + Sync> =
        Arc::new(DistributionCodePostgres::new(Arc::clone(&db_pool_arc)));
    let ejv_file_repository: Arc<dyn EjvFileRepository + Send + Sync> =
        Arc::new(EjvFilePostgres::new(Arc::clone(&db_pool_arc)));
    let account_repository: Arc<dyn PaymentAccountRepository + Send + Sync> =
        Arc::new(PaymentAccountPostgres::new(Arc::clone(&db_pool_arc)));
    let statement_repository: Arc<dyn StatementRepository + Send + Sync> =
        Arc::new(StatementPostgres::new(Arc::clone(&db_pool_arc)));
    let cfs_account_repository: Arc<dyn CfsAccountRepository + Send + Sync> =
        Arc::new(CfsAccountPostgres::new(Arc::clone(&db_pool_arc)));
    let nsf_repository: Arc<dyn NonSufficientFundsRepository + Send + Sync> =
        Arc::new(NonSufficientFundsPostgres::new(Arc::clone(&db_pool_arc)));

    let storage: Arc<dyn ObjectStorage + Send + Sync> =
        Arc::new(S3ObjectStorage::new(dotenvy_env.object_storage.clone()).await?);

    let publisher: Arc<dyn EventPublisher + Send + Sync> = Arc::new(QueuePublisher::new(
        dotenvy_env.queue.endpoint.clone(),
        dotenvy_env.queue.source.clone(),
    ));

    let ejv_batch_task = Arc::new(EjvBatchTask::new(
        corp_type_repository,
        Arc::clone(&invoice_repository),
        distribution_repository,
        ejv_file_repository,
        storage,
        dotenvy_env.ejv.clone(),
        dotenvy_env.legislative_utc_offset,
    ));

    let statement_due_task = Arc::new(StatementDueTask::new(
        account_repository,
        invoice_repository,
        statement_repository,
        cfs_account_repository,
        nsf_repository,
        publisher,
        dotenvy_env.statement_due.clone(),
        dotenvy_env.legislative_utc_offset,
    ));

    let disbursement_loop = tokio::spawn(scheduler_loop::run_disbursement_loop(
        ejv_batch_task,
        Duration::from_secs(dotenvy_env.ejv.interval_secs),
    ));

    let statement_due_loop = tokio::spawn(scheduler_loop::run_statement_due_loop(
        statement_due_task,
        Duration::from_secs(dotenvy_env.statement_due.interval_secs),
    ));

    let health_server = tokio::spawn(axum_http::http_serve::start(Arc::clone(&dotenvy_env)));

    tokio::select! {
        result = disbursement_loop => result??,
        result = statement_due_loop => result??,
        result = health_server => result??,
    };
    Ok(())
}
