use anyhow::Result;
use std::{sync::Arc, time::Duration};
use tracing::{error, info};

use crate::tasks::{ejv_batch::EjvBatchTask, statement_due::StatementDueTask};

pub async fn run_disbursement_loop(task: Arc<EjvBatchTask>, interval: Duration) -> Result<()> {
    loop {
        info!("Starting disbursement batch run...");
        if let Err(e) = task.run().await {
            error!("Error while generating disbursement files: {}", e);
        }

        tokio::time::sleep(interval).await;
    }
}

pub async fn run_statement_due_loop(
    task: Arc<StatementDueTask>,
    interval: Duration,
) -> Result<()> {
    loop {
        info!("Starting statement due evaluation...");
        if let Err(e) = task.run().await {
            error!("Error while evaluating unpaid statements: {}", e);
        }

        tokio::time::sleep(interval).await;
    }
}
