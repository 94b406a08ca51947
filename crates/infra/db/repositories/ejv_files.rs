use anyhow::Result;
use async_trait::async_trait;
use diesel::{Connection, RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;

use crate::{
    domain::{
        entities::{
            ejv_files::InsertEjvFileEntity, ejv_invoice_links::InsertEjvInvoiceLinkEntity,
        },
        repositories::ejv_files::EjvFileRepository,
        value_objects::enums::disbursement_statuses::DisbursementStatus,
    },
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{ejv_files, ejv_invoice_links, invoices},
    },
};

pub struct EjvFilePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl EjvFilePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl EjvFileRepository for EjvFilePostgres {
    async fn commit_partner_batch(
        &self,
        file: InsertEjvFileEntity,
        invoice_ids: Vec<i64>,
    ) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let file_id = conn.transaction::<i64, diesel::result::Error, _>(|conn| {
            let file_id = insert_into(ejv_files::table)
                .values(&file)
                .returning(ejv_files::id)
                .get_result::<i64>(conn)?;

            let links: Vec<InsertEjvInvoiceLinkEntity> = invoice_ids
                .iter()
                .map(|invoice_id| InsertEjvInvoiceLinkEntity {
                    ejv_file_id: file_id,
                    invoice_id: *invoice_id,
                })
                .collect();
            insert_into(ejv_invoice_links::table)
                .values(&links)
                .execute(conn)?;

            update(invoices::table.filter(invoices::id.eq_any(&invoice_ids)))
                .set(
                    invoices::disbursement_status_code
                        .eq(DisbursementStatus::Uploaded.as_str()),
                )
                .execute(conn)?;

            Ok(file_id)
        })?;

        Ok(file_id)
    }
}
