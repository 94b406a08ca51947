use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{RunQueryDsl, prelude::*, update};
use std::sync::Arc;

use crate::{
    domain::{
        entities::{invoices::InvoiceEntity, payment_line_items::PaymentLineItemEntity},
        repositories::invoices::InvoiceRepository,
        value_objects::enums::{
            disbursement_statuses::DisbursementStatus, invoice_statuses::InvoiceStatus,
            payment_methods::PaymentMethod,
        },
    },
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{invoices, payment_line_items},
    },
};

pub struct InvoicePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl InvoicePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl InvoiceRepository for InvoicePostgres {
    async fn find_disbursable_by_corp_type(
        &self,
        corp_type_code: String,
    ) -> Result<Vec<InvoiceEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = invoices::table
            .filter(invoices::invoice_status_code.eq(InvoiceStatus::Paid.as_str()))
            .filter(
                invoices::disbursement_status_code
                    .is_null()
                    .or(invoices::disbursement_status_code
                        .eq(DisbursementStatus::Errored.as_str())),
            )
            .filter(invoices::corp_type_code.eq(corp_type_code))
            .order(invoices::id.asc())
            .load::<InvoiceEntity>(&mut conn)?;

        Ok(rows)
    }

    async fn find_line_items(
        &self,
        invoice_ids: Vec<i64>,
    ) -> Result<Vec<PaymentLineItemEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = payment_line_items::table
            .filter(payment_line_items::invoice_id.eq_any(invoice_ids))
            .order(payment_line_items::id.asc())
            .load::<PaymentLineItemEntity>(&mut conn)?;

        Ok(rows)
    }

    async fn mark_eft_invoices_overdue(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let unpaid: Vec<&str> = InvoiceStatus::unpaid()
            .iter()
            .map(|status| status.as_str())
            .collect();

        let updated = update(
            invoices::table
                .filter(invoices::payment_method_code.eq(PaymentMethod::Eft.as_str()))
                .filter(invoices::overdue_date.is_not_null())
                .filter(invoices::overdue_date.lt(cutoff))
                .filter(invoices::invoice_status_code.eq_any(unpaid)),
        )
        .set(invoices::invoice_status_code.eq(InvoiceStatus::Overdue.as_str()))
        .execute(&mut conn)?;

        Ok(updated)
    }
}
