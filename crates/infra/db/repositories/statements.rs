use anyhow::Result;
use async_trait::async_trait;
use diesel::{OptionalExtension, RunQueryDsl, prelude::*};
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::{
    domain::{
        entities::{invoices::InvoiceEntity, statements::StatementEntity},
        repositories::statements::StatementRepository,
        value_objects::enums::invoice_statuses::InvoiceStatus,
    },
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{invoices, statement_invoices, statement_recipients, statements},
    },
};

pub struct StatementPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl StatementPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }

    /// Unpaid statuses for notification queries. OVERDUE is included because
    /// the overdue sweep runs before notification and would otherwise hide
    /// every invoice the sweep just flipped.
    fn unpaid_statuses() -> Vec<&'static str> {
        InvoiceStatus::unpaid()
            .iter()
            .map(|status| status.as_str())
            .chain(std::iter::once(InvoiceStatus::Overdue.as_str()))
            .collect()
    }
}

#[async_trait]
impl StatementRepository for StatementPostgres {
    async fn find_most_recent_by_frequency(
        &self,
        payment_account_id: i64,
        frequency: String,
    ) -> Result<Option<StatementEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let statement = statements::table
            .filter(statements::payment_account_id.eq(payment_account_id))
            .filter(statements::frequency.eq(frequency))
            .order(statements::to_date.desc())
            .first::<StatementEntity>(&mut conn)
            .optional()?;

        Ok(statement)
    }

    async fn find_most_overdue_unpaid_invoice(
        &self,
        statement_id: i64,
    ) -> Result<Option<InvoiceEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let invoice = invoices::table
            .inner_join(
                statement_invoices::table
                    .on(statement_invoices::invoice_id.eq(invoices::id)),
            )
            .filter(statement_invoices::statement_id.eq(statement_id))
            .filter(invoices::invoice_status_code.eq_any(Self::unpaid_statuses()))
            .filter(invoices::overdue_date.is_not_null())
            .order(invoices::overdue_date.asc())
            .select(InvoiceEntity::as_select())
            .first::<InvoiceEntity>(&mut conn)
            .optional()?;

        Ok(invoice)
    }

    async fn find_unpaid_invoices(&self, statement_id: i64) -> Result<Vec<InvoiceEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = invoices::table
            .inner_join(
                statement_invoices::table
                    .on(statement_invoices::invoice_id.eq(invoices::id)),
            )
            .filter(statement_invoices::statement_id.eq(statement_id))
            .filter(invoices::invoice_status_code.eq_any(Self::unpaid_statuses()))
            .order(invoices::id.asc())
            .select(InvoiceEntity::as_select())
            .load::<InvoiceEntity>(&mut conn)?;

        Ok(rows)
    }

    async fn total_due(&self, statement_id: i64) -> Result<Decimal> {
        let unpaid = self.find_unpaid_invoices(statement_id).await?;

        Ok(unpaid
            .iter()
            .fold(Decimal::ZERO, |acc, invoice| acc + invoice.total - invoice.paid))
    }

    async fn find_recipient_emails(&self, payment_account_id: i64) -> Result<Vec<String>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let emails = statement_recipients::table
            .filter(statement_recipients::payment_account_id.eq(payment_account_id))
            .select(statement_recipients::email)
            .load::<String>(&mut conn)?;

        Ok(emails)
    }
}
