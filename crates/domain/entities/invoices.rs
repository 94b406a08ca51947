use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

use crate::infra::db::postgres::schema::invoices;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = invoices)]
pub struct InvoiceEntity {
    pub id: i64,
    pub invoice_status_code: String,
    pub payment_account_id: i64,
    pub corp_type_code: String,
    pub payment_method_code: String,
    pub disbursement_status_code: Option<String>,
    pub overdue_date: Option<DateTime<Utc>>,
    pub total: Decimal,
    pub paid: Decimal,
    pub created_at: DateTime<Utc>,
}
