use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::payment_transactions;

/// One attempt to settle a payment against the external gateway. A payment
/// has at most one transaction in `CREATED` status at any time.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = payment_transactions)]
pub struct PaymentTransactionEntity {
    pub id: Uuid,
    pub payment_id: i64,
    pub status_code: String,
    pub client_return_url: String,
    pub gateway_url: Option<String>,
    pub gateway_reason_code: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payment_transactions)]
pub struct InsertPaymentTransactionEntity {
    pub id: Uuid,
    pub payment_id: i64,
    pub status_code: String,
    pub client_return_url: String,
    pub gateway_url: Option<String>,
    pub gateway_reason_code: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}
