use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::payment_accounts;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = payment_accounts)]
pub struct PaymentAccountEntity {
    pub id: i64,
    pub auth_account_id: String,
    pub name: Option<String>,
    pub payment_method: Option<String>,
    pub created_at: DateTime<Utc>,
}
