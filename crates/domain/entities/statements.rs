use chrono::NaiveDate;
use diesel::prelude::*;

use crate::infra::db::postgres::schema::statements;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = statements)]
pub struct StatementEntity {
    pub id: i64,
    pub payment_account_id: i64,
    pub frequency: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}
