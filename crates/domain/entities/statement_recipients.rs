use diesel::prelude::*;

use crate::infra::db::postgres::schema::statement_recipients;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = statement_recipients)]
pub struct StatementRecipientEntity {
    pub id: i64,
    pub payment_account_id: i64,
    pub email: String,
}
