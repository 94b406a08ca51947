use diesel::prelude::*;

use crate::infra::db::postgres::schema::non_sufficient_funds;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = non_sufficient_funds)]
pub struct NonSufficientFundsEntity {
    pub id: i64,
    pub invoice_id: i64,
    pub cfs_account_number: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = non_sufficient_funds)]
pub struct InsertNonSufficientFundsEntity {
    pub invoice_id: i64,
    pub cfs_account_number: String,
    pub description: Option<String>,
}
