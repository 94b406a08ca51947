use diesel::prelude::*;

use crate::infra::db::postgres::schema::cfs_accounts;

/// Central-finance-system account record mirrored per payment account.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = cfs_accounts)]
pub struct CfsAccountEntity {
    pub id: i64,
    pub account_id: i64,
    pub cfs_account_number: String,
    pub status: String,
}
