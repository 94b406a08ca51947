use diesel::prelude::*;

use crate::infra::db::postgres::schema::distribution_codes;

/// General-ledger coordinate set identifying where revenue is debited or
/// credited. `disbursement_distribution_code_id` points at the paired
/// partner-side (credit) code used when revenue is disbursed.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = distribution_codes)]
#[diesel(primary_key(distribution_code_id))]
pub struct DistributionCodeEntity {
    pub distribution_code_id: i64,
    pub client: String,
    pub responsibility_centre: String,
    pub service_line: String,
    pub stob: String,
    pub project_code: String,
    pub disbursement_distribution_code_id: Option<i64>,
}
