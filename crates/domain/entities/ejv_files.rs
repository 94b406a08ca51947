use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::ejv_files;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = ejv_files)]
pub struct EjvFileEntity {
    pub id: i64,
    pub file_ref: String,
    pub is_distribution: bool,
    pub disbursement_status_code: Option<String>,
    pub created_on: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ejv_files)]
pub struct InsertEjvFileEntity {
    pub file_ref: String,
    pub is_distribution: bool,
    pub disbursement_status_code: Option<String>,
}
