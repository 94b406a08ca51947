use diesel::prelude::*;

use crate::infra::db::postgres::schema::corp_types;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = corp_types)]
#[diesel(primary_key(code))]
pub struct CorpTypeEntity {
    pub code: String,
    pub description: Option<String>,
    pub batch_type: Option<String>,
}
