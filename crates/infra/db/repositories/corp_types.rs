use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, prelude::*};
use std::sync::Arc;

use crate::{
    domain::{
        entities::corp_types::CorpTypeEntity, repositories::corp_types::CorpTypeRepository,
    },
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::corp_types},
};

pub struct CorpTypePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl CorpTypePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CorpTypeRepository for CorpTypePostgres {
    async fn find_by_batch_type(&self, batch_type: String) -> Result<Vec<CorpTypeEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let partners = corp_types::table
            .filter(corp_types::batch_type.eq(batch_type))
            .order(corp_types::code.asc())
            .load::<CorpTypeEntity>(&mut conn)?;

        Ok(partners)
    }
}
