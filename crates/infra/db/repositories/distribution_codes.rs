use anyhow::Result;
use async_trait::async_trait;
use diesel::{OptionalExtension, RunQueryDsl, prelude::*};
use std::sync::Arc;

use crate::{
    domain::{
        entities::distribution_codes::DistributionCodeEntity,
        repositories::distribution_codes::DistributionCodeRepository,
    },
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::distribution_codes},
};

pub struct DistributionCodePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl DistributionCodePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl DistributionCodeRepository for DistributionCodePostgres {
    async fn find_by_id(
        &self,
        distribution_code_id: i64,
    ) -> Result<Option<DistributionCodeEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let code = distribution_codes::table
            .filter(distribution_codes::distribution_code_id.eq(distribution_code_id))
            .first::<DistributionCodeEntity>(&mut conn)
            .optional()?;

        Ok(code)
    }
}
