use anyhow::Result;
use async_trait::async_trait;
use diesel::{OptionalExtension, RunQueryDsl, prelude::*, update};
use std::sync::Arc;

use crate::{
    domain::{
        entities::cfs_accounts::CfsAccountEntity,
        repositories::cfs_accounts::CfsAccountRepository,
        value_objects::enums::cfs_account_statuses::CfsAccountStatus,
    },
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::cfs_accounts},
};

pub struct CfsAccountPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl CfsAccountPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CfsAccountRepository for CfsAccountPostgres {
    async fn find_effective_by_account_id(
        &self,
        payment_account_id: i64,
    ) -> Result<Option<CfsAccountEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let account = cfs_accounts::table
            .filter(cfs_accounts::account_id.eq(payment_account_id))
            .order(cfs_accounts::id.desc())
            .first::<CfsAccountEntity>(&mut conn)
            .optional()?;

        Ok(account)
    }

    async fn freeze_by_account_id(&self, payment_account_id: i64) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = update(
            cfs_accounts::table
                .filter(cfs_accounts::account_id.eq(payment_account_id))
                .filter(cfs_accounts::status.eq(CfsAccountStatus::Active.as_str())),
        )
        .set(cfs_accounts::status.eq(CfsAccountStatus::Freeze.as_str()))
        .execute(&mut conn)?;

        Ok(rows)
    }
}
