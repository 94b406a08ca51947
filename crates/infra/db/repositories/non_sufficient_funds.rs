use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into};
use std::sync::Arc;

use crate::{
    domain::{
        entities::non_sufficient_funds::InsertNonSufficientFundsEntity,
        repositories::non_sufficient_funds::NonSufficientFundsRepository,
    },
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::non_sufficient_funds},
};

pub struct NonSufficientFundsPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl NonSufficientFundsPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl NonSufficientFundsRepository for NonSufficientFundsPostgres {
    async fn create_rows(&self, rows: Vec<InsertNonSufficientFundsEntity>) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        insert_into(non_sufficient_funds::table)
            .values(&rows)
            .execute(&mut conn)?;

        Ok(())
    }
}
