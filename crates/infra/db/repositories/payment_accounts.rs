use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, dsl::exists, prelude::*};
use std::sync::Arc;

use crate::{
    domain::{
        entities::payment_accounts::PaymentAccountEntity,
        repositories::payment_accounts::PaymentAccountRepository,
        value_objects::enums::{
            payment_methods::PaymentMethod, statement_frequencies::StatementFrequency,
        },
    },
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{payment_accounts, statements},
    },
};

pub struct PaymentAccountPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PaymentAccountPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PaymentAccountRepository for PaymentAccountPostgres {
    async fn find_monthly_eft_accounts(&self) -> Result<Vec<PaymentAccountEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let accounts = payment_accounts::table
            .filter(payment_accounts::payment_method.eq(PaymentMethod::Eft.as_str()))
            .filter(exists(
                statements::table
                    .filter(statements::payment_account_id.eq(payment_accounts::id))
                    .filter(statements::frequency.eq(StatementFrequency::Monthly.as_str())),
            ))
            .order(payment_accounts::id.asc())
            .load::<PaymentAccountEntity>(&mut conn)?;

        Ok(accounts)
    }
}
