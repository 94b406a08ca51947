use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{Connection, OptionalExtension, RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::payment_transactions::{
            InsertPaymentTransactionEntity, PaymentTransactionEntity,
        },
        repositories::payment_transactions::PaymentTransactionRepository,
        value_objects::enums::{
            payment_statuses::PaymentStatus, transaction_statuses::TransactionStatus,
        },
    },
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{payment_transactions, payments},
    },
};

pub struct PaymentTransactionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PaymentTransactionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PaymentTransactionRepository for PaymentTransactionPostgres {
    async fn create(
        &self,
        transaction: InsertPaymentTransactionEntity,
    ) -> Result<PaymentTransactionEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let created = insert_into(payment_transactions::table)
            .values(&transaction)
            .get_result::<PaymentTransactionEntity>(&mut conn)?;

        Ok(created)
    }

    async fn find_by_id_and_payment_id(
        &self,
        transaction_id: Uuid,
        payment_id: i64,
    ) -> Result<Option<PaymentTransactionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let transaction = payment_transactions::table
            .filter(payment_transactions::id.eq(transaction_id))
            .filter(payment_transactions::payment_id.eq(payment_id))
            .first::<PaymentTransactionEntity>(&mut conn)
            .optional()?;

        Ok(transaction)
    }

    async fn find_active_by_payment_id(
        &self,
        payment_id: i64,
    ) -> Result<Option<PaymentTransactionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let transaction = payment_transactions::table
            .filter(payment_transactions::payment_id.eq(payment_id))
            .filter(payment_transactions::status_code.eq(TransactionStatus::Created.as_str()))
            .first::<PaymentTransactionEntity>(&mut conn)
            .optional()?;

        Ok(transaction)
    }

    async fn find_by_payment_id(
        &self,
        payment_id: i64,
    ) -> Result<Vec<PaymentTransactionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let transactions = payment_transactions::table
            .filter(payment_transactions::payment_id.eq(payment_id))
            .order(payment_transactions::start_time.desc())
            .load::<PaymentTransactionEntity>(&mut conn)?;

        Ok(transactions)
    }

    async fn complete_with_payment(
        &self,
        transaction_id: Uuid,
        payment_id: i64,
        end_time: DateTime<Utc>,
    ) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = conn.transaction::<usize, diesel::result::Error, _>(|conn| {
            let rows = update(
                payment_transactions::table
                    .filter(payment_transactions::id.eq(transaction_id))
                    .filter(
                        payment_transactions::status_code
                            .eq(TransactionStatus::Created.as_str()),
                    ),
            )
            .set((
                payment_transactions::status_code.eq(TransactionStatus::Completed.as_str()),
                payment_transactions::end_time.eq(Some(end_time)),
            ))
            .execute(conn)?;

            // Lost the race against a concurrent finalization; leave the
            // payment untouched.
            if rows == 0 {
                return Ok(0);
            }

            update(payments::table.filter(payments::id.eq(payment_id)))
                .set((
                    payments::payment_status_code.eq(PaymentStatus::Completed.as_str()),
                    payments::updated_at.eq(Some(Utc::now())),
                ))
                .execute(conn)?;

            Ok(rows)
        })?;

        Ok(updated)
    }

    async fn mark_failed(
        &self,
        transaction_id: Uuid,
        end_time: DateTime<Utc>,
        gateway_reason_code: Option<String>,
    ) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = update(
            payment_transactions::table
                .filter(payment_transactions::id.eq(transaction_id))
                .filter(
                    payment_transactions::status_code.eq(TransactionStatus::Created.as_str()),
                ),
        )
        .set((
            payment_transactions::status_code.eq(TransactionStatus::Failed.as_str()),
            payment_transactions::end_time.eq(Some(end_time)),
            payment_transactions::gateway_reason_code.eq(gateway_reason_code),
        ))
        .execute(&mut conn)?;

        Ok(rows)
    }

    async fn set_gateway_reason_code(
        &self,
        transaction_id: Uuid,
        gateway_reason_code: String,
    ) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = update(
            payment_transactions::table
                .filter(payment_transactions::id.eq(transaction_id))
                .filter(
                    payment_transactions::status_code.eq(TransactionStatus::Created.as_str()),
                ),
        )
        .set(payment_transactions::gateway_reason_code.eq(Some(gateway_reason_code)))
        .execute(&mut conn)?;

        Ok(rows)
    }
}
