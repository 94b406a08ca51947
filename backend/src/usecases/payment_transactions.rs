use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use crates::{
    domain::{
        entities::payment_transactions::{
            InsertPaymentTransactionEntity, PaymentTransactionEntity,
        },
        repositories::{
            payment_transactions::PaymentTransactionRepository, payments::PaymentRepository,
        },
        value_objects::enums::{
            payment_statuses::PaymentStatus, transaction_statuses::TransactionStatus,
        },
    },
    payments::gateway_client::{CaptureOutcome, GatewayClient, GatewayError},
};
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Reason code stored on a transaction while the gateway is unreachable.
pub const SERVICE_UNAVAILABLE: &str = "SERVICE_UNAVAILABLE";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// URL of the provider's hosted payment page for the payment.
    fn hosted_payment_url(&self, payment_id: i64, return_url: &str) -> String;

    async fn capture(&self, receipt_number: &str) -> Result<CaptureOutcome, GatewayError>;
}

#[async_trait]
impl PaymentGateway for GatewayClient {
    fn hosted_payment_url(&self, payment_id: i64, return_url: &str) -> String {
        self.hosted_payment_url(payment_id, return_url)
    }

    async fn capture(&self, receipt_number: &str) -> Result<CaptureOutcome, GatewayError> {
        self.capture(receipt_number).await
    }
}

#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("payment not found")]
    PaymentNotFound,
    #[error("transaction not found")]
    TransactionNotFound,
    #[error("payment is already completed")]
    PaymentAlreadyCompleted,
    #[error("a transaction is already in progress for this payment")]
    TransactionInProgress,
    #[error("transaction is already finalized")]
    TransactionAlreadyFinalized,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl TransactionError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            TransactionError::PaymentNotFound | TransactionError::TransactionNotFound => {
                StatusCode::NOT_FOUND
            }
            TransactionError::PaymentAlreadyCompleted
            | TransactionError::TransactionInProgress
            | TransactionError::TransactionAlreadyFinalized => StatusCode::BAD_REQUEST,
            TransactionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, TransactionError>;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTransactionRequest {
    pub client_return_url: String,
    pub gateway_return_url: String,
}

/// Drives a payment transaction's lifecycle against the external gateway.
///
/// State machine: `CREATED -> COMPLETED` on a captured receipt,
/// `CREATED -> FAILED` on a missing or declined receipt. While the gateway
/// is unreachable the transaction stays `CREATED` with a transient reason
/// code so the caller can retry `update` with the same transaction id; this
/// engine never retries or sleeps on its own.
pub struct PaymentTransactionUseCase<T, P, G>
where
    T: PaymentTransactionRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    transaction_repo: Arc<T>,
    payment_repo: Arc<P>,
    gateway: Arc<G>,
}

impl<T, P, G> PaymentTransactionUseCase<T, P, G>
where
    T: PaymentTransactionRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    pub fn new(transaction_repo: Arc<T>, payment_repo: Arc<P>, gateway: Arc<G>) -> Self {
        Self {
            transaction_repo,
            payment_repo,
            gateway,
        }
    }

    pub async fn create(
        &self,
        payment_id: i64,
        request: CreateTransactionRequest,
    ) -> UseCaseResult<PaymentTransactionEntity> {
        info!(payment_id, "transactions: create requested");

        let payment = self
            .payment_repo
            .find_by_id(payment_id)
            .await
            .map_err(|err| {
                error!(payment_id, db_error = ?err, "transactions: failed to load payment");
                TransactionError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(payment_id, "transactions: payment not found");
                TransactionError::PaymentNotFound
            })?;

        if PaymentStatus::from_str(&payment.payment_status_code)
            == Some(PaymentStatus::Completed)
        {
            warn!(payment_id, "transactions: payment is already completed");
            return Err(TransactionError::PaymentAlreadyCompleted);
        }

        if let Some(active) = self
            .transaction_repo
            .find_active_by_payment_id(payment_id)
            .await
            .map_err(|err| {
                error!(
                    payment_id,
                    db_error = ?err,
                    "transactions: failed to look up active transaction"
                );
                TransactionError::Internal(err)
            })?
        {
            warn!(
                payment_id,
                transaction_id = %active.id,
                "transactions: a transaction is already in progress"
            );
            return Err(TransactionError::TransactionInProgress);
        }

        let gateway_url = self
            .gateway
            .hosted_payment_url(payment_id, &request.gateway_return_url);

        let created = self
            .transaction_repo
            .create(InsertPaymentTransactionEntity {
                id: Uuid::new_v4(),
                payment_id,
                status_code: TransactionStatus::Created.to_string(),
                client_return_url: request.client_return_url,
                gateway_url: Some(gateway_url),
                gateway_reason_code: None,
                start_time: Utc::now(),
                end_time: None,
            })
            .await
            .map_err(|err| {
                error!(payment_id, db_error = ?err, "transactions: failed to persist transaction");
                TransactionError::Internal(err)
            })?;

        info!(
            payment_id,
            transaction_id = %created.id,
            "transactions: transaction created"
        );

        Ok(created)
    }

    /// Reconciles one in-flight transaction. A missing receipt finalizes it
    /// as FAILED; a captured receipt completes transaction and payment
    /// atomically; an unreachable gateway leaves it CREATED and retryable.
    pub async fn update(
        &self,
        payment_id: i64,
        transaction_id: Uuid,
        receipt_number: Option<String>,
    ) -> UseCaseResult<PaymentTransactionEntity> {
        let transaction = self.load(transaction_id, payment_id).await?;

        match TransactionStatus::from_str(&transaction.status_code) {
            Some(TransactionStatus::Created) => {}
            _ => {
                warn!(
                    payment_id,
                    transaction_id = %transaction_id,
                    status = %transaction.status_code,
                    "transactions: update on a finalized transaction"
                );
                return Err(TransactionError::TransactionAlreadyFinalized);
            }
        }

        let receipt = receipt_number
            .as_deref()
            .map(str::trim)
            .filter(|receipt| !receipt.is_empty());

        let Some(receipt) = receipt else {
            let rows = self
                .transaction_repo
                .mark_failed(transaction_id, Utc::now(), None)
                .await
                .map_err(|err| {
                    error!(
                        payment_id,
                        transaction_id = %transaction_id,
                        db_error = ?err,
                        "transactions: failed to mark transaction failed"
                    );
                    TransactionError::Internal(err)
                })?;
            if rows == 0 {
                return Err(TransactionError::TransactionAlreadyFinalized);
            }
            info!(
                payment_id,
                transaction_id = %transaction_id,
                "transactions: no receipt supplied; transaction failed"
            );
            return self.load(transaction_id, payment_id).await;
        };

        match self.gateway.capture(receipt).await {
            Ok(outcome) if outcome.paid => {
                let rows = self
                    .transaction_repo
                    .complete_with_payment(transaction_id, payment_id, Utc::now())
                    .await
                    .map_err(|err| {
                        error!(
                            payment_id,
                            transaction_id = %transaction_id,
                            db_error = ?err,
                            "transactions: failed to complete transaction"
                        );
                        TransactionError::Internal(err)
                    })?;
                if rows == 0 {
                    return Err(TransactionError::TransactionAlreadyFinalized);
                }
                info!(
                    payment_id,
                    transaction_id = %transaction_id,
                    "transactions: transaction and payment completed"
                );
            }
            Ok(outcome) => {
                let rows = self
                    .transaction_repo
                    .mark_failed(transaction_id, Utc::now(), outcome.reason_code.clone())
                    .await
                    .map_err(|err| {
                        error!(
                            payment_id,
                            transaction_id = %transaction_id,
                            db_error = ?err,
                            "transactions: failed to mark transaction failed"
                        );
                        TransactionError::Internal(err)
                    })?;
                if rows == 0 {
                    return Err(TransactionError::TransactionAlreadyFinalized);
                }
                warn!(
                    payment_id,
                    transaction_id = %transaction_id,
                    reason_code = ?outcome.reason_code,
                    "transactions: gateway declined the receipt; transaction failed"
                );
            }
            Err(GatewayError::Unavailable(reason)) => {
                // Transient outage: record the reason code but leave the
                // transaction CREATED so the caller can retry this update.
                warn!(
                    payment_id,
                    transaction_id = %transaction_id,
                    error = %reason,
                    "transactions: gateway unreachable; transaction stays retryable"
                );
                self.transaction_repo
                    .set_gateway_reason_code(transaction_id, SERVICE_UNAVAILABLE.to_string())
                    .await
                    .map_err(|err| {
                        error!(
                            payment_id,
                            transaction_id = %transaction_id,
                            db_error = ?err,
                            "transactions: failed to record gateway reason code"
                        );
                        TransactionError::Internal(err)
                    })?;
            }
            Err(GatewayError::Other(err)) => {
                error!(
                    payment_id,
                    transaction_id = %transaction_id,
                    error = ?err,
                    "transactions: gateway capture failed"
                );
                return Err(TransactionError::Internal(err));
            }
        }

        self.load(transaction_id, payment_id).await
    }

    pub async fn find_by_id(
        &self,
        payment_id: i64,
        transaction_id: Uuid,
    ) -> UseCaseResult<PaymentTransactionEntity> {
        self.load(transaction_id, payment_id).await
    }

    pub async fn find_by_payment_id(
        &self,
        payment_id: i64,
    ) -> UseCaseResult<Vec<PaymentTransactionEntity>> {
        self.transaction_repo
            .find_by_payment_id(payment_id)
            .await
            .map_err(|err| {
                error!(payment_id, db_error = ?err, "transactions: failed to list transactions");
                TransactionError::Internal(err)
            })
    }

    pub async fn find_active_by_payment_id(
        &self,
        payment_id: i64,
    ) -> UseCaseResult<Option<PaymentTransactionEntity>> {
        self.transaction_repo
            .find_active_by_payment_id(payment_id)
            .await
            .map_err(|err| {
                error!(
                    payment_id,
                    db_error = ?err,
                    "transactions: failed to look up active transaction"
                );
                TransactionError::Internal(err)
            })
    }

    async fn load(
        &self,
        transaction_id: Uuid,
        payment_id: i64,
    ) -> UseCaseResult<PaymentTransactionEntity> {
        self.transaction_repo
            .find_by_id_and_payment_id(transaction_id, payment_id)
            .await
            .map_err(|err| {
                error!(
                    payment_id,
                    transaction_id = %transaction_id,
                    db_error = ?err,
                    "transactions: failed to load transaction"
                );
                TransactionError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(
                    payment_id,
                    transaction_id = %transaction_id,
                    "transactions: transaction not found"
                );
                TransactionError::TransactionNotFound
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crates::domain::entities::payments::PaymentEntity;
    use crates::domain::repositories::payment_transactions::MockPaymentTransactionRepository;
    use crates::domain::repositories::payments::MockPaymentRepository;

    fn payment(status: PaymentStatus) -> PaymentEntity {
        PaymentEntity {
            id: 10,
            payment_status_code: status.to_string(),
            payment_account_id: 1,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn transaction(id: Uuid, status: TransactionStatus) -> PaymentTransactionEntity {
        PaymentTransactionEntity {
            id,
            payment_id: 10,
            status_code: status.to_string(),
            client_return_url: "https://client.example/return".to_string(),
            gateway_url: Some("https://gateway.example/web/payments/10".to_string()),
            gateway_reason_code: None,
            start_time: Utc::now(),
            end_time: None,
        }
    }

    fn usecase(
        transaction_repo: MockPaymentTransactionRepository,
        payment_repo: MockPaymentRepository,
        gateway: MockPaymentGateway,
    ) -> PaymentTransactionUseCase<
        MockPaymentTransactionRepository,
        MockPaymentRepository,
        MockPaymentGateway,
    > {
        PaymentTransactionUseCase::new(
            Arc::new(transaction_repo),
            Arc::new(payment_repo),
            Arc::new(gateway),
        )
    }

    fn create_request() -> CreateTransactionRequest {
        CreateTransactionRequest {
            client_return_url: "https://client.example/return".to_string(),
            gateway_return_url: "https://client.example/gateway-return".to_string(),
        }
    }

    #[tokio::test]
    async fn create_persists_a_created_transaction() {
        let mut transaction_repo = MockPaymentTransactionRepository::new();
        let mut payment_repo = MockPaymentRepository::new();
        let mut gateway = MockPaymentGateway::new();

        payment_repo
            .expect_find_by_id()
            .returning(|_| Ok(Some(payment(PaymentStatus::Created))));
        transaction_repo
            .expect_find_active_by_payment_id()
            .returning(|_| Ok(None));
        gateway
            .expect_hosted_payment_url()
            .returning(|payment_id, _| format!("https://gateway.example/web/payments/{payment_id}"));
        transaction_repo.expect_create().returning(|insert| {
            assert_eq!(insert.status_code, "CREATED");
            assert!(insert.end_time.is_none());
            assert!(insert.gateway_url.is_some());
            Ok(PaymentTransactionEntity {
                id: insert.id,
                payment_id: insert.payment_id,
                status_code: insert.status_code,
                client_return_url: insert.client_return_url,
                gateway_url: insert.gateway_url,
                gateway_reason_code: insert.gateway_reason_code,
                start_time: insert.start_time,
                end_time: insert.end_time,
            })
        });

        let created = usecase(transaction_repo, payment_repo, gateway)
            .create(10, create_request())
            .await
            .expect("create should succeed");

        assert_eq!(created.payment_id, 10);
        assert_eq!(created.status_code, "CREATED");
        assert!(created.start_time <= Utc::now());
    }

    #[tokio::test]
    async fn create_fails_for_unknown_payment() {
        let mut payment_repo = MockPaymentRepository::new();
        payment_repo.expect_find_by_id().returning(|_| Ok(None));

        let result = usecase(
            MockPaymentTransactionRepository::new(),
            payment_repo,
            MockPaymentGateway::new(),
        )
        .create(999, create_request())
        .await;

        assert!(matches!(result, Err(TransactionError::PaymentNotFound)));
    }

    #[tokio::test]
    async fn create_fails_for_completed_payment() {
        let mut payment_repo = MockPaymentRepository::new();
        payment_repo
            .expect_find_by_id()
            .returning(|_| Ok(Some(payment(PaymentStatus::Completed))));

        let result = usecase(
            MockPaymentTransactionRepository::new(),
            payment_repo,
            MockPaymentGateway::new(),
        )
        .create(10, create_request())
        .await;

        assert!(matches!(result, Err(TransactionError::PaymentAlreadyCompleted)));
    }

    #[tokio::test]
    async fn create_fails_while_another_transaction_is_in_progress() {
        let mut transaction_repo = MockPaymentTransactionRepository::new();
        let mut payment_repo = MockPaymentRepository::new();

        payment_repo
            .expect_find_by_id()
            .returning(|_| Ok(Some(payment(PaymentStatus::Created))));
        transaction_repo
            .expect_find_active_by_payment_id()
            .returning(|_| Ok(Some(transaction(Uuid::new_v4(), TransactionStatus::Created))));
        transaction_repo.expect_create().times(0);

        let result = usecase(transaction_repo, payment_repo, MockPaymentGateway::new())
            .create(10, create_request())
            .await;

        assert!(matches!(result, Err(TransactionError::TransactionInProgress)));
    }

    #[tokio::test]
    async fn update_without_receipt_marks_the_transaction_failed() {
        let transaction_id = Uuid::new_v4();
        let mut transaction_repo = MockPaymentTransactionRepository::new();
        let mut gateway = MockPaymentGateway::new();

        let mut loaded = vec![
            transaction(transaction_id, TransactionStatus::Created),
            transaction(transaction_id, TransactionStatus::Failed),
        ]
        .into_iter();
        transaction_repo
            .expect_find_by_id_and_payment_id()
            .times(2)
            .returning(move |_, _| Ok(loaded.next()));
        transaction_repo
            .expect_mark_failed()
            .withf(|_, _, reason| reason.is_none())
            .times(1)
            .returning(|_, _, _| Ok(1));
        transaction_repo.expect_complete_with_payment().times(0);
        gateway.expect_capture().times(0);

        let updated = usecase(transaction_repo, MockPaymentRepository::new(), gateway)
            .update(10, transaction_id, None)
            .await
            .expect("update should succeed");

        assert_eq!(updated.status_code, "FAILED");
    }

    #[tokio::test]
    async fn update_completes_transaction_and_payment_on_capture() {
        let transaction_id = Uuid::new_v4();
        let mut transaction_repo = MockPaymentTransactionRepository::new();
        let mut gateway = MockPaymentGateway::new();

        let mut loaded = vec![
            transaction(transaction_id, TransactionStatus::Created),
            transaction(transaction_id, TransactionStatus::Completed),
        ]
        .into_iter();
        transaction_repo
            .expect_find_by_id_and_payment_id()
            .times(2)
            .returning(move |_, _| Ok(loaded.next()));
        gateway.expect_capture().times(1).returning(|_| {
            Ok(CaptureOutcome {
                paid: true,
                reason_code: None,
            })
        });
        transaction_repo
            .expect_complete_with_payment()
            .times(1)
            .returning(|_, _, _| Ok(1));
        transaction_repo.expect_mark_failed().times(0);

        let updated = usecase(transaction_repo, MockPaymentRepository::new(), gateway)
            .update(10, transaction_id, Some("123451".to_string()))
            .await
            .expect("update should succeed");

        assert_eq!(updated.status_code, "COMPLETED");
    }

    #[tokio::test]
    async fn update_marks_failed_when_gateway_declines() {
        let transaction_id = Uuid::new_v4();
        let mut transaction_repo = MockPaymentTransactionRepository::new();
        let mut gateway = MockPaymentGateway::new();

        let mut loaded = vec![
            transaction(transaction_id, TransactionStatus::Created),
            transaction(transaction_id, TransactionStatus::Failed),
        ]
        .into_iter();
        transaction_repo
            .expect_find_by_id_and_payment_id()
            .times(2)
            .returning(move |_, _| Ok(loaded.next()));
        gateway.expect_capture().returning(|_| {
            Ok(CaptureOutcome {
                paid: false,
                reason_code: Some("DECLINED".to_string()),
            })
        });
        transaction_repo
            .expect_mark_failed()
            .withf(|_, _, reason| reason.as_deref() == Some("DECLINED"))
            .times(1)
            .returning(|_, _, _| Ok(1));
        transaction_repo.expect_complete_with_payment().times(0);

        let updated = usecase(transaction_repo, MockPaymentRepository::new(), gateway)
            .update(10, transaction_id, Some("123451".to_string()))
            .await
            .expect("update should succeed");

        assert_eq!(updated.status_code, "FAILED");
    }

    #[tokio::test]
    async fn repeated_updates_stay_retryable_while_gateway_is_down() {
        let transaction_id = Uuid::new_v4();
        let mut transaction_repo = MockPaymentTransactionRepository::new();
        let mut gateway = MockPaymentGateway::new();

        transaction_repo
            .expect_find_by_id_and_payment_id()
            .returning(move |_, _| {
                let mut entity = transaction(transaction_id, TransactionStatus::Created);
                entity.gateway_reason_code = Some(SERVICE_UNAVAILABLE.to_string());
                Ok(Some(entity))
            });
        gateway.expect_capture().times(2).returning(|_| {
            Err(GatewayError::Unavailable("connection refused".to_string()))
        });
        transaction_repo
            .expect_set_gateway_reason_code()
            .withf(|_, reason| reason == SERVICE_UNAVAILABLE)
            .times(2)
            .returning(|_, _| Ok(1));
        transaction_repo.expect_mark_failed().times(0);
        transaction_repo.expect_complete_with_payment().times(0);

        let usecase = usecase(transaction_repo, MockPaymentRepository::new(), gateway);

        for _ in 0..2 {
            let updated = usecase
                .update(10, transaction_id, Some("123451".to_string()))
                .await
                .expect("update should not error while the gateway is down");
            assert_eq!(updated.status_code, "CREATED");
            assert_eq!(updated.gateway_reason_code.as_deref(), Some(SERVICE_UNAVAILABLE));
        }
    }

    #[tokio::test]
    async fn update_on_finalized_transaction_fails() {
        let transaction_id = Uuid::new_v4();
        let mut transaction_repo = MockPaymentTransactionRepository::new();

        transaction_repo
            .expect_find_by_id_and_payment_id()
            .returning(move |_, _| {
                Ok(Some(transaction(transaction_id, TransactionStatus::Completed)))
            });
        transaction_repo.expect_mark_failed().times(0);

        let result = usecase(
            transaction_repo,
            MockPaymentRepository::new(),
            MockPaymentGateway::new(),
        )
        .update(10, transaction_id, Some("123451".to_string()))
        .await;

        assert!(matches!(result, Err(TransactionError::TransactionAlreadyFinalized)));
    }

    #[tokio::test]
    async fn find_by_id_fails_for_unknown_combination() {
        let mut transaction_repo = MockPaymentTransactionRepository::new();
        transaction_repo
            .expect_find_by_id_and_payment_id()
            .returning(|_, _| Ok(None));

        let result = usecase(
            transaction_repo,
            MockPaymentRepository::new(),
            MockPaymentGateway::new(),
        )
        .find_by_id(10, Uuid::new_v4())
        .await;

        assert!(matches!(result, Err(TransactionError::TransactionNotFound)));
    }
}
