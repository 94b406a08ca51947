use crate::axum_http::error_responses::AppError;
use crate::usecases::payment_transactions::{
    CreateTransactionRequest, PaymentGateway, PaymentTransactionUseCase,
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use chrono::{DateTime, Utc};
use crates::{
    domain::{
        entities::payment_transactions::PaymentTransactionEntity,
        repositories::{
            payment_transactions::PaymentTransactionRepository, payments::PaymentRepository,
        },
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{
            payment_transactions::PaymentTransactionPostgres, payments::PaymentPostgres,
        },
    },
    payments::gateway_client::GatewayClient,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

pub fn routes(db_pool: Arc<PgPoolSquad>, gateway: Arc<GatewayClient>) -> Router {
    let transaction_repo = PaymentTransactionPostgres::new(Arc::clone(&db_pool));
    let payment_repo = PaymentPostgres::new(Arc::clone(&db_pool));
    let transactions_usecase = PaymentTransactionUseCase::new(
        Arc::new(transaction_repo),
        Arc::new(payment_repo),
        gateway,
    );

    Router::new()
        .route(
            "/:payment_id/transactions",
            post(create_transaction).get(list_transactions),
        )
        .route(
            "/:payment_id/transactions/:transaction_id",
            patch(update_transaction).get(get_transaction),
        )
        .with_state(Arc::new(transactions_usecase))
}

#[derive(Debug, Deserialize)]
pub struct UpdateTransactionRequest {
    pub receipt_number: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub id: Uuid,
    pub payment_id: i64,
    pub status_code: String,
    pub client_return_url: String,
    pub gateway_url: Option<String>,
    pub gateway_reason_code: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

impl From<PaymentTransactionEntity> for TransactionResponse {
    fn from(entity: PaymentTransactionEntity) -> Self {
        Self {
            id: entity.id,
            payment_id: entity.payment_id,
            status_code: entity.status_code,
            client_return_url: entity.client_return_url,
            gateway_url: entity.gateway_url,
            gateway_reason_code: entity.gateway_reason_code,
            start_time: entity.start_time,
            end_time: entity.end_time,
        }
    }
}

pub async fn create_transaction<T, P, G>(
    State(transactions_usecase): State<Arc<PaymentTransactionUseCase<T, P, G>>>,
    Path(payment_id): Path<i64>,
    Json(payload): Json<CreateTransactionRequest>,
) -> impl IntoResponse
where
    T: PaymentTransactionRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    if payload.client_return_url.trim().is_empty() {
        return AppError::BadRequest("client_return_url is required".to_string())
            .into_response();
    }

    match transactions_usecase.create(payment_id, payload).await {
        Ok(transaction) => (
            StatusCode::CREATED,
            Json(TransactionResponse::from(transaction)),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn update_transaction<T, P, G>(
    State(transactions_usecase): State<Arc<PaymentTransactionUseCase<T, P, G>>>,
    Path((payment_id, transaction_id)): Path<(i64, Uuid)>,
    Json(payload): Json<UpdateTransactionRequest>,
) -> impl IntoResponse
where
    T: PaymentTransactionRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    match transactions_usecase
        .update(payment_id, transaction_id, payload.receipt_number)
        .await
    {
        Ok(transaction) => (
            StatusCode::OK,
            Json(TransactionResponse::from(transaction)),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn list_transactions<T, P, G>(
    State(transactions_usecase): State<Arc<PaymentTransactionUseCase<T, P, G>>>,
    Path(payment_id): Path<i64>,
) -> impl IntoResponse
where
    T: PaymentTransactionRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    match transactions_usecase.find_by_payment_id(payment_id).await {
        Ok(transactions) => {
            let body: Vec<TransactionResponse> = transactions
                .into_iter()
                .map(TransactionResponse::from)
                .collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn get_transaction<T, P, G>(
    State(transactions_usecase): State<Arc<PaymentTransactionUseCase<T, P, G>>>,
    Path((payment_id, transaction_id)): Path<(i64, Uuid)>,
) -> impl IntoResponse
where
    T: PaymentTransactionRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    match transactions_usecase.find_by_id(payment_id, transaction_id).await {
        Ok(transaction) => (
            StatusCode::OK,
            Json(TransactionResponse::from(transaction)),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}
