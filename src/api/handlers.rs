use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};
use tracing::debug;

use crate::application::AppError;
use crate::domain::{cents_from_decimal, AccountId};

use super::types::{
    AccountResponse, CreateAccountRequest, DepositResponse, HistoryQuery, TransactionRequest,
    TransactionResponse, WithdrawResponse,
};
use super::AppState;

/// GET /
/// Service name, version and the available endpoints
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Banking Ledger Service",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "create_account": "/accounts/create",
            "deposit": "/accounts/deposit",
            "withdraw": "/accounts/withdraw",
            "balance": "/accounts/{account_id}/balance",
            "transactions": "/accounts/{account_id}/transactions"
        }
    }))
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// POST /accounts/create
pub async fn create_account(
    State(service): State<AppState>,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<Json<AccountResponse>, AppError> {
    let Json(request) = payload?;
    debug!("API /accounts/create for {:?}", request.holder_name);

    let initial_balance = cents_from_decimal(request.initial_balance)?;
    let account = service
        .create_account(&request.holder_name, initial_balance)
        .await?;

    Ok(Json(account.into()))
}

/// POST /accounts/deposit
pub async fn deposit(
    State(service): State<AppState>,
    payload: Result<Json<TransactionRequest>, JsonRejection>,
) -> Result<Json<DepositResponse>, AppError> {
    let Json(request) = payload?;
    debug!("API /accounts/deposit {} ({})", request.account_id, request.amount);

    let amount = cents_from_decimal(request.amount)?;
    let transaction = service.deposit(request.account_id, amount).await?;

    Ok(Json(transaction.into()))
}

/// POST /accounts/withdraw
pub async fn withdraw(
    State(service): State<AppState>,
    payload: Result<Json<TransactionRequest>, JsonRejection>,
) -> Result<Json<WithdrawResponse>, AppError> {
    let Json(request) = payload?;
    debug!("API /accounts/withdraw {} ({})", request.account_id, request.amount);

    let amount = cents_from_decimal(request.amount)?;
    let transaction = service.withdraw(request.account_id, amount).await?;

    Ok(Json(transaction.into()))
}

/// GET /accounts/{account_id}/balance
pub async fn balance(
    State(service): State<AppState>,
    account_id: Result<Path<AccountId>, PathRejection>,
) -> Result<Json<AccountResponse>, AppError> {
    let Path(account_id) = account_id?;
    debug!("API /accounts/{}/balance", account_id);

    let account = service.get_balance(account_id).await?;
    Ok(Json(account.into()))
}

/// GET /accounts/{account_id}/transactions?limit=N
pub async fn transactions(
    State(service): State<AppState>,
    account_id: Result<Path<AccountId>, PathRejection>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<Vec<TransactionResponse>>, AppError> {
    let Path(account_id) = account_id?;
    let Query(query) = query?;
    debug!("API /accounts/{}/transactions limit={:?}", account_id, query.limit);

    let history = service.transaction_history(account_id, query.limit).await?;
    Ok(Json(history.into_iter().map(Into::into).collect()))
}
