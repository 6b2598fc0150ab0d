//! Customer API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use http::StatusCode;

use crate::core::ServerState;
use crate::db::models::{Customer, CustomerCreate, CustomerUpdate};
use crate::db::repository::{CUSTOMER_TABLE, RepoError, parse_record_id};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, require, validate_non_negative, validate_optional_text,
    validate_required_text,
};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, created, ok_with_message};

use shared::models as dto;

/// Map repository failures onto customer error codes
fn customer_error(id: &str) -> impl FnOnce(RepoError) -> AppError + '_ {
    move |e| match e {
        RepoError::NotFound(_) => AppError::customer_not_found(id),
        RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::CustomerMobileExists, msg),
        other => other.into(),
    }
}

fn parse_customer_id(raw: &str) -> AppResult<surrealdb::RecordId> {
    parse_record_id(CUSTOMER_TABLE, raw).map_err(|_| AppError::customer_not_found(raw))
}

/// List all customers (ordered by name)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<Customer>>>> {
    let customers = state.customers().find_all().await?;
    Ok(ok_with_message(customers, "Customers fetched successfully"))
}

/// Get customer by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Customer>>> {
    let record = parse_customer_id(&id)?;
    let customer = state
        .customers()
        .find_by_id(&record)
        .await?
        .ok_or_else(|| AppError::customer_not_found(&id))?;
    Ok(ok_with_message(customer, "Customer fetched successfully"))
}

/// Create a new customer
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<dto::CustomerCreate>,
) -> AppResult<(StatusCode, Json<ApiResponse<Customer>>)> {
    let full_name = require(payload.full_name, "fullName")?;
    let mobile = require(payload.mobile, "mobile")?;
    let base_fat_rate = require(payload.base_fat_rate, "baseFatRate")?;

    validate_required_text(&full_name, "fullName", MAX_NAME_LEN)?;
    validate_required_text(&mobile, "mobile", MAX_SHORT_TEXT_LEN)?;
    validate_non_negative(base_fat_rate, "baseFatRate", ErrorCode::CustomerInvalidRate)?;

    let customer = state
        .customers()
        .create(CustomerCreate {
            full_name: full_name.trim().to_string(),
            mobile: mobile.trim().to_string(),
            base_fat_rate,
            payment_mode: payload.payment_mode.unwrap_or_default(),
        })
        .await
        .map_err(customer_error(&mobile))?;

    tracing::info!(
        customer_id = %customer.id_string(),
        base_fat_rate = customer.base_fat_rate,
        payment_mode = customer.payment_mode.as_str(),
        "Customer created"
    );

    Ok(created(customer, "Customer added successfully"))
}

/// Update a customer; absent fields are kept
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<dto::CustomerUpdate>,
) -> AppResult<Json<ApiResponse<Customer>>> {
    let record = parse_customer_id(&id)?;

    validate_optional_text(&payload.full_name, "fullName", MAX_NAME_LEN)?;
    validate_optional_text(&payload.mobile, "mobile", MAX_SHORT_TEXT_LEN)?;
    if let Some(rate) = payload.base_fat_rate {
        validate_non_negative(rate, "baseFatRate", ErrorCode::CustomerInvalidRate)?;
    }

    // Empty strings keep the stored value
    let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

    let customer = state
        .customers()
        .update(
            &record,
            CustomerUpdate {
                full_name: non_empty(payload.full_name),
                mobile: non_empty(payload.mobile),
                base_fat_rate: payload.base_fat_rate,
                payment_mode: payload.payment_mode,
            },
        )
        .await
        .map_err(customer_error(&id))?;

    tracing::info!(customer_id = %customer.id_string(), "Customer updated");

    Ok(ok_with_message(customer, "Customer updated successfully"))
}

/// Hard delete a customer; milk entries are kept
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let record = parse_customer_id(&id)?;
    if !state.customers().delete(&record).await? {
        return Err(AppError::customer_not_found(&id));
    }

    tracing::info!(customer_id = %record, "Customer deleted");

    Ok(Json(ApiResponse::success_with_message(
        "Customer deleted successfully",
        (),
    )))
}
