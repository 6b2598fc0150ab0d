//! Milk Entry API Handlers

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use http::StatusCode;
use surrealdb::RecordId;

use crate::auth::CurrentUser;
use crate::billing::{PayoutRow, WeeklySummary, aggregate_payouts, aggregate_week, compute_amount, resolve_week};
use crate::core::ServerState;
use crate::db::models::{Customer, MilkEntry, MilkEntryCreate, MilkEntryDetail};
use crate::db::repository::{CUSTOMER_TABLE, EntryFilter, MILK_ENTRY_TABLE, parse_record_id};
use crate::security_log;
use crate::utils::time::{local_now, parse_bound, parse_date};
use crate::utils::validation::{require, validate_non_negative};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, created, ok_with_message};

use shared::models::{
    CustomerEntriesQuery, MilkEntryQuery, MilkEntryUpdate, Session, WeeklySummaryQuery,
};
use shared::models::MilkEntryCreate as MilkEntryPayload;

fn parse_customer_id(raw: &str) -> AppResult<RecordId> {
    parse_record_id(CUSTOMER_TABLE, raw).map_err(|e| {
        AppError::validation(e.to_string()).with_detail("field", "customerId")
    })
}

fn parse_entry_id(raw: &str) -> AppResult<RecordId> {
    parse_record_id(MILK_ENTRY_TABLE, raw).map_err(|_| AppError::milk_entry_not_found(raw))
}

/// Customers may only read their own records
fn ensure_scope(user: &CurrentUser, customer_id: &RecordId) -> AppResult<()> {
    if user.can_access_customer(&customer_id.to_string()) {
        return Ok(());
    }
    security_log!(
        "WARN",
        "customer_scope_violation",
        user_id = user.id.clone(),
        customer_id = customer_id.to_string()
    );
    Err(AppError::new(ErrorCode::CustomerScopeViolation))
}

fn validate_measurements(liters: f64, fat: f64) -> AppResult<()> {
    validate_non_negative(liters, "liters", ErrorCode::MilkEntryInvalidQuantity)?;
    validate_non_negative(fat, "fat", ErrorCode::MilkEntryInvalidQuantity)
}

fn with_customer(entry: MilkEntry, customers: &HashMap<String, Customer>) -> MilkEntryDetail {
    let customer = customers.get(&entry.customer_id.to_string());
    MilkEntryDetail {
        customer_name: customer.map(|c| c.full_name.clone()),
        customer_mobile: customer.map(|c| c.mobile.clone()),
        entry,
    }
}

/// Record a delivery; amount is computed from the customer's base rate
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MilkEntryPayload>,
) -> AppResult<(StatusCode, Json<ApiResponse<MilkEntry>>)> {
    let customer_id = require(payload.customer_id, "customerId")?;
    let date = require(payload.date, "date")?;
    let session = require(payload.session, "session")?;
    let liters = require(payload.liters, "liters")?;
    let fat = require(payload.fat, "fat")?;

    let customer_id = parse_customer_id(&customer_id)?;
    let date = parse_date(&date, "date")?;
    let session = Session::parse(&session).ok_or_else(|| {
        AppError::with_message(
            ErrorCode::MilkEntryInvalidSession,
            format!("Invalid session '{}', expected morning or evening", session),
        )
    })?;
    validate_measurements(liters, fat)?;

    let customer = state
        .customers()
        .find_by_id(&customer_id)
        .await?
        .ok_or_else(|| AppError::customer_not_found(customer_id.to_string()))?;

    let amount = compute_amount(liters, fat, customer.base_fat_rate);

    let entry = state
        .milk_entries()
        .create(MilkEntryCreate {
            customer_id,
            date,
            session,
            liters,
            fat,
            amount,
        })
        .await?;

    tracing::info!(
        entry_id = %entry.id_string(),
        customer_id = %entry.customer_id,
        date = %entry.date,
        session = entry.session.as_str(),
        liters,
        fat,
        amount,
        "Milk entry added"
    );

    Ok(created(entry, "Milk entry added successfully"))
}

/// List entries, optionally by customer and/or day, newest first
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<MilkEntryQuery>,
) -> AppResult<Json<ApiResponse<Vec<MilkEntryDetail>>>> {
    let customer_id = match query.customer_id.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(raw) => Some(parse_customer_id(raw)?),
        None => None,
    };
    let date = match query.date.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(raw) => Some(parse_date(raw, "date")?),
        None => None,
    };

    let entries = state
        .milk_entries()
        .find_all(EntryFilter { customer_id, date })
        .await?;

    let customers: HashMap<String, Customer> = state
        .customers()
        .find_all()
        .await?
        .into_iter()
        .map(|c| (c.id_string(), c))
        .collect();

    let details = entries
        .into_iter()
        .map(|entry| with_customer(entry, &customers))
        .collect();

    Ok(ok_with_message(details, "Milk entries fetched"))
}

/// Get one entry with its customer's name
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<MilkEntryDetail>>> {
    let record = parse_entry_id(&id)?;
    let entry = state
        .milk_entries()
        .find_by_id(&record)
        .await?
        .ok_or_else(|| AppError::milk_entry_not_found(&id))?;

    let customer = state.customers().find_by_id(&entry.customer_id).await?;
    let detail = MilkEntryDetail {
        customer_name: customer.as_ref().map(|c| c.full_name.clone()),
        customer_mobile: customer.map(|c| c.mobile),
        entry,
    };

    Ok(ok_with_message(detail, "Milk entry found"))
}

/// Update liters and/or fat; amount is recomputed with the current rate
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<MilkEntryUpdate>,
) -> AppResult<Json<ApiResponse<MilkEntry>>> {
    let record = parse_entry_id(&id)?;
    let repo = state.milk_entries();
    let entry = repo
        .find_by_id(&record)
        .await?
        .ok_or_else(|| AppError::milk_entry_not_found(&id))?;

    let liters = payload.liters.unwrap_or(entry.liters);
    let fat = payload.fat.unwrap_or(entry.fat);
    validate_measurements(liters, fat)?;

    let base_rate = match state.customers().find_by_id(&entry.customer_id).await? {
        Some(customer) => customer.base_fat_rate,
        None => {
            tracing::warn!(entry_id = %id, customer_id = %entry.customer_id, "Customer missing, recomputing amount with zero rate");
            0.0
        }
    };
    let amount = compute_amount(liters, fat, base_rate);

    let updated = repo.update_measurements(&record, liters, fat, amount).await?;

    tracing::info!(entry_id = %updated.id_string(), liters, fat, amount, "Milk entry updated");

    Ok(ok_with_message(updated, "Milk entry updated"))
}

/// Delete an entry
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let record = parse_entry_id(&id)?;
    if !state.milk_entries().delete(&record).await? {
        return Err(AppError::milk_entry_not_found(&id));
    }

    tracing::info!(entry_id = %record, "Milk entry deleted");

    Ok(Json(ApiResponse::success_with_message("Milk entry deleted", ())))
}

/// All entries of one customer, newest first
pub async fn list_by_customer(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<CustomerEntriesQuery>,
) -> AppResult<Json<ApiResponse<Vec<MilkEntry>>>> {
    let raw = require(
        query.customer_id.filter(|s| !s.trim().is_empty()),
        "customerId",
    )?;
    let customer_id = parse_customer_id(&raw)?;
    ensure_scope(&user, &customer_id)?;

    let entries = state.milk_entries().find_by_customer(&customer_id).await?;
    Ok(ok_with_message(entries, "Milk entries fetched successfully"))
}

/// Day-by-day totals of one customer for a billing week
///
/// Without both `startDate` and `endDate` the current Saturday-Friday week
/// is used
pub async fn weekly_summary(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<WeeklySummaryQuery>,
) -> AppResult<Json<ApiResponse<WeeklySummary>>> {
    let raw = require(
        query.customer_id.filter(|s| !s.trim().is_empty()),
        "customerId",
    )?;
    let customer_id = parse_customer_id(&raw)?;
    ensure_scope(&user, &customer_id)?;

    let explicit = match (query.start_date.as_deref(), query.end_date.as_deref()) {
        (Some(start), Some(end)) => Some((
            parse_bound(start, "startDate")?,
            parse_bound(end, "endDate")?,
        )),
        _ => None,
    };
    let window = resolve_week(local_now(), explicit);

    let entries = state
        .milk_entries()
        .find_in_range(window.start_date(), window.end_date(), Some(&customer_id))
        .await?;
    let summary = aggregate_week(&entries, &customer_id.to_string(), &window);

    tracing::debug!(
        customer_id = %customer_id,
        week = %window.label(),
        days = summary.daily.len(),
        amount = summary.weekly_total.amount,
        "Weekly summary computed"
    );

    Ok(ok_with_message(summary, "Weekly milk summary"))
}

/// Amount owed to every customer for the current week
pub async fn weekly_payouts(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Vec<PayoutRow>>>> {
    let window = resolve_week(local_now(), None);

    let entries = state
        .milk_entries()
        .find_in_range(window.start_date(), window.end_date(), None)
        .await?;
    let customers = state.customers().find_all().await?;

    let rows = aggregate_payouts(&entries, &customers, &window);

    tracing::info!(week = %window.label(), customers = rows.len(), "Weekly payouts calculated");

    Ok(ok_with_message(rows, "Weekly payouts calculated"))
}
