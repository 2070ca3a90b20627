//! HTTP request handlers for the payroll API.
//!
//! This module contains the handler functions for all API endpoints.
//! Every route is scoped by the company in its path.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::{CompanyId, PayMasterId};
use crate::store::CorrectionPatch;

use super::request::{CostQuery, GenerateRequest, ListQuery, PeriodQuery, SummaryQuery, TrendsQuery};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/companies/:company_id/payroll", get(list_handler))
        .route("/companies/:company_id/payroll/generate", post(generate_handler))
        .route(
            "/companies/:company_id/payroll/:pay_master_id",
            patch(update_handler),
        )
        .route(
            "/companies/:company_id/payroll/analytics/summary",
            get(summary_handler),
        )
        .route(
            "/companies/:company_id/payroll/analytics/trends",
            get(trends_handler),
        )
        .route(
            "/companies/:company_id/payroll/analytics/cost",
            get(cost_handler),
        )
        .route(
            "/companies/:company_id/payroll/analytics/compliance",
            get(compliance_handler),
        )
        .with_state(state)
}

/// Handler for `POST /companies/:company_id/payroll/generate`.
///
/// Runs payroll for the requested period and returns the created records,
/// the skipped employees and the payslip counts.
async fn generate_handler(
    State(state): State<AppState>,
    Path(company_id): Path<CompanyId>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, company_id, "Processing generation request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection(correlation_id, rejection).into_response(),
    };
    let period = match request.period() {
        Ok(period) => period,
        Err(err) => return engine_error(correlation_id, err),
    };

    let start_time = Instant::now();
    match state
        .coordinator()
        .generate(company_id, period, &request.filter())
        .await
    {
        Ok(outcome) => {
            info!(
                correlation_id = %correlation_id,
                company_id,
                created = outcome.created.len(),
                skipped = outcome.skipped.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Generation completed"
            );
            json_response(StatusCode::CREATED, &outcome)
        }
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for `GET /companies/:company_id/payroll`.
async fn list_handler(
    State(state): State<AppState>,
    Path(company_id): Path<CompanyId>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return query_rejection(correlation_id, rejection).into_response(),
    };

    let result = query
        .pagination()
        .and_then(|pagination| state.coordinator().list(company_id, &query.filter(), pagination));
    match result {
        Ok(page) => {
            info!(
                correlation_id = %correlation_id,
                company_id,
                total = page.pagination.total_count,
                "Listed payroll records"
            );
            json_response(StatusCode::OK, &page)
        }
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for `PATCH /companies/:company_id/payroll/:pay_master_id`.
async fn update_handler(
    State(state): State<AppState>,
    Path((company_id, pay_master_id)): Path<(CompanyId, PayMasterId)>,
    payload: Result<Json<CorrectionPatch>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, company_id, pay_master_id, "Processing correction");

    let patch = match payload {
        Ok(Json(patch)) => patch,
        Err(rejection) => return json_rejection(correlation_id, rejection).into_response(),
    };

    match state.coordinator().update(company_id, pay_master_id, &patch) {
        Ok(record) => json_response(StatusCode::OK, &record),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for `GET /companies/:company_id/payroll/analytics/summary`.
async fn summary_handler(
    State(state): State<AppState>,
    Path(company_id): Path<CompanyId>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return query_rejection(correlation_id, rejection).into_response(),
    };

    let result = query.period().and_then(|period| {
        let scope = query.scope()?;
        state
            .analytics()
            .summarize(company_id, period, &scope, query.compare_with_previous)
    });
    respond(correlation_id, result)
}

/// Handler for `GET /companies/:company_id/payroll/analytics/trends`.
async fn trends_handler(
    State(state): State<AppState>,
    Path(company_id): Path<CompanyId>,
    query: Result<Query<TrendsQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return query_rejection(correlation_id, rejection).into_response(),
    };

    let result = query
        .end()
        .and_then(|end| state.analytics().trends(company_id, end, query.months));
    respond(correlation_id, result)
}

/// Handler for `GET /companies/:company_id/payroll/analytics/cost`.
async fn cost_handler(
    State(state): State<AppState>,
    Path(company_id): Path<CompanyId>,
    query: Result<Query<CostQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return query_rejection(correlation_id, rejection).into_response(),
    };

    let result = query
        .period()
        .and_then(|period| state.analytics().cost_analysis(company_id, period, query.group_by));
    respond(correlation_id, result)
}

/// Handler for `GET /companies/:company_id/payroll/analytics/compliance`.
async fn compliance_handler(
    State(state): State<AppState>,
    Path(company_id): Path<CompanyId>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return query_rejection(correlation_id, rejection).into_response(),
    };

    let result = query
        .period()
        .and_then(|period| state.analytics().compliance_report(company_id, period));
    respond(correlation_id, result)
}

fn respond<T: Serialize>(correlation_id: Uuid, result: Result<T, EngineError>) -> Response {
    match result {
        Ok(body) => json_response(StatusCode::OK, &body),
        Err(err) => engine_error(correlation_id, err),
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn engine_error(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(correlation_id = %correlation_id, error = %err, "Request failed");
    ApiErrorResponse::from(err).into_response()
}

fn json_rejection(correlation_id: Uuid, rejection: JsonRejection) -> ApiErrorResponse {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::bad_request(error)
}

fn query_rejection(correlation_id: Uuid, rejection: QueryRejection) -> ApiErrorResponse {
    let body_text = rejection.body_text();
    warn!(correlation_id = %correlation_id, error = %body_text, "Query string rejected");
    ApiErrorResponse::bad_request(ApiError::validation_error(body_text))
}
