// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! HTTP JSON API (Axum).
//!
//! Handlers only decode requests, call [`AgreementService`] and encode the
//! result. Status codes follow [`ServiceError`]: 400 validation, 403 not a
//! participant or not the creator, 404 unknown agreement or invite code,
//! 409 duplicate name or repeated agreement, 500 anything else.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use metrics::counter;
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::application::agreement_service::{
    AddChecklistItemRequest, AgreementService, CreateAgreementRequest, ServiceError,
    UpdateAgreementRequest,
};
use crate::domain::agreement::AgreementId;
use crate::presentation::dto::*;

pub struct AppState {
    pub agreement_service: Arc<dyn AgreementService>,
    pub start_time: Instant,
}

pub fn app(service: Arc<dyn AgreementService>) -> Router {
    let state = Arc::new(AppState {
        agreement_service: service,
        start_time: Instant::now(),
    });

    Router::new()
        .route("/health", get(health))
        .route("/api/agreements", post(create_agreement))
        .route("/api/agreements/join", post(join_agreement))
        .route("/api/agreements/{id}", get(get_agreement).put(update_agreement))
        .route("/api/agreements/{id}/public", get(get_public_agreement))
        .route("/api/agreements/{id}/chat", post(add_message))
        .route("/api/agreements/{id}/checklist", post(add_checklist_item))
        .route("/api/agreements/{id}/agree", post(agree))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Error response carrying an HTTP status and a client-facing message.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: "agreement not found".to_string(),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let status = match &err {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Internal(detail) => {
                error!(error = %detail, "Request failed with internal error");
                return Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "internal server error".to_string(),
                };
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let reason = match self.status {
            StatusCode::BAD_REQUEST => "validation",
            StatusCode::NOT_FOUND => "not_found",
            StatusCode::FORBIDDEN => "forbidden",
            StatusCode::CONFLICT => "conflict",
            _ => "internal",
        };
        counter!("pact_requests_rejected_total", "reason" => reason).increment(1);
        if self.status != StatusCode::INTERNAL_SERVER_ERROR {
            warn!(status = %self.status, reason, message = %self.message, "Request rejected");
        }

        (self.status, Json(ErrorResponse { error: self.message })).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Unwrap a JSON body, reporting malformed input as 400.
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

/// An ID that does not parse cannot name a stored agreement.
fn parse_id(raw: &str) -> Result<AgreementId, ApiError> {
    AgreementId::from_string(raw).map_err(|_| ApiError::not_found())
}

fn parse_deadline(raw: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(date) => NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ApiError::bad_request("deadline must be a date in YYYY-MM-DD format")),
    }
}

async fn health(State(state): State<Arc<AppState>>) -> ApiResult<HealthResponse> {
    let agreements = state.agreement_service.count_agreements().await?;
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        agreements,
    }))
}

async fn create_agreement(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateAgreementBody>, JsonRejection>,
) -> ApiResult<CreateAgreementResponse> {
    let payload = body(payload)?;
    let agreement = state
        .agreement_service
        .create_agreement(CreateAgreementRequest {
            title: payload.title,
            description: payload.description,
            creator_name: payload.creator_name,
        })
        .await?;

    Ok(Json(CreateAgreementResponse {
        message: "Agreement created successfully".to_string(),
        invite_code: agreement.invite_code.clone(),
        agreement,
    }))
}

async fn join_agreement(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<JoinAgreementBody>, JsonRejection>,
) -> ApiResult<AgreementResponse> {
    let payload = body(payload)?;
    let agreement = state
        .agreement_service
        .join_agreement(&payload.invite_code, &payload.participant_name)
        .await?;

    Ok(Json(AgreementResponse {
        message: Some("You have joined the agreement".to_string()),
        agreement,
    }))
}

async fn get_agreement(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<ParticipantQuery>,
) -> ApiResult<AgreementResponse> {
    let id = parse_id(&id)?;
    let agreement = state
        .agreement_service
        .get_agreement(id, &query.name)
        .await?;

    Ok(Json(AgreementResponse {
        message: None,
        agreement,
    }))
}

async fn update_agreement(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateAgreementBody>, JsonRejection>,
) -> ApiResult<AgreementResponse> {
    let payload = body(payload)?;
    let id = parse_id(&id)?;
    let agreement = state
        .agreement_service
        .update_agreement(
            id,
            UpdateAgreementRequest {
                title: payload.title,
                description: payload.description,
                participant_name: payload.participant_name,
            },
        )
        .await?;

    Ok(Json(AgreementResponse {
        message: Some("Agreement updated".to_string()),
        agreement,
    }))
}

async fn get_public_agreement(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<PublicAgreementResponse> {
    let id = parse_id(&id)?;
    let agreement = state.agreement_service.get_public_agreement(id).await?;
    Ok(Json(PublicAgreementResponse { agreement }))
}

async fn add_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<AddMessageBody>, JsonRejection>,
) -> ApiResult<NewMessageResponse> {
    let payload = body(payload)?;
    let id = parse_id(&id)?;
    let new_message = state
        .agreement_service
        .add_message(id, &payload.sender_name, &payload.content)
        .await?;

    Ok(Json(NewMessageResponse {
        message: "Message added".to_string(),
        new_message,
    }))
}

async fn add_checklist_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<AddChecklistItemBody>, JsonRejection>,
) -> ApiResult<NewItemResponse> {
    let payload = body(payload)?;
    let deadline = parse_deadline(payload.deadline.as_deref())?;
    let id = parse_id(&id)?;
    let new_item = state
        .agreement_service
        .add_checklist_item(
            id,
            AddChecklistItemRequest {
                text: payload.text,
                deadline,
                participant_name: payload.participant_name,
            },
        )
        .await?;

    Ok(Json(NewItemResponse {
        message: "Checklist item added".to_string(),
        new_item,
    }))
}

async fn agree(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<AgreeBody>, JsonRejection>,
) -> ApiResult<AgreeResponse> {
    let payload = body(payload)?;
    let id = parse_id(&id)?;
    let outcome = state
        .agreement_service
        .record_agreement(id, &payload.participant_name)
        .await?;

    Ok(Json(AgreeResponse {
        message: "Your agreement has been recorded".to_string(),
        agreement: outcome.agreement,
        all_agreed: outcome.all_agreed,
    }))
}
