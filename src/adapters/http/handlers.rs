//! HTTP handlers for the conversation API.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::application::{ConversationService, ServiceError};
use crate::domain::advisor::AdvisorId;
use crate::domain::foundation::{ConversationId, UserId};

use super::dto::{
    ConversationDetailResponse, ConversationDto, ErrorResponse, MessageDto, SendMessageRequest,
    SendMessageResponse, StartConversationRequest, StartConversationResponse,
};

type ApiError = (StatusCode, Json<ErrorResponse>);

pub async fn start_conversation(
    State(service): State<Arc<ConversationService>>,
    Json(request): Json<StartConversationRequest>,
) -> Result<(StatusCode, Json<StartConversationResponse>), ApiError> {
    let user_id = UserId::new(request.user_id).map_err(bad_request)?;

    let started = service
        .start_conversation(user_id, request.title)
        .await
        .map_err(service_error)?;

    Ok((
        StatusCode::CREATED,
        Json(StartConversationResponse::from(&started)),
    ))
}

pub async fn send_message(
    State(service): State<Arc<ConversationService>>,
    Path(id): Path<String>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>, ApiError> {
    let conversation_id = parse_conversation_id(&id)?;
    let manual_advisor = request
        .advisor_id
        .as_deref()
        .map(AdvisorId::from_str)
        .transpose()
        .map_err(bad_request)?;

    let result = service
        .send_message(conversation_id, request.text, manual_advisor)
        .await
        .map_err(service_error)?;

    Ok(Json(SendMessageResponse::from(&result)))
}

pub async fn get_conversation(
    State(service): State<Arc<ConversationService>>,
    Path(id): Path<String>,
) -> Result<Json<ConversationDetailResponse>, ApiError> {
    let conversation_id = parse_conversation_id(&id)?;

    let (record, messages) = service
        .get_conversation(conversation_id)
        .await
        .map_err(service_error)?;

    Ok(Json(ConversationDetailResponse {
        conversation: ConversationDto::from(&record),
        messages: messages.iter().map(MessageDto::from).collect(),
    }))
}

pub async fn cancel_turn(
    State(service): State<Arc<ConversationService>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let conversation_id = parse_conversation_id(&id)?;

    if service.cancel(conversation_id) {
        Ok(StatusCode::ACCEPTED)
    } else {
        // Nothing in flight; idempotent no-op.
        Ok(StatusCode::NO_CONTENT)
    }
}

fn parse_conversation_id(raw: &str) -> Result<ConversationId, ApiError> {
    ConversationId::from_str(raw)
        .map_err(|_| bad_request(format!("invalid conversation id: {raw}")))
}

fn bad_request(err: impl ToString) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

fn service_error(err: ServiceError) -> ApiError {
    let status = match &err {
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Validation(_) | ServiceError::Registry(_) => StatusCode::BAD_REQUEST,
        ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}
