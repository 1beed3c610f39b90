// Participant HTTP routes, nested under their event

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use rollcall_core::{NewParticipant, Participant, ParticipantPatch};
use std::sync::Arc;

use super::common::{ApiError, ErrorResponse};
use super::validation::{validate_new_participant, validate_participant_patch};
use crate::services::ParticipantService;

/// App state for participant routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ParticipantService>,
}

impl AppState {
    pub fn new(service: Arc<ParticipantService>) -> Self {
        Self { service }
    }
}

/// Create participant routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/events/:event_id/participants",
            post(add_participant).get(list_participants),
        )
        .route(
            "/events/:event_id/participants/",
            post(add_participant).get(list_participants),
        )
        .route(
            "/events/:event_id/participants/:participant_id",
            get(get_participant)
                .put(update_participant)
                .delete(delete_participant),
        )
        .with_state(state)
}

/// POST /events/{event_id}/participants/ - Register a participant
#[utoipa::path(
    post,
    path = "/events/{event_id}/participants/",
    params(
        ("event_id" = String, Path, description = "Event ID")
    ),
    request_body = NewParticipant,
    responses(
        (status = 201, description = "Participant registered", body = Participant),
        (status = 400, description = "Event full, duplicate participant, invalid input or store error", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 409, description = "Event kept changing concurrently", body = ErrorResponse)
    ),
    tag = "participants"
)]
pub async fn add_participant(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    payload: Result<Json<NewParticipant>, JsonRejection>,
) -> Result<(StatusCode, Json<Participant>), ApiError> {
    let Json(new) = payload?;
    validate_new_participant(&new)?;

    let participant = state.service.add(&event_id, new).await?;
    Ok((StatusCode::CREATED, Json(participant)))
}

/// GET /events/{event_id}/participants/ - List an event's participants
#[utoipa::path(
    get,
    path = "/events/{event_id}/participants/",
    params(
        ("event_id" = String, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Participants in registration order", body = Vec<Participant>),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    tag = "participants"
)]
pub async fn list_participants(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Json<Vec<Participant>>, ApiError> {
    let participants = state.service.list(&event_id).await?;
    Ok(Json(participants))
}

/// GET /events/{event_id}/participants/{participant_id} - Get a participant
#[utoipa::path(
    get,
    path = "/events/{event_id}/participants/{participant_id}",
    params(
        ("event_id" = String, Path, description = "Event ID"),
        ("participant_id" = String, Path, description = "Participant ID")
    ),
    responses(
        (status = 200, description = "Participant found", body = Participant),
        (status = 404, description = "Event or participant not found", body = ErrorResponse)
    ),
    tag = "participants"
)]
pub async fn get_participant(
    State(state): State<AppState>,
    Path((event_id, participant_id)): Path<(String, String)>,
) -> Result<Json<Participant>, ApiError> {
    let participant = state.service.get(&event_id, &participant_id).await?;
    Ok(Json(participant))
}

/// PUT /events/{event_id}/participants/{participant_id} - Update a participant
#[utoipa::path(
    put,
    path = "/events/{event_id}/participants/{participant_id}",
    params(
        ("event_id" = String, Path, description = "Event ID"),
        ("participant_id" = String, Path, description = "Participant ID")
    ),
    request_body = ParticipantPatch,
    responses(
        (status = 200, description = "Participant updated", body = Participant),
        (status = 404, description = "Event or participant not found", body = ErrorResponse),
        (status = 409, description = "Event kept changing concurrently", body = ErrorResponse)
    ),
    tag = "participants"
)]
pub async fn update_participant(
    State(state): State<AppState>,
    Path((event_id, participant_id)): Path<(String, String)>,
    payload: Result<Json<ParticipantPatch>, JsonRejection>,
) -> Result<Json<Participant>, ApiError> {
    let Json(patch) = payload?;
    validate_participant_patch(&patch)?;

    let participant = state
        .service
        .update(&event_id, &participant_id, &patch)
        .await?;
    Ok(Json(participant))
}

/// DELETE /events/{event_id}/participants/{participant_id} - Remove a participant
#[utoipa::path(
    delete,
    path = "/events/{event_id}/participants/{participant_id}",
    params(
        ("event_id" = String, Path, description = "Event ID"),
        ("participant_id" = String, Path, description = "Participant ID")
    ),
    responses(
        (status = 204, description = "Participant removed"),
        (status = 404, description = "Event or participant not found", body = ErrorResponse),
        (status = 409, description = "Event kept changing concurrently", body = ErrorResponse)
    ),
    tag = "participants"
)]
pub async fn delete_participant(
    State(state): State<AppState>,
    Path((event_id, participant_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state.service.delete(&event_id, &participant_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
