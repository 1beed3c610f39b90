// Event CRUD HTTP routes

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use rollcall_core::{Event, EventPatch, NewEvent};
use std::sync::Arc;

use super::common::{ApiError, ErrorResponse};
use super::validation::{validate_event_patch, validate_new_event};
use crate::services::EventService;

/// App state for event routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<EventService>,
}

impl AppState {
    pub fn new(service: Arc<EventService>) -> Self {
        Self { service }
    }
}

/// Create event routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/events", post(create_event).get(list_events))
        .route("/events/", post(create_event).get(list_events))
        .route(
            "/events/:event_id",
            get(get_event).put(update_event).delete(delete_event),
        )
        .with_state(state)
}

/// POST /events/ - Create a new event
#[utoipa::path(
    post,
    path = "/events/",
    request_body = NewEvent,
    responses(
        (status = 201, description = "Event created successfully", body = Event),
        (status = 400, description = "Duplicate id, invalid input or store error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn create_event(
    State(state): State<AppState>,
    payload: Result<Json<NewEvent>, JsonRejection>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let Json(new) = payload?;
    validate_new_event(&new)?;

    let event = state.service.create(new.into_event()).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /events/ - List all events
#[utoipa::path(
    get,
    path = "/events/",
    responses(
        (status = 200, description = "All stored events", body = Vec<Event>),
        (status = 400, description = "Store error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, ApiError> {
    let events = state.service.list().await?;
    Ok(Json(events))
}

/// GET /events/{event_id} - Get event by ID
#[utoipa::path(
    get,
    path = "/events/{event_id}",
    params(
        ("event_id" = String, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event found", body = Event),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 400, description = "Store error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Json<Event>, ApiError> {
    let event = state.service.get(&event_id).await?;
    Ok(Json(event))
}

/// PUT /events/{event_id} - Update event. Only provided fields are changed.
#[utoipa::path(
    put,
    path = "/events/{event_id}",
    params(
        ("event_id" = String, Path, description = "Event ID")
    ),
    request_body = EventPatch,
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 404, description = "Event not found, or capacity below participant count", body = ErrorResponse),
        (status = 400, description = "Invalid input or store error", body = ErrorResponse),
        (status = 409, description = "Event kept changing concurrently", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn update_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    payload: Result<Json<EventPatch>, JsonRejection>,
) -> Result<Json<Event>, ApiError> {
    let Json(patch) = payload?;
    validate_event_patch(&patch)?;

    let event = state.service.update(&event_id, &patch).await?;
    Ok(Json(event))
}

/// DELETE /events/{event_id} - Delete event and its participants
#[utoipa::path(
    delete,
    path = "/events/{event_id}",
    params(
        ("event_id" = String, Path, description = "Event ID")
    ),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 400, description = "Store error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn delete_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.service.delete(&event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
