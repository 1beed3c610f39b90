// OpenAPI specification for the Rollcall API
// Decision: Lives in the library so export-openapi can print it without a server

use crate::api;
use crate::api::ErrorResponse;
use rollcall_core::{Event, EventPatch, NewEvent, NewParticipant, Participant, ParticipantPatch};
use utoipa::OpenApi;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::app::home,
        api::events::create_event,
        api::events::list_events,
        api::events::get_event,
        api::events::update_event,
        api::events::delete_event,
        api::participants::add_participant,
        api::participants::list_participants,
        api::participants::get_participant,
        api::participants::update_participant,
        api::participants::delete_participant,
    ),
    components(
        schemas(
            Event, NewEvent, EventPatch,
            Participant, NewParticipant, ParticipantPatch,
            ErrorResponse,
        )
    ),
    tags(
        (name = "root", description = "Service greeting"),
        (name = "events", description = "Event management endpoints"),
        (name = "participants", description = "Participant registration endpoints")
    ),
    info(
        title = "Rollcall API",
        version = "0.1.0",
        description = "API for managing events and their participants",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the OpenAPI spec as a pretty-printed JSON string
    pub fn to_json() -> serde_json::Result<String> {
        Self::openapi().to_pretty_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_every_route() {
        let spec: serde_json::Value = serde_json::from_str(&ApiDoc::to_json().unwrap()).unwrap();
        let paths = spec["paths"].as_object().unwrap();
        for path in [
            "/",
            "/events/",
            "/events/{event_id}",
            "/events/{event_id}/participants/",
            "/events/{event_id}/participants/{participant_id}",
        ] {
            assert!(paths.contains_key(path), "missing {path}");
        }
        assert!(spec["components"]["schemas"]["Event"].is_object());
    }
}
