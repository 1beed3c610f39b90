// Input validation for event and participant APIs
//
// Last-resort limits checked before a request reaches the store. These are
// hard limits, not configurable.

use rollcall_core::{EventPatch, NewEvent, NewParticipant, ParticipantPatch};
use thiserror::Error;

// =============================================================================
// Input Size Limits
// =============================================================================

/// Maximum size for event and participant ids.
/// Ids double as document keys, so they follow document-store key rules.
pub const MAX_ID_BYTES: usize = 255;

/// Characters not allowed in ids (they break document keys and URL paths).
pub const FORBIDDEN_ID_CHARS: [char; 4] = ['/', '\\', '?', '#'];

/// Maximum size for names and locations.
pub const MAX_NAME_BYTES: usize = 2 * 1024; // 2 KB

/// Maximum size for event descriptions.
pub const MAX_DESCRIPTION_BYTES: usize = 10 * 1024; // 10 KB

/// Maximum size for participant email and phone.
pub const MAX_CONTACT_BYTES: usize = 320;

/// Largest capacity an event may declare.
/// Bounds the participant list scanned on every participant operation.
pub const MAX_EVENT_CAPACITY: u32 = 10_000;

// =============================================================================
// Validation Functions
// =============================================================================

#[derive(Debug, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Validate an event or participant id
pub fn validate_id(field: &'static str, id: &str) -> Result<(), ValidationError> {
    if id.is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    if id.len() > MAX_ID_BYTES {
        tracing::warn!(
            "{} exceeds limit: {} bytes (max: {})",
            field,
            id.len(),
            MAX_ID_BYTES
        );
        return Err(ValidationError::new(
            field,
            format!("must be at most {MAX_ID_BYTES} bytes"),
        ));
    }
    if let Some(c) = id.chars().find(|c| FORBIDDEN_ID_CHARS.contains(c)) {
        return Err(ValidationError::new(
            field,
            format!("must not contain '{c}'"),
        ));
    }
    Ok(())
}

fn validate_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.len() > max {
        tracing::warn!(
            "{} exceeds limit: {} bytes (max: {})",
            field,
            value.len(),
            max
        );
        return Err(ValidationError::new(
            field,
            format!("must be at most {max} bytes"),
        ));
    }
    Ok(())
}

pub fn validate_capacity(capacity: u32) -> Result<(), ValidationError> {
    if capacity > MAX_EVENT_CAPACITY {
        return Err(ValidationError::new(
            "capacity",
            format!("must be at most {MAX_EVENT_CAPACITY}"),
        ));
    }
    Ok(())
}

/// Validate all fields of an event submitted for creation
pub fn validate_new_event(event: &NewEvent) -> Result<(), ValidationError> {
    if let Some(id) = &event.id {
        validate_id("id", id)?;
    }
    validate_len("name", &event.name, MAX_NAME_BYTES)?;
    validate_len("location", &event.location, MAX_NAME_BYTES)?;
    if let Some(desc) = &event.description {
        validate_len("description", desc, MAX_DESCRIPTION_BYTES)?;
    }
    validate_capacity(event.capacity)?;
    for participant in &event.participants {
        validate_new_participant(participant)?;
    }
    Ok(())
}

/// Validate all provided fields of an event patch
pub fn validate_event_patch(patch: &EventPatch) -> Result<(), ValidationError> {
    if let Some(name) = &patch.name {
        validate_len("name", name, MAX_NAME_BYTES)?;
    }
    if let Some(location) = &patch.location {
        validate_len("location", location, MAX_NAME_BYTES)?;
    }
    if let Some(desc) = &patch.description {
        validate_len("description", desc, MAX_DESCRIPTION_BYTES)?;
    }
    if let Some(capacity) = patch.capacity {
        validate_capacity(capacity)?;
    }
    Ok(())
}

pub fn validate_new_participant(participant: &NewParticipant) -> Result<(), ValidationError> {
    if let Some(id) = &participant.id {
        validate_id("participant id", id)?;
    }
    validate_len("participant name", &participant.name, MAX_NAME_BYTES)?;
    validate_len("email", &participant.email, MAX_CONTACT_BYTES)?;
    if let Some(phone) = &participant.phone {
        validate_len("phone", phone, MAX_CONTACT_BYTES)?;
    }
    Ok(())
}

pub fn validate_participant_patch(patch: &ParticipantPatch) -> Result<(), ValidationError> {
    if let Some(name) = &patch.name {
        validate_len("participant name", name, MAX_NAME_BYTES)?;
    }
    if let Some(email) = &patch.email {
        validate_len("email", email, MAX_CONTACT_BYTES)?;
    }
    if let Some(phone) = &patch.phone {
        validate_len("phone", phone, MAX_CONTACT_BYTES)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn new_event() -> NewEvent {
        NewEvent {
            id: Some("e1".to_string()),
            name: "Meetup".to_string(),
            date: Utc::now(),
            location: "Lisbon".to_string(),
            capacity: 10,
            description: None,
            participants: vec![],
        }
    }

    #[test]
    fn test_valid_ids() {
        assert!(validate_id("id", "e1").is_ok());
        assert!(validate_id("id", "0192f0c4-7b1e-7c3a-9d55-1f7c3a9d551f").is_ok());
        assert!(validate_id("id", &"x".repeat(MAX_ID_BYTES)).is_ok());
    }

    #[test]
    fn test_invalid_ids() {
        assert!(validate_id("id", "").is_err());
        assert!(validate_id("id", &"x".repeat(MAX_ID_BYTES + 1)).is_err());
        for bad in ["a/b", "a\\b", "a?b", "a#b"] {
            assert!(validate_id("id", bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_valid_new_event() {
        assert!(validate_new_event(&new_event()).is_ok());

        let mut event = new_event();
        event.id = None;
        event.capacity = MAX_EVENT_CAPACITY;
        event.description = Some("x".repeat(MAX_DESCRIPTION_BYTES));
        assert!(validate_new_event(&event).is_ok());
    }

    #[test]
    fn test_invalid_new_event() {
        let mut event = new_event();
        event.name = "x".repeat(MAX_NAME_BYTES + 1);
        assert!(validate_new_event(&event).is_err());

        let mut event = new_event();
        event.capacity = MAX_EVENT_CAPACITY + 1;
        let err = validate_new_event(&event).unwrap_err();
        assert_eq!(err.field, "capacity");

        let mut event = new_event();
        event.participants.push(NewParticipant {
            id: Some("p/1".to_string()),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            phone: None,
        });
        assert!(validate_new_event(&event).is_err());
    }

    #[test]
    fn test_event_patch() {
        assert!(validate_event_patch(&EventPatch::default()).is_ok());
        let patch = EventPatch {
            location: Some("x".repeat(MAX_NAME_BYTES + 1)),
            ..Default::default()
        };
        assert!(validate_event_patch(&patch).is_err());
        let patch = EventPatch {
            capacity: Some(MAX_EVENT_CAPACITY + 1),
            ..Default::default()
        };
        assert!(validate_event_patch(&patch).is_err());
    }

    #[test]
    fn test_participant_inputs() {
        let participant = NewParticipant {
            id: None,
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            phone: Some("555-0100".to_string()),
        };
        assert!(validate_new_participant(&participant).is_ok());

        let patch = ParticipantPatch {
            email: Some("x".repeat(MAX_CONTACT_BYTES + 1)),
            ..Default::default()
        };
        assert!(validate_participant_patch(&patch).is_err());
        assert!(validate_participant_patch(&ParticipantPatch::default()).is_ok());
    }
}
