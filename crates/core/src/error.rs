// Error types for event and participant operations

use thiserror::Error;

use crate::store::StoreError;

/// Result type alias for domain operations
pub type Result<T> = std::result::Result<T, RollcallError>;

/// Errors surfaced by the event and participant layers.
///
/// Every store failure is translated into one of these kinds at the boundary
/// of the component that issued the call.
#[derive(Debug, Error)]
pub enum RollcallError {
    /// No event document with this id
    #[error("Event not found: {0}")]
    EventNotFound(String),

    /// The event exists but has no participant with this id
    #[error("Participant {participant_id} not found in event {event_id}")]
    ParticipantNotFound {
        event_id: String,
        participant_id: String,
    },

    /// An event with the same id is already stored
    #[error("Event already exists: {0}")]
    EventAlreadyExists(String),

    /// A participant with the same id is already registered for the event
    #[error("Participant {participant_id} is already registered for event {event_id}")]
    DuplicateParticipant {
        event_id: String,
        participant_id: String,
    },

    /// The event's participant list is full
    #[error("Event {event_id} is at capacity ({capacity})")]
    CapacityExceeded { event_id: String, capacity: u32 },

    /// A capacity change would leave more participants than seats
    #[error("Capacity {capacity} is lower than the number of participants ({participants})")]
    InvalidCapacity { capacity: u32, participants: usize },

    /// Concurrent writers kept winning the conditional replace
    #[error("Event {event_id} was modified concurrently; gave up after {attempts} attempts")]
    Conflict { event_id: String, attempts: u32 },

    /// Input rejected before reaching the store
    #[error("Validation error: {0}")]
    Validation(String),

    /// Backend communication failure or unreadable document
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl RollcallError {
    /// Stable machine-readable kind, returned to clients alongside the message
    pub fn code(&self) -> &'static str {
        match self {
            Self::EventNotFound(_) => "EVENT_NOT_FOUND",
            Self::ParticipantNotFound { .. } => "PARTICIPANT_NOT_FOUND",
            Self::EventAlreadyExists(_) => "ALREADY_EXISTS",
            Self::DuplicateParticipant { .. } => "DUPLICATE_PARTICIPANT",
            Self::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
            Self::InvalidCapacity { .. } => "INVALID_CAPACITY",
            Self::Conflict { .. } => "CONFLICT",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
        }
    }

    /// Create a participant not found error
    pub fn participant_not_found(event_id: &str, participant_id: &str) -> Self {
        Self::ParticipantNotFound {
            event_id: event_id.to_string(),
            participant_id: participant_id.to_string(),
        }
    }

    /// Create a duplicate participant error
    pub fn duplicate_participant(event_id: &str, participant_id: &str) -> Self {
        Self::DuplicateParticipant {
            event_id: event_id.to_string(),
            participant_id: participant_id.to_string(),
        }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Translate a store failure for an operation addressing `event_id`.
    ///
    /// `PreconditionFailed` becomes a single-attempt `Conflict`. Callers that
    /// replace conditionally intercept it first and retry.
    pub fn from_store(event_id: &str, err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => Self::EventNotFound(event_id.to_string()),
            StoreError::AlreadyExists(_) => Self::EventAlreadyExists(event_id.to_string()),
            StoreError::PreconditionFailed { .. } => Self::Conflict {
                event_id: event_id.to_string(),
                attempts: 1,
            },
            StoreError::Transport(msg) => Self::StoreUnavailable(msg),
            StoreError::Serialization(msg) => {
                Self::StoreUnavailable(format!("malformed document {event_id}: {msg}"))
            }
        }
    }
}
