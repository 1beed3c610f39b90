// Rollcall Core
//
// Domain types and storage contract for the events & participants service.
//
// Key design decisions:
// - Participants are embedded in their Event; there is no participant storage
// - The Event aggregate enforces the capacity invariant and participant id uniqueness
// - Storage is reached through the DocumentStore trait so services stay DB-agnostic
// - Document reads carry an etag so writers can replace conditionally

pub mod error;
pub mod event;
pub mod participant;
pub mod store;

// Logging setup shared by binaries
pub mod telemetry;

pub use error::{Result, RollcallError};
pub use event::{Event, EventPatch, NewEvent};
pub use participant::{NewParticipant, Participant, ParticipantPatch};
pub use store::{Document, DocumentStore, StoreError};
