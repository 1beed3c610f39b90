// HTTP API routes
//
// Each submodule handles a specific resource type with its own AppState.

pub mod common;
pub mod events;
pub mod participants;
pub mod validation;

// Re-export common types
pub use common::{ApiError, ErrorResponse};
