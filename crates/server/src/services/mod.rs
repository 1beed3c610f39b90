// Services layer for business logic
// Services own business logic and validation, calling the document store directly

pub mod event;
pub mod participant;

pub use event::EventService;
pub use participant::ParticipantService;
