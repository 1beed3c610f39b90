// Participant service: the participant management layer
//
// Works purely through EventService. Participants are never addressed in
// storage; each mutation is a fetch-mutate-replace of the parent event.

use rollcall_core::{NewParticipant, Participant, ParticipantPatch, Result, RollcallError};
use std::sync::Arc;
use tracing::instrument;

use super::EventService;

pub struct ParticipantService {
    events: Arc<EventService>,
}

impl ParticipantService {
    pub fn new(events: Arc<EventService>) -> Self {
        Self { events }
    }

    /// Register a participant. Fails when the event is full or the id is taken.
    #[instrument(skip(self, new))]
    pub async fn add(&self, event_id: &str, new: NewParticipant) -> Result<Participant> {
        // Resolve the id once so a retried cycle registers the same participant
        let participant = new.into_participant();

        let added = self
            .events
            .modify(event_id, |event| {
                event.add_participant(participant.clone())?;
                Ok(participant.clone())
            })
            .await?;

        tracing::info!(participant_id = %added.id, "Participant added");
        Ok(added)
    }

    pub async fn get(&self, event_id: &str, participant_id: &str) -> Result<Participant> {
        let event = self.events.get(event_id).await?;
        event
            .participant(participant_id)
            .cloned()
            .ok_or_else(|| RollcallError::participant_not_found(event_id, participant_id))
    }

    pub async fn list(&self, event_id: &str) -> Result<Vec<Participant>> {
        Ok(self.events.get(event_id).await?.participants)
    }

    /// Apply the fields present in `patch`; the participant keeps its position.
    #[instrument(skip(self, patch))]
    pub async fn update(
        &self,
        event_id: &str,
        participant_id: &str,
        patch: &ParticipantPatch,
    ) -> Result<Participant> {
        self.events
            .modify(event_id, |event| event.update_participant(participant_id, patch))
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, event_id: &str, participant_id: &str) -> Result<()> {
        self.events
            .modify(event_id, |event| {
                event.remove_participant(participant_id).map(|_| ())
            })
            .await?;
        tracing::info!("Participant removed");
        Ok(())
    }
}
