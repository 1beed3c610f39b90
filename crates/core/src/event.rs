// Event aggregate
//
// An Event document is the sole source of truth for its participants. Every
// participant change goes through the methods below, which keep
// `participants.len() <= capacity` and per-event participant id uniqueness.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::error::{Result, RollcallError};
use crate::participant::{NewParticipant, Participant, ParticipantPatch};

/// A scheduled occurrence with a bounded number of seats.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Event {
    /// Identifier. Also the document partition key.
    pub id: String,
    /// Event name.
    pub name: String,
    /// When the event takes place.
    pub date: DateTime<Utc>,
    /// Where the event takes place.
    pub location: String,
    /// Maximum number of participants.
    pub capacity: u32,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Registered participants, in registration order.
    #[serde(default)]
    pub participants: Vec<Participant>,
}

/// Event as submitted for creation. The id may be omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct NewEvent {
    /// Identifier. A UUID v7 is generated when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub capacity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Participants registered up front.
    #[serde(default)]
    pub participants: Vec<NewParticipant>,
}

impl NewEvent {
    pub fn into_event(self) -> Event {
        Event {
            id: self.id.unwrap_or_else(|| Uuid::now_v7().to_string()),
            name: self.name,
            date: self.date,
            location: self.location,
            capacity: self.capacity,
            description: self.description,
            participants: self
                .participants
                .into_iter()
                .map(NewParticipant::into_participant)
                .collect(),
        }
    }
}

/// Partial update of an event. Only provided fields are changed.
///
/// The participant list is not patchable here; it changes only through the
/// participant operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct EventPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Event {
    pub fn participant(&self, participant_id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == participant_id)
    }

    /// Check the invariants a freshly submitted event must satisfy
    pub fn check_invariants(&self) -> Result<()> {
        if self.participants.len() > self.capacity as usize {
            return Err(RollcallError::InvalidCapacity {
                capacity: self.capacity,
                participants: self.participants.len(),
            });
        }
        let mut seen = HashSet::with_capacity(self.participants.len());
        for p in &self.participants {
            if !seen.insert(p.id.as_str()) {
                return Err(RollcallError::duplicate_participant(&self.id, &p.id));
            }
        }
        Ok(())
    }

    /// Append a participant.
    ///
    /// Capacity is checked before the duplicate scan, and both before the list
    /// is touched.
    pub fn add_participant(&mut self, participant: Participant) -> Result<()> {
        if self.participants.len() >= self.capacity as usize {
            return Err(RollcallError::CapacityExceeded {
                event_id: self.id.clone(),
                capacity: self.capacity,
            });
        }
        if self.participant(&participant.id).is_some() {
            return Err(RollcallError::duplicate_participant(
                &self.id,
                &participant.id,
            ));
        }
        self.participants.push(participant);
        Ok(())
    }

    /// Apply `patch` to the matching participant in place and return the result
    pub fn update_participant(
        &mut self,
        participant_id: &str,
        patch: &ParticipantPatch,
    ) -> Result<Participant> {
        let slot = self
            .participants
            .iter_mut()
            .find(|p| p.id == participant_id)
            .ok_or_else(|| RollcallError::participant_not_found(&self.id, participant_id))?;
        *slot = patch.apply_to(slot);
        Ok(slot.clone())
    }

    /// Remove the matching participant, preserving the order of the rest
    pub fn remove_participant(&mut self, participant_id: &str) -> Result<Participant> {
        let index = self
            .participants
            .iter()
            .position(|p| p.id == participant_id)
            .ok_or_else(|| RollcallError::participant_not_found(&self.id, participant_id))?;
        Ok(self.participants.remove(index))
    }

    /// Apply an event patch.
    ///
    /// Fails with `InvalidCapacity` and leaves the event untouched when the new
    /// capacity would be lower than the current participant count.
    pub fn apply_patch(&mut self, patch: &EventPatch) -> Result<()> {
        let capacity = patch.capacity.unwrap_or(self.capacity);
        if (capacity as usize) < self.participants.len() {
            return Err(RollcallError::InvalidCapacity {
                capacity,
                participants: self.participants.len(),
            });
        }

        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(location) = &patch.location {
            self.location = location.clone();
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        self.capacity = capacity;
        Ok(())
    }
}
