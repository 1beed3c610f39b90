// Participant domain types
//
// Participants have no storage of their own: they are value records embedded
// in an Event document and only change through the owning event.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// A person registered for an event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Participant {
    /// Identifier, unique within the owning event's participant list.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Contact email address.
    pub email: String,
    /// Contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Participant as submitted for registration. The id may be omitted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct NewParticipant {
    /// Identifier. A UUID v7 is generated when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// Contact email address.
    pub email: String,
    /// Contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl NewParticipant {
    pub fn into_participant(self) -> Participant {
        Participant {
            id: self.id.unwrap_or_else(|| Uuid::now_v7().to_string()),
            name: self.name,
            email: self.email,
            phone: self.phone,
        }
    }
}

impl From<Participant> for NewParticipant {
    fn from(p: Participant) -> Self {
        Self {
            id: Some(p.id),
            name: p.name,
            email: p.email,
            phone: p.phone,
        }
    }
}

/// Partial update of a participant. Only provided fields are changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ParticipantPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ParticipantPatch {
    /// Return a copy of `participant` with the provided fields applied.
    pub fn apply_to(&self, participant: &Participant) -> Participant {
        let mut updated = participant.clone();
        if let Some(name) = &self.name {
            updated.name = name.clone();
        }
        if let Some(email) = &self.email {
            updated.email = email.clone();
        }
        if let Some(phone) = &self.phone {
            updated.phone = Some(phone.clone());
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> Participant {
        Participant {
            id: "p1".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: Some("555-0100".to_string()),
        }
    }

    #[test]
    fn test_empty_patch_is_identity() {
        let patch = ParticipantPatch::default();
        assert_eq!(patch.apply_to(&ada()), ada());
    }

    #[test]
    fn test_patch_only_touches_provided_fields() {
        let patch = ParticipantPatch {
            email: Some("ada@lovelace.dev".to_string()),
            ..Default::default()
        };
        let updated = patch.apply_to(&ada());
        assert_eq!(updated.email, "ada@lovelace.dev");
        assert_eq!(updated.name, "Ada");
        assert_eq!(updated.phone.as_deref(), Some("555-0100"));
        assert_eq!(updated.id, "p1");
    }

    #[test]
    fn test_missing_phone_in_patch_does_not_unset() {
        let patch: ParticipantPatch = serde_json::from_str(r#"{"name": "Ada L."}"#).unwrap();
        assert_eq!(patch.apply_to(&ada()).phone.as_deref(), Some("555-0100"));
    }

    #[test]
    fn test_new_participant_generates_id() {
        let new = NewParticipant {
            id: None,
            name: "Grace".to_string(),
            email: "grace@example.com".to_string(),
            phone: None,
        };
        let p = new.into_participant();
        assert!(Uuid::parse_str(&p.id).is_ok());

        let kept = NewParticipant::from(ada()).into_participant();
        assert_eq!(kept, ada());
    }
}
