// Event service: the event store access layer
//
// Owns the event document collection. Also hosts the fetch-mutate-replace
// cycle every participant mutation and event patch goes through: the replace
// is conditional on the etag of the read, and the whole cycle is re-run from a
// fresh read when another writer got there first.

use rollcall_core::store::{encode, StoreError};
use rollcall_core::{DocumentStore, Event, EventPatch, Result, RollcallError};
use std::sync::Arc;
use tracing::instrument;

pub struct EventService {
    store: Arc<dyn DocumentStore>,
    max_write_attempts: u32,
}

impl EventService {
    pub fn new(store: Arc<dyn DocumentStore>, max_write_attempts: u32) -> Self {
        Self {
            store,
            max_write_attempts: max_write_attempts.max(1),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    #[instrument(skip(self, event), fields(event_id = %event.id))]
    pub async fn create(&self, event: Event) -> Result<Event> {
        // A new event must already satisfy the aggregate invariants
        event
            .check_invariants()
            .map_err(|e| RollcallError::validation(e.to_string()))?;

        let body = encode(&event).map_err(|e| RollcallError::from_store(&event.id, e))?;
        self.store
            .create_document(body)
            .await
            .map_err(|e| RollcallError::from_store(&event.id, e))?;

        tracing::info!(capacity = event.capacity, "Event created");
        Ok(event)
    }

    pub async fn get(&self, id: &str) -> Result<Event> {
        Ok(self.fetch(id).await?.0)
    }

    /// Every stored event, in store-defined order.
    ///
    /// Full collection scan; cost grows with the number of events.
    pub async fn list(&self) -> Result<Vec<Event>> {
        let docs = self
            .store
            .query_all_documents()
            .await
            .map_err(|e| RollcallError::StoreUnavailable(e.to_string()))?;

        docs.iter()
            .map(|doc| {
                doc.decode::<Event>()
                    .map_err(|e| RollcallError::from_store(&doc.id, e))
            })
            .collect()
    }

    /// Unconditional overwrite (last writer wins)
    #[instrument(skip(self, event))]
    pub async fn replace(&self, id: &str, event: Event) -> Result<Event> {
        if event.id != id {
            return Err(RollcallError::validation(format!(
                "body id {} does not match path id {id}",
                event.id
            )));
        }
        let body = encode(&event).map_err(|e| RollcallError::from_store(id, e))?;
        self.store
            .replace_document(id, body, None)
            .await
            .map_err(|e| RollcallError::from_store(id, e))?;
        Ok(event)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.store
            .delete_document(id, id)
            .await
            .map_err(|e| RollcallError::from_store(id, e))?;
        tracing::info!("Event deleted");
        Ok(())
    }

    /// Apply a partial update, re-validating capacity against the stored
    /// participants. Nothing is persisted when the patch is rejected.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: &str, patch: &EventPatch) -> Result<Event> {
        self.modify(id, |event| {
            event.apply_patch(patch)?;
            Ok(event.clone())
        })
        .await
    }

    /// Run one fetch-mutate-replace cycle against the event `id`.
    ///
    /// `mutate` may run more than once (once per attempt) and must not have
    /// side effects outside the event it is given. When it returns an error
    /// nothing is written.
    pub async fn modify<T, F>(&self, id: &str, mut mutate: F) -> Result<T>
    where
        F: FnMut(&mut Event) -> Result<T> + Send,
        T: Send,
    {
        for attempt in 1..=self.max_write_attempts {
            let (mut event, etag) = self.fetch(id).await?;
            let output = mutate(&mut event)?;

            let body = encode(&event).map_err(|e| RollcallError::from_store(id, e))?;
            match self.store.replace_document(id, body, Some(&etag)).await {
                Ok(_) => return Ok(output),
                Err(StoreError::PreconditionFailed { .. }) => {
                    tracing::debug!(
                        event_id = %id,
                        attempt,
                        "Event changed since read, retrying"
                    );
                }
                Err(e) => return Err(RollcallError::from_store(id, e)),
            }
        }

        tracing::warn!(
            event_id = %id,
            attempts = self.max_write_attempts,
            "Giving up on event update after repeated conflicts"
        );
        Err(RollcallError::Conflict {
            event_id: id.to_string(),
            attempts: self.max_write_attempts,
        })
    }

    async fn fetch(&self, id: &str) -> Result<(Event, String)> {
        let doc = self
            .store
            .read_document(id, id)
            .await
            .map_err(|e| RollcallError::from_store(id, e))?;
        let event = doc
            .decode::<Event>()
            .map_err(|e| RollcallError::from_store(id, e))?;
        Ok((event, doc.etag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{event, participant, FailingStore};
    use crate::storage::InMemoryDocumentStore;

    fn service() -> EventService {
        EventService::new(Arc::new(InMemoryDocumentStore::new()), 3)
    }

    #[tokio::test]
    async fn test_create_then_get_returns_same_event() {
        let svc = service();
        let mut e = event("e1", 3);
        e.description = Some("Lightning talks".to_string());
        e.participants.push(participant("p1"));

        let created = svc.create(e.clone()).await.unwrap();
        assert_eq!(created, e);
        assert_eq!(svc.get("e1").await.unwrap(), e);
    }

    #[tokio::test]
    async fn test_create_duplicate_id() {
        let svc = service();
        svc.create(event("e1", 1)).await.unwrap();
        let err = svc.create(event("e1", 5)).await.unwrap_err();
        assert!(matches!(err, RollcallError::EventAlreadyExists(ref id) if id == "e1"));
        assert_eq!(svc.get("e1").await.unwrap().capacity, 1);
    }

    #[tokio::test]
    async fn test_create_rejects_overfull_event() {
        let svc = service();
        let mut e = event("e1", 1);
        e.participants = vec![participant("p1"), participant("p2")];
        assert!(matches!(
            svc.create(e).await,
            Err(RollcallError::Validation(_))
        ));
        assert!(matches!(
            svc.get("e1").await,
            Err(RollcallError::EventNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_get_missing() {
        assert!(matches!(
            service().get("nope").await,
            Err(RollcallError::EventNotFound(ref id)) if id == "nope"
        ));
    }

    #[tokio::test]
    async fn test_list_returns_all() {
        let svc = service();
        assert!(svc.list().await.unwrap().is_empty());
        svc.create(event("e1", 1)).await.unwrap();
        svc.create(event("e2", 1)).await.unwrap();
        let mut ids: Vec<_> = svc.list().await.unwrap().into_iter().map(|e| e.id).collect();
        ids.sort();
        assert_eq!(ids, ["e1", "e2"]);
    }

    #[tokio::test]
    async fn test_replace_and_delete() {
        let svc = service();
        svc.create(event("e1", 1)).await.unwrap();

        let mut e = event("e1", 10);
        e.name = "Renamed".to_string();
        svc.replace("e1", e.clone()).await.unwrap();
        assert_eq!(svc.get("e1").await.unwrap(), e);

        svc.delete("e1").await.unwrap();
        assert!(matches!(
            svc.delete("e1").await,
            Err(RollcallError::EventNotFound(_))
        ));
        assert!(matches!(
            svc.replace("e1", e).await,
            Err(RollcallError::EventNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_rejects_capacity_below_participants() {
        let svc = service();
        let mut e = event("e1", 2);
        e.participants = vec![participant("p1"), participant("p2")];
        svc.create(e.clone()).await.unwrap();

        let patch = EventPatch {
            capacity: Some(1),
            ..Default::default()
        };
        let err = svc.update("e1", &patch).await.unwrap_err();
        assert!(matches!(err, RollcallError::InvalidCapacity { .. }));
        assert_eq!(svc.get("e1").await.unwrap(), e);
    }

    #[tokio::test]
    async fn test_update_applies_patch() {
        let svc = service();
        svc.create(event("e1", 2)).await.unwrap();
        let patch = EventPatch {
            location: Some("Lisbon".to_string()),
            capacity: Some(40),
            ..Default::default()
        };
        let updated = svc.update("e1", &patch).await.unwrap();
        assert_eq!(updated.location, "Lisbon");
        assert_eq!(updated.capacity, 40);
        assert_eq!(svc.get("e1").await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_missing_event() {
        let err = service()
            .update("nope", &EventPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RollcallError::EventNotFound(_)));
    }

    #[tokio::test]
    async fn test_modify_gives_up_after_conflicts() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let svc = EventService::new(store.clone(), 2);
        svc.create(event("e1", 5)).await.unwrap();

        // Every attempt sees someone else write between its read and its replace
        let mut calls = 0;
        let err = svc
            .modify("e1", |e| {
                calls += 1;
                e.name = format!("attempt {calls}");
                let other = store.clone();
                let mut body = serde_json::to_value(&*e).unwrap();
                body["location"] = serde_json::json!("elsewhere");
                futures::executor::block_on(other.replace_document("e1", body, None)).unwrap();
                Ok(())
            })
            .await
            .unwrap_err();

        assert!(matches!(err, RollcallError::Conflict { attempts: 2, .. }));
        assert_eq!(calls, 2);
    }

    #[tokio::test]
    async fn test_store_failures_surface_as_unavailable() {
        let svc = EventService::new(Arc::new(FailingStore), 3);
        assert!(matches!(
            svc.get("e1").await,
            Err(RollcallError::StoreUnavailable(_))
        ));
        assert!(matches!(
            svc.list().await,
            Err(RollcallError::StoreUnavailable(_))
        ));
        assert!(matches!(
            svc.create(event("e1", 1)).await,
            Err(RollcallError::StoreUnavailable(_))
        ));
    }
}
