//! In-memory task store with realtime fan-out.
//!
//! Mirrors the contract of a hosted document database closely enough to
//! exercise multi-session scenarios: every accepted mutation re-delivers the
//! full ordered result set to every live subscriber, field patches merge
//! last-writer-wins, and server timestamps come from an injected clock with
//! insertion order breaking ties.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use mockable::{Clock, DefaultClock};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;

use crate::board::{
    domain::{CollectionPath, DocId, Document, FieldMap},
    ports::store::{
        StoreError, StoreEvent, StoreResult, Subscription, TaskStore, is_server_timestamp,
    },
};

/// Thread-safe in-memory task store.
pub struct InMemoryTaskStore<C = DefaultClock>
where
    C: Clock + Send + Sync,
{
    clock: Arc<C>,
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryTaskStore<DefaultClock> {
    /// Creates an empty store driven by the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

impl Default for InMemoryTaskStore<DefaultClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for InMemoryTaskStore<C>
where
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            clock: Arc::clone(&self.clock),
            state: Arc::clone(&self.state),
        }
    }
}

impl<C> InMemoryTaskStore<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty store driven by the given clock.
    #[must_use]
    pub fn with_clock(clock: Arc<C>) -> Self {
        Self {
            clock,
            state: Arc::new(Mutex::new(StoreState::default())),
        }
    }

    /// Rejects the next write (insert, patch, or delete) with a backend
    /// error. Test support for failure-path coverage.
    pub fn reject_next_write(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.pending_rejections += 1;
        }
    }

    /// Delivers a feed failure to every subscriber of the collection.
    /// Test support for degraded-mode coverage.
    pub fn break_feed(&self, collection: &CollectionPath, reason: &str) {
        if let Ok(mut state) = self.state.lock() {
            if let Some(collection_state) = state.collections.get_mut(collection.as_str()) {
                let failure = StoreError::Subscription(reason.to_owned());
                collection_state
                    .subscribers
                    .retain(|fanout| fanout.sender.send(StoreEvent::Failed(failure.clone())).is_ok());
            }
        }
    }

    /// Returns the number of live subscribers on the collection.
    #[must_use]
    pub fn subscriber_count(&self, collection: &CollectionPath) -> usize {
        self.state
            .lock()
            .ok()
            .and_then(|state| {
                state
                    .collections
                    .get(collection.as_str())
                    .map(|collection_state| collection_state.subscribers.len())
            })
            .unwrap_or_default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, StoreState>> {
        self.state
            .lock()
            .map_err(|err| StoreError::backend(std::io::Error::other(err.to_string())))
    }
}

#[derive(Default)]
struct StoreState {
    collections: HashMap<String, CollectionState>,
    next_subscriber_id: u64,
    pending_rejections: u32,
}

impl StoreState {
    fn take_rejection(&mut self) -> StoreResult<()> {
        if self.pending_rejections > 0 {
            self.pending_rejections -= 1;
            return Err(StoreError::backend(std::io::Error::other(
                "injected write rejection",
            )));
        }
        Ok(())
    }

    fn collection_mut(&mut self, collection: &CollectionPath) -> &mut CollectionState {
        self.collections
            .entry(collection.as_str().to_owned())
            .or_default()
    }
}

#[derive(Default)]
struct CollectionState {
    docs: HashMap<DocId, StoredDoc>,
    next_seq: u64,
    subscribers: Vec<Fanout>,
}

impl CollectionState {
    /// Re-delivers the full ordered result set to every live subscriber,
    /// dropping subscribers whose channel has gone away.
    fn broadcast(&mut self) {
        let docs = &self.docs;
        self.subscribers.retain(|fanout| {
            let snapshot = ordered_snapshot(docs, &fanout.order_key);
            fanout.sender.send(StoreEvent::Snapshot(snapshot)).is_ok()
        });
    }
}

struct StoredDoc {
    fields: FieldMap,
    seq: u64,
}

struct Fanout {
    id: u64,
    order_key: String,
    sender: mpsc::UnboundedSender<StoreEvent>,
}

/// Replaces server-timestamp sentinels with the resolved write time.
fn resolve_server_timestamps(fields: &mut FieldMap, now: DateTime<Utc>) {
    for value in fields.values_mut() {
        if is_server_timestamp(value) {
            *value = Value::String(now.to_rfc3339_opts(SecondsFormat::Micros, true));
        }
    }
}

/// Orders two raw field values the way the store sorts them.
///
/// Missing values sort first. RFC 3339 UTC timestamps order correctly under
/// plain string comparison.
fn compare_order_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::String(lhs)), Some(Value::String(rhs))) => lhs.cmp(rhs),
        (Some(Value::Number(lhs)), Some(Value::Number(rhs))) => lhs
            .as_f64()
            .partial_cmp(&rhs.as_f64())
            .unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    }
}

fn ordered_snapshot(docs: &HashMap<DocId, StoredDoc>, order_key: &str) -> Vec<Document> {
    let mut entries: Vec<(&DocId, &StoredDoc)> = docs.iter().collect();
    entries.sort_by(|(_, lhs), (_, rhs)| {
        compare_order_values(lhs.fields.get(order_key), rhs.fields.get(order_key))
            .then_with(|| lhs.seq.cmp(&rhs.seq))
    });
    entries
        .into_iter()
        .map(|(id, doc)| Document::new(id.clone(), doc.fields.clone()))
        .collect()
}

#[async_trait]
impl<C> TaskStore for InMemoryTaskStore<C>
where
    C: Clock + Send + Sync,
{
    async fn insert(&self, collection: &CollectionPath, fields: FieldMap) -> StoreResult<DocId> {
        let now = self.clock.utc();
        let mut state = self.lock()?;
        state.take_rejection()?;

        let collection_state = state.collection_mut(collection);
        let id = DocId::random();
        let mut resolved = fields;
        resolve_server_timestamps(&mut resolved, now);

        let seq = collection_state.next_seq;
        collection_state.next_seq += 1;
        collection_state.docs.insert(
            id.clone(),
            StoredDoc {
                fields: resolved,
                seq,
            },
        );
        collection_state.broadcast();
        Ok(id)
    }

    async fn update_fields(
        &self,
        collection: &CollectionPath,
        id: &DocId,
        patch: FieldMap,
    ) -> StoreResult<()> {
        let now = self.clock.utc();
        let mut state = self.lock()?;
        state.take_rejection()?;

        let collection_state = state.collection_mut(collection);
        let doc = collection_state
            .docs
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        let mut resolved = patch;
        resolve_server_timestamps(&mut resolved, now);
        for (key, value) in resolved {
            doc.fields.insert(key, value);
        }
        collection_state.broadcast();
        Ok(())
    }

    async fn remove(&self, collection: &CollectionPath, id: &DocId) -> StoreResult<()> {
        let mut state = self.lock()?;
        state.take_rejection()?;

        let collection_state = state.collection_mut(collection);
        if collection_state.docs.remove(id).is_some() {
            collection_state.broadcast();
        }
        Ok(())
    }

    fn subscribe_ordered(
        &self,
        collection: &CollectionPath,
        order_key: &str,
    ) -> StoreResult<Subscription> {
        let mut state = self.lock()?;
        let subscriber_id = state.next_subscriber_id;
        state.next_subscriber_id += 1;

        let (sender, receiver) = mpsc::unbounded_channel();
        let collection_state = state.collection_mut(collection);
        let initial = ordered_snapshot(&collection_state.docs, order_key);
        sender
            .send(StoreEvent::Snapshot(initial))
            .map_err(|_| StoreError::Subscription("subscriber channel closed".to_owned()))?;
        collection_state.subscribers.push(Fanout {
            id: subscriber_id,
            order_key: order_key.to_owned(),
            sender,
        });

        let registry = Arc::clone(&self.state);
        let collection_name = collection.as_str().to_owned();
        Ok(Subscription::new(receiver, move || {
            if let Ok(mut registry_state) = registry.lock() {
                if let Some(collection_state) =
                    registry_state.collections.get_mut(&collection_name)
                {
                    collection_state
                        .subscribers
                        .retain(|fanout| fanout.id != subscriber_id);
                }
            }
        }))
    }
}
