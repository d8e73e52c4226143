//! Process-local `LikeStore` for tests and local experiments.
//!
//! Enforces the same uniqueness and counter-floor rules as the Postgres
//! tables. Writes apply immediately and are not rolled back when a
//! transaction is dropped; `LikeToggleService` only abandons a transaction
//! before its first write.
//!
//! Public so the test binaries under `tests/` can drive the service and the
//! router without Postgres.

use crate::domain::{
    errors::DomainError,
    like::{
        mark::LikeMark,
        store::{CounterDelta, LikeStore, LikeTransaction, MarkInsert},
        target::LikeTarget,
    },
};
use async_trait::async_trait;
use chrono::Utc;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

#[derive(Default)]
struct State {
    counters: HashMap<LikeTarget, i32>,
    marks: HashMap<(LikeTarget, String), LikeMark>,
    next_mark_id: i32,
}

#[derive(Clone, Default)]
pub struct InMemoryLikeStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryLikeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_target(&self, target: LikeTarget, like_count: i32) {
        self.lock().counters.insert(target, like_count.max(0));
    }

    /// Removes the target and every mark pointing at it.
    pub fn remove_target(&self, target: LikeTarget) -> bool {
        let mut state = self.lock();
        state.marks.retain(|(t, _), _| *t != target);
        state.counters.remove(&target).is_some()
    }

    pub fn like_count(&self, target: LikeTarget) -> Option<i32> {
        self.lock().counters.get(&target).copied()
    }

    pub fn mark_count(&self, target: LikeTarget) -> usize {
        self.lock().marks.keys().filter(|(t, _)| *t == target).count()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl LikeStore for InMemoryLikeStore {
    async fn begin(&self) -> Result<Box<dyn LikeTransaction>, DomainError> {
        Ok(Box::new(InMemoryLikeTransaction {
            store: self.clone(),
        }))
    }

    async fn has_mark(&self, target: LikeTarget, requester_ip: &str) -> Result<bool, DomainError> {
        Ok(self
            .lock()
            .marks
            .contains_key(&(target, requester_ip.to_string())))
    }
}

struct InMemoryLikeTransaction {
    store: InMemoryLikeStore,
}

#[async_trait]
impl LikeTransaction for InMemoryLikeTransaction {
    async fn target_exists(&mut self, target: LikeTarget) -> Result<bool, DomainError> {
        Ok(self.store.lock().counters.contains_key(&target))
    }

    async fn find_mark(
        &mut self,
        target: LikeTarget,
        requester_ip: &str,
    ) -> Result<Option<LikeMark>, DomainError> {
        Ok(self
            .store
            .lock()
            .marks
            .get(&(target, requester_ip.to_string()))
            .cloned())
    }

    async fn insert_mark(
        &mut self,
        target: LikeTarget,
        requester_ip: &str,
    ) -> Result<MarkInsert, DomainError> {
        let mut state = self.store.lock();
        if !state.counters.contains_key(&target) {
            return Err(DomainError::NotFound(target.to_string()));
        }
        let key = (target, requester_ip.to_string());
        if state.marks.contains_key(&key) {
            return Ok(MarkInsert::AlreadyExists);
        }
        state.next_mark_id += 1;
        let id = state.next_mark_id;
        state.marks.insert(
            key,
            LikeMark {
                id,
                target_id: target.id,
                ip_address: requester_ip.to_string(),
                created_at: Utc::now(),
            },
        );
        Ok(MarkInsert::Inserted(id))
    }

    async fn delete_mark(&mut self, target: LikeTarget, mark_id: i32) -> Result<bool, DomainError> {
        let mut state = self.store.lock();
        let before = state.marks.len();
        state
            .marks
            .retain(|(t, _), mark| !(*t == target && mark.id == mark_id));
        Ok(state.marks.len() < before)
    }

    async fn adjust_counter(
        &mut self,
        target: LikeTarget,
        delta: CounterDelta,
    ) -> Result<i32, DomainError> {
        let mut state = self.store.lock();
        let count = state
            .counters
            .get_mut(&target)
            .ok_or_else(|| DomainError::NotFound(target.to_string()))?;
        *count = match delta {
            CounterDelta::Increment => *count + 1,
            CounterDelta::Decrement => (*count - 1).max(0),
        };
        Ok(*count)
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        Ok(())
    }
}
