use super::{mark::LikeMark, target::LikeTarget};
use crate::domain::errors::DomainError;
use async_trait::async_trait;

/// Result of trying to insert a like mark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkInsert {
    Inserted(i32),
    /// The unique (target, requester) constraint rejected the row.
    AlreadyExists,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterDelta {
    Increment,
    /// Floored at zero by the store.
    Decrement,
}

/// Storage that backs the like toggle.
///
/// Implementations must enforce uniqueness of (target, requester) and apply
/// counter changes inside the store rather than in the caller.
#[async_trait]
pub trait LikeStore: Send + Sync {
    /// Opens a unit of work. Dropping it without `commit` discards its writes.
    async fn begin(&self) -> Result<Box<dyn LikeTransaction>, DomainError>;

    async fn has_mark(&self, target: LikeTarget, requester_ip: &str) -> Result<bool, DomainError>;
}

#[async_trait]
pub trait LikeTransaction: Send {
    async fn target_exists(&mut self, target: LikeTarget) -> Result<bool, DomainError>;

    async fn find_mark(
        &mut self,
        target: LikeTarget,
        requester_ip: &str,
    ) -> Result<Option<LikeMark>, DomainError>;

    async fn insert_mark(
        &mut self,
        target: LikeTarget,
        requester_ip: &str,
    ) -> Result<MarkInsert, DomainError>;

    /// Returns `false` when the mark was already gone.
    async fn delete_mark(&mut self, target: LikeTarget, mark_id: i32) -> Result<bool, DomainError>;

    /// Applies `delta` to the target's like counter and returns the new value.
    async fn adjust_counter(
        &mut self,
        target: LikeTarget,
        delta: CounterDelta,
    ) -> Result<i32, DomainError>;

    async fn commit(self: Box<Self>) -> Result<(), DomainError>;
}
