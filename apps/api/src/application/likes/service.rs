use crate::domain::{
    errors::DomainError,
    like::{
        store::{CounterDelta, LikeStore, LikeTransaction, MarkInsert},
        target::{LikeStatus, LikeTarget},
    },
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Flips like state for a (target, requester) pair and keeps the target's
/// denormalized counter in step.
///
/// Holds no state of its own; every call is one transaction against the
/// store, so the service can be shared freely between request handlers.
pub struct LikeToggleService {
    store: Arc<dyn LikeStore>,
    max_attempts: u32,
}

impl LikeToggleService {
    pub fn new(store: Arc<dyn LikeStore>) -> Self {
        Self::with_max_attempts(store, DEFAULT_MAX_ATTEMPTS)
    }

    /// `max_attempts` bounds how often an insert that lost a uniqueness race
    /// is retried after the winning mark disappeared again.
    pub fn with_max_attempts(store: Arc<dyn LikeStore>, max_attempts: u32) -> Self {
        Self {
            store,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Likes the target if `requester_ip` has not liked it yet, otherwise
    /// removes the like.
    ///
    /// # Errors
    /// - `NotFound` if the target does not exist
    /// - `ValidationError` if the requester identity is empty
    /// - `Conflict` if a uniqueness race could not be reconciled
    /// - `InfrastructureError` on storage failure
    #[instrument(skip(self, target), fields(target = %target))]
    pub async fn toggle(
        &self,
        target: LikeTarget,
        requester_ip: &str,
    ) -> Result<LikeStatus, DomainError> {
        let requester_ip = normalize_requester(requester_ip)?;
        let mut tx = self.store.begin().await?;

        if !tx.target_exists(target).await? {
            return Err(DomainError::NotFound(format!("{} {}", target.kind, target.id)));
        }

        let liked = match tx.find_mark(target, requester_ip).await? {
            Some(mark) => unlike(tx.as_mut(), target, mark.id).await?,
            None => self.like(tx.as_mut(), target, requester_ip).await?,
        };

        tx.commit().await?;
        info!(liked, "like toggled");
        Ok(LikeStatus { liked })
    }

    /// Reports whether `requester_ip` currently likes the target.
    #[instrument(skip(self, target), fields(target = %target))]
    pub async fn check_status(
        &self,
        target: LikeTarget,
        requester_ip: &str,
    ) -> Result<LikeStatus, DomainError> {
        let requester_ip = normalize_requester(requester_ip)?;
        let liked = self.store.has_mark(target, requester_ip).await?;
        Ok(LikeStatus { liked })
    }

    async fn like(
        &self,
        tx: &mut dyn LikeTransaction,
        target: LikeTarget,
        requester_ip: &str,
    ) -> Result<bool, DomainError> {
        for attempt in 1..=self.max_attempts {
            match tx.insert_mark(target, requester_ip).await? {
                MarkInsert::Inserted(mark_id) => {
                    let count = tx.adjust_counter(target, CounterDelta::Increment).await?;
                    debug!(mark_id, like_count = count, "like mark inserted");
                    return Ok(true);
                }
                MarkInsert::AlreadyExists => {
                    // A concurrent toggle got there first. Its mark already
                    // stands for this requester, so the counter stays as is.
                    if tx.find_mark(target, requester_ip).await?.is_some() {
                        debug!(attempt, "concurrent like reconciled with existing mark");
                        return Ok(true);
                    }
                    warn!(attempt, "conflicting like mark vanished before lookup");
                }
            }
        }

        Err(DomainError::Conflict(format!(
            "could not settle like state for {} after {} attempts",
            target, self.max_attempts
        )))
    }
}

async fn unlike(
    tx: &mut dyn LikeTransaction,
    target: LikeTarget,
    mark_id: i32,
) -> Result<bool, DomainError> {
    if tx.delete_mark(target, mark_id).await? {
        let count = tx.adjust_counter(target, CounterDelta::Decrement).await?;
        debug!(mark_id, like_count = count, "like mark removed");
    } else {
        debug!(mark_id, "like mark already removed by a concurrent unlike");
    }
    Ok(false)
}

fn normalize_requester(requester_ip: &str) -> Result<&str, DomainError> {
    let trimmed = requester_ip.trim();
    if trimmed.is_empty() {
        return Err(DomainError::ValidationError(
            "requester identity must not be empty".into(),
        ));
    }
    Ok(trimmed)
}
