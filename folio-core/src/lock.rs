//! Advisory single-writer edit locks with time-based expiry.
//!
//! A lock is held by one editor per document. It becomes stale once
//! `acquired_at + ttl <= now`; a stale lock can be taken over by anyone.
//! Contention is routine, so nothing here returns an error.

use chrono::{DateTime, Duration, Utc};
use folio_types::{DocId, HolderId};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// How long a lock stays live without being re-acquired.
pub const DEFAULT_TTL: Duration = Duration::minutes(5);

/// A held lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditLock {
    pub document: DocId,
    pub holder: HolderId,
    pub acquired_at: DateTime<Utc>,
}

impl EditLock {
    pub fn is_stale(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.acquired_at + ttl <= now
    }
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Backing store for locks.
///
/// `try_acquire` must check staleness and write in one step; two
/// concurrent callers can never both see the lock as free.
pub trait LockStore: Send + Sync {
    /// Take the lock if it is free, stale, or already held by `holder`.
    fn try_acquire(&self, doc: &DocId, holder: &HolderId, now: DateTime<Utc>, ttl: Duration) -> bool;

    /// Drop the lock if `holder` holds it. Returns whether anything was removed.
    fn release(&self, doc: &DocId, holder: &HolderId) -> bool;

    fn get(&self, doc: &DocId) -> Option<EditLock>;
}

#[derive(Debug, Default)]
pub struct InMemoryLockStore {
    locks: Mutex<HashMap<DocId, EditLock>>,
}

impl InMemoryLockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every stale lock; returns how many were dropped.
    pub fn purge_stale(&self, now: DateTime<Utc>, ttl: Duration) -> usize {
        let mut locks = self.locks.lock();
        let before = locks.len();
        locks.retain(|_, lock| !lock.is_stale(now, ttl));
        before - locks.len()
    }

    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.lock().is_empty()
    }
}

impl LockStore for InMemoryLockStore {
    fn try_acquire(&self, doc: &DocId, holder: &HolderId, now: DateTime<Utc>, ttl: Duration) -> bool {
        let mut locks = self.locks.lock();
        if let Some(existing) = locks.get(doc) {
            if existing.holder != *holder && !existing.is_stale(now, ttl) {
                return false;
            }
        }
        locks.insert(
            doc.clone(),
            EditLock {
                document: doc.clone(),
                holder: holder.clone(),
                acquired_at: now,
            },
        );
        true
    }

    fn release(&self, doc: &DocId, holder: &HolderId) -> bool {
        let mut locks = self.locks.lock();
        match locks.get(doc) {
            Some(lock) if lock.holder == *holder => {
                locks.remove(doc);
                true
            }
            _ => false,
        }
    }

    fn get(&self, doc: &DocId) -> Option<EditLock> {
        self.locks.lock().get(doc).cloned()
    }
}

/// Grants and releases edit locks against a [`LockStore`].
pub struct EditLockCoordinator<S = InMemoryLockStore> {
    store: S,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl EditLockCoordinator<InMemoryLockStore> {
    pub fn in_memory() -> Self {
        Self::new(InMemoryLockStore::new())
    }
}

impl<S: LockStore> EditLockCoordinator<S> {
    pub const DEFAULT_TTL: Duration = self::DEFAULT_TTL;

    pub fn new(store: S) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            ttl: DEFAULT_TTL,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Try to take the edit lock on `doc` for `holder`.
    ///
    /// Succeeds when the document is unlocked, the existing lock is stale,
    /// or `holder` already holds it (which restarts the TTL).
    pub fn acquire(&self, doc: &DocId, holder: &HolderId) -> bool {
        let now = self.clock.now();
        let acquired = self.store.try_acquire(doc, holder, now, self.ttl);
        if acquired {
            debug!(document = %doc, holder = %holder, "edit lock acquired");
        } else {
            debug!(document = %doc, holder = %holder, "edit lock busy");
        }
        acquired
    }

    /// Release the lock if `holder` holds it; anyone else is ignored.
    pub fn release(&self, doc: &DocId, holder: &HolderId) {
        if self.store.release(doc, holder) {
            debug!(document = %doc, holder = %holder, "edit lock released");
        } else {
            debug!(document = %doc, holder = %holder, "release ignored, not the holder");
        }
    }

    /// Current live lock on `doc`, if any.
    pub fn holder(&self, doc: &DocId) -> Option<EditLock> {
        let now = self.clock.now();
        self.store
            .get(doc)
            .filter(|lock| !lock.is_stale(now, self.ttl))
    }
}
