//! Per-key async mutexes.
//!
//! The booking manager holds one mutex per room while it checks overlaps and
//! writes. Requests for disjoint rooms never contend; requests sharing a room
//! are serialized.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// A lazily populated set of async mutexes, one per key.
#[derive(Debug)]
pub struct KeyedLocks<K> {
    slots: Mutex<HashMap<K, Arc<AsyncMutex<()>>>>,
}

impl<K> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }
}

/// Guards for a set of keys; dropping it releases every key.
#[derive(Debug)]
#[must_use = "the keys are released as soon as the guard is dropped"]
pub struct KeyedGuard {
    guards: Vec<OwnedMutexGuard<()>>,
}

impl KeyedGuard {
    /// Number of keys held
    #[must_use]
    pub fn len(&self) -> usize {
        self.guards.len()
    }

    /// Whether no key is held
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

impl<K> KeyedLocks<K>
where
    K: Copy + Ord + Hash,
{
    /// Create an empty lock set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire every key in `keys`.
    ///
    /// Keys are deduplicated and taken in ascending order, so concurrent
    /// callers with overlapping key sets cannot deadlock.
    pub async fn lock_all(&self, keys: &[K]) -> KeyedGuard {
        let mut ordered = keys.to_vec();
        ordered.sort_unstable();
        ordered.dedup();

        // Resolve the mutexes first; the slot table is never held across an await.
        let mutexes: Vec<Arc<AsyncMutex<()>>> = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            ordered
                .iter()
                .map(|key| Arc::clone(slots.entry(*key).or_default()))
                .collect()
        };

        let mut guards = Vec::with_capacity(mutexes.len());
        for mutex in mutexes {
            guards.push(mutex.lock_owned().await);
        }
        KeyedGuard { guards }
    }

    #[cfg(test)]
    fn key_count(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_duplicate_keys_are_taken_once() {
        let locks = KeyedLocks::new();
        let guard = locks.lock_all(&[3, 1, 3, 2]).await;
        assert_eq!(guard.len(), 3);
        assert_eq!(locks.key_count(), 3);
    }

    #[tokio::test]
    async fn test_shared_key_blocks_until_released() {
        let locks = Arc::new(KeyedLocks::new());
        let guard = locks.lock_all(&[1, 2]).await;

        let contender = Arc::clone(&locks);
        let waiting = tokio::spawn(async move { contender.lock_all(&[2, 3]).await.len() });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiting.is_finished());

        drop(guard);
        let held = tokio::time::timeout(Duration::from_secs(1), waiting)
            .await
            .ok()
            .and_then(Result::ok);
        assert_eq!(held, Some(2));
    }

    #[tokio::test]
    async fn test_disjoint_keys_do_not_contend() {
        let locks = KeyedLocks::new();
        let _first = locks.lock_all(&[1]).await;
        let second = tokio::time::timeout(Duration::from_millis(100), locks.lock_all(&[2])).await;
        assert!(second.is_ok());
    }
}
