// src/services/authority_locks.rs
//
// Per-authority async mutex.
//
// Callbacks for the same authority are serialized from lookup to persist;
// callbacks for different authorities never wait on each other. Entries
// are dropped from the map when the last holder releases.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Default)]
pub struct AuthorityLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

/// Held while one callback owns its authority.
pub struct AuthorityGuard<'a> {
    owner: &'a AuthorityLocks,
    authority: String,
    _held: OwnedMutexGuard<()>,
}

impl AuthorityLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self) -> MutexGuard<'_, HashMap<String, Arc<AsyncMutex<()>>>> {
        self.locks.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub async fn acquire(&self, authority: &str) -> AuthorityGuard<'_> {
        let mutex = {
            let mut map = self.map();
            Arc::clone(map.entry(authority.to_string()).or_default())
        };
        let held = mutex.lock_owned().await;
        AuthorityGuard {
            owner: self,
            authority: authority.to_string(),
            _held: held,
        }
    }

    /// Number of authorities currently locked or awaited.
    pub fn active(&self) -> usize {
        self.map().len()
    }
}

impl Drop for AuthorityGuard<'_> {
    fn drop(&mut self) {
        let mut map = self.owner.map();
        // Map + this guard only: nobody is queued behind us.
        let idle = map
            .get(&self.authority)
            .map_or(false, |m| Arc::strong_count(m) <= 2);
        if idle {
            map.remove(&self.authority);
        }
    }
}
