//! Keyed store of in-flight reply callbacks.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::cancellation::{CancellationPayload, CancellationPolicy};
use crate::stats::{ReplyStats, StatsSnapshot};

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;

/// Single-shot reply callback.
pub type ReplyCallback = Box<dyn FnOnce(Option<String>) + Send + 'static>;

/// One outstanding expectation of a reply.
struct PendingReply {
    /// Only used to correlate log lines.
    id: u64,
    callback: ReplyCallback,
}

impl PendingReply {
    fn resolve(self, response: Option<String>) {
        (self.callback)(response);
    }
}

/// Registry holding at most one pending reply per key.
///
/// Every mutation happens under a single lock, so `register`, `send`,
/// `cancel` and `cancel_all` are linearizable with respect to each other.
/// Callbacks run after the lock is released but before the call that
/// resolved them returns; a callback may therefore call back into the
/// registry.
///
/// Dropping the registry resolves whatever is still pending with the
/// cancellation payload for its key. The policy is always consulted outside
/// the lock.
pub struct ReplyRegistry<K> {
    pending: Mutex<HashMap<K, PendingReply>>,
    policy: CancellationPolicy<K>,
    next_id: AtomicU64,
    stats: ReplyStats,
}

impl<K> ReplyRegistry<K>
where
    K: Eq + Hash + fmt::Debug,
{
    /// Create a registry that cancels with each key's "no action" reply.
    pub fn new() -> Self
    where
        K: CancellationPayload + 'static,
    {
        Self::with_policy(CancellationPolicy::default())
    }

    /// Create a registry with a custom cancellation policy.
    pub fn with_policy(policy: CancellationPolicy<K>) -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            policy,
            next_id: AtomicU64::new(1),
            stats: ReplyStats::new(),
        }
    }

    /// The policy applied to superseded and cancelled replies.
    pub fn policy(&self) -> &CancellationPolicy<K> {
        &self.policy
    }

    /// Register a callback for `key`.
    ///
    /// Under the lock, the new callback replaces whatever was waiting under
    /// `key`. The replaced callback then runs with the cancellation payload
    /// after the lock is released and before this returns, so by the time it
    /// runs the new callback is already pending.
    pub fn register<F>(&self, key: K, callback: F)
    where
        F: FnOnce(Option<String>) + Send + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let superseded = {
            let mut pending = self.pending.lock();
            debug!(key = ?key, reply_id = id, "Registering pending reply");
            let previous = pending.remove_entry(&key);
            pending.insert(
                key,
                PendingReply {
                    id,
                    callback: Box::new(callback),
                },
            );
            previous
        };
        self.stats.record_registered();

        if let Some((key, previous)) = superseded {
            debug!(
                reply_id = previous.id,
                superseded_by = id,
                "Superseding pending reply"
            );
            self.stats.record_superseded();
            previous.resolve(self.policy.payload_for(&key));
        }
    }

    /// Deliver `response` to the callback waiting under `key`.
    ///
    /// Returns `false` when nothing is pending for `key`; the response is
    /// then dropped. That is the expected outcome when an answer races a
    /// supersede or a `cancel_all`.
    pub fn send<Q>(&self, key: &Q, response: Option<String>) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + fmt::Debug + ?Sized,
    {
        let entry = self.pending.lock().remove(key);
        match entry {
            Some(reply) => {
                debug!(key = ?key, reply_id = reply.id, "Delivering reply");
                self.stats.record_answered();
                reply.resolve(response);
                true
            }
            None => {
                trace!(key = ?key, "No pending reply, dropping response");
                self.stats.record_missed();
                false
            }
        }
    }

    /// Resolve the reply waiting under `key` with the cancellation payload.
    pub fn cancel<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + fmt::Debug + ?Sized,
    {
        let entry = self.pending.lock().remove_entry(key);
        match entry {
            Some((key, reply)) => {
                debug!(key = ?key, reply_id = reply.id, "Cancelling pending reply");
                self.stats.record_cancelled(1);
                reply.resolve(self.policy.payload_for(&key));
                true
            }
            None => false,
        }
    }

    /// Resolve every pending reply with the cancellation payload.
    ///
    /// Returns how many replies were resolved. The registry is empty when
    /// the lock is released; callbacks run afterwards.
    pub fn cancel_all(&self) -> usize {
        let drained: Vec<(K, PendingReply)> = {
            let mut pending = self.pending.lock();
            pending.drain().collect()
        };

        let count = drained.len();
        if count > 0 {
            debug!(count, "Cancelling all pending replies");
            self.stats.record_cancelled(count as u64);
        }

        for (key, reply) in drained {
            reply.resolve(self.policy.payload_for(&key));
        }
        count
    }

    /// Whether a reply is waiting under `key`.
    pub fn is_pending<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.pending.lock().contains_key(key)
    }

    /// Keys with a pending reply, in no particular order.
    pub fn pending_keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.pending.lock().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

impl<K> Default for ReplyRegistry<K>
where
    K: Eq + Hash + fmt::Debug + CancellationPayload + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> fmt::Debug for ReplyRegistry<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplyRegistry")
            .field("pending", &self.pending.lock().len())
            .field("policy", &self.policy)
            .finish()
    }
}

impl<K> Drop for ReplyRegistry<K> {
    fn drop(&mut self) {
        let remaining: Vec<(K, PendingReply)> = self.pending.get_mut().drain().collect();

        if !remaining.is_empty() {
            debug!(count = remaining.len(), "Resolving pending replies on teardown");
        }
        for (key, reply) in remaining {
            reply.resolve(self.policy.payload_for(&key));
        }
    }
}
