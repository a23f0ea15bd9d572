//! The handle transports and vault integrations share.
//!
//! [`PendingReplyCoordinator`] is the only thing callers need to know about:
//! it wraps a [`ReplyRegistry`] behind an `Arc` so the user script that
//! registers replies and the vault manager that answers them can each hold a
//! clone, and it never exposes the registry's map or lock.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use autofill_protocols::MessageType;
use serde::Serialize;
use tokio::sync::oneshot;

use crate::cancellation::{CancellationPayload, CancellationPolicy};
use crate::registry::ReplyRegistry;
use crate::stats::StatsSnapshot;

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;

/// Receiving half of [`PendingReplyCoordinator::register_channel`].
pub type ReplyReceiver = oneshot::Receiver<Option<String>>;

/// Observable state of one key.
///
/// A resolved reply is removed immediately, so after resolution a key reads
/// as `Unregistered` again until the next `register`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyState {
    Unregistered,
    Pending,
}

/// Cloneable façade over a shared [`ReplyRegistry`].
pub struct PendingReplyCoordinator<K = MessageType> {
    registry: Arc<ReplyRegistry<K>>,
}

impl<K> PendingReplyCoordinator<K>
where
    K: Eq + Hash + fmt::Debug,
{
    /// Create a coordinator that cancels with each key's "no action" reply.
    pub fn new() -> Self
    where
        K: CancellationPayload + 'static,
    {
        Self::with_policy(CancellationPolicy::default())
    }

    pub fn with_policy(policy: CancellationPolicy<K>) -> Self {
        Self {
            registry: Arc::new(ReplyRegistry::with_policy(policy)),
        }
    }

    /// Expect exactly one reply for `key`, delivered to `callback`.
    ///
    /// Supersedes (and resolves with "no action") any reply already
    /// pending for `key`.
    pub fn register<F>(&self, key: K, callback: F)
    where
        F: FnOnce(Option<String>) + Send + 'static,
    {
        self.registry.register(key, callback);
    }

    /// Like [`register`](Self::register), but hands back a receiver
    /// instead of taking a callback.
    pub fn register_channel(&self, key: K) -> ReplyReceiver {
        let (tx, rx) = oneshot::channel();
        self.registry.register(key, move |response| {
            // The waiter may have given up; nothing to do then.
            let _ = tx.send(response);
        });
        rx
    }

    /// Deliver an already-encoded response. Returns whether anyone was waiting.
    pub fn send<Q>(&self, key: &Q, response: Option<String>) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + fmt::Debug + ?Sized,
    {
        self.registry.send(key, response)
    }

    /// Encode `response` as JSON and deliver it.
    ///
    /// Fails only if encoding fails, in which case nothing is resolved.
    pub fn send_response<Q, T>(&self, key: &Q, response: &T) -> Result<bool, serde_json::Error>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + fmt::Debug + ?Sized,
        T: Serialize + ?Sized,
    {
        let encoded = serde_json::to_string(response)?;
        Ok(self.registry.send(key, Some(encoded)))
    }

    /// Resolve one key with the cancellation payload.
    pub fn cancel<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + fmt::Debug + ?Sized,
    {
        self.registry.cancel(key)
    }

    /// Resolve everything pending. Call on navigation or teardown.
    pub fn cancel_all(&self) -> usize {
        self.registry.cancel_all()
    }

    /// The payload a superseded or cancelled reply under `key` receives.
    pub fn no_action_response(&self, key: &K) -> Option<String> {
        self.registry.policy().payload_for(key)
    }

    pub fn state<Q>(&self, key: &Q) -> ReplyState
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        if self.registry.is_pending(key) {
            ReplyState::Pending
        } else {
            ReplyState::Unregistered
        }
    }

    pub fn pending_count(&self) -> usize {
        self.registry.len()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.registry.stats()
    }
}

impl<K> Clone for PendingReplyCoordinator<K> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
        }
    }
}

impl<K> Default for PendingReplyCoordinator<K>
where
    K: Eq + Hash + fmt::Debug + CancellationPayload + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> fmt::Debug for PendingReplyCoordinator<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingReplyCoordinator")
            .field("registry", &self.registry)
            .finish()
    }
}
