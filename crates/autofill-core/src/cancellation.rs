//! Payload used to resolve replies that were never genuinely answered.

use std::fmt;
use std::sync::Arc;

use autofill_protocols::{MessageType, NO_ACTION_JSON};

/// Keys that know which reply tells the page "nothing happened".
///
/// The payload must decode with the same schema as a real reply for the key.
pub trait CancellationPayload {
    fn cancellation_payload(&self) -> Option<String>;
}

impl CancellationPayload for MessageType {
    fn cancellation_payload(&self) -> Option<String> {
        Some(self.no_action_json().to_string())
    }
}

/// Message names resolve like their [`MessageType`]; other names get the
/// autofill "no action" reply.
impl CancellationPayload for str {
    fn cancellation_payload(&self) -> Option<String> {
        let payload = self
            .parse::<MessageType>()
            .map(|message_type| message_type.no_action_json())
            .unwrap_or(NO_ACTION_JSON);
        Some(payload.to_string())
    }
}

impl CancellationPayload for String {
    fn cancellation_payload(&self) -> Option<String> {
        self.as_str().cancellation_payload()
    }
}

impl<T: CancellationPayload + ?Sized> CancellationPayload for &T {
    fn cancellation_payload(&self) -> Option<String> {
        (**self).cancellation_payload()
    }
}

type PayloadFn<K> = dyn Fn(&K) -> Option<String> + Send + Sync;

/// Decides what a superseded or cancelled reply receives.
///
/// The default asks the key for its own "no action" reply, so a cancelled
/// `getAvailableInputTypes` decodes as an input-types reply and a cancelled
/// autofill request as `{"success":{"action":"none"}}`.
pub struct CancellationPolicy<K> {
    payload: Arc<PayloadFn<K>>,
}

impl<K: 'static> CancellationPolicy<K> {
    /// Resolve every key with the same caller-chosen payload.
    pub fn with_payload(payload: impl Into<String>) -> Self {
        let payload = payload.into();
        Self::from_fn(move |_| Some(payload.clone()))
    }

    /// Compute the payload from the key being resolved.
    pub fn from_fn<F>(payload: F) -> Self
    where
        F: Fn(&K) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            payload: Arc::new(payload),
        }
    }
}

impl<K> CancellationPolicy<K> {
    /// The payload handed to a resolved callback registered under `key`.
    pub fn payload_for(&self, key: &K) -> Option<String> {
        (self.payload)(key)
    }
}

impl<K: CancellationPayload + 'static> CancellationPolicy<K> {
    /// Resolve with each key's own "no action" reply.
    pub fn no_action() -> Self {
        Self::from_fn(K::cancellation_payload)
    }
}

impl<K: CancellationPayload + 'static> Default for CancellationPolicy<K> {
    fn default() -> Self {
        Self::no_action()
    }
}

impl<K> Clone for CancellationPolicy<K> {
    fn clone(&self) -> Self {
        Self {
            payload: self.payload.clone(),
        }
    }
}

impl<K> fmt::Debug for CancellationPolicy<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationPolicy").finish_non_exhaustive()
    }
}
