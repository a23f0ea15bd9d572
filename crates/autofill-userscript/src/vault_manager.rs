//! Drives the vault delegate and answers through the coordinator.
//!
//! Each dispatched request runs as its own tokio task. The task asks the
//! delegate, encodes the answer and hands it to
//! [`PendingReplyCoordinator::send`]. When the delegate fails the page still
//! gets an answer: the no-action payload for that message type.

use std::collections::HashMap;
use std::sync::Arc;

use autofill_core::PendingReplyCoordinator;
use autofill_protocols::{
    AutofillResponse, AvailableInputTypesResponse, MessageType, ProviderStatusResponse,
    ProviderStatusSuccess, VaultDelegate, VaultError,
};
use parking_lot::Mutex;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

use crate::request::ScriptRequest;

#[cfg(test)]
#[path = "vault_manager_tests.rs"]
mod tests;

#[derive(Debug, Error)]
enum DispatchError {
    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error("Failed to encode reply: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Answers page requests on behalf of a [`VaultDelegate`].
pub struct AutofillVaultManager {
    delegate: Arc<dyn VaultDelegate>,
    replies: PendingReplyCoordinator,
    in_flight: Mutex<HashMap<MessageType, AbortHandle>>,
}

impl AutofillVaultManager {
    pub fn new(delegate: Arc<dyn VaultDelegate>, replies: PendingReplyCoordinator) -> Self {
        Self {
            delegate,
            replies,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Start answering `request`.
    ///
    /// Any task still working on the same message type is aborted first.
    /// Outside a tokio runtime the request is answered with no action.
    pub fn dispatch(&self, request: ScriptRequest) {
        let message_type = request.message_type();

        let runtime = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                warn!("No runtime to dispatch {} on: {}", message_type, e);
                self.replies
                    .send(&message_type, self.replies.no_action_response(&message_type));
                return;
            }
        };

        let delegate = self.delegate.clone();
        let replies = self.replies.clone();
        let task = runtime.spawn(async move {
            let payload = match answer(delegate.as_ref(), request).await {
                Ok(payload) => Some(payload),
                Err(e) => {
                    warn!("Vault failed to answer {}: {}", message_type, e);
                    replies.no_action_response(&message_type)
                }
            };
            if !replies.send(&message_type, payload) {
                debug!("Reply to {} had no waiter", message_type);
            }
        });

        let previous = self
            .in_flight
            .lock()
            .insert(message_type, task.abort_handle());
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Abort the in-flight task for `message_type`, if any.
    pub fn abort(&self, message_type: MessageType) -> bool {
        match self.in_flight.lock().remove(&message_type) {
            Some(handle) => {
                let running = !handle.is_finished();
                handle.abort();
                if running {
                    debug!("Aborted in-flight {}", message_type);
                }
                running
            }
            None => false,
        }
    }

    /// Abort every in-flight task. Returns how many were still running.
    pub fn abort_all(&self) -> usize {
        let drained: Vec<_> = self.in_flight.lock().drain().collect();
        drained
            .into_iter()
            .filter(|(_, handle)| {
                let running = !handle.is_finished();
                handle.abort();
                running
            })
            .count()
    }

    /// Number of delegate calls still running.
    pub fn in_flight(&self) -> usize {
        self.in_flight
            .lock()
            .values()
            .filter(|handle| !handle.is_finished())
            .count()
    }
}

impl Drop for AutofillVaultManager {
    fn drop(&mut self) {
        for (_, handle) in self.in_flight.get_mut().drain() {
            handle.abort();
        }
    }
}

async fn answer(
    delegate: &dyn VaultDelegate,
    request: ScriptRequest,
) -> Result<String, DispatchError> {
    let payload = match request {
        ScriptRequest::GetAutofillData { origin, request }
        | ScriptRequest::GetAutofillDataFocus { origin, request } => {
            let selection = delegate.select_autofill_data(origin, request).await?;
            AutofillResponse::from_selection(selection).to_json()?
        }
        ScriptRequest::GetAvailableInputTypes { origin } => {
            let types = delegate.available_input_types(origin).await?;
            AvailableInputTypesResponse::new(types).to_json()?
        }
        ScriptRequest::AskToUnlockProvider => {
            let status = delegate.unlock_provider().await?;
            ProviderStatusResponse::new(ProviderStatusSuccess { status }).to_json()?
        }
    };
    Ok(payload)
}
