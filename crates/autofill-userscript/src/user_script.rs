//! Transport-facing half of the bridge.

use std::sync::Arc;
use std::time::Duration;

use autofill_config::BridgeConfig;
use autofill_core::{PendingReplyCoordinator, ReplyReceiver};
use autofill_protocols::{BridgeError, InboundMessage, MessageType, VaultDelegate};
use tracing::{debug, info, warn};

use crate::request::ScriptRequest;
use crate::vault_manager::AutofillVaultManager;

#[cfg(test)]
#[path = "user_script_tests.rs"]
mod tests;

/// One per page context.
///
/// Registers an expected reply for every valid request and lets the vault
/// manager answer it. A newer request of the same type supersedes the older
/// one, which is answered with no action right away.
pub struct AutofillUserScript {
    replies: PendingReplyCoordinator,
    vault: AutofillVaultManager,
    reply_timeout: Option<Duration>,
}

impl AutofillUserScript {
    pub fn new(delegate: Arc<dyn VaultDelegate>, config: &BridgeConfig) -> Self {
        let replies = PendingReplyCoordinator::new();
        let vault = AutofillVaultManager::new(delegate, replies.clone());
        Self {
            replies,
            vault,
            reply_timeout: config.reply_timeout(),
        }
    }

    /// Accept a message and return the receiver its reply arrives on.
    ///
    /// Invalid messages are rejected before anything is registered.
    pub fn handle_message(&self, message: &InboundMessage) -> Result<ReplyReceiver, BridgeError> {
        self.accept(message).map(|(_, receiver)| receiver)
    }

    /// Like [`handle_message`](Self::handle_message), also returning the
    /// message type the reply was registered under.
    pub fn accept(
        &self,
        message: &InboundMessage,
    ) -> Result<(MessageType, ReplyReceiver), BridgeError> {
        let request = ScriptRequest::parse(message).inspect_err(|e| {
            warn!("Rejected message {}: {}", message.name, e);
        })?;
        let message_type = request.message_type();

        self.vault.abort(message_type);
        let receiver = self.replies.register_channel(message_type);
        debug!(
            id = message.id.as_deref().unwrap_or("-"),
            "Dispatching {}", message_type
        );
        self.vault.dispatch(request);

        Ok((message_type, receiver))
    }

    /// Accept a message and wait for its reply, bounded by the reply timeout.
    pub async fn handle_message_and_wait(
        &self,
        message: &InboundMessage,
    ) -> Result<Option<String>, BridgeError> {
        let (message_type, receiver) = self.accept(message)?;
        self.wait_for_reply(message_type, receiver).await
    }

    /// Await a receiver obtained from [`handle_message`](Self::handle_message).
    ///
    /// A timeout only stops the wait; the reply stays registered.
    pub async fn wait_for_reply(
        &self,
        message_type: MessageType,
        receiver: ReplyReceiver,
    ) -> Result<Option<String>, BridgeError> {
        let outcome = match self.reply_timeout {
            Some(timeout) => tokio::time::timeout(timeout, receiver).await.map_err(|_| {
                BridgeError::Timeout {
                    message_type: message_type.to_string(),
                    timeout_ms: timeout.as_millis() as u64,
                }
            })?,
            None => receiver.await,
        };
        outcome.map_err(|_| BridgeError::Closed)
    }

    /// Page navigated or the context is going away: answer everything
    /// outstanding with no action.
    pub fn reset(&self) -> usize {
        let aborted = self.vault.abort_all();
        let cancelled = self.replies.cancel_all();
        if cancelled > 0 || aborted > 0 {
            info!(
                "Reset user script: {} replies cancelled, {} vault calls aborted",
                cancelled, aborted
            );
        }
        cancelled
    }

    /// The coordinator replies are registered with.
    pub fn replies(&self) -> &PendingReplyCoordinator {
        &self.replies
    }

    pub fn reply_timeout(&self) -> Option<Duration> {
        self.reply_timeout
    }
}

impl Drop for AutofillUserScript {
    fn drop(&mut self) {
        self.reset();
    }
}
