//! # Autofill User Script
//!
//! The two collaborators that sit on either side of the
//! [`PendingReplyCoordinator`](autofill_core::PendingReplyCoordinator):
//!
//! - [`AutofillUserScript`] receives page messages from a transport and
//!   registers the replies it expects.
//! - [`AutofillVaultManager`] asks a [`VaultDelegate`](autofill_protocols::VaultDelegate)
//!   for answers and delivers them.

pub mod request;
pub mod user_script;
pub mod vault_manager;

#[cfg(test)]
mod test_support;

pub use request::ScriptRequest;
pub use user_script::AutofillUserScript;
pub use vault_manager::AutofillVaultManager;
