//! Vault delegate errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Vault is locked")]
    Locked,

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Prompt dismissed: {0}")]
    PromptDismissed(String),

    #[error("Vault backend error: {0}")]
    Backend(String),
}
