//! # Autofill Protocols
//!
//! Wire schema and collaborator definitions for the autofill bridge.
//! Contains only types and interface definitions - no coordination logic.
//!
//! ## Contents
//!
//! - [`MessageType`] - Closed set of reply-bearing message names sent by page scripts
//! - [`InboundMessage`] - A request as delivered by a transport
//! - [`AutofillResponse`] - The `{"success": {"action": ...}}` reply envelope
//! - [`VaultDelegate`] - Trait for the UI-owning collaborator that answers requests

pub mod error;
pub mod message;
pub mod response;
pub mod vault;

pub use error::{BridgeError, VaultError};
pub use message::{AutofillDataRequest, InboundMessage, MainType, MessageType, Trigger};
pub use response::{
    AutofillAction, AutofillResponse, AutofillSuccess, AvailableInputTypes,
    AvailableInputTypesResponse, NO_ACTION_JSON, NO_INPUT_TYPES_JSON, PROVIDER_LOCKED_JSON,
    ProviderStatus, ProviderStatusResponse, ProviderStatusSuccess, Reply,
};
pub use vault::{AutofillSelection, Credential, CreditCard, Identity, VaultDelegate};
