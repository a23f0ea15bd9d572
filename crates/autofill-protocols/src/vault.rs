//! Vault records and the delegate that answers page requests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::VaultError;
use crate::message::AutofillDataRequest;
use crate::response::{AvailableInputTypes, ProviderStatus};

/// A saved login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub id: String,
    pub username: String,
    pub password: String,
}

/// A saved payment card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCard {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardholder_name: Option<String>,
    pub card_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_month: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_year: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_security_code: Option<String>,
}

/// A saved identity (name, address, contact details).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// What the user picked in response to an autofill prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutofillSelection {
    /// Dismissed, or nothing suitable.
    None,
    Credential(Credential),
    CreditCard(CreditCard),
    Identity(Identity),
}

/// The UI-owning collaborator that eventually supplies real answers.
///
/// Calls may take arbitrarily long (a prompt stays open until the user acts).
/// Implementations must not assume they are the only call in flight.
#[async_trait]
pub trait VaultDelegate: Send + Sync {
    /// Ask the user which record, if any, should fill the field.
    async fn select_autofill_data(
        &self,
        origin: Option<String>,
        request: AutofillDataRequest,
    ) -> Result<AutofillSelection, VaultError>;

    /// Report which kinds of data are saved for the origin.
    async fn available_input_types(
        &self,
        origin: Option<String>,
    ) -> Result<AvailableInputTypes, VaultError>;

    /// Ask the provider to unlock and report the resulting state.
    async fn unlock_provider(&self) -> Result<ProviderStatus, VaultError>;
}
