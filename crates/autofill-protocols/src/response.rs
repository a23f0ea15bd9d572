//! Reply payloads sent back to page scripts.
//!
//! Every reply is wrapped in a `{"success": ...}` envelope. Autofill replies
//! carry an `action` tag; the "no action" reply is distinguished from a fill
//! purely by that tag, so a page decodes both with one schema.

use serde::{Deserialize, Serialize};

use crate::vault::{AutofillSelection, Credential, CreditCard, Identity};

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;

/// Encoded form of [`AutofillResponse::no_action`].
pub const NO_ACTION_JSON: &str = r#"{"success":{"action":"none"}}"#;

/// Encoded form of [`AvailableInputTypesResponse::none`]: nothing is saved.
pub const NO_INPUT_TYPES_JSON: &str =
    r#"{"success":{"credentials":false,"identities":false,"creditCards":false,"email":false}}"#;

/// Encoded form of [`ProviderStatusResponse::locked`].
pub const PROVIDER_LOCKED_JSON: &str = r#"{"success":{"status":"locked"}}"#;

/// The `{"success": ...}` envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply<T> {
    pub success: T,
}

impl<T: Serialize> Reply<T> {
    pub fn new(success: T) -> Self {
        Self { success }
    }

    /// Encode to the string form handed to the transport.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// What the page should do with an autofill reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AutofillAction {
    None,
    Fill,
}

/// Body of an autofill reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutofillSuccess {
    pub action: AutofillAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credential>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identities: Option<Identity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_cards: Option<CreditCard>,
}

/// Reply to `getAutofillData` and `getAutofillDataFocus`.
pub type AutofillResponse = Reply<AutofillSuccess>;

impl Reply<AutofillSuccess> {
    /// The reply that tells the page to do nothing.
    pub fn no_action() -> Self {
        Reply::new(AutofillSuccess {
            action: AutofillAction::None,
            credentials: None,
            identities: None,
            credit_cards: None,
        })
    }

    /// Build a reply from the delegate's selection.
    pub fn from_selection(selection: AutofillSelection) -> Self {
        let mut response = Self::no_action();
        match selection {
            AutofillSelection::None => {}
            AutofillSelection::Credential(credential) => {
                response.success.action = AutofillAction::Fill;
                response.success.credentials = Some(credential);
            }
            AutofillSelection::Identity(identity) => {
                response.success.action = AutofillAction::Fill;
                response.success.identities = Some(identity);
            }
            AutofillSelection::CreditCard(card) => {
                response.success.action = AutofillAction::Fill;
                response.success.credit_cards = Some(card);
            }
        }
        response
    }

    pub fn is_no_action(&self) -> bool {
        self.success.action == AutofillAction::None
    }
}

/// Which kinds of saved data exist for an origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableInputTypes {
    pub credentials: bool,
    pub identities: bool,
    pub credit_cards: bool,
    pub email: bool,
}

/// Reply to `getAvailableInputTypes`.
pub type AvailableInputTypesResponse = Reply<AvailableInputTypes>;

impl Reply<AvailableInputTypes> {
    /// The reply that offers nothing.
    pub fn none() -> Self {
        Reply::new(AvailableInputTypes::default())
    }
}

/// Lock state of the vault provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProviderStatus {
    Locked,
    Unlocked,
}

/// Body of a provider status reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderStatusSuccess {
    pub status: ProviderStatus,
}

/// Reply to `askToUnlockProvider`.
pub type ProviderStatusResponse = Reply<ProviderStatusSuccess>;

impl Reply<ProviderStatusSuccess> {
    /// The reply that leaves the provider locked.
    pub fn locked() -> Self {
        Reply::new(ProviderStatusSuccess {
            status: ProviderStatus::Locked,
        })
    }
}
