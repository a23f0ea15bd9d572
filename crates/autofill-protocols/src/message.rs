//! Inbound message definitions.
//!
//! Page scripts post messages by name. Only reply-bearing names are modelled
//! here; each [`MessageType`] doubles as the key under which at most one reply
//! may be outstanding at a time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BridgeError;
use crate::response::{NO_ACTION_JSON, NO_INPUT_TYPES_JSON, PROVIDER_LOCKED_JSON};

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;

/// Reply-bearing message names understood by the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageType {
    /// User asked to fill a field from the vault.
    GetAutofillData,
    /// A field gained focus and the page wants to know whether to offer a fill.
    GetAutofillDataFocus,
    /// Which kinds of saved data exist for the current origin.
    GetAvailableInputTypes,
    /// The page asks the vault provider to unlock.
    AskToUnlockProvider,
}

impl MessageType {
    /// Every known message type.
    pub const ALL: [MessageType; 4] = [
        MessageType::GetAutofillData,
        MessageType::GetAutofillDataFocus,
        MessageType::GetAvailableInputTypes,
        MessageType::AskToUnlockProvider,
    ];

    /// Wire name of the message.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::GetAutofillData => "getAutofillData",
            MessageType::GetAutofillDataFocus => "getAutofillDataFocus",
            MessageType::GetAvailableInputTypes => "getAvailableInputTypes",
            MessageType::AskToUnlockProvider => "askToUnlockProvider",
        }
    }

    /// Encoded reply that tells the page nothing happened.
    ///
    /// Decodes with the same schema as a real reply to this message type.
    pub fn no_action_json(&self) -> &'static str {
        match self {
            MessageType::GetAutofillData | MessageType::GetAutofillDataFocus => NO_ACTION_JSON,
            MessageType::GetAvailableInputTypes => NO_INPUT_TYPES_JSON,
            MessageType::AskToUnlockProvider => PROVIDER_LOCKED_JSON,
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageType {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MessageType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| BridgeError::UnknownMessageType(s.to_string()))
    }
}

/// A message as delivered by a transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Transport-assigned id, echoed back with the reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Message name (e.g. `getAutofillDataFocus`).
    pub name: String,
    /// Host of the frame that posted the message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// Message body.
    #[serde(default)]
    pub body: Value,
}

impl InboundMessage {
    /// Create a new message with an empty body.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            origin: None,
            body: Value::Null,
        }
    }

    /// Set the transport id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the sending origin.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Set the body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    /// Resolve the message name to a known type.
    pub fn message_type(&self) -> Result<MessageType, BridgeError> {
        self.name.parse()
    }
}

/// Kind of vault data a field wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MainType {
    Credentials,
    Identities,
    CreditCards,
}

/// What caused the page to ask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Trigger {
    UserInitiated,
    Autoprompt,
    PasswordGeneration,
}

/// Body of `getAutofillData` and `getAutofillDataFocus`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutofillDataRequest {
    pub main_type: MainType,
    /// Field subtype, e.g. `cardNumber` or `username`.
    #[serde(default)]
    pub sub_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<Trigger>,
}

impl AutofillDataRequest {
    pub fn new(main_type: MainType, sub_type: impl Into<String>) -> Self {
        Self {
            main_type,
            sub_type: sub_type.into(),
            trigger: None,
        }
    }

    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = Some(trigger);
        self
    }

    /// Parse a request body.
    ///
    /// A body without `mainType` is rejected before anything is registered.
    pub fn from_body(body: &Value) -> Result<Self, BridgeError> {
        let object = body
            .as_object()
            .ok_or_else(|| BridgeError::InvalidBody("body must be a JSON object".to_string()))?;

        let main_type = object
            .get("mainType")
            .filter(|v| !v.is_null())
            .ok_or_else(|| BridgeError::MissingField("mainType".to_string()))?;
        let main_type: MainType = serde_json::from_value(main_type.clone())
            .map_err(|e| BridgeError::InvalidBody(format!("mainType: {}", e)))?;

        let sub_type = object
            .get("subType")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let trigger = match object.get("trigger") {
            None | Some(Value::Null) => None,
            Some(value) => Some(
                serde_json::from_value(value.clone())
                    .map_err(|e| BridgeError::InvalidBody(format!("trigger: {}", e)))?,
            ),
        };

        Ok(Self {
            main_type,
            sub_type,
            trigger,
        })
    }
}
