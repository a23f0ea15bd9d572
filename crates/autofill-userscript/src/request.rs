//! Parsed page requests.

use autofill_protocols::{AutofillDataRequest, BridgeError, InboundMessage, MessageType};

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;

/// A validated, reply-bearing page request.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptRequest {
    GetAutofillData {
        origin: Option<String>,
        request: AutofillDataRequest,
    },
    GetAutofillDataFocus {
        origin: Option<String>,
        request: AutofillDataRequest,
    },
    GetAvailableInputTypes {
        origin: Option<String>,
    },
    AskToUnlockProvider,
}

impl ScriptRequest {
    /// Validate an inbound message.
    ///
    /// Fails on unknown names and on autofill bodies without a `mainType`.
    pub fn parse(message: &InboundMessage) -> Result<Self, BridgeError> {
        let origin = message.origin.clone();
        let request = match message.message_type()? {
            MessageType::GetAutofillData => ScriptRequest::GetAutofillData {
                origin,
                request: AutofillDataRequest::from_body(&message.body)?,
            },
            MessageType::GetAutofillDataFocus => ScriptRequest::GetAutofillDataFocus {
                origin,
                request: AutofillDataRequest::from_body(&message.body)?,
            },
            MessageType::GetAvailableInputTypes => {
                ScriptRequest::GetAvailableInputTypes { origin }
            }
            MessageType::AskToUnlockProvider => ScriptRequest::AskToUnlockProvider,
        };
        Ok(request)
    }

    /// The key the reply is registered under.
    pub fn message_type(&self) -> MessageType {
        match self {
            ScriptRequest::GetAutofillData { .. } => MessageType::GetAutofillData,
            ScriptRequest::GetAutofillDataFocus { .. } => MessageType::GetAutofillDataFocus,
            ScriptRequest::GetAvailableInputTypes { .. } => MessageType::GetAvailableInputTypes,
            ScriptRequest::AskToUnlockProvider => MessageType::AskToUnlockProvider,
        }
    }
}
