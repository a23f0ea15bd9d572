use super::*;
use autofill_protocols::{MainType, Trigger};
use serde_json::json;

#[test]
fn test_parse_autofill_data() {
    let message = InboundMessage::new("getAutofillData")
        .with_origin("shop.example")
        .with_body(json!({
            "mainType": "creditCards",
            "subType": "cardNumber",
            "trigger": "userInitiated"
        }));

    let request = ScriptRequest::parse(&message).unwrap();
    assert_eq!(request.message_type(), MessageType::GetAutofillData);
    match request {
        ScriptRequest::GetAutofillData { origin, request } => {
            assert_eq!(origin.as_deref(), Some("shop.example"));
            assert_eq!(request.main_type, MainType::CreditCards);
            assert_eq!(request.sub_type, "cardNumber");
            assert_eq!(request.trigger, Some(Trigger::UserInitiated));
        }
        other => panic!("unexpected request: {:?}", other),
    }
}

#[test]
fn test_parse_focus_request() {
    let message = InboundMessage::new("getAutofillDataFocus")
        .with_body(json!({"mainType": "credentials", "subType": "username"}));

    let request = ScriptRequest::parse(&message).unwrap();
    assert_eq!(request.message_type(), MessageType::GetAutofillDataFocus);
}

#[test]
fn test_parse_ignores_body_for_input_types() {
    let message = InboundMessage::new("getAvailableInputTypes").with_origin("example.com");
    let request = ScriptRequest::parse(&message).unwrap();
    assert_eq!(
        request,
        ScriptRequest::GetAvailableInputTypes {
            origin: Some("example.com".to_string())
        }
    );
}

#[test]
fn test_parse_unlock() {
    let message = InboundMessage::new("askToUnlockProvider");
    assert_eq!(
        ScriptRequest::parse(&message).unwrap(),
        ScriptRequest::AskToUnlockProvider
    );
}

#[test]
fn test_parse_missing_main_type() {
    let message =
        InboundMessage::new("getAutofillDataFocus").with_body(json!({"subType": "cardNumber"}));
    let result = ScriptRequest::parse(&message);
    assert!(matches!(result, Err(BridgeError::MissingField(ref f)) if f == "mainType"));
}

#[test]
fn test_parse_unknown_name() {
    let message = InboundMessage::new("storeFormData");
    let result = ScriptRequest::parse(&message);
    assert!(matches!(result, Err(BridgeError::UnknownMessageType(_))));
}
