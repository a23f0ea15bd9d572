use super::*;

fn test_card() -> CreditCard {
    CreditCard {
        id: "card-1".to_string(),
        title: "Visa".to_string(),
        cardholder_name: Some("Dax Smith".to_string()),
        card_number: "4111111111111111".to_string(),
        expiration_month: Some(12),
        expiration_year: Some(2030),
        card_security_code: None,
    }
}

#[test]
fn test_no_action_encodes_to_constant() {
    let json = AutofillResponse::no_action().to_json().unwrap();
    assert_eq!(json, NO_ACTION_JSON);
}

#[test]
fn test_no_action_constant_decodes_with_same_schema() {
    let response: AutofillResponse = serde_json::from_str(NO_ACTION_JSON).unwrap();
    assert!(response.is_no_action());
    assert!(response.success.credit_cards.is_none());
    assert!(response.success.credentials.is_none());
    assert!(response.success.identities.is_none());
}

#[test]
fn test_fill_from_credit_card_selection() {
    let response = AutofillResponse::from_selection(AutofillSelection::CreditCard(test_card()));
    assert_eq!(response.success.action, AutofillAction::Fill);

    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["success"]["action"], "fill");
    assert_eq!(value["success"]["creditCards"]["cardNumber"], "4111111111111111");
    assert_eq!(value["success"]["creditCards"]["expirationYear"], 2030);
    assert!(value["success"]["creditCards"].get("cardSecurityCode").is_none());
    assert!(value["success"].get("credentials").is_none());
}

#[test]
fn test_fill_from_credential_selection() {
    let response = AutofillResponse::from_selection(AutofillSelection::Credential(Credential {
        id: "1".to_string(),
        username: "dax@example.com".to_string(),
        password: "hunter2".to_string(),
    }));
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["success"]["action"], "fill");
    assert_eq!(value["success"]["credentials"]["username"], "dax@example.com");
}

#[test]
fn test_none_selection_is_no_action() {
    let response = AutofillResponse::from_selection(AutofillSelection::None);
    assert_eq!(response.to_json().unwrap(), NO_ACTION_JSON);
}

#[test]
fn test_fill_response_distinguished_by_action_tag() {
    let json = AutofillResponse::from_selection(AutofillSelection::CreditCard(test_card()))
        .to_json()
        .unwrap();
    let decoded: AutofillResponse = serde_json::from_str(&json).unwrap();
    assert!(!decoded.is_no_action());
    assert_eq!(decoded.success.credit_cards, Some(test_card()));
}

#[test]
fn test_available_input_types_encoding() {
    let response = AvailableInputTypesResponse::new(AvailableInputTypes {
        credentials: true,
        credit_cards: true,
        ..Default::default()
    });
    assert_eq!(
        response.to_json().unwrap(),
        r#"{"success":{"credentials":true,"identities":false,"creditCards":true,"email":false}}"#
    );
}

#[test]
fn test_provider_status_encoding() {
    let response = ProviderStatusResponse::new(ProviderStatusSuccess {
        status: ProviderStatus::Unlocked,
    });
    assert_eq!(response.to_json().unwrap(), r#"{"success":{"status":"unlocked"}}"#);
}

#[test]
fn test_no_input_types_encodes_to_constant() {
    assert_eq!(
        AvailableInputTypesResponse::none().to_json().unwrap(),
        NO_INPUT_TYPES_JSON
    );
    let decoded: AvailableInputTypesResponse = serde_json::from_str(NO_INPUT_TYPES_JSON).unwrap();
    assert_eq!(decoded.success, AvailableInputTypes::default());
}

#[test]
fn test_provider_locked_encodes_to_constant() {
    assert_eq!(
        ProviderStatusResponse::locked().to_json().unwrap(),
        PROVIDER_LOCKED_JSON
    );
    let decoded: ProviderStatusResponse = serde_json::from_str(PROVIDER_LOCKED_JSON).unwrap();
    assert_eq!(decoded.success.status, ProviderStatus::Locked);
}
