use super::*;

#[test]
fn ok_with_payload() {
    let envelope: Envelope<Vec<String>> =
        serde_json::from_str(r#"{"status":"ok","payload":["a","b"]}"#).unwrap();
    assert_eq!(
        envelope.into_result(),
        Ok(Some(vec!["a".to_string(), "b".to_string()]))
    );
}

#[test]
fn ok_without_payload_is_void_success() {
    let envelope: Envelope<String> = serde_json::from_str(r#"{"status":"ok"}"#).unwrap();
    assert_eq!(envelope.into_result(), Ok(None));
}

#[test]
fn ok_with_null_payload_is_void_success() {
    let envelope: Envelope<String> =
        serde_json::from_str(r#"{"status":"ok","payload":null}"#).unwrap();
    assert_eq!(envelope.into_result(), Ok(None));
}

#[test]
fn error_carries_message() {
    let envelope: Envelope<String> =
        serde_json::from_str(r#"{"status":"error","msg":"cluster on fire"}"#).unwrap();
    assert_eq!(envelope.into_result(), Err("cluster on fire".to_string()));
}

#[test]
fn error_without_message_gets_default() {
    let envelope: Envelope<String> = serde_json::from_str(r#"{"status":"error"}"#).unwrap();
    assert_eq!(envelope.into_result(), Err(DEFAULT_ERROR_MSG.to_string()));
}

#[test]
fn legacy_err_status_accepted() {
    let envelope: Envelope<String> = serde_json::from_str(r#"{"status":"err"}"#).unwrap();
    assert_eq!(envelope.status, Status::Error);
}

#[test]
fn garbage_is_a_parse_error() {
    assert!(serde_json::from_str::<Envelope<String>>("<not json>").is_err());
    assert!(serde_json::from_str::<Envelope<String>>(r#"{"payload":1}"#).is_err());
}
