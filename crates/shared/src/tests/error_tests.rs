use super::*;

#[test]
fn error_body_uses_snake_case_codes() {
    let body = ApiError::new(ErrorCode::NotFound, "item 9 not found");
    let json = serde_json::to_value(&body).expect("json");
    assert_eq!(json["code"], "not_found");
    assert_eq!(json["message"], "item 9 not found");
}

#[test]
fn exception_round_trips_through_the_body() {
    let body: ApiError =
        serde_json::from_str(r#"{"code":"validation","message":"name must not be empty"}"#)
            .expect("body");
    let err = ApiException::from(body);
    assert_eq!(err.code, ErrorCode::Validation);
    assert_eq!(err.to_string(), "Validation: name must not be empty");
}
