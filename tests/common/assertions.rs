//! Custom assertion macros and utilities

/// Assert that a result is ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $message:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $message, e),
        }
    };
}

/// Assert that a string contains a substring
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {
        assert!(
            $haystack.contains($needle),
            "Expected '{}' to contain '{}'",
            $haystack,
            $needle
        );
    };
}

/// Assert a `BaseResponse` failure envelope with the given message
#[macro_export]
macro_rules! assert_failure_envelope {
    ($body:expr, $message:expr) => {{
        let body: &serde_json::Value = &$body;
        assert_eq!(body["success"], serde_json::json!(false), "body: {}", body);
        assert_eq!(body["message"], serde_json::json!($message), "body: {}", body);
        assert!(body["data"].is_null(), "failure carried data: {}", body);
    }};
}
