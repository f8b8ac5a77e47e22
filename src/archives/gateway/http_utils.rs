//! Shared HTTP utilities for the gateway implementation.

use serde_json::Value;

/// Extracts a user-facing failure message from a fragment action response.
///
/// Failure results carry their text in `globalErrors`, plain replies in
/// `message`, and servlet errors in `error.message`.
pub(super) fn extract_failure_message(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return None;
    };

    let global_error = value
        .get("globalErrors")
        .and_then(Value::as_array)
        .and_then(|errors| errors.iter().find_map(Value::as_str));
    let message = value.get("message").and_then(Value::as_str);
    let nested = value
        .get("error")
        .and_then(|error| error.get("message"))
        .and_then(Value::as_str);

    global_error
        .or(message)
        .or(nested)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToOwned::to_owned)
}
