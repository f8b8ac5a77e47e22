//! Error mapping helpers for the HTTP gateway.

use http::StatusCode;

use crate::archives::error::DeskError;

/// Checks if a status indicates an authentication failure.
pub(super) const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

pub(super) fn map_transport_error(operation: &str, error: &reqwest::Error) -> DeskError {
    if error.is_decode() {
        return DeskError::Decode {
            message: format!("{operation}: {error}"),
        };
    }

    DeskError::Network {
        message: format!("{operation} failed: {error}"),
    }
}

pub(super) fn map_http_error(
    operation: &str,
    status: StatusCode,
    maybe_message: Option<String>,
) -> DeskError {
    let message = maybe_message.unwrap_or_else(|| {
        format!(
            "{operation} failed: {}",
            status.canonical_reason().unwrap_or("unknown error")
        )
    });

    if is_auth_failure(status) {
        DeskError::Authentication { message }
    } else {
        DeskError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

pub(super) fn map_decode_error(operation: &str, error: &serde_json::Error) -> DeskError {
    DeskError::Decode {
        message: format!("{operation}: {error}"),
    }
}
