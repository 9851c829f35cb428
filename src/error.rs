use serde::Deserialize;
use thiserror::Error;

/// Start-up failures: the page did not give us what we need to mount.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Page bootstrap element #{0} not found")]
    MissingBootstrap(String),

    #[error("Page bootstrap is not valid JSON: {0}")]
    InvalidBootstrap(#[from] serde_json::Error),

    #[error("Browser API unavailable: {0}")]
    Browser(String),
}

impl From<AppError> for String {
    fn from(err: AppError) -> Self {
        err.to_string()
    }
}

/// Which request failed, so the message can name it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    SaveProfile,
    UploadPhoto,
    UpdateRows,
}

/// A failed request, classified by HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("endpoint not found")]
    EndpointNotFound,

    #[error("permission denied")]
    PermissionDenied,

    /// 400: the server refused the submitted data.
    #[error("rejected by server{}", .0.as_deref().map(|m| format!(": {}", m)).unwrap_or_default())]
    Rejected(Option<String>),

    #[error("request failed{}", .message.as_deref().map(|m| format!(": {}", m)).unwrap_or_default())]
    Failed { status: Option<u16>, message: Option<String> },

    #[error("request timed out")]
    Timeout,

    #[error("could not build request: {0}")]
    Request(String),
}

impl From<ApiError> for String {
    fn from(err: ApiError) -> Self {
        err.to_string()
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// `message` field of a JSON error body, if there is one.
fn server_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}

impl ApiError {
    /// Classify a non-success response.
    pub fn from_response(status: u16, body: &str) -> Self {
        match status {
            404 => ApiError::EndpointNotFound,
            403 => ApiError::PermissionDenied,
            400 => ApiError::Rejected(server_message(body)),
            _ => ApiError::Failed {
                status: Some(status),
                message: server_message(body),
            },
        }
    }

    /// Banner text for this failure.
    pub fn user_message(&self, op: Operation) -> String {
        match self {
            ApiError::EndpointNotFound => match op {
                Operation::SaveProfile => "Update endpoint not found. Please contact support.",
                Operation::UploadPhoto => "Upload endpoint not found. Please contact support.",
                Operation::UpdateRows => "Update endpoint not found. Please contact support.",
            }
            .to_string(),
            ApiError::PermissionDenied => "Permission denied. Please log in again.".to_string(),
            ApiError::Rejected(Some(message)) => message.clone(),
            ApiError::Rejected(None) => match op {
                Operation::UploadPhoto => "Invalid file format or size. Please try again.",
                Operation::SaveProfile => "The server rejected these details. Please review them and try again.",
                Operation::UpdateRows => "The server rejected these changes. Please review them and try again.",
            }
            .to_string(),
            ApiError::Failed {
                message: Some(message),
                ..
            } => message.clone(),
            ApiError::Failed { message: None, .. } | ApiError::Timeout | ApiError::Request(_) => {
                op.fallback_message().to_string()
            }
        }
    }
}

impl Operation {
    /// Message shown when nothing more specific is known.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Operation::SaveProfile => "Failed to update profile. Please try again.",
            Operation::UploadPhoto => "Failed to upload photo. Please try again.",
            Operation::UpdateRows => "Error saving changes. Please try again.",
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_builder() {
            ApiError::Request(err.to_string())
        } else {
            ApiError::Failed {
                status: err.status().map(|s| s.as_u16()),
                message: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_status() {
        assert_eq!(ApiError::from_response(404, ""), ApiError::EndpointNotFound);
        assert_eq!(ApiError::from_response(403, "<html>"), ApiError::PermissionDenied);
        assert_eq!(
            ApiError::from_response(400, r#"{"message": "Email already in use"}"#),
            ApiError::Rejected(Some("Email already in use".to_string()))
        );
        assert_eq!(ApiError::from_response(400, "not json"), ApiError::Rejected(None));
        assert_eq!(
            ApiError::from_response(500, r#"{"message": ""}"#),
            ApiError::Failed { status: Some(500), message: None }
        );
    }

    #[test]
    fn test_user_messages_per_operation() {
        assert_eq!(
            ApiError::EndpointNotFound.user_message(Operation::UploadPhoto),
            "Upload endpoint not found. Please contact support."
        );
        assert_eq!(
            ApiError::EndpointNotFound.user_message(Operation::SaveProfile),
            "Update endpoint not found. Please contact support."
        );
        assert_eq!(
            ApiError::PermissionDenied.user_message(Operation::SaveProfile),
            "Permission denied. Please log in again."
        );
        assert_eq!(
            ApiError::Rejected(None).user_message(Operation::UploadPhoto),
            "Invalid file format or size. Please try again."
        );
        assert_eq!(
            ApiError::Timeout.user_message(Operation::SaveProfile),
            "Failed to update profile. Please try again."
        );
    }

    #[test]
    fn test_server_message_wins_for_generic_failures() {
        let err = ApiError::from_response(502, r#"{"message": "Storage offline"}"#);
        assert_eq!(err.user_message(Operation::UploadPhoto), "Storage offline");
        assert_eq!(err.to_string(), "request failed: Storage offline");
    }
}
