//! Standard response envelope helpers.

use axum::{http::StatusCode, Json};
use serde::Serialize;

/// `{status, payload?, message?, error?}` wrapper shared by every route.
#[derive(Serialize, Debug)]
pub struct Envelope<T> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn error(error: String) -> Self {
        Envelope {
            status: "error",
            payload: None,
            message: None,
            error: Some(error),
        }
    }
}

pub fn success_payload<T: Serialize>(payload: T) -> (StatusCode, Json<Envelope<T>>) {
    (
        StatusCode::OK,
        Json(Envelope {
            status: "success",
            payload: Some(payload),
            message: None,
            error: None,
        }),
    )
}

pub fn success_message(message: &str) -> (StatusCode, Json<Envelope<()>>) {
    (
        StatusCode::OK,
        Json(Envelope {
            status: "success",
            payload: None,
            message: Some(message.to_string()),
            error: None,
        }),
    )
}

pub fn created<T: Serialize>(message: &str, payload: T) -> (StatusCode, Json<Envelope<T>>) {
    (
        StatusCode::CREATED,
        Json(Envelope {
            status: "success",
            payload: Some(payload),
            message: Some(message.to_string()),
            error: None,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_envelope_omits_payload() {
        let (status, Json(body)) = success_message("Pet adopted");
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"status": "success", "message": "Pet adopted"})
        );
    }

    #[test]
    fn error_envelope_carries_error_only() {
        let body = Envelope::<()>::error("Invalid token".into());
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"status": "error", "error": "Invalid token"})
        );
    }

    #[test]
    fn created_uses_201() {
        let (status, Json(body)) = created("done", json!({"usersInserted": 1}));
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.payload, Some(json!({"usersInserted": 1})));
    }
}
