//! /api/mocks handlers: preview generated records, or generate and persist them.

use crate::error::AppError;
use crate::mock::{generate_pets, generate_users};
use crate::response::{created, success_payload};
use crate::service::{RequestValidator, SeedService};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    response::IntoResponse,
};
use serde_json::Value;
use std::collections::HashMap;

pub const DEFAULT_MOCK_PETS: usize = 100;
pub const DEFAULT_MOCK_USERS: usize = 50;
/// Count used by generateData when neither query nor body names one.
pub const DEFAULT_SEED_COUNT: usize = 1;
pub const MAX_MOCK_COUNT: usize = 10_000;

/// GET /api/mocks/mockingpets?count=N. Nothing is persisted.
pub async fn mocking_pets(Query(params): Query<HashMap<String, String>>) -> Result<impl IntoResponse, AppError> {
    let count = resolve_count("count", &params, None, DEFAULT_MOCK_PETS)?;
    Ok(success_payload(generate_pets(count)))
}

/// GET /api/mocks/mockingusers?count=N. Nothing is persisted.
pub async fn mocking_users(Query(params): Query<HashMap<String, String>>) -> Result<impl IntoResponse, AppError> {
    let count = resolve_count("count", &params, None, DEFAULT_MOCK_USERS)?;
    Ok(success_payload(generate_users(count).await?))
}

/// POST /api/mocks/generateData. Counts come from the query string first, then the JSON body.
pub async fn generate_data(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let body = parse_optional_body(&body)?;
    let users = resolve_count("users", &params, body.as_ref(), DEFAULT_SEED_COUNT)?;
    let pets = resolve_count("pets", &params, body.as_ref(), DEFAULT_SEED_COUNT)?;
    let counts = SeedService::seed(state.store.as_ref(), users, pets).await?;
    Ok(created("Mock data generated and inserted", counts))
}

fn parse_optional_body(body: &Bytes) -> Result<Option<Value>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| AppError::Validation(format!("Invalid JSON body: {}", e)))
}

fn resolve_count(
    key: &str,
    query: &HashMap<String, String>,
    body: Option<&Value>,
    default: usize,
) -> Result<usize, AppError> {
    let invalid = || AppError::Validation(format!("{} must be a non-negative integer", key));
    let requested = if let Some(raw) = query.get(key) {
        Some(raw.trim().parse::<i64>().map_err(|_| invalid())?)
    } else {
        match body.and_then(|b| b.get(key)) {
            None | Some(Value::Null) => None,
            Some(v) => Some(v.as_i64().ok_or_else(invalid)?),
        }
    };
    let count = match requested {
        Some(n) => RequestValidator::non_negative_count(key, n)?,
        None => default,
    };
    if count > MAX_MOCK_COUNT {
        return Err(AppError::Validation(format!("{} must be at most {}", key, MAX_MOCK_COUNT)));
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn query_takes_precedence_over_body() {
        let body = json!({"users": 9});
        assert_eq!(resolve_count("users", &query(&[("users", "2")]), Some(&body), 1).unwrap(), 2);
        assert_eq!(resolve_count("users", &query(&[]), Some(&body), 1).unwrap(), 9);
    }

    #[test]
    fn unspecified_counts_default() {
        assert_eq!(resolve_count("pets", &query(&[]), None, DEFAULT_SEED_COUNT).unwrap(), 1);
        assert_eq!(resolve_count("pets", &query(&[]), Some(&json!({"pets": null})), 1).unwrap(), 1);
    }

    #[test]
    fn negative_or_non_integer_counts_are_rejected() {
        assert!(resolve_count("users", &query(&[]), Some(&json!({"users": -1})), 1).is_err());
        assert!(resolve_count("users", &query(&[]), Some(&json!({"users": "3"})), 1).is_err());
        assert!(resolve_count("users", &query(&[("users", "abc")]), None, 1).is_err());
        assert!(resolve_count("users", &query(&[("users", "-4")]), None, 1).is_err());
        assert!(resolve_count("count", &query(&[("count", "1000000")]), None, 1).is_err());
    }

    #[test]
    fn blank_body_is_absent() {
        assert!(parse_optional_body(&Bytes::from_static(b"  \n")).unwrap().is_none());
        assert!(parse_optional_body(&Bytes::from_static(b"{oops")).is_err());
    }
}
