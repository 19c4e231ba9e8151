//! Top-level response envelope

use serde::Deserialize;
use serde_json::{Number, Value};

use crate::error::FeedError;
use crate::path;

/// Status block of a response.
#[derive(Debug, Clone, Deserialize)]
pub struct Meta {
    pub code: Number,
    #[serde(default)]
    pub error_type: Option<Value>,
    #[serde(default)]
    pub error_message: Option<Value>,
}

/// `{meta, data?, pagination?}` as received from the API.
///
/// `data` and `pagination` are kept untyped: their shape only matters on the
/// paths that use them.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedEnvelope {
    pub meta: Meta,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub pagination: Option<Value>,
}

impl FeedEnvelope {
    /// Read the envelope out of a decoded response body.
    pub fn from_value(value: &Value) -> Result<Self, FeedError> {
        Self::deserialize(value).map_err(|e| FeedError::Envelope(e.to_string()))
    }

    pub fn is_success(&self) -> bool {
        self.meta.code.as_f64() == Some(200.0)
    }

    /// The API error described by `meta`, if the response is not a success.
    pub fn api_error(&self) -> Option<FeedError> {
        if self.is_success() {
            return None;
        }

        Some(FeedError::Api {
            code: self.meta.code.clone(),
            error_type: self
                .meta
                .error_type
                .as_ref()
                .and_then(Value::as_str)
                .map(str::to_string),
            error_message: self
                .meta
                .error_message
                .as_ref()
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }

    /// The raw items of the page.
    pub fn items(&self) -> Result<&[Value], FeedError> {
        match &self.data {
            Some(Value::Array(items)) => Ok(items),
            Some(_) => Err(FeedError::Envelope("data is not an array".to_string())),
            None => Err(FeedError::Envelope("data is missing".to_string())),
        }
    }

    /// `pagination.next_url`, when it is a string.
    pub fn next_url(&self) -> Option<&str> {
        self.pagination
            .as_ref()
            .and_then(|pagination| path::resolve(pagination, "next_url"))
            .and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope() {
        let envelope = FeedEnvelope::from_value(&json!({
            "meta": {"code": 200},
            "data": [{"id": "1"}],
            "pagination": {"next_url": "https://api/next"}
        }))
        .unwrap();

        assert!(envelope.is_success());
        assert!(envelope.api_error().is_none());
        assert_eq!(envelope.items().unwrap().len(), 1);
        assert_eq!(envelope.next_url(), Some("https://api/next"));
    }

    #[test]
    fn test_api_error_envelope() {
        let envelope = FeedEnvelope::from_value(&json!({
            "meta": {"code": 400, "error_type": "OAuthError", "error_message": "bad token"}
        }))
        .unwrap();

        assert!(!envelope.is_success());
        assert_eq!(
            envelope.api_error(),
            Some(FeedError::Api {
                code: 400.into(),
                error_type: Some("OAuthError".to_string()),
                error_message: Some("bad token".to_string()),
            })
        );
    }

    #[test]
    fn test_non_string_error_details_are_dropped() {
        let envelope = FeedEnvelope::from_value(&json!({
            "meta": {"code": 500, "error_type": 7, "error_message": null}
        }))
        .unwrap();

        match envelope.api_error() {
            Some(FeedError::Api {
                error_type,
                error_message,
                ..
            }) => {
                assert_eq!(error_type, None);
                assert_eq!(error_message, None);
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_meta() {
        for value in [
            json!(null),
            json!([]),
            json!({}),
            json!({"meta": null}),
            json!({"meta": {}}),
            json!({"meta": {"code": "200"}}),
        ] {
            let result = FeedEnvelope::from_value(&value);
            assert!(
                matches!(result, Err(FeedError::Envelope(_))),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn test_items_must_be_an_array() {
        let envelope = FeedEnvelope::from_value(&json!({"meta": {"code": 200}})).unwrap();
        assert!(envelope.items().is_err());

        let envelope =
            FeedEnvelope::from_value(&json!({"meta": {"code": 200}, "data": {"id": "1"}})).unwrap();
        assert!(envelope.items().is_err());
    }

    #[test]
    fn test_next_url_must_be_a_string() {
        let envelope = FeedEnvelope::from_value(&json!({
            "meta": {"code": 200},
            "pagination": {"next_url": 12}
        }))
        .unwrap();
        assert_eq!(envelope.next_url(), None);

        let envelope = FeedEnvelope::from_value(&json!({
            "meta": {"code": 200},
            "pagination": "oops"
        }))
        .unwrap();
        assert_eq!(envelope.next_url(), None);
    }
}
