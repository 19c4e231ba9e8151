//! Error types for the feed transform
//!
//! Construction-time problems surface as [`ConfigError`] and are returned
//! synchronously. Everything that can go wrong while turning a response into
//! markup is a [`FeedError`], which the pipeline funnels into a single
//! `on_error(message)` call.

/// Message used for every failure that has no more specific wording.
pub const PARSE_ERROR_MESSAGE: &str = "InstafeedParseError: Invalid response from Instagram.";

/// Message used when the remote side cannot be reached or reports a failure
/// without details.
pub const CONNECTION_ERROR_MESSAGE: &str = "InstafeedConnectionError: Connection to Instagram failed.";

/// Invalid option supplied when building a feed configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("InstafeedOptionsError: Missing or invalid option \"{0}\".")]
    Missing(&'static str),

    #[error("InstafeedOptionsError: Invalid option \"{0}\".")]
    Invalid(&'static str),

    #[error("InstafeedOptionsError: Unreadable options file: {0}")]
    File(String),
}

/// A raw item (or part of the envelope) that does not have the required shape.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {reason}")]
pub struct SchemaError {
    /// Dotted path of the offending field, e.g. `user.username`.
    pub field: String,
    pub reason: String,
}

impl SchemaError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: "missing".to_string(),
        }
    }

    pub fn expected(field: impl Into<String>, kind: &str) -> Self {
        Self {
            field: field.into(),
            reason: format!("expected {kind}"),
        }
    }
}

/// A sort metric that could not be compared.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SortError {
    #[error("sort metric '{0}' is missing on an item")]
    MissingMetric(&'static str),

    #[error("sort metric '{0}' holds values that cannot be compared")]
    Incomparable(&'static str),
}

/// A template that still had placeholders after the substitution limit.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("template still has placeholders after {limit} substitutions")]
pub struct TemplateError {
    pub limit: usize,
}

/// Runtime failure of one transform pass.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FeedError {
    #[error("API error {code}")]
    Api {
        code: serde_json::Number,
        error_type: Option<String>,
        error_message: Option<String>,
    },

    #[error("Malformed envelope: {0}")]
    Envelope(String),

    #[error("Invalid item: {0}")]
    Schema(#[from] SchemaError),

    #[error("Sort failed: {0}")]
    Sort(#[from] SortError),

    #[error("Rendering failed: {0}")]
    Template(#[from] TemplateError),

    #[error("Transport failed: {0}")]
    Transport(String),

    #[error("No target element found: {0}")]
    Target(String),
}

impl FeedError {
    /// Human-readable text handed to `on_error`.
    ///
    /// Schema, sort, template and envelope failures all collapse into the
    /// generic parse message; the precise cause is only available through
    /// `Display`.
    pub fn user_message(&self) -> String {
        match self {
            FeedError::Api {
                error_type: Some(error_type),
                error_message: Some(error_message),
                ..
            } => format!("InstafeedInstagramAPIError: \"{error_type}: {error_message}\"."),
            FeedError::Api { .. } | FeedError::Transport(_) => CONNECTION_ERROR_MESSAGE.to_string(),
            FeedError::Target(_) => "InstafeedParseError: No target element found.".to_string(),
            FeedError::Envelope(_)
            | FeedError::Schema(_)
            | FeedError::Sort(_)
            | FeedError::Template(_) => {
                PARSE_ERROR_MESSAGE.to_string()
            }
        }
    }

    /// Whether this failure came from the remote API rather than from parsing.
    pub fn is_api_error(&self) -> bool {
        matches!(self, FeedError::Api { .. } | FeedError::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message_includes_type_and_message() {
        let err = FeedError::Api {
            code: 400.into(),
            error_type: Some("OAuthError".to_string()),
            error_message: Some("bad token".to_string()),
        };

        assert_eq!(
            err.user_message(),
            "InstafeedInstagramAPIError: \"OAuthError: bad token\"."
        );
        assert!(err.is_api_error());
    }

    #[test]
    fn test_api_error_without_details_is_connection_error() {
        let err = FeedError::Api {
            code: 500.into(),
            error_type: Some("ServerError".to_string()),
            error_message: None,
        };

        assert_eq!(err.user_message(), CONNECTION_ERROR_MESSAGE);
    }

    #[test]
    fn test_schema_error_collapses_to_generic_message() {
        let err = FeedError::from(SchemaError::expected("user.username", "string"));

        assert_eq!(err.user_message(), PARSE_ERROR_MESSAGE);
        assert_eq!(err.to_string(), "Invalid item: user.username: expected string");
        assert!(!err.is_api_error());
    }

    #[test]
    fn test_sort_error_collapses_to_generic_message() {
        let err = FeedError::from(SortError::MissingMetric("likes.count"));
        assert_eq!(err.user_message(), PARSE_ERROR_MESSAGE);
    }

    #[test]
    fn test_template_error_collapses_to_generic_message() {
        let err = FeedError::from(TemplateError { limit: 3 });

        assert_eq!(err.user_message(), PARSE_ERROR_MESSAGE);
        assert_eq!(
            err.to_string(),
            "Rendering failed: template still has placeholders after 3 substitutions"
        );
        assert!(!err.is_api_error());
    }

    #[test]
    fn test_target_error_message() {
        let err = FeedError::Target("sidebar".to_string());
        assert_eq!(
            err.user_message(),
            "InstafeedParseError: No target element found."
        );
    }

    #[test]
    fn test_config_error_display() {
        assert_eq!(
            ConfigError::Invalid("sort").to_string(),
            "InstafeedOptionsError: Invalid option \"sort\"."
        );
        assert_eq!(
            ConfigError::Missing("access_token").to_string(),
            "InstafeedOptionsError: Missing or invalid option \"access_token\"."
        );
    }
}
