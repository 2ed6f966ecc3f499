use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire-level error body returned by the server for non-2xx responses.
///
/// The field may be absent or the body may not parse at all; clients fall
/// back to a generic message in that case rather than failing.
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
#[error("{error}")]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_to_single_error_key() {
        let body = serde_json::to_value(ApiError::new("bad input")).expect("serialize");
        assert_eq!(body, serde_json::json!({ "error": "bad input" }));
    }
}
