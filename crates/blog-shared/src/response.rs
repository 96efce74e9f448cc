//! Problem Details (RFC 7807) error body, rendered by the server's error pages.

use serde::{Deserialize, Serialize};

/// RFC 7807 Problem Details.
///
/// See: https://datatracker.ietf.org/doc/html/rfc7807
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Problem type; `about:blank` means the status title says it all.
    #[serde(rename = "type")]
    pub error_type: String,
    pub title: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: u16, title: impl Into<String>) -> Self {
        Self {
            error_type: "about:blank".to_string(),
            title: title.into(),
            status,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(400, "Bad Request").with_detail(detail)
    }

    /// Someone else's post. Kept distinct from [`ErrorResponse::not_found`].
    pub fn forbidden() -> Self {
        Self {
            error_type: "/problems/not-the-author".to_string(),
            ..Self::new(403, "Forbidden")
        }
        .with_detail("You do not have permission to modify this post.")
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(404, "Not Found").with_detail(detail)
    }

    /// Details of internal failures stay in the logs.
    pub fn internal_error() -> Self {
        Self::new(500, "Internal Server Error")
            .with_detail("Something went wrong on our side. Please try again later.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_type_field_and_skips_empty_detail() {
        let json = serde_json::to_value(ErrorResponse::new(409, "Conflict")).unwrap();
        assert_eq!(json["type"], "about:blank");
        assert_eq!(json["status"], 409);
        assert!(json.get("detail").is_none());
    }

    #[test]
    fn test_forbidden_differs_from_not_found() {
        let forbidden = ErrorResponse::forbidden();
        let missing = ErrorResponse::not_found("No post found with id 1.");
        assert_ne!(forbidden.status, missing.status);
        assert_ne!(forbidden.error_type, missing.error_type);
    }
}
