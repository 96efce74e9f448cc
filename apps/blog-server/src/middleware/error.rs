//! Error handling - domain errors to HTML error pages.

use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode, http::header::ContentType};
use blog_core::DomainError;
use blog_shared::ErrorResponse;

use crate::middleware::auth::{login_redirect, removal_cookie};
use crate::views::{ErrorTemplate, render_html};

/// Application-level error type rendered as a problem-details HTML page.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    /// The session names a user that no longer exists.
    LoginRequired,
    Forbidden,
    Conflict(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::LoginRequired => write!(f, "Login required"),
            AppError::Forbidden => write!(f, "Forbidden"),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl AppError {
    fn problem(&self) -> ErrorResponse {
        match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::LoginRequired => ErrorResponse::new(401, "Login Required"),
            AppError::Forbidden => ErrorResponse::forbidden(),
            AppError::Conflict(detail) => ErrorResponse::new(409, "Conflict").with_detail(detail),
            AppError::Internal(_) => ErrorResponse::internal_error(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::LoginRequired => StatusCode::FOUND,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::LoginRequired => {
                let mut response = login_redirect(None);
                let _ = response.add_cookie(&removal_cookie());
                return response;
            }
            AppError::Internal(detail) => tracing::error!("Internal error: {}", detail),
            _ => {}
        }

        let problem = self.problem();
        let status = self.status_code();
        match render_html(&ErrorTemplate::new(problem)) {
            Ok(body) => HttpResponse::build(status)
                .content_type(ContentType::html())
                .body(body),
            Err(e) => {
                tracing::error!("Failed to render error page: {}", e);
                HttpResponse::build(status)
                    .content_type(ContentType::plaintext())
                    .body(status.canonical_reason().unwrap_or("Error"))
            }
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, id } => {
                AppError::NotFound(format!("No {} found with id {}.", entity_type, id))
            }
            DomainError::Validation(errors) => AppError::BadRequest(errors.to_string()),
            DomainError::Duplicate(msg) => AppError::Conflict(msg),
            DomainError::Unauthorized => AppError::LoginRequired,
            DomainError::Forbidden => AppError::Forbidden,
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<askama::Error> for AppError {
    fn from(err: askama::Error) -> Self {
        AppError::Internal(format!("template rendering failed: {err}"))
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_domain_errors_map_to_distinct_statuses() {
        let not_found: AppError = DomainError::not_found("post", 7).into();
        let forbidden: AppError = DomainError::Forbidden.into();
        let login: AppError = DomainError::Unauthorized.into();

        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(login.status_code(), StatusCode::FOUND);
    }

    #[actix_web::test]
    async fn test_error_page_is_html() {
        let response = AppError::Forbidden.error_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = to_bytes(response.into_body()).await.unwrap();
        let body = std::str::from_utf8(&body).unwrap();
        assert!(body.contains("403"));
        assert!(body.contains("You do not have permission to modify this post."));
    }

    #[test]
    fn test_stale_session_redirects_to_login() {
        let response = AppError::LoginRequired.error_response();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get("location").unwrap(),
            "/login/"
        );
    }
}
