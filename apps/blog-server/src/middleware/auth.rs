//! Session authentication extractors.

use std::future::{Ready, ready};

use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use actix_web::http::{StatusCode, header};
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, dev::Payload, web};

use blog_core::policy::Caller;
use blog_core::ports::{AuthError, TokenClaims};

use crate::state::{AppState, SessionSettings};

/// Name of the cookie holding the session token.
pub const SESSION_COOKIE: &str = "blog_session";

/// Where unauthenticated users are sent.
pub const LOGIN_PATH: &str = "/login/";

/// Authenticated user identity extractor.
///
/// Use this in handlers to require a logged-in user:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.username)
/// }
/// ```
/// Anonymous requests are redirected to the login page.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: uuid::Uuid,
    pub username: String,
}

impl Identity {
    pub fn caller(&self) -> Caller {
        Caller::from(self.user_id)
    }
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
        }
    }
}

/// Error type for authentication failures.
#[derive(Debug)]
pub enum AuthenticationError {
    /// No usable session; carries the path to come back to after login.
    LoginRequired { cause: AuthError, next: String },
    /// The application state is not registered.
    Misconfigured,
}

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoginRequired { cause, .. } => write!(f, "Login required: {}", cause),
            Self::Misconfigured => write!(f, "Application state not configured"),
        }
    }
}

impl ResponseError for AuthenticationError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::LoginRequired { .. } => StatusCode::FOUND,
            Self::Misconfigured => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Self::LoginRequired { cause, next } => {
                let mut response = login_redirect(Some(next));
                // A stale or forged cookie would otherwise be sent forever.
                if matches!(cause, AuthError::TokenExpired | AuthError::InvalidToken(_)) {
                    let _ = response.add_cookie(&removal_cookie());
                }
                response
            }
            Self::Misconfigured => HttpResponse::InternalServerError().finish(),
        }
    }
}

/// `302` to the login page, remembering `next` when given.
pub fn login_redirect(next: Option<&str>) -> HttpResponse {
    let location = match next {
        Some(next) => format!(
            "{LOGIN_PATH}?next={}",
            url::form_urlencoded::byte_serialize(next.as_bytes()).collect::<String>()
        ),
        None => LOGIN_PATH.to_string(),
    };
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Session cookie carrying `token`.
pub fn session_cookie(token: String, max_age_seconds: i64, settings: &SessionSettings) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(settings.secure)
        .max_age(CookieDuration::seconds(max_age_seconds))
        .finish()
}

/// Cookie that clears the session on the client.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    cookie.make_removal();
    cookie
}

/// Session token from the cookie, or from an `Authorization: Bearer` header.
fn session_token(req: &HttpRequest) -> Result<String, AuthError> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        return Ok(cookie.value().to_string());
    }

    let Some(auth_header) = req.headers().get(header::AUTHORIZATION) else {
        return Err(AuthError::MissingAuth);
    };
    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

    auth_str
        .strip_prefix("Bearer ")
        .map(str::to_string)
        .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))
}

fn authenticate(req: &HttpRequest) -> Result<Identity, AuthenticationError> {
    let Some(state) = req.app_data::<web::Data<AppState>>() else {
        tracing::error!("AppState not found in app data");
        return Err(AuthenticationError::Misconfigured);
    };

    let login_required = |cause: AuthError| AuthenticationError::LoginRequired {
        cause,
        next: req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| req.path().to_string()),
    };

    let token = session_token(req).map_err(login_required)?;
    let claims = state.tokens.validate_token(&token).map_err(|e| {
        tracing::debug!(error = %e, "Rejected session token");
        login_required(e)
    })?;

    Ok(Identity::from(claims))
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

/// Optional identity extractor - doesn't fail if not authenticated.
#[derive(Debug, Clone, Default)]
pub struct OptionalIdentity(pub Option<Identity>);

impl OptionalIdentity {
    pub fn username(&self) -> Option<String> {
        self.0.as_ref().map(|identity| identity.username.clone())
    }

    pub fn caller(&self) -> Option<Caller> {
        self.0.as_ref().map(Identity::caller)
    }
}

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(OptionalIdentity(authenticate(req).ok())))
    }
}

/// Only local paths are followed after login; anything else goes home.
///
/// Browsers drop tabs and newlines from a `Location`, so a path holding
/// whitespace or control characters is refused before the `//` check.
pub fn safe_next(next: Option<&str>) -> String {
    let is_local = |path: &str| {
        !path.chars().any(|c| c.is_control() || c.is_whitespace())
            && path.starts_with('/')
            && !path.starts_with("//")
            && !path.contains('\\')
    };
    match next {
        Some(path) if is_local(path) => path.to_string(),
        _ => "/".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_next() {
        assert_eq!(safe_next(Some("/post/new/")), "/post/new/");
        assert_eq!(safe_next(Some("/?page=2")), "/?page=2");
        assert_eq!(safe_next(Some("//evil.example")), "/");
        assert_eq!(safe_next(Some("https://evil.example/")), "/");
        assert_eq!(safe_next(Some("/\\evil.example")), "/");
        assert_eq!(safe_next(Some("/\t/evil.example")), "/");
        assert_eq!(safe_next(Some("/\n/evil.example")), "/");
        assert_eq!(safe_next(Some("/\r\nSet-Cookie: x=1")), "/");
        assert_eq!(safe_next(Some("/ /evil.example")), "/");
        assert_eq!(safe_next(Some("/\u{7f}/evil.example")), "/");
        assert_eq!(safe_next(None), "/");
    }

    #[test]
    fn test_login_redirect_encodes_next() {
        let response = login_redirect(Some("/post/1/update/?x=1&y=2"));
        assert_eq!(response.status(), StatusCode::FOUND);
        let location = response.headers().get(header::LOCATION).unwrap();
        assert_eq!(
            location.to_str().unwrap(),
            "/login/?next=%2Fpost%2F1%2Fupdate%2F%3Fx%3D1%26y%3D2"
        );
    }

    #[test]
    fn test_removal_cookie_expires_session() {
        let cookie = removal_cookie();
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
    }
}
