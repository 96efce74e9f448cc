//! Data Transfer Objects - form and query payloads.

use serde::{Deserialize, Serialize};

/// Title/content form used by both create and update.
///
/// Fields are optional so a missing field reaches validation instead of
/// failing deserialization. Unknown fields such as `author` are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostForm {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// `?page=N` on the listing. Kept as a string so a malformed value can be
/// answered with not-found rather than a bad request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
}

/// Request to register a new user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirm: String,
}

/// Request to log in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Where to go after a successful login.
    pub next: Option<String>,
}

/// `?next=/path` carried to the login page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}
