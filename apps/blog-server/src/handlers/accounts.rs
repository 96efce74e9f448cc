//! Registration, login and logout.

use actix_web::{HttpResponse, web};

use blog_core::DomainError;
use blog_core::domain::FieldErrors;
use blog_shared::dto::{LoginForm, NextQuery, RegisterForm};

use super::redirect;
use crate::middleware::auth::{OptionalIdentity, removal_cookie, safe_next, session_cookie};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::views::{LoginTemplate, RegisterTemplate, html};

const BAD_CREDENTIALS: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

/// GET /register/
pub async fn register_form(viewer: OptionalIdentity) -> AppResult<HttpResponse> {
    html(&RegisterTemplate::new(viewer.username()))
}

/// POST /register/
pub async fn register(
    state: web::Data<AppState>,
    form: web::Form<RegisterForm>,
    viewer: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();

    let result = if form.password != form.password_confirm {
        Err(DomainError::Validation(FieldErrors::single(
            "password_confirm",
            "The two password fields did not match.",
        )))
    } else {
        state.accounts.register(&form.username, &form.password).await
    };

    match result {
        Ok(_) => Ok(redirect("/login/")),
        Err(DomainError::Validation(errors)) => html(
            &RegisterTemplate::new(viewer.username()).with_errors(form.username, &errors),
        ),
        Err(e) => Err(e.into()),
    }
}

/// GET /login/
pub async fn login_form(
    query: web::Query<NextQuery>,
    viewer: OptionalIdentity,
) -> AppResult<HttpResponse> {
    html(&LoginTemplate::new(
        viewer.username(),
        query.into_inner().next,
    ))
}

/// POST /login/
///
/// Issues the session cookie and follows `next` when it is a local path.
pub async fn login(
    state: web::Data<AppState>,
    form: web::Form<LoginForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();

    let user = match state.accounts.authenticate(&form.username, &form.password).await {
        Ok(user) => user,
        Err(DomainError::Unauthorized) => {
            let mut page = LoginTemplate::new(None, form.next);
            page.username = form.username;
            page.error = Some(BAD_CREDENTIALS.to_string());
            return html(&page);
        }
        Err(e) => return Err(e.into()),
    };

    let token = state
        .tokens
        .generate_token(user.id, &user.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let cookie = session_cookie(token, state.tokens.expiration_seconds(), &state.session);

    tracing::info!(user_id = %user.id, "User logged in");

    let mut response = redirect(&safe_next(form.next.as_deref()));
    response
        .add_cookie(&cookie)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(response)
}

/// POST /logout/
pub async fn logout() -> AppResult<HttpResponse> {
    let mut response = redirect("/");
    response
        .add_cookie(&removal_cookie())
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(response)
}
