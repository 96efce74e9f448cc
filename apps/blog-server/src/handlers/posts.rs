//! Post pages: listing, detail and the author-only create/update/delete forms.

use actix_web::{HttpResponse, web};

use blog_core::DomainError;
use blog_core::domain::PostInput;
use blog_core::policy::can_mutate;
use blog_shared::dto::{ListQuery, PostForm};

use super::redirect;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::views::{
    HomeTemplate, PostConfirmDeleteTemplate, PostDetailTemplate, PostFormMode, PostFormTemplate,
    PostView, html,
};

/// `?page=` value; absent or blank means the first page.
fn page_number(raw: Option<&str>) -> AppResult<u64> {
    match raw.map(str::trim) {
        None | Some("") => Ok(1),
        Some(value) => value
            .parse()
            .map_err(|_| AppError::NotFound("Invalid page.".to_string())),
    }
}

fn input(form: &PostForm) -> PostInput {
    PostInput {
        title: form.title.clone(),
        content: form.content.clone(),
    }
}

fn detail_url(id: i64) -> String {
    format!("/post/{id}/")
}

/// GET /
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
    viewer: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let number = page_number(query.page.as_deref())?;
    let page = state.posts.list(number).await?;
    html(&HomeTemplate::new(&page, viewer.username()))
}

/// GET /post/{id}/
pub async fn detail(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    viewer: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let entry = state.posts.detail(path.into_inner()).await?;
    let can_mutate = viewer
        .caller()
        .is_some_and(|caller| can_mutate(&caller, &entry.post));

    html(&PostDetailTemplate {
        page_title: entry.post.title.clone(),
        viewer: viewer.username(),
        post: PostView::from(&entry),
        can_mutate,
    })
}

/// GET /post/new/
pub async fn create_form(identity: Identity) -> AppResult<HttpResponse> {
    html(&PostFormTemplate::new(
        PostFormMode::Create,
        Some(identity.username),
    ))
}

/// POST /post/new/
///
/// The author is always the logged-in user; any `author` field in the
/// submitted form is dropped during deserialization.
pub async fn create(
    identity: Identity,
    state: web::Data<AppState>,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    match state.posts.create(&identity.caller(), input(&form)).await {
        Ok(post) => Ok(redirect(&detail_url(post.id))),
        Err(DomainError::Validation(errors)) => html(
            &PostFormTemplate::new(PostFormMode::Create, Some(identity.username))
                .with_values(form.title, form.content)
                .with_errors(&errors),
        ),
        Err(e) => Err(e.into()),
    }
}

/// GET /post/{id}/update/
pub async fn update_form(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post = state.posts.authorize_mutation(&identity.caller(), id).await?;

    html(
        &PostFormTemplate::new(PostFormMode::Update(id), Some(identity.username))
            .with_values(Some(post.title), Some(post.content)),
    )
}

/// POST /post/{id}/update/
pub async fn update(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let form = form.into_inner();
    match state.posts.update(&identity.caller(), id, input(&form)).await {
        Ok(post) => Ok(redirect(&detail_url(post.id))),
        Err(DomainError::Validation(errors)) => html(
            &PostFormTemplate::new(PostFormMode::Update(id), Some(identity.username))
                .with_values(form.title, form.content)
                .with_errors(&errors),
        ),
        Err(e) => Err(e.into()),
    }
}

/// GET /post/{id}/delete/
pub async fn delete_confirm(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .authorize_mutation(&identity.caller(), path.into_inner())
        .await?;

    html(&PostConfirmDeleteTemplate {
        page_title: "Delete Post".to_string(),
        viewer: Some(identity.username),
        id: post.id,
        title: post.title,
    })
}

/// POST /post/{id}/delete/
pub async fn delete(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    state
        .posts
        .delete(&identity.caller(), path.into_inner())
        .await?;
    Ok(redirect("/"))
}
