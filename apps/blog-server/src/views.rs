//! Page view models and their askama templates.
//!
//! Views carry display-ready strings; templates hold no formatting logic.

use actix_web::{HttpResponse, http::header::ContentType};
use askama::Template;

use blog_core::domain::{FieldErrors, PostWithAuthor};
use blog_core::pagination::Page;
use blog_shared::ErrorResponse;

use crate::middleware::error::AppResult;

const DATE_FORMAT: &str = "%B %-d, %Y";

pub fn render_html<T: Template>(template: &T) -> askama::Result<String> {
    template.render()
}

/// `200 OK` HTML response.
pub fn html<T: Template>(template: &T) -> AppResult<HttpResponse> {
    let body = render_html(template)?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body))
}

#[derive(Debug, Clone)]
pub struct PostView {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author: String,
    pub date_posted: String,
}

impl From<&PostWithAuthor> for PostView {
    fn from(entry: &PostWithAuthor) -> Self {
        Self {
            id: entry.post.id,
            title: entry.post.title.clone(),
            content: entry.post.content.clone(),
            author: entry.author.username.clone(),
            date_posted: entry.post.date_posted.format(DATE_FORMAT).to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PaginationView {
    pub number: u64,
    pub num_pages: u64,
    pub previous: Option<u64>,
    pub next: Option<u64>,
}

impl PaginationView {
    pub fn is_paginated(&self) -> bool {
        self.num_pages > 1
    }
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub page_title: String,
    pub viewer: Option<String>,
    pub posts: Vec<PostView>,
    pub pagination: PaginationView,
}

impl HomeTemplate {
    pub fn new(page: &Page<PostWithAuthor>, viewer: Option<String>) -> Self {
        Self {
            page_title: "Home".to_string(),
            viewer,
            posts: page.items.iter().map(PostView::from).collect(),
            pagination: PaginationView {
                number: page.number,
                num_pages: page.num_pages(),
                previous: page.previous_number(),
                next: page.next_number(),
            },
        }
    }
}

#[derive(Template)]
#[template(path = "post_detail.html")]
pub struct PostDetailTemplate {
    pub page_title: String,
    pub viewer: Option<String>,
    pub post: PostView,
    /// Show the update and delete links.
    pub can_mutate: bool,
}

/// Which form a [`PostFormTemplate`] renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFormMode {
    Create,
    Update(i64),
}

#[derive(Template)]
#[template(path = "post_form.html")]
pub struct PostFormTemplate {
    pub page_title: String,
    pub viewer: Option<String>,
    pub heading: &'static str,
    pub action: String,
    pub title: String,
    pub content: String,
    pub title_errors: Vec<String>,
    pub content_errors: Vec<String>,
}

impl PostFormTemplate {
    pub fn new(mode: PostFormMode, viewer: Option<String>) -> Self {
        let (heading, action) = match mode {
            PostFormMode::Create => ("New Post", "/post/new/".to_string()),
            PostFormMode::Update(id) => ("Update Post", format!("/post/{id}/update/")),
        };
        Self {
            page_title: heading.to_string(),
            viewer,
            heading,
            action,
            title: String::new(),
            content: String::new(),
            title_errors: Vec::new(),
            content_errors: Vec::new(),
        }
    }

    pub fn with_values(mut self, title: Option<String>, content: Option<String>) -> Self {
        self.title = title.unwrap_or_default();
        self.content = content.unwrap_or_default();
        self
    }

    pub fn with_errors(mut self, errors: &FieldErrors) -> Self {
        self.title_errors = errors.get("title").to_vec();
        self.content_errors = errors.get("content").to_vec();
        self
    }
}

#[derive(Template)]
#[template(path = "post_confirm_delete.html")]
pub struct PostConfirmDeleteTemplate {
    pub page_title: String,
    pub viewer: Option<String>,
    pub id: i64,
    pub title: String,
}

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub page_title: String,
    pub viewer: Option<String>,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub page_title: String,
    pub viewer: Option<String>,
    pub username: String,
    pub next: String,
    pub error: Option<String>,
}

impl LoginTemplate {
    pub fn new(viewer: Option<String>, next: Option<String>) -> Self {
        Self {
            page_title: "Log In".to_string(),
            viewer,
            username: String::new(),
            next: next.unwrap_or_default(),
            error: None,
        }
    }
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub page_title: String,
    pub viewer: Option<String>,
    pub username: String,
    pub username_errors: Vec<String>,
    pub password_errors: Vec<String>,
    pub password_confirm_errors: Vec<String>,
}

impl RegisterTemplate {
    pub fn new(viewer: Option<String>) -> Self {
        Self {
            page_title: "Register".to_string(),
            viewer,
            username: String::new(),
            username_errors: Vec::new(),
            password_errors: Vec::new(),
            password_confirm_errors: Vec::new(),
        }
    }

    pub fn with_errors(mut self, username: String, errors: &FieldErrors) -> Self {
        self.username = username;
        self.username_errors = errors.get("username").to_vec();
        self.password_errors = errors.get("password").to_vec();
        self.password_confirm_errors = errors.get("password_confirm").to_vec();
        self
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub page_title: String,
    pub viewer: Option<String>,
    pub problem: ErrorResponse,
}

impl ErrorTemplate {
    pub fn new(problem: ErrorResponse) -> Self {
        Self {
            page_title: problem.title.clone(),
            viewer: None,
            problem,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_core::domain::{Author, Post};
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn entry(title: &str) -> PostWithAuthor {
        let author_id = Uuid::new_v4();
        PostWithAuthor {
            post: Post {
                id: 3,
                title: title.to_string(),
                content: "body".to_string(),
                date_posted: Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap(),
                author_id,
            },
            author: Author {
                id: author_id,
                username: "alice".to_string(),
            },
        }
    }

    #[test]
    fn test_post_view_formats_date() {
        let view = PostView::from(&entry("Hello"));
        assert_eq!(view.date_posted, "March 9, 2024");
        assert_eq!(view.author, "alice");
    }

    #[test]
    fn test_templates_escape_user_content() {
        let template = PostDetailTemplate {
            page_title: "x".to_string(),
            viewer: None,
            post: PostView::from(&entry("<script>alert(1)</script>")),
            can_mutate: false,
        };
        let html = render_html(&template).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("alert(1)"));
    }

    #[test]
    fn test_author_links_only_when_allowed() {
        let mut template = PostDetailTemplate {
            page_title: "Hello".to_string(),
            viewer: Some("alice".to_string()),
            post: PostView::from(&entry("Hello")),
            can_mutate: true,
        };
        assert!(render_html(&template).unwrap().contains("/post/3/update/"));

        template.can_mutate = false;
        assert!(!render_html(&template).unwrap().contains("/post/3/update/"));
    }

    #[test]
    fn test_post_form_keeps_submitted_values() {
        let errors = FieldErrors::single("title", "This field is required.");
        let html = render_html(
            &PostFormTemplate::new(PostFormMode::Create, None)
                .with_values(None, Some("draft body".to_string()))
                .with_errors(&errors),
        )
        .unwrap();
        assert!(html.contains("draft body"));
        assert!(html.contains("This field is required."));
    }
}
