//! Static pages.

use actix_web::HttpResponse;

use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::views::{AboutTemplate, html};

/// GET /about/
pub async fn about(viewer: OptionalIdentity) -> AppResult<HttpResponse> {
    html(&AboutTemplate {
        page_title: "About".to_string(),
        viewer: viewer.username(),
    })
}
