//! HTTP handlers and route configuration.

mod accounts;
mod health;
mod pages;
mod posts;

use actix_web::{HttpResponse, http::header, web};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(posts::list))
        .route("/about/", web::get().to(pages::about))
        // Posts; `new` must precede the `{id}` pattern
        .service(
            web::resource("/post/new/")
                .route(web::get().to(posts::create_form))
                .route(web::post().to(posts::create)),
        )
        .route("/post/{id}/", web::get().to(posts::detail))
        .service(
            web::resource("/post/{id}/update/")
                .route(web::get().to(posts::update_form))
                .route(web::post().to(posts::update)),
        )
        .service(
            web::resource("/post/{id}/delete/")
                .route(web::get().to(posts::delete_confirm))
                .route(web::post().to(posts::delete)),
        )
        // Accounts
        .service(
            web::resource("/register/")
                .route(web::get().to(accounts::register_form))
                .route(web::post().to(accounts::register)),
        )
        .service(
            web::resource("/login/")
                .route(web::get().to(accounts::login_form))
                .route(web::post().to(accounts::login)),
        )
        .route("/logout/", web::post().to(accounts::logout))
        .service(web::scope("/api").route("/health", web::get().to(health::health_check)));
}

/// `302 Found` to `location`.
fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}
