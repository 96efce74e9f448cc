//! # Blog Server
//!
//! Actix-web application serving the blog: post pages, accounts and the
//! author-only editing forms. The binary in `main.rs` wires it to a socket;
//! tests build the same `App` through [`configure_app`].

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod state;
pub mod telemetry;
pub mod views;

use actix_web::web;

use state::AppState;

/// Register shared state, the form body limit and every route.
pub fn configure_app(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let forms = web::FormConfig::default().limit(state.form_limit_bytes);
        cfg.app_data(forms)
            .app_data(web::Data::new(state))
            .configure(handlers::configure_routes);
    }
}
