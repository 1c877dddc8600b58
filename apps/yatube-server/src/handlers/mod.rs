//! HTTP handlers and route configuration.

mod auth;
mod feed;
mod health;
mod posts;

use actix_web::{HttpResponse, http::header, web};
use askama::Template;

use crate::middleware::error::AppResult;

/// Configure all application routes.
///
/// Fixed prefixes are registered before the `/{username}/` catch-alls.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/auth")
                .service(
                    web::resource("/signup/")
                        .route(web::get().to(auth::signup_form))
                        .route(web::post().to(auth::signup)),
                )
                .service(
                    web::resource("/login/")
                        .route(web::get().to(auth::login_form))
                        .route(web::post().to(auth::login)),
                )
                .route("/logout/", web::get().to(auth::logout)),
        )
        .route("/", web::get().to(posts::index))
        .service(
            web::resource("/new/")
                .route(web::get().to(posts::new_post_form))
                .route(web::post().to(posts::new_post)),
        )
        .route("/group/{slug}/", web::get().to(posts::group_posts))
        .route("/{username}/", web::get().to(posts::profile))
        .route("/{username}/{post_id}/", web::get().to(posts::post_view))
        .service(
            web::resource("/{username}/{post_id}/edit/")
                .route(web::get().to(posts::post_edit_form))
                .route(web::post().to(posts::post_edit)),
        );
}

/// Render a template as a `200 OK` HTML page.
fn render<T: Template>(template: &T) -> AppResult<HttpResponse> {
    let html = template.render()?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

/// `302 Found` to `location`.
fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}
