//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod follows;
mod health;
mod posts;
mod views;


use actix_multipart::form::MultipartFormConfig;
use actix_web::http::header::{self, ContentType};
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;

use yatube_core::PageRequest;
use yatube_shared::ErrorResponse;

use crate::config::SiteConfig;
use crate::middleware::error::{AppError, AppResult};
use crate::observability::RequestId;

/// Configure all application routes.
///
/// Post forms are buffered whole before being parsed as urlencoded or
/// multipart, so every body extractor shares the upload limit.
pub fn configure_routes(cfg: &mut web::ServiceConfig, site: &SiteConfig) {
    let limit = site.max_upload_bytes;

    cfg.app_data(web::PathConfig::default().error_handler(|err, req| {
        tracing::debug!(path = %req.path(), error = %err, "Unmatched path parameter");
        AppError::NotFound(format!("No page at {}", req.path())).into()
    }))
    .app_data(web::PayloadConfig::new(limit))
    .app_data(web::FormConfig::default().limit(limit))
    .app_data(
        MultipartFormConfig::default()
            .total_limit(limit)
            .memory_limit(limit),
    )
    .route("/", web::get().to(posts::index))
    .route("/health", web::get().to(health::health_check))
    .route("/group/{slug}/", web::get().to(posts::group_posts))
    .route("/profile/{username}/", web::get().to(posts::profile))
    .route("/profile/{username}/follow/", web::get().to(follows::follow))
    .route(
        "/profile/{username}/unfollow/",
        web::get().to(follows::unfollow),
    )
    .route("/follow/", web::get().to(follows::feed))
    .route("/create/", web::get().to(posts::create_form))
    .route("/create/", web::post().to(posts::create))
    .route("/posts/{post_id}/", web::get().to(posts::detail))
    .route("/posts/{post_id}/edit/", web::get().to(posts::edit_form))
    .route("/posts/{post_id}/edit/", web::post().to(posts::edit))
    .route("/posts/{post_id}/comment/", web::post().to(comments::add))
    .service(
        web::scope("/auth")
            .route("/signup/", web::get().to(auth::signup_form))
            .route("/signup/", web::post().to(auth::signup))
            .route("/login/", web::get().to(auth::login_form))
            .route("/login/", web::post().to(auth::login))
            .route("/logout/", web::get().to(auth::logout))
            .route("/logout/", web::post().to(auth::logout)),
    )
    .default_service(web::to(not_found));
}

async fn not_found(req: HttpRequest, request_id: RequestId) -> HttpResponse {
    let error = ErrorResponse::not_found(format!("No page at {}", req.path()))
        .with_instance(req.path())
        .with_request_id(request_id.as_str());

    HttpResponse::NotFound().json(error)
}

/// `?page=` as sent; anything unparsable falls back to the first page.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    pub fn request(&self) -> PageRequest {
        PageRequest::new(self.page.as_deref())
    }
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

fn profile_url(username: &str) -> String {
    format!("/profile/{}/", username)
}

fn post_url(post_id: uuid::Uuid) -> String {
    format!("/posts/{}/", post_id)
}

/// Serialize a page context to a JSON body.
fn to_body<T: serde::Serialize>(context: &T) -> AppResult<String> {
    serde_json::to_string(context).map_err(|e| AppError::Internal(e.to_string()))
}

fn json_page(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::json())
        .body(body)
}
