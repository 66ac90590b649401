use super::post_controller::{create_post, delete_post, get_post, like_post, list_posts, unlike_post};
use crate::comment::controller::{add_comment, remove_comment};
use crate::middleware::auth::verify_token;
use crate::middleware::error_handler::unauthenticated;
use actix_web::http::StatusCode;
use actix_web::middleware::ErrorHandlers;
use actix_web::web;
use actix_web_httpauth::middleware::HttpAuthentication;

pub fn post_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/posts")
            .wrap(HttpAuthentication::bearer(verify_token))
            .wrap(ErrorHandlers::new().handler(StatusCode::UNAUTHORIZED, unauthenticated))
            .route("", web::get().to(list_posts))
            .route("", web::post().to(create_post))
            .route("/likes/{id}", web::put().to(like_post))
            .route("/unlike/{id}", web::put().to(unlike_post))
            .route("/comment/{id}", web::post().to(add_comment))
            .route("/comment/{id}/{comment_id}", web::delete().to(remove_comment))
            .route("/{id}", web::get().to(get_post))
            .route("/{id}", web::delete().to(delete_post)),
    );
}
