use crate::middleware::auth::TokenVerifier;
use crate::middleware::error_handler::json_error_handler;
use crate::post::post_index::post_routes;
use crate::post::post_service::PostService;
use crate::utils::helpers::success_body;
use actix_web::{HttpResponse, Responder, get, web};
use serde_json::json;

#[get("/")]
async fn default() -> impl Responder {
    HttpResponse::Ok().json(success_body("API is running", json!({})))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(default);
    cfg.configure(post_routes);
}

/// Handles shared by every worker. Built once, cloned into each `App`.
#[derive(Clone)]
pub struct AppState {
    pub post_service: web::Data<PostService>,
    pub token_verifier: web::Data<TokenVerifier>,
}

impl AppState {
    pub fn new(post_service: PostService, token_verifier: TokenVerifier) -> Self {
        AppState {
            post_service: web::Data::new(post_service),
            token_verifier: web::Data::new(token_verifier),
        }
    }

    /// Registers app data and all routes.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.post_service.clone())
            .app_data(self.token_verifier.clone())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .configure(routes);
    }
}
