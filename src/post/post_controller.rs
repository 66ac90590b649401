use actix_web::{HttpResponse, web};
use serde_json::json;

use crate::middleware::auth::Identity;
use crate::post::post_model::CreatePostRequest;
use crate::post::post_service::PostService;
use crate::utils::error::CustomError;
use crate::utils::helpers::success_body;

/// GET /api/posts
pub async fn list_posts(post_service: web::Data<PostService>) -> Result<HttpResponse, CustomError> {
    let posts = post_service.list_posts().await?;

    Ok(HttpResponse::Ok().json(success_body(
        "Posts fetched successfully",
        json!({ "count": posts.len(), "posts": posts }),
    )))
}

/// GET /api/posts/{id}
pub async fn get_post(
    post_id: web::Path<String>,
    post_service: web::Data<PostService>,
) -> Result<HttpResponse, CustomError> {
    let post = post_service.get_post(&post_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(success_body("Post fetched successfully", json!({ "post": post }))))
}

/// POST /api/posts
pub async fn create_post(
    identity: Identity,
    post_service: web::Data<PostService>,
    body: web::Json<CreatePostRequest>,
) -> Result<HttpResponse, CustomError> {
    let post = post_service
        .create_post(&identity, body.into_inner().text)
        .await?;

    Ok(HttpResponse::Ok().json(success_body("Post created successfully", json!({ "post": post }))))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    identity: Identity,
    post_id: web::Path<String>,
    post_service: web::Data<PostService>,
) -> Result<HttpResponse, CustomError> {
    post_service
        .delete_post(&post_id.into_inner(), &identity)
        .await?;

    Ok(HttpResponse::Ok().json(success_body("Post removed", json!({}))))
}

/// PUT /api/posts/likes/{id}
pub async fn like_post(
    identity: Identity,
    post_id: web::Path<String>,
    post_service: web::Data<PostService>,
) -> Result<HttpResponse, CustomError> {
    let likes = post_service.like(&post_id.into_inner(), &identity).await?;

    Ok(HttpResponse::Ok().json(success_body("Post liked", json!({ "likes": likes }))))
}

/// PUT /api/posts/unlike/{id}
pub async fn unlike_post(
    identity: Identity,
    post_id: web::Path<String>,
    post_service: web::Data<PostService>,
) -> Result<HttpResponse, CustomError> {
    let likes = post_service.unlike(&post_id.into_inner(), &identity).await?;

    Ok(HttpResponse::Ok().json(success_body("Post unliked", json!({ "likes": likes }))))
}
