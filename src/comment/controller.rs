use actix_web::{HttpResponse, web};
use serde_json::json;

use crate::comment::model::CreateCommentRequest;
use crate::middleware::auth::Identity;
use crate::post::post_service::PostService;
use crate::utils::error::CustomError;
use crate::utils::helpers::success_body;

/// Add a comment to a post
/// POST /api/posts/comment/{id}
pub async fn add_comment(
    identity: Identity,
    post_id: web::Path<String>,
    post_service: web::Data<PostService>,
    body: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse, CustomError> {
    let (post, comment_id) = post_service
        .add_comment(&post_id.into_inner(), &identity, body.into_inner().text)
        .await?;

    Ok(HttpResponse::Ok().json(success_body(
        "Comment created successfully",
        json!({ "comment_id": comment_id.to_hex(), "post": post }),
    )))
}

/// Remove one of the caller's comments
/// DELETE /api/posts/comment/{id}/{comment_id}
pub async fn remove_comment(
    identity: Identity,
    path: web::Path<(String, String)>,
    post_service: web::Data<PostService>,
) -> Result<HttpResponse, CustomError> {
    let (post_id, comment_id) = path.into_inner();
    let post = post_service
        .remove_comment(&post_id, &comment_id, &identity)
        .await?;

    Ok(HttpResponse::Ok().json(success_body(
        "Comment deleted successfully",
        json!({ "post": post }),
    )))
}
