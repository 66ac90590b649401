use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::user::model::UserProfile;

/// A comment embedded in its post. It has no collection of its own.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub text: String,
    pub author_id: ObjectId,
    pub author_name: String,
    pub author_avatar: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(author: &UserProfile, text: String) -> Self {
        Comment {
            id: ObjectId::new(),
            text,
            author_id: author.id,
            author_name: author.name.clone(),
            author_avatar: author.avatar.clone(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Deserialize)]
pub struct CreateCommentRequest {
    pub text: String,
}
