use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// The slice of a user document that posts and comments snapshot.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
}
