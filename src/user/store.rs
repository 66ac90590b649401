use std::collections::HashMap;

use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::{Collection, Database};
use tokio::sync::RwLock;

use crate::user::model::UserProfile;
use crate::utils::error::CustomError;

/// Read access to user profiles. Registration lives elsewhere.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_profile(&self, id: &ObjectId) -> Result<Option<UserProfile>, CustomError>;
}

pub struct MongoUserStore {
    collection: Collection<UserProfile>,
}

impl MongoUserStore {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<UserProfile>("users");
        MongoUserStore { collection }
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn find_profile(&self, id: &ObjectId) -> Result<Option<UserProfile>, CustomError> {
        self.collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| CustomError::StorageError(format!("Failed to fetch user: {}", e)))
    }
}

#[derive(Default)]
pub struct MemoryUserStore {
    profiles: RwLock<HashMap<ObjectId, UserProfile>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, profile: UserProfile) {
        self.profiles.write().await.insert(profile.id, profile);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_profile(&self, id: &ObjectId) -> Result<Option<UserProfile>, CustomError> {
        Ok(self.profiles.read().await.get(id).cloned())
    }
}
