use std::collections::HashMap;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::{Collection, Database};
use tokio::sync::RwLock;

use crate::post::post_model::Post;
use crate::utils::error::CustomError;

/// Whole-document storage for posts.
///
/// There is no versioning: `replace` overwrites whatever is stored, so two callers that
/// read the same post and write it back will lose the first write.
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn insert(&self, post: &Post) -> Result<(), CustomError>;

    /// All posts, newest first.
    async fn find_all(&self) -> Result<Vec<Post>, CustomError>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Post>, CustomError>;

    /// Overwrites the stored post with the same id. `NotFoundError` if it is gone.
    async fn replace(&self, post: &Post) -> Result<(), CustomError>;

    /// Returns whether a post was removed.
    async fn delete(&self, id: &ObjectId) -> Result<bool, CustomError>;
}

pub struct MongoPostStore {
    collection: Collection<Post>,
}

impl MongoPostStore {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<Post>("posts");
        MongoPostStore { collection }
    }
}

#[async_trait]
impl PostStore for MongoPostStore {
    async fn insert(&self, post: &Post) -> Result<(), CustomError> {
        self.collection
            .insert_one(post)
            .await
            .map_err(|e| CustomError::StorageError(format!("Failed to create post: {}", e)))?;

        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Post>, CustomError> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(|e| CustomError::StorageError(format!("Failed to fetch posts: {}", e)))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| CustomError::StorageError(format!("Failed to collect posts: {}", e)))
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Post>, CustomError> {
        self.collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| CustomError::StorageError(format!("Failed to fetch post: {}", e)))
    }

    async fn replace(&self, post: &Post) -> Result<(), CustomError> {
        let result = self
            .collection
            .replace_one(doc! { "_id": post.id }, post)
            .await
            .map_err(|e| CustomError::StorageError(format!("Failed to save post: {}", e)))?;

        if result.matched_count == 0 {
            return Err(CustomError::NotFoundError("Post not found".into()));
        }

        Ok(())
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool, CustomError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id })
            .await
            .map_err(|e| CustomError::StorageError(format!("Failed to delete post: {}", e)))?;

        Ok(result.deleted_count > 0)
    }
}

/// In-process store with the same last-write-wins behaviour as the MongoDB one.
#[derive(Default)]
pub struct MemoryPostStore {
    posts: RwLock<HashMap<ObjectId, Post>>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn insert(&self, post: &Post) -> Result<(), CustomError> {
        let mut posts = self.posts.write().await;
        if posts.contains_key(&post.id) {
            return Err(CustomError::StorageError(format!(
                "Duplicate post id {}",
                post.id
            )));
        }
        posts.insert(post.id, post.clone());
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Post>, CustomError> {
        let mut posts: Vec<Post> = self.posts.read().await.values().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(posts)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Post>, CustomError> {
        Ok(self.posts.read().await.get(id).cloned())
    }

    async fn replace(&self, post: &Post) -> Result<(), CustomError> {
        match self.posts.write().await.get_mut(&post.id) {
            Some(stored) => {
                *stored = post.clone();
                Ok(())
            }
            None => Err(CustomError::NotFoundError("Post not found".into())),
        }
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool, CustomError> {
        Ok(self.posts.write().await.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::model::UserProfile;
    use chrono::{Duration, Utc};

    fn author() -> UserProfile {
        UserProfile {
            id: ObjectId::new(),
            name: "ada".into(),
            avatar: String::new(),
        }
    }

    #[actix_web::test]
    async fn find_all_lists_newest_first() {
        let store = MemoryPostStore::new();
        let author = author();

        let mut older = Post::new(&author, "older".into()).unwrap();
        older.created_at = Utc::now() - Duration::minutes(5);
        let newer = Post::new(&author, "newer".into()).unwrap();

        store.insert(&older).await.unwrap();
        store.insert(&newer).await.unwrap();

        let texts: Vec<String> = store
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.text)
            .collect();
        assert_eq!(texts, vec!["newer", "older"]);
    }

    #[actix_web::test]
    async fn replace_of_a_deleted_post_reports_not_found() {
        let store = MemoryPostStore::new();
        let post = Post::new(&author(), "gone soon".into()).unwrap();
        store.insert(&post).await.unwrap();

        assert!(store.delete(&post.id).await.unwrap());
        assert!(!store.delete(&post.id).await.unwrap());
        assert!(matches!(
            store.replace(&post).await,
            Err(CustomError::NotFoundError(_))
        ));
    }

    #[actix_web::test]
    async fn interleaved_read_modify_write_loses_an_update() {
        let store = MemoryPostStore::new();
        let post = Post::new(&author(), "popular".into()).unwrap();
        store.insert(&post).await.unwrap();

        let first_user = ObjectId::new();
        let second_user = ObjectId::new();

        // Both requests load before either saves.
        let mut first = store.find_by_id(&post.id).await.unwrap().unwrap();
        let mut second = store.find_by_id(&post.id).await.unwrap().unwrap();
        first.like(first_user).unwrap();
        second.like(second_user).unwrap();
        store.replace(&first).await.unwrap();
        store.replace(&second).await.unwrap();

        let stored = store.find_by_id(&post.id).await.unwrap().unwrap();
        assert!(!stored.likes.contains(&first_user));
        assert!(stored.likes.contains(&second_user));
        assert_eq!(stored.likes.len(), 1);
    }
}
