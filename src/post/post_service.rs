use std::sync::Arc;

use log::{error, info};
use mongodb::bson::oid::ObjectId;

use crate::middleware::auth::Identity;
use crate::post::post_model::{Like, Post};
use crate::post::post_store::PostStore;
use crate::user::model::UserProfile;
use crate::user::store::UserStore;
use crate::utils::error::CustomError;

/// Loads a post, applies one state transition and writes the whole document back.
///
/// Nothing is locked between the load and the write.
pub struct PostService {
    posts: Arc<dyn PostStore>,
    users: Arc<dyn UserStore>,
}

fn parse_post_id(id: &str) -> Result<ObjectId, CustomError> {
    ObjectId::parse_str(id).map_err(|_| CustomError::NotFoundError("Post not found".into()))
}

fn parse_comment_id(id: &str) -> Result<ObjectId, CustomError> {
    ObjectId::parse_str(id).map_err(|_| CustomError::CommentNotFoundError("Comment not found".into()))
}

fn log_storage<T>(op: &str, result: Result<T, CustomError>) -> Result<T, CustomError> {
    if let Err(CustomError::StorageError(msg)) = &result {
        error!("{} failed: {}", op, msg);
    }
    result
}

impl PostService {
    pub fn new(posts: Arc<dyn PostStore>, users: Arc<dyn UserStore>) -> Self {
        PostService { posts, users }
    }

    async fn load(&self, post_id: &str) -> Result<Post, CustomError> {
        let id = parse_post_id(post_id)?;
        self.posts
            .find_by_id(&id)
            .await?
            .ok_or_else(|| CustomError::NotFoundError("Post not found".into()))
    }

    async fn profile(&self, identity: &Identity) -> Result<UserProfile, CustomError> {
        self.users
            .find_profile(&identity.user_id)
            .await?
            .ok_or_else(|| CustomError::UnauthenticatedError("User no longer exists".into()))
    }

    pub async fn list_posts(&self) -> Result<Vec<Post>, CustomError> {
        log_storage("list posts", self.posts.find_all().await)
    }

    pub async fn get_post(&self, post_id: &str) -> Result<Post, CustomError> {
        log_storage("get post", self.load(post_id).await)
    }

    pub async fn create_post(&self, identity: &Identity, text: String) -> Result<Post, CustomError> {
        let result = async {
            let author = self.profile(identity).await?;
            let post = Post::new(&author, text)?;
            self.posts.insert(&post).await?;
            Ok::<_, CustomError>(post)
        }
        .await;

        let post = log_storage("create post", result)?;
        info!("Post {} created by {}", post.id, identity.user_id);
        Ok(post)
    }

    pub async fn delete_post(&self, post_id: &str, identity: &Identity) -> Result<(), CustomError> {
        let result = async {
            let post = self.load(post_id).await?;
            post.ensure_author(&identity.user_id)?;

            if !self.posts.delete(&post.id).await? {
                return Err(CustomError::NotFoundError("Post not found".into()));
            }
            Ok::<_, CustomError>(post.id)
        }
        .await;

        let id = log_storage("delete post", result)?;
        info!("Post {} removed by {}", id, identity.user_id);
        Ok(())
    }

    pub async fn like(&self, post_id: &str, identity: &Identity) -> Result<Vec<Like>, CustomError> {
        let result = async {
            let mut post = self.load(post_id).await?;
            post.like(identity.user_id)?;
            self.posts.replace(&post).await?;
            Ok::<_, CustomError>(post)
        }
        .await;

        let post = log_storage("like post", result)?;
        info!("Post {} liked by {}", post.id, identity.user_id);
        Ok(post.likes.into())
    }

    pub async fn unlike(&self, post_id: &str, identity: &Identity) -> Result<Vec<Like>, CustomError> {
        let result = async {
            let mut post = self.load(post_id).await?;
            post.unlike(&identity.user_id)?;
            self.posts.replace(&post).await?;
            Ok::<_, CustomError>(post)
        }
        .await;

        let post = log_storage("unlike post", result)?;
        info!("Post {} unliked by {}", post.id, identity.user_id);
        Ok(post.likes.into())
    }

    /// Returns the updated post and the id of the new comment.
    pub async fn add_comment(
        &self,
        post_id: &str,
        identity: &Identity,
        text: String,
    ) -> Result<(Post, ObjectId), CustomError> {
        let result = async {
            let mut post = self.load(post_id).await?;
            let author = self.profile(identity).await?;
            let comment_id = post.add_comment(&author, text)?;
            self.posts.replace(&post).await?;
            Ok::<_, CustomError>((post, comment_id))
        }
        .await;

        let (post, comment_id) = log_storage("add comment", result)?;
        info!("Comment {} added to post {} by {}", comment_id, post.id, identity.user_id);
        Ok((post, comment_id))
    }

    pub async fn remove_comment(
        &self,
        post_id: &str,
        comment_id: &str,
        identity: &Identity,
    ) -> Result<Post, CustomError> {
        let result = async {
            let mut post = self.load(post_id).await?;
            let comment_id = parse_comment_id(comment_id)?;
            post.remove_comment(&comment_id, &identity.user_id)?;
            self.posts.replace(&post).await?;
            Ok::<_, CustomError>((post, comment_id))
        }
        .await;

        let (post, comment_id) = log_storage("remove comment", result)?;
        info!("Comment {} removed from post {} by {}", comment_id, post.id, identity.user_id);
        Ok(post)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::post_store::MemoryPostStore;
    use crate::user::store::MemoryUserStore;
    use async_trait::async_trait;

    struct Fixture {
        service: PostService,
        posts: Arc<MemoryPostStore>,
        ada: Identity,
        bob: Identity,
    }

    async fn fixture() -> Fixture {
        let posts = Arc::new(MemoryPostStore::new());
        let users = Arc::new(MemoryUserStore::new());

        let ada = ObjectId::new();
        let bob = ObjectId::new();
        for (id, name) in [(ada, "ada"), (bob, "bob")] {
            users
                .insert(UserProfile {
                    id,
                    name: name.into(),
                    avatar: format!("//www.gravatar.com/avatar/{}", name),
                })
                .await;
        }

        Fixture {
            service: PostService::new(posts.clone(), users),
            posts,
            ada: Identity { user_id: ada },
            bob: Identity { user_id: bob },
        }
    }

    fn users_of(likes: &[Like]) -> Vec<ObjectId> {
        likes.iter().map(|like| like.user).collect()
    }

    #[actix_web::test]
    async fn create_post_snapshots_profile() {
        let f = fixture().await;
        let post = f.service.create_post(&f.ada, "first!".into()).await.unwrap();

        assert_eq!(post.author_name, "ada");
        assert_eq!(post.author_id, f.ada.user_id);
        assert_eq!(f.service.get_post(&post.id.to_hex()).await.unwrap(), post);
    }

    #[actix_web::test]
    async fn create_post_requires_text_and_a_known_user() {
        let f = fixture().await;

        assert!(matches!(
            f.service.create_post(&f.ada, " ".into()).await,
            Err(CustomError::ValidationError(_))
        ));

        let ghost = Identity { user_id: ObjectId::new() };
        assert!(matches!(
            f.service.create_post(&ghost, "boo".into()).await,
            Err(CustomError::UnauthenticatedError(_))
        ));
        assert!(f.service.list_posts().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn unknown_or_malformed_post_ids_are_not_found() {
        let f = fixture().await;

        for id in ["not-an-object-id".to_string(), ObjectId::new().to_hex()] {
            assert!(matches!(
                f.service.get_post(&id).await,
                Err(CustomError::NotFoundError(_))
            ));
            assert!(matches!(
                f.service.like(&id, &f.ada).await,
                Err(CustomError::NotFoundError(_))
            ));
            assert!(matches!(
                f.service.add_comment(&id, &f.ada, "hi".into()).await,
                Err(CustomError::NotFoundError(_))
            ));
        }
    }

    #[actix_web::test]
    async fn only_the_author_can_delete() {
        let f = fixture().await;
        let post = f.service.create_post(&f.ada, "mine".into()).await.unwrap();
        let id = post.id.to_hex();

        assert!(matches!(
            f.service.delete_post(&id, &f.bob).await,
            Err(CustomError::ForbiddenError(_))
        ));
        assert!(f.service.get_post(&id).await.is_ok());

        f.service.delete_post(&id, &f.ada).await.unwrap();
        assert!(matches!(
            f.service.get_post(&id).await,
            Err(CustomError::NotFoundError(_))
        ));
    }

    #[actix_web::test]
    async fn like_twice_then_unlike() {
        let f = fixture().await;
        let post = f.service.create_post(&f.ada, "like me".into()).await.unwrap();
        let id = post.id.to_hex();

        let likes = f.service.like(&id, &f.bob).await.unwrap();
        assert_eq!(users_of(&likes), vec![f.bob.user_id]);

        assert!(matches!(
            f.service.like(&id, &f.bob).await,
            Err(CustomError::AlreadyLikedError(_))
        ));
        let stored = f.service.get_post(&id).await.unwrap();
        assert_eq!(stored.likes.len(), 1);

        let likes = f.service.like(&id, &f.ada).await.unwrap();
        assert_eq!(users_of(&likes), vec![f.ada.user_id, f.bob.user_id]);

        let likes = f.service.unlike(&id, &f.bob).await.unwrap();
        assert_eq!(users_of(&likes), vec![f.ada.user_id]);

        assert!(matches!(
            f.service.unlike(&id, &f.bob).await,
            Err(CustomError::NotLikedError(_))
        ));
        assert_eq!(f.service.get_post(&id).await.unwrap().likes.len(), 1);
    }

    #[actix_web::test]
    async fn remove_comment_targets_the_given_id() {
        let f = fixture().await;
        let post = f.service.create_post(&f.bob, "discuss".into()).await.unwrap();
        let id = post.id.to_hex();

        let (_, first) = f.service.add_comment(&id, &f.ada, "one".into()).await.unwrap();
        let (_, second) = f.service.add_comment(&id, &f.ada, "two".into()).await.unwrap();
        let (post, _) = f.service.add_comment(&id, &f.bob, "three".into()).await.unwrap();
        assert_eq!(post.comments.len(), 3);
        assert_eq!(post.comments[0].author_name, "bob");

        let post = f
            .service
            .remove_comment(&id, &first.to_hex(), &f.ada)
            .await
            .unwrap();
        let remaining: Vec<String> = post.comments.iter().map(|c| c.text.clone()).collect();
        assert_eq!(remaining, vec!["three", "two"]);
        assert!(post.comments.iter().any(|c| c.id == second));
    }

    #[actix_web::test]
    async fn remove_comment_failures_leave_comments_alone() {
        let f = fixture().await;
        let post = f.service.create_post(&f.ada, "discuss".into()).await.unwrap();
        let id = post.id.to_hex();
        let (_, comment) = f.service.add_comment(&id, &f.ada, "keep".into()).await.unwrap();

        assert!(matches!(
            f.service.remove_comment(&id, &comment.to_hex(), &f.bob).await,
            Err(CustomError::ForbiddenError(_))
        ));
        assert!(matches!(
            f.service.remove_comment(&id, "garbage", &f.ada).await,
            Err(CustomError::CommentNotFoundError(_))
        ));
        assert!(matches!(
            f.service
                .remove_comment(&id, &ObjectId::new().to_hex(), &f.ada)
                .await,
            Err(CustomError::CommentNotFoundError(_))
        ));
        assert_eq!(f.service.get_post(&id).await.unwrap().comments.len(), 1);
    }

    #[actix_web::test]
    async fn list_posts_is_newest_first() {
        let f = fixture().await;
        let first = f.service.create_post(&f.ada, "one".into()).await.unwrap();
        let second = f.service.create_post(&f.bob, "two".into()).await.unwrap();

        let listed = f.service.list_posts().await.unwrap();
        let ids: Vec<ObjectId> = listed.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
        assert_eq!(f.posts.find_all().await.unwrap().len(), 2);
    }

    /// Reads work, writes fail.
    struct FailingWrites(MemoryPostStore);

    #[async_trait]
    impl PostStore for FailingWrites {
        async fn insert(&self, post: &Post) -> Result<(), CustomError> {
            self.0.insert(post).await
        }

        async fn find_all(&self) -> Result<Vec<Post>, CustomError> {
            self.0.find_all().await
        }

        async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Post>, CustomError> {
            self.0.find_by_id(id).await
        }

        async fn replace(&self, _post: &Post) -> Result<(), CustomError> {
            Err(CustomError::StorageError("disk full".into()))
        }

        async fn delete(&self, _id: &ObjectId) -> Result<bool, CustomError> {
            Err(CustomError::StorageError("disk full".into()))
        }
    }

    #[actix_web::test]
    async fn failed_writes_surface_as_storage_errors_without_changing_state() {
        let users = Arc::new(MemoryUserStore::new());
        let ada = ObjectId::new();
        users
            .insert(UserProfile {
                id: ada,
                name: "ada".into(),
                avatar: String::new(),
            })
            .await;
        let ada = Identity { user_id: ada };

        let store = Arc::new(FailingWrites(MemoryPostStore::new()));
        let service = PostService::new(store.clone(), users);
        let post = service.create_post(&ada, "stuck".into()).await.unwrap();
        let id = post.id.to_hex();

        assert!(matches!(
            service.like(&id, &ada).await,
            Err(CustomError::StorageError(_))
        ));
        assert!(matches!(
            service.delete_post(&id, &ada).await,
            Err(CustomError::StorageError(_))
        ));
        assert_eq!(service.get_post(&id).await.unwrap(), post);
    }
}
