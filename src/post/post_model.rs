use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::comment::model::Comment;
use crate::user::model::UserProfile;
use crate::utils::error::CustomError;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Like {
    pub user: ObjectId,
}

/// Likes of a post, newest first, at most one per user.
///
/// Stored as a plain array of `{ user }` documents. Duplicates found in a loaded
/// document are dropped, keeping the newest entry.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(from = "Vec<Like>", into = "Vec<Like>")]
pub struct Likes(Vec<Like>);

impl Likes {
    pub fn contains(&self, user: &ObjectId) -> bool {
        self.position(user).is_some()
    }

    fn position(&self, user: &ObjectId) -> Option<usize> {
        self.0.iter().position(|like| like.user == *user)
    }

    /// Prepends `user`. Returns `false` and leaves the list alone if already present.
    pub fn insert_front(&mut self, user: ObjectId) -> bool {
        if self.contains(&user) {
            return false;
        }
        self.0.insert(0, Like { user });
        true
    }

    /// Removes the entry for `user`. Returns `false` if there was none.
    pub fn remove(&mut self, user: &ObjectId) -> bool {
        match self.position(user) {
            Some(index) => {
                self.0.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Like] {
        &self.0
    }
}

impl From<Vec<Like>> for Likes {
    fn from(likes: Vec<Like>) -> Self {
        let mut unique: Vec<Like> = Vec::with_capacity(likes.len());
        for like in likes {
            if !unique.contains(&like) {
                unique.push(like);
            }
        }
        Likes(unique)
    }
}

impl From<Likes> for Vec<Like> {
    fn from(likes: Likes) -> Self {
        likes.0
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub author_id: ObjectId,
    pub author_name: String,
    pub author_avatar: String,
    pub text: String,
    #[serde(default)]
    pub likes: Likes,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CreatePostRequest {
    pub text: String,
}

pub(crate) fn require_text(text: &str) -> Result<(), CustomError> {
    if text.trim().is_empty() {
        return Err(CustomError::ValidationError("Text is required".into()));
    }
    Ok(())
}

impl Post {
    pub fn new(author: &UserProfile, text: String) -> Result<Self, CustomError> {
        require_text(&text)?;

        Ok(Post {
            id: ObjectId::new(),
            author_id: author.id,
            author_name: author.name.clone(),
            author_avatar: author.avatar.clone(),
            text,
            likes: Likes::default(),
            comments: Vec::new(),
            created_at: Utc::now(),
        })
    }

    pub fn ensure_author(&self, requester: &ObjectId) -> Result<(), CustomError> {
        if self.author_id != *requester {
            return Err(CustomError::ForbiddenError("User is not authorized".into()));
        }
        Ok(())
    }

    pub fn like(&mut self, user: ObjectId) -> Result<(), CustomError> {
        if !self.likes.insert_front(user) {
            return Err(CustomError::AlreadyLikedError(
                "This post has already been liked".into(),
            ));
        }
        Ok(())
    }

    pub fn unlike(&mut self, user: &ObjectId) -> Result<(), CustomError> {
        if !self.likes.remove(user) {
            return Err(CustomError::NotLikedError(
                "This post has not been liked yet".into(),
            ));
        }
        Ok(())
    }

    /// Prepends a new comment and returns its id.
    pub fn add_comment(&mut self, author: &UserProfile, text: String) -> Result<ObjectId, CustomError> {
        require_text(&text)?;

        let comment = Comment::new(author, text);
        let id = comment.id;
        self.comments.insert(0, comment);
        Ok(id)
    }

    /// Removes the comment whose id is `comment_id`, provided `requester` wrote it.
    pub fn remove_comment(
        &mut self,
        comment_id: &ObjectId,
        requester: &ObjectId,
    ) -> Result<Comment, CustomError> {
        let index = self
            .comments
            .iter()
            .position(|comment| comment.id == *comment_id)
            .ok_or_else(|| CustomError::CommentNotFoundError("Comment not found".into()))?;

        if self.comments[index].author_id != *requester {
            return Err(CustomError::ForbiddenError("User is not authorized".into()));
        }

        Ok(self.comments.remove(index))
    }
}
