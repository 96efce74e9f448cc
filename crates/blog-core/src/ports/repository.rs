use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{NewPost, Post, PostDraft, PostWithAuthor, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
///
/// `delete` must also remove every post authored by the user.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their exact username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i64> {
    /// Persist a new post and return it with its assigned id.
    async fn insert(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Overwrite title and content only; author and date_posted are untouched.
    async fn update_body(&self, id: i64, draft: PostDraft) -> Result<Post, RepoError>;

    async fn find_with_author(&self, id: i64) -> Result<Option<PostWithAuthor>, RepoError>;

    /// Posts ordered newest first (date_posted desc, then id desc).
    async fn list_recent(&self, offset: u64, limit: u64)
    -> Result<Vec<PostWithAuthor>, RepoError>;

    async fn count(&self) -> Result<u64, RepoError>;
}
