//! Post listing, detail and the ownership-gated mutations.

use std::sync::Arc;

use crate::domain::{NewPost, Post, PostInput, PostWithAuthor};
use crate::error::{DomainError, RepoError};
use crate::pagination::{POSTS_PER_PAGE, Page, page_offset};
use crate::policy::{Caller, can_mutate};
use crate::ports::{PostRepository, UserRepository};

const ENTITY: &str = "post";

/// Post operations. Every update and delete goes through
/// [`PostService::authorize_mutation`].
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { posts, users }
    }

    /// One page of posts, newest first.
    pub async fn list(&self, number: u64) -> Result<Page<PostWithAuthor>, DomainError> {
        let total_items = self.posts.count().await?;
        let offset = page_offset(number, POSTS_PER_PAGE, total_items)?;
        let items = self.posts.list_recent(offset, POSTS_PER_PAGE).await?;

        Ok(Page {
            items,
            number,
            per_page: POSTS_PER_PAGE,
            total_items,
        })
    }

    pub async fn detail(&self, id: i64) -> Result<PostWithAuthor, DomainError> {
        self.posts
            .find_with_author(id)
            .await?
            .ok_or_else(|| DomainError::not_found(ENTITY, id))
    }

    /// Create a post owned by `caller`.
    pub async fn create(&self, caller: &Caller, input: PostInput) -> Result<Post, DomainError> {
        // A token can outlive its account.
        if self.users.find_by_id(caller.id).await?.is_none() {
            tracing::warn!(user_id = %caller.id, "Session refers to a deleted user");
            return Err(DomainError::Unauthorized);
        }

        let draft = input.validate().map_err(DomainError::Validation)?;
        let post = self
            .posts
            .insert(NewPost::new(caller.id, draft))
            .await
            .map_err(|e| match e {
                // The account was removed after the check above.
                RepoError::ForeignKey(_) => DomainError::Unauthorized,
                other => other.into(),
            })?;

        tracing::info!(post_id = post.id, user_id = %caller.id, "Post created");
        Ok(post)
    }

    /// Load the post fresh and check that `caller` owns it.
    ///
    /// A missing post is not-found; someone else's post is forbidden.
    pub async fn authorize_mutation(&self, caller: &Caller, id: i64) -> Result<Post, DomainError> {
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(ENTITY, id))?;

        if !can_mutate(caller, &post) {
            tracing::warn!(post_id = id, user_id = %caller.id, "Refused mutation by non-author");
            return Err(DomainError::Forbidden);
        }
        Ok(post)
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: i64,
        input: PostInput,
    ) -> Result<Post, DomainError> {
        self.authorize_mutation(caller, id).await?;
        let draft = input.validate().map_err(DomainError::Validation)?;

        let post = self
            .posts
            .update_body(id, draft)
            .await
            .map_err(|e| vanished(e, id))?;

        tracing::info!(post_id = id, user_id = %caller.id, "Post updated");
        Ok(post)
    }

    pub async fn delete(&self, caller: &Caller, id: i64) -> Result<(), DomainError> {
        self.authorize_mutation(caller, id).await?;
        self.posts.delete(id).await.map_err(|e| vanished(e, id))?;

        tracing::info!(post_id = id, user_id = %caller.id, "Post deleted");
        Ok(())
    }
}

/// A post deleted between the ownership check and the write is not-found.
fn vanished(err: RepoError, id: i64) -> DomainError {
    match err {
        RepoError::NotFound => DomainError::not_found(ENTITY, id),
        other => other.into(),
    }
}
