use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use blog_core::domain::{NewPost, Post, PostDraft, PostWithAuthor};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, PostRepository};

use super::InMemoryStore;
use super::store::Tables;

/// In-memory post repository.
#[derive(Clone)]
pub struct InMemoryPostRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryPostRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

fn with_author(tables: &Tables, post: &Post) -> Result<PostWithAuthor, RepoError> {
    let author = tables
        .users
        .get(&post.author_id)
        .ok_or_else(|| RepoError::Query(format!("post {} has no matching author", post.id)))?;
    Ok(PostWithAuthor {
        post: post.clone(),
        author: author.as_author(),
    })
}

fn ensure_author(tables: &Tables, author_id: Uuid) -> Result<(), RepoError> {
    if tables.users.contains_key(&author_id) {
        Ok(())
    } else {
        Err(RepoError::ForeignKey(format!(
            "author {author_id} does not exist"
        )))
    }
}

#[async_trait]
impl BaseRepository<Post, i64> for InMemoryPostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.posts.get(&id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.store.tables.write().await;
        ensure_author(&tables, post.author_id)?;

        tables.last_post_id = tables.last_post_id.max(post.id);
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        tables
            .posts
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let mut tables = self.store.tables.write().await;
        ensure_author(&tables, new_post.author_id)?;

        let post = Post {
            id: tables.next_post_id(),
            title: new_post.title,
            content: new_post.content,
            date_posted: new_post.date_posted,
            author_id: new_post.author_id,
        };
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update_body(&self, id: i64, draft: PostDraft) -> Result<Post, RepoError> {
        let mut tables = self.store.tables.write().await;
        let post = tables.posts.get_mut(&id).ok_or(RepoError::NotFound)?;

        post.title = draft.title;
        post.content = draft.content;
        Ok(post.clone())
    }

    async fn find_with_author(&self, id: i64) -> Result<Option<PostWithAuthor>, RepoError> {
        let tables = self.store.tables.read().await;
        tables
            .posts
            .get(&id)
            .map(|post| with_author(&tables, post))
            .transpose()
    }

    async fn list_recent(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PostWithAuthor>, RepoError> {
        let tables = self.store.tables.read().await;

        let mut posts: Vec<&Post> = tables.posts.values().collect();
        posts.sort_by(|a, b| {
            b.date_posted
                .cmp(&a.date_posted)
                .then_with(|| b.id.cmp(&a.id))
        });

        posts
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|post| with_author(&tables, post))
            .collect()
    }

    async fn count(&self) -> Result<u64, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.posts.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_core::domain::User;
    use chrono::{TimeDelta, Utc};

    use crate::memory::InMemoryUserRepository;

    async fn seeded() -> (InMemoryPostRepository, User) {
        let store = InMemoryStore::new();
        let users = InMemoryUserRepository::new(store.clone());
        let alice = users
            .save(User::new("alice".into(), "hash".into()))
            .await
            .unwrap();
        (InMemoryPostRepository::new(store), alice)
    }

    fn new_post(author_id: Uuid, title: &str, minutes_ago: i64) -> NewPost {
        NewPost {
            title: title.into(),
            content: "body".into(),
            date_posted: Utc::now() - TimeDelta::minutes(minutes_ago),
            author_id,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let (repo, alice) = seeded().await;
        let first = repo.insert(new_post(alice.id, "a", 0)).await.unwrap();
        let second = repo.insert(new_post(alice.id, "b", 0)).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_insert_rejects_unknown_author() {
        let (repo, _) = seeded().await;
        let result = repo.insert(new_post(Uuid::new_v4(), "orphan", 0)).await;
        assert!(matches!(result, Err(RepoError::ForeignKey(_))));
    }

    #[tokio::test]
    async fn test_list_recent_orders_by_date_then_id() {
        let (repo, alice) = seeded().await;
        repo.insert(new_post(alice.id, "oldest", 30)).await.unwrap();
        repo.insert(new_post(alice.id, "newest", 0)).await.unwrap();
        repo.insert(new_post(alice.id, "middle", 10)).await.unwrap();

        let titles: Vec<String> = repo
            .list_recent(0, 10)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.post.title)
            .collect();
        assert_eq!(titles, ["newest", "middle", "oldest"]);

        let tail = repo.list_recent(2, 10).await.unwrap();
        assert_eq!(tail.len(), 1);
        assert_eq!(tail[0].author.username, "alice");
    }

    #[tokio::test]
    async fn test_update_body_keeps_author_and_date() {
        let (repo, alice) = seeded().await;
        let created = repo.insert(new_post(alice.id, "before", 5)).await.unwrap();

        let updated = repo
            .update_body(
                created.id,
                PostDraft {
                    title: "after".into(),
                    content: "changed".into(),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "after");
        assert_eq!(updated.content, "changed");
        assert_eq!(updated.date_posted, created.date_posted);
        assert_eq!(updated.author_id, created.author_id);
    }

    #[tokio::test]
    async fn test_update_missing_post() {
        let (repo, _) = seeded().await;
        let result = repo
            .update_body(
                42,
                PostDraft {
                    title: String::new(),
                    content: String::new(),
                },
            )
            .await;
        assert!(matches!(result, Err(RepoError::NotFound)));
    }
}
