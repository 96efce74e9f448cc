//! Post service behaviour against the in-memory store.

use std::sync::Arc;

use blog_core::DomainError;
use blog_core::domain::{PostInput, User};
use blog_core::policy::Caller;
use blog_core::ports::{BaseRepository, PostRepository};
use blog_core::services::{AccountService, PostService};
use blog_infra::{
    Argon2PasswordService, InMemoryPostRepository, InMemoryStore, InMemoryUserRepository,
};

struct Harness {
    posts: Arc<InMemoryPostRepository>,
    service: PostService,
    accounts: AccountService,
}

impl Harness {
    fn new() -> Self {
        let store = InMemoryStore::new();
        let posts = Arc::new(InMemoryPostRepository::new(store.clone()));
        let users = Arc::new(InMemoryUserRepository::new(store));
        Self {
            service: PostService::new(posts.clone(), users.clone()),
            accounts: AccountService::new(users, Arc::new(Argon2PasswordService::low_cost())),
            posts,
        }
    }

    async fn user(&self, name: &str) -> (User, Caller) {
        let user = self
            .accounts
            .register(name, "password123")
            .await
            .expect("registration succeeds");
        let caller = Caller::from(user.id);
        (user, caller)
    }
}

#[tokio::test]
async fn test_alice_and_bob_scenario() {
    let h = Harness::new();
    let (_alice, alice) = h.user("alice").await;
    let (_bob, bob) = h.user("bob").await;

    let post = h
        .service
        .create(&alice, PostInput::new("Hello", "World"))
        .await
        .unwrap();

    let shown = h.service.detail(post.id).await.unwrap();
    assert_eq!(shown.author.username, "alice");

    let refused = h
        .service
        .update(&bob, post.id, PostInput::new("Hijacked", "!"))
        .await;
    assert!(matches!(refused, Err(DomainError::Forbidden)));
    let unchanged = h.service.detail(post.id).await.unwrap();
    assert_eq!(unchanged.post, post);

    h.service
        .update(&alice, post.id, PostInput::new("Hello 2", "World"))
        .await
        .unwrap();

    let after = h.service.detail(post.id).await.unwrap();
    assert_eq!(after.post.title, "Hello 2");
    assert_eq!(after.author.username, "alice");
    assert_eq!(after.post.date_posted, post.date_posted);
}

#[tokio::test]
async fn test_non_author_cannot_delete() {
    let h = Harness::new();
    let (_, alice) = h.user("alice").await;
    let (_, bob) = h.user("bob").await;
    let post = h
        .service
        .create(&alice, PostInput::new("mine", "keep out"))
        .await
        .unwrap();

    assert!(matches!(
        h.service.delete(&bob, post.id).await,
        Err(DomainError::Forbidden)
    ));
    assert!(h.service.detail(post.id).await.is_ok());
}

#[tokio::test]
async fn test_missing_post_is_not_found_before_ownership() {
    let h = Harness::new();
    let (_, bob) = h.user("bob").await;

    let update = h.service.update(&bob, 404, PostInput::new("x", "y")).await;
    assert!(matches!(update, Err(DomainError::NotFound { .. })));

    let delete = h.service.delete(&bob, 404).await;
    assert!(matches!(delete, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_ownership_checked_before_validation() {
    let h = Harness::new();
    let (_, alice) = h.user("alice").await;
    let (_, bob) = h.user("bob").await;
    let post = h
        .service
        .create(&alice, PostInput::new("t", "c"))
        .await
        .unwrap();

    let result = h.service.update(&bob, post.id, PostInput::default()).await;
    assert!(matches!(result, Err(DomainError::Forbidden)));
}

#[tokio::test]
async fn test_update_may_clear_fields() {
    let h = Harness::new();
    let (_, alice) = h.user("alice").await;
    let post = h
        .service
        .create(&alice, PostInput::new("t", "c"))
        .await
        .unwrap();

    let cleared = h
        .service
        .update(&alice, post.id, PostInput::new("", ""))
        .await
        .unwrap();
    assert_eq!(cleared.title, "");
    assert_eq!(cleared.content, "");
}

#[tokio::test]
async fn test_invalid_create_persists_nothing() {
    let h = Harness::new();
    let (_, alice) = h.user("alice").await;

    let result = h
        .service
        .create(&alice, PostInput::new("x".repeat(101), "body"))
        .await;
    match result {
        Err(DomainError::Validation(errors)) => assert_eq!(errors.get("title").len(), 1),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(h.posts.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_for_deleted_user_is_unauthorized() {
    let h = Harness::new();
    let (user, alice) = h.user("alice").await;
    h.accounts.delete_user(user.id).await.unwrap();

    let result = h.service.create(&alice, PostInput::new("t", "c")).await;
    assert!(matches!(result, Err(DomainError::Unauthorized)));
}

#[tokio::test]
async fn test_listing_pages_newest_first() {
    let h = Harness::new();
    let (_, alice) = h.user("alice").await;
    for i in 1..=7 {
        h.service
            .create(&alice, PostInput::new(format!("post {i}"), "body"))
            .await
            .unwrap();
    }

    let first = h.service.list(1).await.unwrap();
    assert_eq!(first.items.len(), 5);
    assert_eq!(first.items[0].post.title, "post 7");
    assert_eq!(first.num_pages(), 2);
    assert!(first.has_next());

    let second = h.service.list(2).await.unwrap();
    let titles: Vec<&str> = second.items.iter().map(|p| p.post.title.as_str()).collect();
    assert_eq!(titles, ["post 2", "post 1"]);
    assert!(!second.has_next());

    assert!(matches!(
        h.service.list(3).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_empty_listing_has_one_page() {
    let h = Harness::new();
    let page = h.service.list(1).await.unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.num_pages(), 1);
}

#[tokio::test]
async fn test_delete_then_detail_is_not_found() {
    let h = Harness::new();
    let (_, alice) = h.user("alice").await;
    let post = h
        .service
        .create(&alice, PostInput::new("bye", "soon"))
        .await
        .unwrap();

    h.service.delete(&alice, post.id).await.unwrap();

    assert!(matches!(
        h.service.detail(post.id).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(h.posts.find_by_id(post.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_deleting_user_cascades_to_posts() {
    let h = Harness::new();
    let (alice_user, alice) = h.user("alice").await;
    let (_bob_user, bob) = h.user("bob").await;
    let mut alice_posts = Vec::new();
    for i in 0..3 {
        let post = h
            .service
            .create(&alice, PostInput::new(format!("a{i}"), ""))
            .await
            .unwrap();
        alice_posts.push(post.id);
    }
    let bob_post = h
        .service
        .create(&bob, PostInput::new("b", ""))
        .await
        .unwrap();

    h.accounts.delete_user(alice_user.id).await.unwrap();

    for id in alice_posts {
        assert!(matches!(
            h.service.detail(id).await,
            Err(DomainError::NotFound { .. })
        ));
    }
    assert_eq!(h.service.detail(bob_post.id).await.unwrap().author.username, "bob");
    assert_eq!(h.posts.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_register_rejects_duplicates_and_short_passwords() {
    let h = Harness::new();
    h.user("alice").await;

    match h.accounts.register("alice", "password123").await {
        Err(DomainError::Validation(errors)) => assert!(!errors.get("username").is_empty()),
        other => panic!("expected duplicate username error, got {other:?}"),
    }
    match h.accounts.register("carol", "short").await {
        Err(DomainError::Validation(errors)) => assert!(!errors.get("password").is_empty()),
        other => panic!("expected password error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_authenticate() {
    let h = Harness::new();
    let (user, _) = h.user("alice").await;

    let found = h.accounts.authenticate("alice", "password123").await.unwrap();
    assert_eq!(found.id, user.id);

    assert!(matches!(
        h.accounts.authenticate("alice", "wrong-password").await,
        Err(DomainError::Unauthorized)
    ));
    assert!(matches!(
        h.accounts.authenticate("nobody", "password123").await,
        Err(DomainError::Unauthorized)
    ));
}

#[tokio::test]
async fn test_author_removed_during_create_requires_login() {
    // Users and posts live in separate stores, so the author check passes
    // but the insert sees no such user.
    let users = Arc::new(InMemoryUserRepository::new(InMemoryStore::new()));
    let posts = Arc::new(InMemoryPostRepository::new(InMemoryStore::new()));
    let accounts = AccountService::new(users.clone(), Arc::new(Argon2PasswordService::low_cost()));
    let service = PostService::new(posts.clone(), users);

    let alice = accounts.register("alice", "password123").await.unwrap();
    let result = service
        .create(&Caller::from(alice.id), PostInput::new("Hello", "World"))
        .await;

    assert!(matches!(result, Err(DomainError::Unauthorized)));
    assert_eq!(posts.count().await.unwrap(), 0);
}
