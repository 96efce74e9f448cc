use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use blog_core::domain::{Post, User};

#[derive(Default)]
pub(crate) struct Tables {
    pub users: HashMap<Uuid, User>,
    pub posts: BTreeMap<i64, Post>,
    pub last_post_id: i64,
}

impl Tables {
    pub fn next_post_id(&mut self) -> i64 {
        self.last_post_id += 1;
        self.last_post_id
    }
}

/// Shared backing store for the in-memory repositories.
#[derive(Default)]
pub struct InMemoryStore {
    pub(crate) tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}
