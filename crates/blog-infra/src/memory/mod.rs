//! In-memory repositories - used when no database is configured, and by tests.
//!
//! Both repositories share one [`InMemoryStore`] so that deleting a user can
//! cascade to that user's posts. Data is lost on process restart.

mod posts;
mod store;
mod users;

pub use posts::InMemoryPostRepository;
pub use store::InMemoryStore;
pub use users::InMemoryUserRepository;
