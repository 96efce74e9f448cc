//! Application services - the operations the HTTP layer exposes.

mod accounts;
mod posts;

pub use accounts::{AccountService, MIN_PASSWORD_CHARS};
pub use posts::PostService;
