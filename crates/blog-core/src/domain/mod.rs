//! Domain entities - the core business objects.

mod post;
mod user;
mod validation;

pub use post::{Author, NewPost, Post, PostDraft, PostInput, PostWithAuthor, TITLE_MAX_CHARS};
pub use user::{USERNAME_MAX_CHARS, User, mask_username, validate_username};
pub use validation::FieldErrors;
