use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::FieldErrors;

/// Longest title accepted, counted in characters rather than bytes.
pub const TITLE_MAX_CHARS: usize = 100;

/// Post entity - a user-authored text item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub date_posted: DateTime<Utc>,
    pub author_id: Uuid,
}

/// A post that has not been persisted yet; the store assigns its id.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub date_posted: DateTime<Utc>,
    pub author_id: Uuid,
}

impl NewPost {
    /// Stamp a validated draft with its author and the current time.
    pub fn new(author_id: Uuid, draft: PostDraft) -> Self {
        Self {
            title: draft.title,
            content: draft.content,
            date_posted: Utc::now(),
            author_id,
        }
    }
}

/// Public face of a post's author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub username: String,
}

/// A post joined with its author, as shown by the listing and detail pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostWithAuthor {
    pub post: Post,
    pub author: Author,
}

/// Raw, unvalidated title/content as submitted by a form.
///
/// Carries no author or date; both are assigned server-side.
#[derive(Debug, Clone, Default)]
pub struct PostInput {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Title and content that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
}

impl PostInput {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            content: Some(content.into()),
        }
    }

    /// Both fields must be present and the title must fit in
    /// [`TITLE_MAX_CHARS`]. Empty strings are accepted.
    pub fn validate(self) -> Result<PostDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        match &self.title {
            None => errors.add("title", "This field is required."),
            Some(title) => {
                let length = title.chars().count();
                if length > TITLE_MAX_CHARS {
                    errors.add(
                        "title",
                        format!(
                            "Ensure this value has at most {TITLE_MAX_CHARS} characters (it has {length})."
                        ),
                    );
                }
            }
        }
        if self.content.is_none() {
            errors.add("content", "This field is required.");
        }

        match (self.title, self.content) {
            (Some(title), Some(content)) if errors.is_empty() => Ok(PostDraft { title, content }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_empty_strings() {
        let draft = PostInput::new("", "").validate().unwrap();
        assert_eq!(draft.title, "");
        assert_eq!(draft.content, "");
    }

    #[test]
    fn test_validate_requires_both_fields() {
        let errors = PostInput::default().validate().unwrap_err();
        assert_eq!(errors.get("title"), ["This field is required."]);
        assert_eq!(errors.get("content"), ["This field is required."]);
    }

    #[test]
    fn test_title_limit_counts_characters() {
        let exact = "é".repeat(TITLE_MAX_CHARS);
        assert!(PostInput::new(exact, "body").validate().is_ok());

        let over = "a".repeat(TITLE_MAX_CHARS + 1);
        let errors = PostInput::new(over, "body").validate().unwrap_err();
        assert_eq!(errors.get("title").len(), 1);
        assert!(errors.get("content").is_empty());
    }

    #[test]
    fn test_new_post_takes_given_author() {
        let author = Uuid::new_v4();
        let before = Utc::now();
        let post = NewPost::new(
            author,
            PostDraft {
                title: "Hello".into(),
                content: "World".into(),
            },
        );
        assert_eq!(post.author_id, author);
        assert!(post.date_posted >= before);
    }
}
