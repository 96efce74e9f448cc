//! Ownership policy for mutating posts.

use uuid::Uuid;

use crate::domain::Post;

/// The authenticated user on whose behalf an operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub id: Uuid,
}

impl From<Uuid> for Caller {
    fn from(id: Uuid) -> Self {
        Self { id }
    }
}

/// A resource with a single owning user.
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

impl Owned for Post {
    fn owner_id(&self) -> Uuid {
        self.author_id
    }
}

/// Whether `caller` may update or delete `resource`.
///
/// Compares stable user ids, never usernames. Callers must pass state loaded
/// in the current request.
pub fn can_mutate<R: Owned + ?Sized>(caller: &Caller, resource: &R) -> bool {
    caller.id == resource.owner_id()
}
