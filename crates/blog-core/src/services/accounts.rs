//! Registration, credential checks and account removal.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{FieldErrors, User, mask_username, validate_username};
use crate::error::{DomainError, RepoError};
use crate::ports::{PasswordService, UserRepository};

pub const MIN_PASSWORD_CHARS: usize = 8;

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self { users, passwords }
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<User, DomainError> {
        let username = username.trim();
        let mut errors = FieldErrors::new();

        if let Err(msg) = validate_username(username) {
            errors.add("username", msg);
        }
        if password.chars().count() < MIN_PASSWORD_CHARS {
            errors.add(
                "password",
                format!("This password is too short. It must contain at least {MIN_PASSWORD_CHARS} characters."),
            );
        }
        if errors.is_empty() && self.users.find_by_username(username).await?.is_some() {
            errors.add("username", "A user with that username already exists.");
        }
        if !errors.is_empty() {
            return Err(DomainError::Validation(errors));
        }

        let password_hash = self
            .passwords
            .hash(password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let user = self
            .users
            .save(User::new(username.to_string(), password_hash))
            .await
            .map_err(|e| match e {
                // Lost a race with a concurrent registration.
                RepoError::Constraint(_) => DomainError::Validation(FieldErrors::single(
                    "username",
                    "A user with that username already exists.",
                )),
                other => other.into(),
            })?;

        tracing::info!(user_id = %user.id, username = %mask_username(&user.username), "User registered");
        Ok(user)
    }

    /// Check a username/password pair. Unknown users and wrong passwords are
    /// indistinguishable to the caller.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, DomainError> {
        let Some(user) = self.users.find_by_username(username.trim()).await? else {
            return Err(DomainError::Unauthorized);
        };

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if !valid {
            tracing::debug!(username = %mask_username(&user.username), "Password mismatch");
            return Err(DomainError::Unauthorized);
        }
        Ok(user)
    }

    /// Remove an account together with every post it authored.
    pub async fn delete_user(&self, id: Uuid) -> Result<(), DomainError> {
        self.users.delete(id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("user", id),
            other => other.into(),
        })?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }
}
