use crate::domain::user::{ProfileUpdate, User};
use crate::error::{AppError, Result};
use crate::storage::{StoreError, UserStore};
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct UserService {
    users: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// # Errors
    /// `AppError::NoUser` if nobody has that username.
    #[tracing::instrument(skip(self))]
    pub async fn get_profile(&self, username: &str) -> Result<User> {
        self.users
            .find_by_username(username)
            .await
            .map_err(|e| AppError::internal("getting user by username", e))?
            .ok_or(AppError::NoUser)
    }

    /// # Errors
    /// `AppError::DuplicateUsername` if the username is taken.
    #[tracing::instrument(skip(self))]
    pub async fn check_username(&self, username: &str) -> Result<()> {
        let existing = self
            .users
            .find_by_username(username)
            .await
            .map_err(|e| AppError::internal("getting user by username", e))?;

        match existing {
            Some(_) => Err(AppError::DuplicateUsername),
            None => Ok(()),
        }
    }

    /// Edits the profile of `username` on behalf of `auth_user_id`.
    ///
    /// # Errors
    /// `AppError::NoUser` if the profile does not exist, `AppError::Forbidden` if it belongs to
    /// someone else, `AppError::DuplicateUsername` if the new username is taken.
    #[tracing::instrument(skip(self, update), fields(user_id = auth_user_id))]
    pub async fn update_profile(&self, auth_user_id: i64, username: &str, update: ProfileUpdate) -> Result<User> {
        let user = self.get_profile(username).await?;

        if user.id != auth_user_id {
            tracing::debug!(owner_id = user.id, "Profile edit by non-owner rejected");
            return Err(AppError::Forbidden);
        }

        let user = self
            .users
            .update_profile(user.id, &update.normalized())
            .await
            .map_err(|e| match e {
                StoreError::Duplicate => AppError::DuplicateUsername,
                StoreError::Unexpected(e) => AppError::internal("updating user", e),
            })?
            .ok_or(AppError::NoUser)?;

        tracing::info!("Profile updated");
        Ok(user)
    }
}
