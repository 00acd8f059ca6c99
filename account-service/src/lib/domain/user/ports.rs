use async_trait::async_trait;

use crate::domain::errors::AccountError;
use crate::domain::user::models::Credentials;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Preferences;
use crate::domain::user::models::UpdateProfileCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserProfile;

/// Persistence operations for users and their preferences.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user together with its default preferences.
    ///
    /// Both rows are written in one transaction; if either insert fails
    /// neither persists.
    ///
    /// # Returns
    /// Created user record (without hash)
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, credentials: Credentials) -> Result<User, AccountError>;

    /// Retrieve a user joined with its dark mode setting.
    ///
    /// A missing preferences row reads as `dark_mode = false`.
    ///
    /// # Returns
    /// Optional profile (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, AccountError>;

    /// Retrieve a user and its password hash by exact email.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Credentials>, AccountError>;

    /// Apply a partial profile update.
    ///
    /// # Returns
    /// Profile as stored after the update
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `EmailAlreadyExists` - New email belongs to another user
    /// * `DatabaseError` - Database operation failed
    async fn update_profile(
        &self,
        id: &UserId,
        command: UpdateProfileCommand,
    ) -> Result<UserProfile, AccountError>;

    /// Remove a user. Preferences and relationships cascade.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &UserId) -> Result<(), AccountError>;

    /// Read preferences, inserting the default row first if it is absent.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_or_create_preferences(&self, id: &UserId) -> Result<Preferences, AccountError>;

    /// Insert or overwrite the dark mode setting.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn upsert_preferences(
        &self,
        id: &UserId,
        dark_mode: bool,
    ) -> Result<Preferences, AccountError>;

    /// Flip the dark mode setting atomically. An absent row counts as
    /// `false`, so the first toggle stores `true`.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn toggle_dark_mode(&self, id: &UserId) -> Result<Preferences, AccountError>;
}
