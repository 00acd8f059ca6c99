use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::JwtError;
use chrono::Utc;

use crate::domain::account::models::AuthenticatedUser;
use crate::domain::account::models::Session;
use crate::domain::account::payloads::LoginPayload;
use crate::domain::account::payloads::PreferencesPayload;
use crate::domain::account::payloads::RegisterPayload;
use crate::domain::account::payloads::UpdateProfilePayload;
use crate::domain::account::ports::AccountServicePort;
use crate::domain::errors::AccountError;
use crate::domain::relationship::models::OwnerSummary;
use crate::domain::relationship::models::OwnerWithRelatives;
use crate::domain::relationship::models::Relationship;
use crate::domain::relationship::ports::RelationshipRepository;
use crate::domain::user::models::Credentials;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Preferences;
use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserProfile;
use crate::domain::user::ports::UserRepository;

/// Orchestrator over the account store, the relationship graph store and
/// the authenticator.
///
/// Holds no mutable state of its own; all coordination happens in the
/// stores' transactions.
pub struct AccountService<UR, RR>
where
    UR: UserRepository,
    RR: RelationshipRepository,
{
    users: Arc<UR>,
    relationships: Arc<RR>,
    authenticator: Arc<Authenticator>,
}

impl<UR, RR> AccountService<UR, RR>
where
    UR: UserRepository,
    RR: RelationshipRepository,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `users` - Account store
    /// * `relationships` - Relationship graph store
    /// * `authenticator` - Password hashing and token issuance
    pub fn new(users: Arc<UR>, relationships: Arc<RR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            users,
            relationships,
            authenticator,
        }
    }

    /// Argon2 is CPU-bound; run it off the async executor.
    async fn hash_password(&self, password: String) -> Result<String, AccountError> {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || authenticator.hash_password(&password))
            .await
            .map_err(|e| AccountError::Unknown(format!("Password hashing task failed: {}", e)))?
            .map_err(|e| {
                tracing::error!(error = %e, "Password hashing failed");
                AccountError::Password(e.to_string())
            })
    }

    async fn verify_password(
        &self,
        password: String,
        stored_hash: Option<String>,
    ) -> Result<(), AccountError> {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || {
            authenticator.verify_password(&password, stored_hash.as_deref())
        })
        .await
        .map_err(|e| AccountError::Unknown(format!("Password verification task failed: {}", e)))?
        .map_err(|e| match e {
            AuthenticationError::InvalidCredentials => AccountError::InvalidCredentials,
            AuthenticationError::PasswordError(err) => AccountError::Password(err.to_string()),
            AuthenticationError::JwtError(err) => AccountError::Unknown(err.to_string()),
        })
    }

    fn open_session(&self, user: User) -> Result<Session, AccountError> {
        let issued = self
            .authenticator
            .issue_token(user.id, user.email.as_str(), user.role.as_str())
            .map_err(|e| {
                tracing::error!(user_id = %user.id, error = %e, "Token generation failed");
                AccountError::Unknown(format!("Token generation failed: {}", e))
            })?;

        Ok(Session {
            user,
            token: issued.access_token,
            expires_at: issued.expires_at,
        })
    }
}

#[async_trait]
impl<UR, RR> AccountServicePort for AccountService<UR, RR>
where
    UR: UserRepository,
    RR: RelationshipRepository,
{
    async fn register(&self, payload: RegisterPayload) -> Result<Session, AccountError> {
        let command = payload.try_into_command()?;
        let password_hash = self.hash_password(command.password).await?;

        let credentials = Credentials {
            user: User {
                id: UserId::new(),
                email: command.email,
                name: command.name,
                role: command.role,
                profile_img: command.profile_img,
                car_img: command.car_img,
                car_name: command.car_name,
                created_at: Utc::now(),
            },
            password_hash,
        };

        let user = self.users.create(credentials).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "Account registered");

        self.open_session(user)
    }

    async fn login(&self, payload: LoginPayload) -> Result<Session, AccountError> {
        let (email, password) = payload.into_parts()?;

        // A malformed address cannot match any account; treat it as unknown.
        let credentials = match EmailAddress::new(email) {
            Ok(email) => self.users.find_credentials_by_email(&email).await?,
            Err(_) => None,
        };

        let stored_hash = credentials.as_ref().map(|c| c.password_hash.clone());
        if let Err(e) = self.verify_password(password, stored_hash).await {
            tracing::warn!("Login rejected: {}", e);
            return Err(e);
        }

        let credentials = credentials.ok_or(AccountError::InvalidCredentials)?;
        tracing::info!(user_id = %credentials.user.id, "Login succeeded");

        self.open_session(credentials.user)
    }

    fn verify_token(&self, token: &str) -> Result<AuthenticatedUser, AccountError> {
        let claims = self.authenticator.validate_token(token).map_err(|e| {
            tracing::warn!("JWT validation failed: {}", e);
            match e {
                JwtError::TokenExpired => AccountError::TokenExpired,
                other => AccountError::InvalidToken(other.to_string()),
            }
        })?;

        let user_id = UserId::from_string(&claims.sub)
            .map_err(|e| AccountError::InvalidToken(format!("bad subject: {}", e)))?;
        let role = Role::from_str(&claims.role)
            .map_err(|e| AccountError::InvalidToken(format!("bad role: {}", e)))?;

        Ok(AuthenticatedUser {
            user_id,
            email: claims.email,
            role,
        })
    }

    async fn get_profile(&self, id: &UserId) -> Result<UserProfile, AccountError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(AccountError::NotFound(*id))
    }

    async fn update_profile(
        &self,
        id: &UserId,
        payload: UpdateProfilePayload,
    ) -> Result<UserProfile, AccountError> {
        let command = payload.try_into_command()?;
        self.users.update_profile(id, command).await
    }

    async fn delete_account(&self, id: &UserId) -> Result<(), AccountError> {
        self.users.delete(id).await?;
        tracing::info!(user_id = %id, "Account deleted");
        Ok(())
    }

    async fn get_preferences(&self, id: &UserId) -> Result<Preferences, AccountError> {
        self.users.get_or_create_preferences(id).await
    }

    async fn update_preferences(
        &self,
        id: &UserId,
        payload: PreferencesPayload,
    ) -> Result<Preferences, AccountError> {
        let dark_mode = payload.dark_mode()?;
        self.users.upsert_preferences(id, dark_mode).await
    }

    async fn toggle_dark_mode(&self, id: &UserId) -> Result<Preferences, AccountError> {
        self.users.toggle_dark_mode(id).await
    }

    async fn get_owner_with_relatives(
        &self,
        owner_id: &UserId,
    ) -> Result<OwnerWithRelatives, AccountError> {
        let owner = self.get_profile(owner_id).await?;
        if owner.user.role != Role::CarOwner {
            return Err(AccountError::NotCarOwner(*owner_id));
        }

        let relatives = self.relationships.relatives_of(owner_id).await?;

        Ok(OwnerWithRelatives { owner, relatives })
    }

    async fn get_owners_for_relative(
        &self,
        relative_id: &UserId,
    ) -> Result<Vec<OwnerSummary>, AccountError> {
        self.relationships.owners_of(relative_id).await
    }

    async fn add_relative(
        &self,
        owner_id: &UserId,
        relative_id: &UserId,
    ) -> Result<Relationship, AccountError> {
        let relationship = self.relationships.add(owner_id, relative_id).await?;
        tracing::info!(
            relationship_id = %relationship.id,
            owner_id = %owner_id,
            relative_id = %relative_id,
            "Relative added"
        );
        Ok(relationship)
    }

    async fn remove_relative(
        &self,
        owner_id: &UserId,
        relative_id: &UserId,
    ) -> Result<(), AccountError> {
        self.relationships.remove(owner_id, relative_id).await?;
        tracing::info!(owner_id = %owner_id, relative_id = %relative_id, "Relative removed");
        Ok(())
    }
}
