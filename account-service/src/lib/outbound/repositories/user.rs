use async_trait::async_trait;
use sqlx::postgres::PgExecutor;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::errors::AccountError;
use crate::domain::user::models::CarName;
use crate::domain::user::models::Credentials;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Preferences;
use crate::domain::user::models::Role;
use crate::domain::user::models::UpdateProfileCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserName;
use crate::domain::user::models::UserProfile;
use crate::domain::user::ports::UserRepository;

const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";

const PROFILE_COLUMNS: &str = r#"
    u.id, u.email, u.name, u.role, u.profile_img, u.car_img, u.car_name, u.created_at,
    COALESCE(p.dark_mode, FALSE) AS dark_mode
"#;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_profile<'e, E>(
        executor: E,
        id: &UserId,
    ) -> Result<Option<UserProfile>, AccountError>
    where
        E: PgExecutor<'e>,
    {
        let row = sqlx::query(&format!(
            "SELECT {PROFILE_COLUMNS} FROM users u \
             LEFT JOIN user_preferences p ON p.user_id = u.id \
             WHERE u.id = $1"
        ))
        .bind(id.0)
        .fetch_optional(executor)
        .await
        .map_err(db_error)?;

        row.map(|r| {
            Ok(UserProfile {
                user: user_from_row(&r)?,
                dark_mode: r.try_get("dark_mode").map_err(db_error)?,
            })
        })
        .transpose()
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, credentials: Credentials) -> Result<User, AccountError> {
        let mut user = credentials.user;
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        // TIMESTAMPTZ keeps microseconds; hand back what was stored.
        user.created_at = sqlx::query_scalar(
            r#"
            INSERT INTO users (id, email, name, password_hash, role, profile_img, car_img, car_name, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING created_at
            "#,
        )
        .bind(user.id.0)
        .bind(user.email.as_str())
        .bind(user.name.as_str())
        .bind(&credentials.password_hash)
        .bind(user.role.as_str())
        .bind(&user.profile_img)
        .bind(&user.car_img)
        .bind(user.car_name.as_ref().map(CarName::as_str))
        .bind(user.created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| email_conflict(e, &user.email))?;

        sqlx::query("INSERT INTO user_preferences (user_id, dark_mode) VALUES ($1, FALSE)")
            .bind(user.id.0)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, AccountError> {
        Self::fetch_profile(&self.pool, id).await
    }

    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Credentials>, AccountError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, name, password_hash, role, profile_img, car_img, car_name, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(|r| {
            Ok(Credentials {
                user: user_from_row(&r)?,
                password_hash: r.try_get("password_hash").map_err(db_error)?,
            })
        })
        .transpose()
    }

    async fn update_profile(
        &self,
        id: &UserId,
        command: UpdateProfileCommand,
    ) -> Result<UserProfile, AccountError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                car_name = COALESCE($4, car_name)
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .bind(command.name.as_ref().map(UserName::as_str))
        .bind(command.email.as_ref().map(EmailAddress::as_str))
        .bind(command.car_name.as_ref().map(CarName::as_str))
        .execute(&mut *tx)
        .await
        .map_err(|e| match &command.email {
            Some(email) => email_conflict(e, email),
            None => db_error(e),
        })?;

        if result.rows_affected() == 0 {
            return Err(AccountError::NotFound(*id));
        }

        let profile = Self::fetch_profile(&mut *tx, id)
            .await?
            .ok_or(AccountError::NotFound(*id))?;

        tx.commit().await.map_err(db_error)?;

        Ok(profile)
    }

    async fn delete(&self, id: &UserId) -> Result<(), AccountError> {
        // Preferences and relationship edges go with the row via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(AccountError::NotFound(*id));
        }

        Ok(())
    }

    async fn get_or_create_preferences(&self, id: &UserId) -> Result<Preferences, AccountError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let repaired = sqlx::query(
            r#"
            INSERT INTO user_preferences (user_id, dark_mode)
            VALUES ($1, FALSE)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(id.0)
        .execute(&mut *tx)
        .await
        .map_err(|e| missing_user(e, id))?
        .rows_affected();

        if repaired > 0 {
            tracing::debug!(user_id = %id, "Created missing preferences row");
        }

        let dark_mode: bool =
            sqlx::query_scalar("SELECT dark_mode FROM user_preferences WHERE user_id = $1")
                .bind(id.0)
                .fetch_one(&mut *tx)
                .await
                .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;

        Ok(Preferences {
            user_id: *id,
            dark_mode,
        })
    }

    async fn upsert_preferences(
        &self,
        id: &UserId,
        dark_mode: bool,
    ) -> Result<Preferences, AccountError> {
        let dark_mode: bool = sqlx::query_scalar(
            r#"
            INSERT INTO user_preferences (user_id, dark_mode)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET dark_mode = EXCLUDED.dark_mode
            RETURNING dark_mode
            "#,
        )
        .bind(id.0)
        .bind(dark_mode)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| missing_user(e, id))?;

        Ok(Preferences {
            user_id: *id,
            dark_mode,
        })
    }

    async fn toggle_dark_mode(&self, id: &UserId) -> Result<Preferences, AccountError> {
        // Absent row reads as false, so its toggle is true.
        let dark_mode: bool = sqlx::query_scalar(
            r#"
            INSERT INTO user_preferences (user_id, dark_mode)
            VALUES ($1, TRUE)
            ON CONFLICT (user_id) DO UPDATE SET dark_mode = NOT user_preferences.dark_mode
            RETURNING dark_mode
            "#,
        )
        .bind(id.0)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| missing_user(e, id))?;

        Ok(Preferences {
            user_id: *id,
            dark_mode,
        })
    }
}

fn user_from_row(row: &PgRow) -> Result<User, AccountError> {
    let role: String = row.try_get("role").map_err(db_error)?;
    let car_name: Option<String> = row.try_get("car_name").map_err(db_error)?;

    Ok(User {
        id: UserId(row.try_get("id").map_err(db_error)?),
        email: EmailAddress::new(row.try_get("email").map_err(db_error)?)
            .map_err(corrupt_column("email"))?,
        name: UserName::new(row.try_get("name").map_err(db_error)?)
            .map_err(corrupt_column("name"))?,
        role: role.parse::<Role>().map_err(corrupt_column("role"))?,
        profile_img: row.try_get("profile_img").map_err(db_error)?,
        car_img: row.try_get("car_img").map_err(db_error)?,
        car_name: car_name
            .map(CarName::new)
            .transpose()
            .map_err(corrupt_column("car_name"))?,
        created_at: row.try_get("created_at").map_err(db_error)?,
    })
}

pub(crate) fn db_error(e: sqlx::Error) -> AccountError {
    AccountError::DatabaseError(e.to_string())
}

/// A stored value that no longer parses is a storage fault, not bad input.
pub(crate) fn corrupt_column<E: std::fmt::Display>(
    column: &'static str,
) -> impl Fn(E) -> AccountError {
    move |e| AccountError::DatabaseError(format!("corrupt {} column: {}", column, e))
}

fn email_conflict(e: sqlx::Error, email: &EmailAddress) -> AccountError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() && db_err.constraint() == Some(EMAIL_UNIQUE_CONSTRAINT) {
            return AccountError::EmailAlreadyExists(email.as_str().to_string());
        }
    }
    db_error(e)
}

/// Preferences rows reference `users`; a dangling id means the user is gone.
fn missing_user(e: sqlx::Error, id: &UserId) -> AccountError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return AccountError::NotFound(*id);
        }
    }
    db_error(e)
}
