use std::sync::Arc;

use auth::Authenticator;
use auth::PasswordHasher;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::Config;
use crate::domain::account::service::AccountService;
use crate::outbound::repositories::PostgresRelationshipRepository;
use crate::outbound::repositories::PostgresUserRepository;

pub type DefaultAccountService =
    AccountService<PostgresUserRepository, PostgresRelationshipRepository>;

/// Owns the connection pool and the wired account service.
///
/// The pool is opened in [`Application::build`] and released in
/// [`Application::shutdown`]; nothing else opens or closes it.
pub struct Application {
    pool: PgPool,
    service: Arc<DefaultAccountService>,
}

impl Application {
    /// Connect to the database, apply migrations and wire the service.
    pub async fn build(config: &Config) -> Result<Self, anyhow::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect(&config.database.url)
            .await?;
        tracing::info!(
            max_connections = config.database.max_connections,
            database = "postgresql",
            "Database connection pool created"
        );

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!(database = "postgresql", "Database migrations completed");

        Self::with_pool(pool, config)
    }

    /// Wire the service over an already migrated pool.
    pub fn with_pool(pool: PgPool, config: &Config) -> Result<Self, anyhow::Error> {
        let hasher = PasswordHasher::with_params(config.password.into())?;
        let authenticator = Arc::new(Authenticator::with_hasher(
            hasher,
            config.jwt.secret.as_bytes(),
            config.jwt.expiration_hours,
        )?);

        let users = Arc::new(PostgresUserRepository::new(pool.clone()));
        let relationships = Arc::new(PostgresRelationshipRepository::new(pool.clone()));
        let service = Arc::new(AccountService::new(users, relationships, authenticator));

        Ok(Self { pool, service })
    }

    pub fn service(&self) -> Arc<DefaultAccountService> {
        Arc::clone(&self.service)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close the pool, waiting for checked-out connections to return.
    pub async fn shutdown(self) {
        self.pool.close().await;
        tracing::info!(database = "postgresql", "Database connection pool closed");
    }
}
