use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::errors::AccountError;
use crate::domain::relationship::models::OwnerSummary;
use crate::domain::relationship::models::Relationship;
use crate::domain::relationship::models::RelationshipId;
use crate::domain::relationship::models::RelativeSummary;
use crate::domain::relationship::ports::RelationshipRepository;
use crate::domain::user::models::CarName;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Role;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserName;
use crate::outbound::repositories::user::corrupt_column;
use crate::outbound::repositories::user::db_error;

const EDGE_UNIQUE_CONSTRAINT: &str = "user_relationships_owner_id_relative_id_key";

pub struct PostgresRelationshipRepository {
    pool: PgPool,
}

impl PostgresRelationshipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RelationshipRepository for PostgresRelationshipRepository {
    async fn add(
        &self,
        owner_id: &UserId,
        relative_id: &UserId,
    ) -> Result<Relationship, AccountError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        // Share locks keep both roles stable until the edge is committed.
        let rows = sqlx::query("SELECT id, role FROM users WHERE id = ANY($1) FOR SHARE")
            .bind(vec![owner_id.0, relative_id.0])
            .fetch_all(&mut *tx)
            .await
            .map_err(db_error)?;

        let mut owner_role = None;
        let mut relative_role = None;
        for row in rows {
            let id: Uuid = row.try_get("id").map_err(db_error)?;
            let role: String = row.try_get("role").map_err(db_error)?;
            let role: Role = role.parse().map_err(corrupt_column("role"))?;
            if id == owner_id.0 {
                owner_role = Some(role);
            }
            if id == relative_id.0 {
                relative_role = Some(role);
            }
        }

        let owner_role = owner_role.ok_or(AccountError::NotFound(*owner_id))?;
        let relative_role = relative_role.ok_or(AccountError::NotFound(*relative_id))?;

        if owner_role != Role::CarOwner {
            return Err(AccountError::NotCarOwner(*owner_id));
        }
        if relative_role != Role::Relative {
            return Err(AccountError::NotRelative(*relative_id));
        }

        let mut relationship = Relationship {
            id: RelationshipId::new(),
            owner_id: *owner_id,
            relative_id: *relative_id,
            created_at: Utc::now(),
        };

        relationship.created_at = sqlx::query_scalar(
            r#"
            INSERT INTO user_relationships (id, owner_id, relative_id, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING created_at
            "#,
        )
        .bind(relationship.id.0)
        .bind(relationship.owner_id.0)
        .bind(relationship.relative_id.0)
        .bind(relationship.created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() && db_err.constraint() == Some(EDGE_UNIQUE_CONSTRAINT)
                {
                    return AccountError::RelationshipAlreadyExists {
                        owner_id: *owner_id,
                        relative_id: *relative_id,
                    };
                }
            }
            db_error(e)
        })?;

        tx.commit().await.map_err(db_error)?;

        Ok(relationship)
    }

    async fn remove(&self, owner_id: &UserId, relative_id: &UserId) -> Result<(), AccountError> {
        let result =
            sqlx::query("DELETE FROM user_relationships WHERE owner_id = $1 AND relative_id = $2")
                .bind(owner_id.0)
                .bind(relative_id.0)
                .execute(&self.pool)
                .await
                .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(AccountError::RelationshipNotFound {
                owner_id: *owner_id,
                relative_id: *relative_id,
            });
        }

        Ok(())
    }

    async fn relatives_of(&self, owner_id: &UserId) -> Result<Vec<RelativeSummary>, AccountError> {
        let rows = sqlx::query(
            r#"
            SELECT u.id, u.email, u.name
            FROM user_relationships r
            JOIN users u ON u.id = r.relative_id
            WHERE r.owner_id = $1
            ORDER BY r.created_at, u.id
            "#,
        )
        .bind(owner_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter()
            .map(|r| {
                Ok(RelativeSummary {
                    id: UserId(r.try_get("id").map_err(db_error)?),
                    email: EmailAddress::new(r.try_get("email").map_err(db_error)?)
                        .map_err(corrupt_column("email"))?,
                    name: UserName::new(r.try_get("name").map_err(db_error)?)
                        .map_err(corrupt_column("name"))?,
                })
            })
            .collect()
    }

    async fn owners_of(&self, relative_id: &UserId) -> Result<Vec<OwnerSummary>, AccountError> {
        let rows = sqlx::query(
            r#"
            SELECT u.id, u.email, u.name, u.profile_img, u.car_img, u.car_name
            FROM user_relationships r
            JOIN users u ON u.id = r.owner_id
            WHERE r.relative_id = $1
            ORDER BY r.created_at, u.id
            "#,
        )
        .bind(relative_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter()
            .map(|r| {
                let car_name: Option<String> = r.try_get("car_name").map_err(db_error)?;
                Ok(OwnerSummary {
                    id: UserId(r.try_get("id").map_err(db_error)?),
                    email: EmailAddress::new(r.try_get("email").map_err(db_error)?)
                        .map_err(corrupt_column("email"))?,
                    name: UserName::new(r.try_get("name").map_err(db_error)?)
                        .map_err(corrupt_column("name"))?,
                    profile_img: r.try_get("profile_img").map_err(db_error)?,
                    car_img: r.try_get("car_img").map_err(db_error)?,
                    car_name: car_name
                        .map(CarName::new)
                        .transpose()
                        .map_err(corrupt_column("car_name"))?,
                })
            })
            .collect()
    }
}
