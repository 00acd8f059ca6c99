use async_trait::async_trait;

use crate::domain::errors::AccountError;
use crate::domain::relationship::models::OwnerSummary;
use crate::domain::relationship::models::Relationship;
use crate::domain::relationship::models::RelativeSummary;
use crate::domain::user::models::UserId;

/// Persistence operations for the owner <-> relative graph.
#[async_trait]
pub trait RelationshipRepository: Send + Sync + 'static {
    /// Link a relative to an owner.
    ///
    /// Role checks and the insert happen in one transaction.
    ///
    /// # Errors
    /// * `NotFound` - Either user does not exist
    /// * `NotCarOwner` - Owner's role is not car_owner
    /// * `NotRelative` - Relative's role is not relative
    /// * `RelationshipAlreadyExists` - Edge is already present
    /// * `DatabaseError` - Database operation failed
    async fn add(
        &self,
        owner_id: &UserId,
        relative_id: &UserId,
    ) -> Result<Relationship, AccountError>;

    /// Unlink a relative. Exactly one edge must be removed.
    ///
    /// # Errors
    /// * `RelationshipNotFound` - No such edge
    /// * `DatabaseError` - Database operation failed
    async fn remove(&self, owner_id: &UserId, relative_id: &UserId) -> Result<(), AccountError>;

    /// Relatives linked to an owner, oldest link first.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn relatives_of(&self, owner_id: &UserId) -> Result<Vec<RelativeSummary>, AccountError>;

    /// Owners a relative is linked to, oldest link first.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn owners_of(&self, relative_id: &UserId) -> Result<Vec<OwnerSummary>, AccountError>;
}
