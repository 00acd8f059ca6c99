use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::user::models::CarName;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserName;
use crate::domain::user::models::UserProfile;

/// Relationship unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RelationshipId(pub Uuid);

impl RelationshipId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RelationshipId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RelationshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Directed owner -> relative edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relationship {
    pub id: RelationshipId,
    pub owner_id: UserId,
    pub relative_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// A relative as seen from its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelativeSummary {
    pub id: UserId,
    pub email: EmailAddress,
    pub name: UserName,
}

/// An owner as seen from one of its relatives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerSummary {
    pub id: UserId,
    pub email: EmailAddress,
    pub name: UserName,
    pub profile_img: Option<String>,
    pub car_img: Option<String>,
    pub car_name: Option<CarName>,
}

/// Owner profile augmented with every linked relative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerWithRelatives {
    #[serde(flatten)]
    pub owner: UserProfile,
    pub relatives: Vec<RelativeSummary>,
}
