pub mod relationship;
pub mod user;

pub use relationship::PostgresRelationshipRepository;
pub use user::PostgresUserRepository;
