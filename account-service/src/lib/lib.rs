pub mod application;
pub mod config;
pub mod domain;
pub mod outbound;

pub use domain::account;
pub use domain::relationship;
pub use domain::user;
pub use outbound::repositories;
