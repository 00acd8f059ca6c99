pub mod account;
pub mod errors;
pub mod relationship;
pub mod user;
