//! Signed access tokens (HS256) carrying subject, email and role.

pub mod claims;
pub mod errors;
pub mod handler;

pub use claims::Claims;
pub use errors::JwtError;
pub use handler::JwtHandler;
