//! Credential hashing and access-token utilities
//!
//! - Password hashing (Argon2id) with configurable cost
//! - JWT issuance and verification (HS256, mandatory expiry)
//! - An `Authenticator` tying both together, with enumeration-resistant
//!   credential checks
//!
//! Services keep their own domain types and adapt these primitives.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::Authenticator;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!", 24).unwrap();
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify, then issue a token
//! auth.verify_password("password123", Some(&hash)).unwrap();
//! let result = auth.issue_token("user123", "alice@x.com", "car_owner").unwrap();
//!
//! // Later: validate the token
//! let claims = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(claims.sub, "user123");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::HashingParams;
pub use password::PasswordError;
pub use password::PasswordHasher;
