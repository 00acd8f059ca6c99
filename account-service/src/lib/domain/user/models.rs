use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::errors::AccountError;
use crate::domain::user::errors::CarNameError;
use crate::domain::user::errors::EmailError;
use crate::domain::user::errors::UserIdError;
use crate::domain::user::errors::UserNameError;
use crate::domain::user::errors::UserRoleError;

/// Public user record.
///
/// Carries no credential material; the password hash only ever travels
/// inside [`Credentials`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub name: UserName,
    pub role: Role,
    pub profile_img: Option<String>,
    pub car_img: Option<String>,
    pub car_name: Option<CarName>,
    pub created_at: DateTime<Utc>,
}

/// User record joined with its preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    pub dark_mode: bool,
}

/// A user together with its stored password hash.
///
/// Only exchanged between the service and the account store.
#[derive(Clone)]
pub struct Credentials {
    pub user: User,
    pub password_hash: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Account role. Fixed at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    CarOwner,
    Relative,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::CarOwner => "car_owner",
            Role::Relative => "relative",
        }
    }
}

impl FromStr for Role {
    type Err = UserRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "car_owner" => Ok(Role::CarOwner),
            "relative" => Ok(Role::Relative),
            other => Err(UserRoleError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Email address type
///
/// Parsed with an RFC 5322 parser and additionally required to have a
/// dotted domain (`local@domain.tld`). Stored exactly as given, so
/// uniqueness is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Not an address of the form `local@domain.tld`
    pub fn new(email: String) -> Result<Self, EmailError> {
        let parsed = email_address::EmailAddress::from_str(&email)
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))?;

        let domain = parsed.domain();
        let dotted = domain
            .split('.')
            .filter(|label| !label.is_empty())
            .count()
            >= 2;
        if !dotted || email.chars().any(char::is_whitespace) {
            return Err(EmailError::InvalidFormat(email));
        }

        Ok(EmailAddress(email))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name. Non-blank; stored exactly as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    const MAX_LENGTH: usize = 100;

    /// # Errors
    /// * `Empty` - Name is blank
    /// * `TooLong` - Name longer than 100 characters
    pub fn new(name: String) -> Result<Self, UserNameError> {
        let length = name.chars().count();
        if name.trim().is_empty() {
            Err(UserNameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(UserNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Name of an owner's vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CarName(String);

impl CarName {
    const MAX_LENGTH: usize = 100;

    pub fn new(car_name: String) -> Result<Self, CarNameError> {
        let length = car_name.chars().count();
        if car_name.trim().is_empty() {
            Err(CarNameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(CarNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(car_name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Per-user preference state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Preferences {
    pub user_id: UserId,
    pub dark_mode: bool,
}

impl Preferences {
    pub fn default_for(user_id: UserId) -> Self {
        Self {
            user_id,
            dark_mode: false,
        }
    }
}

/// Command to create a new user with domain types
#[derive(Clone)]
pub struct CreateUserCommand {
    pub email: EmailAddress,
    pub name: UserName,
    pub password: String,
    pub role: Role,
    pub profile_img: Option<String>,
    pub car_img: Option<String>,
    pub car_name: Option<CarName>,
}

impl CreateUserCommand {
    /// Construct a create user command, enforcing cross-field rules.
    ///
    /// # Errors
    /// * `MissingField` - Password is empty
    /// * `CarNameRequired` - Role is `CarOwner` and no car name was given
    pub fn new(
        email: EmailAddress,
        name: UserName,
        password: String,
        role: Role,
        profile_img: Option<String>,
        car_img: Option<String>,
        car_name: Option<CarName>,
    ) -> Result<Self, AccountError> {
        if password.is_empty() {
            return Err(AccountError::MissingField("password"));
        }
        if role == Role::CarOwner && car_name.is_none() {
            return Err(AccountError::CarNameRequired);
        }

        Ok(Self {
            email,
            name,
            password,
            role,
            profile_img,
            car_img,
            car_name,
        })
    }
}

impl fmt::Debug for CreateUserCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateUserCommand")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .field("profile_img", &self.profile_img)
            .field("car_img", &self.car_img)
            .field("car_name", &self.car_name)
            .finish()
    }
}

/// Command to update profile fields.
///
/// Only provided fields are updated; role is deliberately absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateProfileCommand {
    pub name: Option<UserName>,
    pub email: Option<EmailAddress>,
    pub car_name: Option<CarName>,
}

impl UpdateProfileCommand {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.car_name.is_none()
    }
}
