//! Plain-data request payloads and their parsing into domain commands.
//!
//! Every field is optional at this level so that a missing value surfaces
//! as a validation error rather than a deserialization failure. Blank
//! strings count as missing.

use std::str::FromStr;

use serde::Deserialize;

use crate::domain::errors::AccountError;
use crate::domain::user::models::CarName;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Role;
use crate::domain::user::models::UpdateProfileCommand;
use crate::domain::user::models::UserName;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RegisterPayload {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
    #[serde(alias = "type")]
    pub role: Option<String>,
    pub profile_img: Option<String>,
    pub car_img: Option<String>,
    pub car_name: Option<String>,
}

impl RegisterPayload {
    /// # Errors
    /// * `MissingField` - email, name, password or role absent
    /// * `InvalidEmail` / `InvalidName` / `InvalidRole` / `InvalidCarName` - malformed value
    /// * `CarNameRequired` - car owner without a car name
    pub fn try_into_command(self) -> Result<CreateUserCommand, AccountError> {
        let email = required("email", self.email)?;
        let name = required("name", self.name)?;
        let password = self
            .password
            .filter(|p| !p.is_empty())
            .ok_or(AccountError::MissingField("password"))?;
        let role = required("role", self.role)?;

        let email = EmailAddress::new(email)?;
        let name = UserName::new(name)?;
        let role = Role::from_str(&role)?;
        let car_name = present(self.car_name).map(CarName::new).transpose()?;

        CreateUserCommand::new(
            email,
            name,
            password,
            role,
            present(self.profile_img),
            present(self.car_img),
            car_name,
        )
    }
}

#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoginPayload {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginPayload {
    /// Split into raw email and password.
    ///
    /// The email is not shape-checked here: a malformed address is treated
    /// like an unknown one so that login failures stay indistinguishable.
    ///
    /// # Errors
    /// * `MissingField` - email or password absent
    pub fn into_parts(self) -> Result<(String, String), AccountError> {
        let email = required("email", self.email)?;
        let password = self
            .password
            .filter(|p| !p.is_empty())
            .ok_or(AccountError::MissingField("password"))?;
        Ok((email, password))
    }
}

impl std::fmt::Debug for LoginPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginPayload")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateProfilePayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub car_name: Option<String>,
}

impl UpdateProfilePayload {
    /// # Errors
    /// * `EmptyUpdate` - No field supplied
    /// * `InvalidEmail` / `InvalidName` / `InvalidCarName` - malformed value
    pub fn try_into_command(self) -> Result<UpdateProfileCommand, AccountError> {
        let command = UpdateProfileCommand {
            name: present(self.name).map(UserName::new).transpose()?,
            email: present(self.email).map(EmailAddress::new).transpose()?,
            car_name: present(self.car_name).map(CarName::new).transpose()?,
        };

        if command.is_empty() {
            return Err(AccountError::EmptyUpdate);
        }
        Ok(command)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PreferencesPayload {
    pub dark_mode: Option<bool>,
}

impl PreferencesPayload {
    /// # Errors
    /// * `MissingPreferences` - Nothing to update
    pub fn dark_mode(&self) -> Result<bool, AccountError> {
        self.dark_mode.ok_or(AccountError::MissingPreferences)
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn required(field: &'static str, value: Option<String>) -> Result<String, AccountError> {
    present(value).ok_or(AccountError::MissingField(field))
}
