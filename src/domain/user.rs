use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed role partition. Every user is exactly one of these and the role
/// never changes after registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Guest,
    Host,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Guest => write!(f, "guest"),
            Role::Host => write!(f, "host"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<String>,
    pub profile_picture: Option<String>,
    pub languages: Vec<String>,
    pub address: Option<UserAddress>,
    pub date_joined: String,
    pub is_verified: bool,
}

/// Projection returned to clients. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub profile_picture: Option<String>,
    pub languages: Vec<String>,
    pub date_joined: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        PublicUser {
            id: user.id,
            email: user.email,
            role: user.role,
            first_name: user.first_name,
            last_name: user.last_name,
            phone_number: user.phone_number,
            profile_picture: user.profile_picture,
            languages: user.languages,
            date_joined: user.date_joined,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<String>,
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    pub address: Option<UserAddress>,
}

impl RegisterRequest {
    /// Role-conditional field requirements: hosts must provide contact and
    /// profile details, guests only their name.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(DomainError::Validation(
                "Email and password are required".to_string(),
            ));
        }
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(DomainError::Validation(
                "First and last name are required".to_string(),
            ));
        }
        if self.role == Role::Host {
            let phone_missing = self
                .phone_number
                .as_deref()
                .is_none_or(|p| p.trim().is_empty());
            let picture_missing = self
                .profile_picture
                .as_deref()
                .is_none_or(|p| p.trim().is_empty());
            if phone_missing || picture_missing || self.languages.is_empty() || self.address.is_none()
            {
                return Err(DomainError::Validation(
                    "Missing required host fields".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}
