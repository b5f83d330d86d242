use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{LoginRequest, PublicUser, RegisterRequest, Role, User};
use crate::infrastructure::security::{
    Claims, generate_token, hash_password, verify_password,
};
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

pub struct AuthService<R: UserRepository> {
    user_repository: Arc<R>,
    jwt_secret: String,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(user_repository: Arc<R>, jwt_secret: String) -> Self {
        Self {
            user_repository,
            jwt_secret,
        }
    }

    #[instrument(skip(self, req), fields(email = %req.email, role = %req.role))]
    pub async fn register(&self, req: RegisterRequest) -> Result<PublicUser> {
        req.validate()?;

        if self
            .user_repository
            .find_user_by_email(&req.email)
            .await?
            .is_some()
        {
            warn!("Email already registered");
            return Err(DomainError::Conflict("Email already registered".to_string()).into());
        }

        let password_hash = hash_password(&req.password).map_err(|e| {
            error!(error = %e, "Failed to hash password");
            DomainError::Internal("Failed to hash password".to_string())
        })?;

        let user = User {
            id: Uuid::new_v4().to_string(),
            email: req.email,
            password_hash,
            role: req.role,
            first_name: req.first_name,
            last_name: req.last_name,
            phone_number: req.phone_number,
            date_of_birth: req.date_of_birth,
            profile_picture: req.profile_picture,
            languages: req.languages,
            address: req.address,
            date_joined: Utc::now().to_rfc3339(),
            is_verified: false,
        };

        debug!(user_id = %user.id, "Saving user to repository");
        self.user_repository.save_user(user.clone()).await?;

        info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user.into())
    }

    /// Looks the caller up by the exact (email, role) pair. A wrong role
    /// fails the same way a wrong password does, revealing nothing about
    /// which part mismatched.
    #[instrument(skip(self, req), fields(email = %req.email, role = %req.role))]
    pub async fn login(&self, req: LoginRequest) -> Result<(String, PublicUser)> {
        let user = self
            .user_repository
            .find_user_by_email(&req.email)
            .await?
            .filter(|u| u.role == req.role)
            .ok_or_else(|| {
                warn!("No user for this email and role");
                DomainError::Auth("Invalid credentials".to_string())
            })?;

        let is_valid = verify_password(&req.password, &user.password_hash).map_err(|e| {
            error!(error = %e, "Failed to verify password");
            DomainError::Internal("Failed to verify password".to_string())
        })?;
        if !is_valid {
            warn!(user_id = %user.id, "Password mismatch");
            return Err(DomainError::Auth("Invalid credentials".to_string()).into());
        }

        let token = generate_token(&user, &self.jwt_secret).map_err(|e| {
            error!(error = %e, "Failed to generate token");
            DomainError::Internal("Failed to generate token".to_string())
        })?;

        info!(user_id = %user.id, "Login successful");
        Ok((token, user.into()))
    }

    /// Resolves verified token claims back to a live user record and gates
    /// on the role stored in the database, not the one baked into the
    /// token. A deleted user or a stale role claim loses access here.
    #[instrument(skip(self, claims), fields(required_role = %required_role))]
    pub async fn authorize(&self, claims: Option<Claims>, required_role: Role) -> Result<User> {
        let user = self.resolve_user(claims).await?;
        if user.role != required_role {
            warn!(user_id = %user.id, role = %user.role, "Role mismatch");
            return Err(
                DomainError::Forbidden(format!("{required_role} access required")).into(),
            );
        }
        Ok(user)
    }

    /// Same resolution without a role requirement; backs the session
    /// endpoint.
    pub async fn current_user(&self, claims: Option<Claims>) -> Result<PublicUser> {
        Ok(self.resolve_user(claims).await?.into())
    }

    async fn resolve_user(&self, claims: Option<Claims>) -> Result<User> {
        let claims =
            claims.ok_or_else(|| DomainError::Auth("Not authenticated".to_string()))?;
        self.user_repository
            .find_user_by_id(&claims.sub)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %claims.sub, "Token references a missing user");
                DomainError::Auth("User not found".to_string()).into()
            })
    }
}
