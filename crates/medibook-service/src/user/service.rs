//! Account lifecycle: register, login, profile, doctor directory.
//!
//! Login failures collapse to one message so usernames cannot be
//! probed. Admin accounts are provisioned out of band, never through
//! self-registration.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use medibook_auth::jwt::encoder::IssuedToken;
use medibook_auth::{JwtEncoder, PasswordHasher, PasswordValidator};
use medibook_core::error::AppError;
use medibook_core::result::AppResult;
use medibook_core::types::pagination::{PageRequest, PageResponse};
use medibook_database::repositories::user::UserRepository;
use medibook_entity::user::{CreateUser, User, UserRole};

use crate::context::RequestContext;

/// Self-registration payload.
#[derive(Debug, Clone)]
pub struct RegisterUser {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Plaintext password; hashed before storage.
    pub password: String,
    /// Display name (optional).
    pub display_name: Option<String>,
    /// Requested role: patient or doctor.
    pub role: UserRole,
    /// Medical specialization (doctors only).
    pub specialization: Option<String>,
}

/// Handles accounts and authentication flows.
#[derive(Clone)]
pub struct UserService {
    user_repo: Arc<UserRepository>,
    hasher: Arc<PasswordHasher>,
    validator: Arc<PasswordValidator>,
    encoder: Arc<JwtEncoder>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        encoder: Arc<JwtEncoder>,
    ) -> Self {
        Self {
            user_repo,
            hasher,
            validator,
            encoder,
        }
    }

    /// Registers a new patient or doctor account and signs them in.
    pub async fn register(&self, req: RegisterUser) -> AppResult<(User, IssuedToken)> {
        if req.role.is_admin() {
            return Err(AppError::validation(
                "Admin accounts cannot be self-registered",
            ));
        }
        if req.username.trim().is_empty() {
            return Err(AppError::validation("Username is required"));
        }
        if !req.email.contains('@') {
            return Err(AppError::validation("Invalid email format"));
        }
        self.validator.validate(&req.password)?;

        let password_hash = self.hasher.hash_password(&req.password)?;

        let user = self
            .user_repo
            .create(&CreateUser {
                username: req.username,
                email: req.email,
                password_hash,
                display_name: req.display_name,
                role: req.role,
                specialization: req.specialization,
            })
            .await?;

        info!(user_id = %user.id, role = %user.role, "User registered");

        let token = self.encoder.issue(user.id, &user.role, &user.username)?;
        Ok((user, token))
    }

    /// Authenticates by username or email and issues an access token.
    pub async fn login(&self, login: &str, password: &str) -> AppResult<(User, IssuedToken)> {
        let user = self
            .user_repo
            .find_by_login(login)
            .await?
            .ok_or_else(|| AppError::authentication("Invalid username or password"))?;

        if !self.hasher.verify_password(password, &user.password_hash)? {
            return Err(AppError::authentication("Invalid username or password"));
        }

        if !user.is_active {
            return Err(AppError::authorization("This account has been disabled"));
        }

        info!(user_id = %user.id, "User logged in");

        let token = self.encoder.issue(user.id, &user.role, &user.username)?;
        Ok((user, token))
    }

    /// The caller's own profile.
    pub async fn me(&self, ctx: &RequestContext) -> AppResult<User> {
        self.user_repo
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Public doctor directory, best-rated first.
    pub async fn list_doctors(&self) -> AppResult<Vec<User>> {
        self.user_repo.list_doctors().await
    }

    /// A single doctor's public profile.
    pub async fn find_doctor(&self, doctor_id: Uuid) -> AppResult<User> {
        let user = self
            .user_repo
            .find_by_id(doctor_id)
            .await?
            .ok_or_else(|| AppError::not_found("Doctor not found"))?;
        if !user.role.is_doctor() {
            return Err(AppError::not_found("Doctor not found"));
        }
        Ok(user)
    }

    /// All accounts, paged (admin).
    pub async fn list_all(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> AppResult<PageResponse<User>> {
        if !ctx.is_admin() {
            return Err(AppError::authorization("Admin access required"));
        }
        self.user_repo.list_all(&page).await
    }

    /// Enable or disable an account (admin).
    pub async fn set_active(&self, ctx: &RequestContext, id: Uuid, active: bool) -> AppResult<()> {
        if !ctx.is_admin() {
            return Err(AppError::authorization("Admin access required"));
        }
        if id == ctx.user_id {
            return Err(AppError::validation("You cannot disable your own account"));
        }
        self.user_repo.set_active(id, active).await?;
        info!(user_id = %id, active, "Account active flag changed");
        Ok(())
    }
}
