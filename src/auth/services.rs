use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, RegisterRequest},
        jwt::JwtKeys,
        password::PasswordHasher,
        repo::UserRepo,
        repo_types::NewUser,
    },
    error::{AppError, StoreError},
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Registration and login over an injected user store, hasher and keys.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepo>,
    hasher: PasswordHasher,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepo>, hasher: PasswordHasher, keys: JwtKeys) -> Self {
        Self {
            users,
            hasher,
            keys,
        }
    }

    #[instrument(skip_all)]
    pub async fn register(&self, req: RegisterRequest) -> Result<AuthResponse, AppError> {
        if req.username.trim().is_empty() {
            return Err(AppError::Validation("Username is required".into()));
        }
        if !is_valid_email(&req.email) {
            return Err(AppError::Validation("Invalid email".into()));
        }
        if req.password.is_empty() {
            return Err(AppError::Validation("Password is required".into()));
        }

        if self.users.find_by_email(&req.email).await?.is_some() {
            warn!("email already registered");
            return Err(AppError::DuplicateUser);
        }

        let password_hash = self.hasher.hash_blocking(req.password).await?;

        let user = match self
            .users
            .create(NewUser {
                username: req.username,
                email: req.email,
                password_hash,
            })
            .await
        {
            Ok(u) => u,
            // Lost a race with a concurrent registration.
            Err(StoreError::UniqueViolation) => {
                warn!("email registered concurrently");
                return Err(AppError::DuplicateUser);
            }
            Err(e) => return Err(e.into()),
        };

        let token = self.keys.sign(&user)?;
        info!(user_id = %user.id, "user registered");
        Ok(AuthResponse {
            token,
            email: user.email,
        })
    }

    #[instrument(skip_all)]
    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, AppError> {
        let Some(user) = self.users.find_by_email(&req.email).await? else {
            // Same Argon2 cost as a wrong password.
            self.hasher.verify_decoy(req.password).await?;
            warn!("login unknown email");
            return Err(AppError::InvalidCredentials);
        };

        let ok = self
            .hasher
            .verify_blocking(req.password, user.password_hash.clone())
            .await?;
        if !ok {
            warn!(user_id = %user.id, "login invalid password");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.keys.sign(&user)?;
        info!(user_id = %user.id, "user logged in");
        Ok(AuthResponse {
            token,
            email: user.email,
        })
    }
}
