//! # Credential Service
//!
//! ## Register Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  RegisterForm                                                          │
//! │       │ validate (names, email, password ×2, phone)                    │
//! │       ▼                                                                 │
//! │  find_by_email ── Some ──► DuplicateEmail                              │
//! │       │ None                                                            │
//! │       ▼                                                                 │
//! │  hash_password ──► INSERT usuario                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  find_id_by_email ──► session {id, email, "first last"}                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Email uniqueness rests on the lookup above; the store has no UNIQUE
//! constraint on `correo`.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{ApiError, ApiResult};
use crate::password::{hash_password, verify_password, PasswordScheme};
use crate::session::{clear_session, load_session, save_session, SessionStore};
use inventario_core::validation::{
    validate_email, validate_password, validate_password_confirmation, validate_phone,
    validate_required,
};
use inventario_core::{CoreError, NewUser, Session, UserProfile, ValidationError};
use inventario_db::Database;

/// Fields of the sign-up screen, as typed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub phone: String,
}

#[derive(Clone)]
pub struct CredentialService {
    db: Database,
    sessions: Arc<dyn SessionStore>,
    scheme: PasswordScheme,
}

impl CredentialService {
    pub fn new(db: Database, sessions: Arc<dyn SessionStore>, scheme: PasswordScheme) -> Self {
        CredentialService {
            db,
            sessions,
            scheme,
        }
    }

    /// Creates an account and logs it in.
    ///
    /// ## Errors
    /// - `VALIDATION_ERROR` before touching the store
    /// - `DUPLICATE_EMAIL` when the email already has an account
    pub async fn register(&self, form: &RegisterForm) -> ApiResult<UserProfile> {
        let first_name = validate_required("first name", &form.first_name)?;
        let last_name = validate_required("last name", &form.last_name)?;
        let email = validate_email(&form.email)?;
        validate_password(&form.password)?;
        validate_password_confirmation(&form.password, &form.password_confirmation)?;
        let phone = validate_phone(&form.phone)?;

        let users = self.db.users();

        if users.find_by_email(&email).await?.is_some() {
            warn!(email = %email, "Registration for existing email");
            return Err(CoreError::DuplicateEmail { email }.into());
        }

        let password_hash = hash_password(self.scheme, &form.password)?;
        users
            .insert(&NewUser {
                email: email.clone(),
                password_hash,
                first_name: first_name.clone(),
                last_name: last_name.clone(),
                phone,
            })
            .await?;

        let id = users
            .find_id_by_email(&email)
            .await?
            .ok_or_else(|| ApiError::internal("Registered user could not be read back"))?;

        let profile = UserProfile {
            id,
            email,
            first_name,
            last_name,
        };
        save_session(self.sessions.as_ref(), &Session::from(&profile)).await?;

        info!(user_id = id, scheme = %self.scheme, "User registered");
        Ok(profile)
    }

    /// Checks credentials and writes the session on success.
    ///
    /// No session is written on any failure.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<UserProfile> {
        let email = validate_email(email)?;
        if password.is_empty() {
            return Err(ValidationError::Required {
                field: "password".to_string(),
            }
            .into());
        }

        let user = self
            .db
            .users()
            .find_by_email(&email)
            .await?
            .ok_or_else(|| CoreError::UserNotFound {
                email: email.clone(),
            })?;

        if !verify_password(password, &user.password_hash) {
            warn!(user_id = user.id, "Wrong password");
            return Err(CoreError::InvalidCredentials.into());
        }

        let profile = user.profile();
        save_session(self.sessions.as_ref(), &Session::from(&profile)).await?;

        info!(user_id = profile.id, "User logged in");
        Ok(profile)
    }

    pub async fn logout(&self) -> ApiResult<()> {
        clear_session(self.sessions.as_ref()).await?;
        debug!("Session cleared");
        Ok(())
    }

    pub async fn current_session(&self) -> ApiResult<Option<Session>> {
        Ok(load_session(self.sessions.as_ref()).await?)
    }
}
