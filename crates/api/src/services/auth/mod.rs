//! Authentication service.
//!
//! Signup, login, and the access-control gate that turns a bearer token
//! into a [`User`].

mod error;
mod password;
mod token;

pub use error::AuthError;
pub use password::{hash_password, reject_unknown_account, verify_password};
pub use token::TokenKeys;

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use storekeep_core::{Email, Role};

use crate::models::User;
use crate::store::Store;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Validated signup details.
#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub password: SecretString,
}

/// Authentication service.
///
/// Borrowed per request from `AppState`; holds no state of its own.
pub struct AuthService<'a> {
    store: &'a Store,
    tokens: &'a TokenKeys,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(store: &'a Store, tokens: &'a TokenKeys) -> Self {
        Self { store, tokens }
    }

    // =========================================================================
    // Password Authentication
    // =========================================================================

    /// Register a new shopper account (`role = user`).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::DuplicateEmail` if the email is already registered.
    /// Returns `AuthError::PasswordHash` if the password cannot be hashed.
    #[instrument(skip(self, new_user), fields(email = %new_user.email))]
    pub fn register(&self, new_user: NewUser) -> Result<User, AuthError> {
        self.create_user(new_user, Role::User)
    }

    /// Make sure an admin account exists for `new_user.email`.
    ///
    /// Returns the existing account untouched if one is already registered
    /// with that email as an admin.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::DuplicateEmail` if the email belongs to a
    /// non-admin account.
    pub fn bootstrap_admin(&self, new_user: NewUser) -> Result<User, AuthError> {
        let existing = self
            .store
            .read()
            .users
            .find(|u| u.email == new_user.email)
            .cloned();

        match existing {
            Some(user) if user.is_admin() => Ok(user),
            Some(_) => Err(AuthError::DuplicateEmail),
            None => self.create_user(new_user, Role::Admin),
        }
    }

    fn create_user(&self, new_user: NewUser, role: Role) -> Result<User, AuthError> {
        // Hash before taking the lock; argon2 is deliberately slow
        let password_hash = hash_password(new_user.password.expose_secret())?;

        let mut tables = self.store.write();
        if tables.users.find(|u| u.email == new_user.email).is_some() {
            return Err(AuthError::DuplicateEmail);
        }

        let user = tables
            .users
            .create_returning(|id| User {
                id,
                name: new_user.name,
                email: new_user.email,
                password_hash,
                role,
                created_at: Utc::now(),
            })?
            .clone();
        drop(tables);

        tracing::info!(user_id = %user.id, role = %user.role, "user registered");
        Ok(user)
    }

    /// Login with email and password and issue a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email is unknown or the
    /// password is wrong; the two cases are indistinguishable.
    #[instrument(skip(self, password), fields(email = %email))]
    pub fn login(&self, email: &Email, password: &str) -> Result<(User, String), AuthError> {
        let found = self
            .store
            .read()
            .users
            .find(|u| &u.email == email)
            .cloned();
        let Some(user) = found else {
            return Err(reject_unknown_account(password));
        };

        verify_password(password, &user.password_hash)?;

        let token = self.tokens.issue(user.id)?;
        Ok((user, token))
    }

    // =========================================================================
    // Access Control Gate
    // =========================================================================

    /// Resolve a bearer credential to the user it was issued for.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingToken` if no credential was presented,
    /// `AuthError::InvalidToken` if it does not verify, and
    /// `AuthError::UserNotFound` if its user no longer exists.
    pub fn resolve_identity(&self, credential: Option<&str>) -> Result<User, AuthError> {
        let token = credential
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;
        let user_id = self.tokens.verify(token)?;

        self.store
            .read()
            .users
            .get(user_id)
            .cloned()
            .ok_or(AuthError::UserNotFound)
    }
}

/// Require `user` to hold exactly `role`.
///
/// # Errors
///
/// Returns `AuthError::Forbidden` otherwise.
pub fn require_role(user: &User, role: Role) -> Result<(), AuthError> {
    if user.role == role {
        Ok(())
    } else {
        Err(AuthError::Forbidden(role))
    }
}
