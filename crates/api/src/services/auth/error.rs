//! Authentication error types.

use thiserror::Error;

/// Errors that can occur during authentication and authorization.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong password or unknown email. Deliberately a single variant so
    /// callers cannot tell the two apart.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Email already belongs to an account.
    #[error("email already registered")]
    DuplicateEmail,

    /// No bearer token on the request.
    #[error("missing authorization token")]
    MissingToken,

    /// Token failed signature, expiry or claim checks.
    #[error("invalid or expired token")]
    InvalidToken,

    /// Token was valid but its user no longer exists.
    #[error("user not found")]
    UserNotFound,

    /// Authenticated, but the role does not allow the operation.
    #[error("{0} access required")]
    Forbidden(storekeep_core::Role),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// No user id is left to assign.
    #[error(transparent)]
    Store(#[from] crate::store::IdSpaceExhausted),

    /// Token could not be signed.
    #[error("token signing error: {0}")]
    TokenSigning(#[from] jsonwebtoken::errors::Error),
}
