//! Account route handlers: signup, login and profile.

use axum::extract::State;
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use storekeep_core::{Email, Role, UserId};

use crate::error::Result;
use crate::middleware::RequireUser;
use crate::models::User;
use crate::routes::envelope::Envelope;
use crate::services::NewUser;
use crate::services::auth::MIN_PASSWORD_LENGTH;
use crate::state::AppState;
use crate::validation::{JsonBody, ValidationError, Violations, non_empty_str};

// =============================================================================
// Request bodies
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct SignupBody {
    name: Option<Value>,
    email: Option<Value>,
    password: Option<Value>,
}

impl SignupBody {
    fn validate(self) -> std::result::Result<NewUser, ValidationError> {
        let mut v = Violations::new();

        let name = v.require(non_empty_str(self.name.as_ref()), "Name is required");
        let email = v.require(parse_email(self.email.as_ref()), "Valid email is required");
        let password = v.require(
            self.password
                .as_ref()
                .and_then(Value::as_str)
                .filter(|p| p.chars().count() >= MIN_PASSWORD_LENGTH),
            "Password must be at least 6 characters",
        );
        v.finish()?;

        match (name, email, password) {
            (Some(name), Some(email), Some(password)) => Ok(NewUser {
                name: name.to_string(),
                email,
                password: SecretString::from(password.to_string()),
            }),
            _ => Err(ValidationError::single("Invalid signup request")),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    email: Option<Value>,
    password: Option<Value>,
}

impl LoginBody {
    fn validate(self) -> std::result::Result<(Email, String), ValidationError> {
        let mut v = Violations::new();

        let email = v.require(parse_email(self.email.as_ref()), "Valid email is required");
        let password = v.require(non_empty_str(self.password.as_ref()), "Password is required");
        v.finish()?;

        match (email, password) {
            (Some(email), Some(password)) => Ok((email, password.to_string())),
            _ => Err(ValidationError::single("Invalid login request")),
        }
    }
}

fn parse_email(value: Option<&Value>) -> Option<Email> {
    value
        .and_then(Value::as_str)
        .and_then(|raw| Email::parse(raw).ok())
}

// =============================================================================
// Response bodies
// =============================================================================

/// A user as shown to clients. Never carries the password hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            token: None,
            created_at: None,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /users/signup`
#[instrument(skip(state, body))]
pub async fn signup(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<SignupBody>,
) -> Result<Envelope<UserResponse>> {
    let new_user = body.validate()?;
    let user = state.auth().register(new_user)?;

    Ok(Envelope::created(UserResponse::from(user)).with_message("User registered successfully"))
}

/// `POST /users/login`
#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginBody>,
) -> Result<Envelope<UserResponse>> {
    let (email, password) = body.validate()?;
    let (user, token) = state.auth().login(&email, &password)?;

    tracing::info!(user_id = %user.id, "user logged in");
    Ok(Envelope::ok(UserResponse {
        token: Some(token),
        ..UserResponse::from(user)
    })
    .with_message("Login successful"))
}

/// `GET /users/profile`
#[instrument(skip_all)]
pub async fn profile(RequireUser(user): RequireUser) -> Envelope<UserResponse> {
    let created_at = user.created_at;
    Envelope::ok(UserResponse {
        created_at: Some(created_at),
        ..UserResponse::from(user)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn signup_body(value: serde_json::Value) -> SignupBody {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_signup_reports_every_problem() {
        let err = signup_body(json!({"email": "nope", "password": "123"}))
            .validate()
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Validation failed: Name is required, Valid email is required, Password must be at least 6 characters"
        );
    }

    #[test]
    fn test_signup_valid() {
        let new_user = signup_body(json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "secret1"
        }))
        .validate()
        .unwrap();

        assert_eq!(new_user.name, "Ada");
        assert_eq!(new_user.email.as_str(), "ada@example.com");
    }

    #[test]
    fn test_login_requires_password() {
        let body: LoginBody =
            serde_json::from_value(json!({"email": "ada@example.com", "password": ""})).unwrap();
        assert_eq!(
            body.validate().unwrap_err().messages(),
            ["Password is required"]
        );
    }

    #[test]
    fn test_user_response_omits_hash() {
        let user = User {
            id: UserId::new(1),
            name: "Ada".to_string(),
            email: Email::parse("ada@example.com").unwrap(),
            password_hash: "$argon2id$...".to_string(),
            role: Role::User,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert_eq!(
            json,
            json!({"id": 1, "name": "Ada", "email": "ada@example.com", "role": "user"})
        );
    }
}
