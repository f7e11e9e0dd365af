//! User domain model and auth request types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Platform role attached to every user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Student,
    Alumnus,
    Mentor,
    Staff,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Alumnus => "alumnus",
            UserRole::Mentor => "mentor",
            UserRole::Staff => "staff",
            UserRole::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "student" => Some(UserRole::Student),
            "alumnus" => Some(UserRole::Alumnus),
            "mentor" => Some(UserRole::Mentor),
            "staff" => Some(UserRole::Staff),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

/// A platform user. Created inactive; activated by OTP verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub phone_num: String,
    pub role: UserRole,
    pub firstname: String,
    pub lastname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middlename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }
}

/// Account fields shared by the signup endpoints.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct SignupAccount {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    #[validate(length(min = 7, max = 20, message = "Phone number must be 7-20 characters"))]
    pub phone_num: String,

    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub firstname: String,

    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub lastname: String,

    pub middlename: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// Request body for OTP verification.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct VerifyOtpRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,

    #[validate(length(equal = 6, message = "Code must be 6 digits"))]
    pub code: String,
}

/// Request body for reissuing an OTP.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct ResendOtpRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
}

/// Request body for password login.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct LoginRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response for a successful login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [
            UserRole::Student,
            UserRole::Alumnus,
            UserRole::Mentor,
            UserRole::Staff,
            UserRole::Admin,
        ] {
            assert_eq!(UserRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::parse("plumber"), None);
    }

    #[test]
    fn test_full_name() {
        let user = User {
            id: Uuid::new_v4(),
            email: "ada@example.edu".into(),
            phone_num: "+2348012345678".into(),
            role: UserRole::Student,
            firstname: "Ada".into(),
            lastname: "Obi".into(),
            middlename: None,
            street: None,
            city: None,
            state: None,
            country: None,
            is_active: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(user.full_name(), "Ada Obi");
    }

    #[test]
    fn test_signup_account_validation() {
        let account = SignupAccount {
            email: "ada@example.edu".into(),
            password: "hunter2hunter2".into(),
            phone_num: "+2348012345678".into(),
            firstname: "Ada".into(),
            lastname: "Obi".into(),
            middlename: None,
            street: None,
            city: None,
            state: None,
            country: None,
        };
        assert!(account.validate().is_ok());

        let bad_email = SignupAccount {
            email: "not-an-email".into(),
            ..account.clone()
        };
        assert!(bad_email.validate().is_err());

        let short_password = SignupAccount {
            password: "short".into(),
            ..account
        };
        assert!(short_password.validate().is_err());
    }
}
