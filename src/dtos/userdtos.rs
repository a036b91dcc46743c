use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use crate::models::usermodel::*;

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserDto {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(length(min = 10, max = 20, message = "Phone number must be between 10-20 characters"))]
    pub phone: Option<String>,

    #[validate(
        length(min = 1, message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: String,

    #[validate(
        length(min = 1, message = "Confirm Password is required"),
        must_match(other = "password", message = "passwords do not match")
    )]
    #[serde(rename = "passwordConfirm")]
    pub password_confirm: String,

    #[validate(custom = "validate_registration_role")]
    pub role: UserRole,
}

fn validate_registration_role(role: &UserRole) -> Result<(), ValidationError> {
    // Admin accounts are never self-registered.
    match role {
        UserRole::Consumer | UserRole::ServiceProvider => Ok(()),
        _ => {
            let mut error = ValidationError::new("invalid_role");
            error.message = Some(Cow::from(
                "Role must be either consumer or service_provider",
            ));
            Err(error)
        }
    }
}

impl RegisterUserDto {
    pub fn validate_phone_number(&self) -> Result<(), ValidationError> {
        if let Some(phone) = &self.phone {
            let phone_regex =
                regex::Regex::new(r"^(\+?[0-9]{1,3}[- ]?)?[0-9]{3}[- ]?[0-9]{3}[- ]?[0-9]{4}$")
                    .map_err(|_| ValidationError::new("Invalid phone regex"))?;

            if !phone_regex.is_match(phone) {
                let mut error = ValidationError::new("invalid_phone");
                error.message = Some(Cow::from(
                    "Phone number must be in a valid format (e.g., +1234567890 or 123-456-7890)",
                ));
                return Err(error);
            }
        }
        Ok(())
    }
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct LoginUserDto {
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,
    #[validate(
        length(min = 1, message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: String,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct VerifyOtpDto {
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(length(equal = 6, message = "OTP must be 6 digits"))]
    pub otp: String,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct ResendOtpDto {
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordDto {
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct ResetPasswordDto {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,

    #[validate(
        length(min = 1, message = "New password is required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub new_password: String,

    #[validate(
        length(min = 1, message = "Confirm Password is required"),
        must_match(other = "new_password", message = "passwords do not match")
    )]
    pub new_password_confirm: String,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct ChangePasswordDto {
    #[validate(length(min = 1, message = "Old password is required"))]
    pub old_password: String,

    #[validate(
        length(min = 1, message = "New password is required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub new_password: String,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct NameUpdateDto {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
}

#[derive(Serialize, Deserialize, Validate)]
pub struct RequestQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterUserDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: String,
    pub picture: Option<String>,
    pub email_verified: bool,
    pub is_blocked: bool,
    pub is_deleted: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl FilterUserDto {
    pub fn filter_user(user: &User) -> Self {
        FilterUserDto {
            id: user.id.to_string(),
            name: user.name.to_owned(),
            email: user.email.to_owned(),
            phone: user.phone.clone(),
            role: user.role.to_str().to_string(),
            picture: user.picture.clone(),
            email_verified: user.is_email_verified,
            is_blocked: user.is_blocked.unwrap_or(false),
            is_deleted: user.is_deleted.unwrap_or(false),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserData {
    pub user: FilterUserDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponseDto {
    pub success: bool,
    pub message: String,
    pub data: UserData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserListResponseDto {
    pub success: bool,
    pub users: Vec<FilterUserDto>,
    pub results: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserLoginResponseDto {
    pub success: bool,
    pub message: String,
    pub token: String,
}

#[derive(Serialize, Deserialize)]
pub struct Response {
    pub success: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_dto_rejects_admin_role() {
        let dto = RegisterUserDto {
            name: "Jo".to_string(),
            email: "jo@example.com".to_string(),
            phone: None,
            password: "secret123".to_string(),
            password_confirm: "secret123".to_string(),
            role: UserRole::Admin,
        };

        assert!(dto.validate().is_err());
    }

    #[test]
    fn register_dto_accepts_consumer_role() {
        let dto = RegisterUserDto {
            name: "Jo".to_string(),
            email: "jo@example.com".to_string(),
            phone: None,
            password: "secret123".to_string(),
            password_confirm: "secret123".to_string(),
            role: UserRole::Consumer,
        };

        assert!(dto.validate().is_ok());
    }

    #[test]
    fn register_dto_rejects_mismatched_passwords() {
        let dto = RegisterUserDto {
            name: "Jo".to_string(),
            email: "jo@example.com".to_string(),
            phone: None,
            password: "secret123".to_string(),
            password_confirm: "different".to_string(),
            role: UserRole::Consumer,
        };

        assert!(dto.validate().is_err());
    }

    #[test]
    fn phone_number_validation() {
        let mut dto = RegisterUserDto {
            name: "Jo".to_string(),
            email: "jo@example.com".to_string(),
            phone: Some("+1234567890".to_string()),
            password: "secret123".to_string(),
            password_confirm: "secret123".to_string(),
            role: UserRole::Consumer,
        };
        assert!(dto.validate_phone_number().is_ok());

        dto.phone = Some("not-a-phone".to_string());
        assert!(dto.validate_phone_number().is_err());
    }
}
