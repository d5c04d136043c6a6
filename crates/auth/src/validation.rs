//! Registration payload validation.

use regex::Regex;
use thiserror::Error;

use crate::messages;

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";

/// The first rule a registration payload broke.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{}", messages::EMPTY_NAME)]
    EmptyName,
    #[error("{}", messages::EMPTY_PASSWORD)]
    EmptyPassword,
    #[error("{}", messages::password_too_short(.0))]
    PasswordTooShort(usize),
    #[error("{}", messages::CONFIRM_PASSWORD_EMPTY)]
    ConfirmPasswordEmpty,
    #[error("{}", messages::PASSWORDS_DO_NOT_MATCH)]
    PasswordsDoNotMatch,
    #[error("{}", messages::EMPTY_EMAIL)]
    EmptyEmail,
    #[error("{}", messages::INVALID_EMAIL)]
    InvalidEmail,
}

/// Tunable validation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// Zero disables the length check.
    pub password_min_length: usize,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            password_min_length: 7,
        }
    }
}

/// Registration fields as submitted; any of them may be missing.
#[derive(Clone, Default)]
pub struct RegistrationForm {
    pub name: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
}

/// A registration that passed every rule. The confirmation is gone.
#[derive(Clone, PartialEq, Eq)]
pub struct ValidRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub bio: Option<String>,
}

impl std::fmt::Debug for ValidRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidRegistration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("bio", &self.bio)
            .finish_non_exhaustive()
    }
}

/// Check a registration payload, stopping at the first violation.
///
/// Rules run in a fixed order: name, password, password length,
/// confirmation present, confirmation matches, email present, email format.
pub fn validate_registration(
    form: RegistrationForm,
    policy: &ValidationPolicy,
) -> Result<ValidRegistration, ValidationError> {
    let name = non_blank(form.name).ok_or(ValidationError::EmptyName)?;

    let password = form
        .password
        .filter(|password| !password.is_empty())
        .ok_or(ValidationError::EmptyPassword)?;

    if password.chars().count() < policy.password_min_length {
        return Err(ValidationError::PasswordTooShort(policy.password_min_length));
    }

    let confirmation = form
        .confirm_password
        .filter(|confirmation| !confirmation.is_empty())
        .ok_or(ValidationError::ConfirmPasswordEmpty)?;

    if confirmation != password {
        return Err(ValidationError::PasswordsDoNotMatch);
    }

    let email = non_blank(form.email).ok_or(ValidationError::EmptyEmail)?;
    validate_email(&email)?;

    Ok(ValidRegistration {
        name,
        email,
        password,
        phone: non_blank(form.phone),
        bio: non_blank(form.bio),
    })
}

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let valid = email.len() <= 255
        && Regex::new(EMAIL_PATTERN).is_ok_and(|regex| regex.is_match(email));

    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

/// Trimmed value, or `None` when missing or whitespace only.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
