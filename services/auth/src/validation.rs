//! Input validation utilities
//!
//! Form fields are trimmed; a field that is empty after trimming counts as
//! absent.

use crate::error::{AuthError, AuthResult};
use crate::models::{LoginForm, SignupForm};

/// Trim a form field, mapping empty input to `None`
pub fn field(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Signup input that passed validation
#[derive(Debug, Clone, Copy)]
pub struct ValidSignup<'a> {
    pub username: &'a str,
    pub full_name: &'a str,
    pub password: &'a str,
}

/// Validate a login form, returning the username and password
pub fn validate_login(form: &LoginForm) -> AuthResult<(&str, &str)> {
    match (field(&form.login), field(&form.password)) {
        (Some(login), Some(password)) => Ok((login, password)),
        _ => Err(AuthError::Validation(
            "Username and password are required".to_string(),
        )),
    }
}

/// Validate a signup form
pub fn validate_signup(form: &SignupForm) -> AuthResult<ValidSignup<'_>> {
    let (Some(username), Some(full_name), Some(password), Some(password2)) = (
        field(&form.username),
        field(&form.full_name),
        field(&form.password),
        field(&form.password2),
    ) else {
        return Err(AuthError::Validation("All fields are required".to_string()));
    };

    if password != password2 {
        return Err(AuthError::Validation("Passwords do not match".to_string()));
    }

    Ok(ValidSignup {
        username,
        full_name,
        password,
    })
}
