//! Client-side form checks. These only keep obviously bad input off the
//! network; the API remains the authority on what it accepts.

use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;
use std::borrow::Cow;
use std::sync::LazyLock;
use validator::{Validate, ValidationError, ValidationErrors};

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("valid email pattern"));

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "Email is required."))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(custom(function = "validate_first_name"))]
    pub first_name: String,
    #[validate(custom(function = "validate_last_name"))]
    pub last_name: String,
    #[validate(email(message = "Please enter a valid email address."))]
    pub email: String,
    #[validate(length(min = 8, message = "Password should be at least 8 characters."))]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ChangePasswordForm {
    #[validate(
        length(min = 1, message = "Email is required."),
        regex(path = *EMAIL_SHAPE, message = "Please enter a valid email address.")
    )]
    pub email: String,
    #[validate(length(min = 8, max = 30, message = "Password must be 8–30 characters long."))]
    pub new_password: String,
}

/// Create and edit share the same shape: a date, a score and an optional note.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MoodForm {
    #[validate(custom(function = "validate_entry_date"))]
    pub date: String,
    #[validate(range(min = 1, max = 5, message = "Mood must be between 1 and 5."))]
    pub score: u8,
    #[serde(default)]
    #[validate(length(max = 500, message = "Note is too long (max 500 characters)."))]
    pub note: String,
}

impl MoodForm {
    pub fn note(&self) -> Option<String> {
        let note = self.note.trim();
        (!note.is_empty()).then(|| note.to_string())
    }
}

/// Validates `form` and reduces any failure to the message of the first
/// failing field, in the order the fields appear on the page.
pub fn check<T: Validate>(form: &T, field_order: &[&str]) -> Result<(), String> {
    match form.validate() {
        Ok(()) => Ok(()),
        Err(errors) => Err(first_message(&errors, field_order)),
    }
}

pub const LOGIN_FIELDS: [&str; 2] = ["email", "password"];
pub const REGISTER_FIELDS: [&str; 4] = ["first_name", "last_name", "email", "password"];
pub const CHANGE_PASSWORD_FIELDS: [&str; 2] = ["email", "new_password"];
pub const MOOD_FIELDS: [&str; 3] = ["date", "score", "note"];

fn first_message(errors: &ValidationErrors, field_order: &[&str]) -> String {
    let fields = errors.field_errors();
    field_order
        .iter()
        .filter_map(|field| fields.get(*field))
        .chain(fields.values())
        .filter_map(|errors| errors.first())
        .map(|error| {
            error
                .message
                .as_ref()
                .map(|message| message.to_string())
                .unwrap_or_else(|| format!("Invalid {}.", error.code))
        })
        .next()
        .unwrap_or_else(|| "Please check the form.".to_string())
}

fn failure(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn validate_first_name(value: &str) -> Result<(), ValidationError> {
    if value.trim().chars().count() < 2 {
        return Err(failure("first_name", "First name must be at least 2 characters."));
    }
    Ok(())
}

fn validate_last_name(value: &str) -> Result<(), ValidationError> {
    if value.trim().chars().count() < 2 {
        return Err(failure("last_name", "Last name must be at least 2 characters."));
    }
    Ok(())
}

fn validate_entry_date(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(failure("required", "Please choose a date."));
    }
    if NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").is_err() {
        return Err(failure("date", "Please choose a valid date."));
    }
    Ok(())
}
