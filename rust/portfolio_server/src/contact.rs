// src/contact.rs

use crate::models::ContactForm;
use lettre::Address;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use validator::Validate;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w\.-]+@[\w\.-]+\.\w+$").expect("email pattern compiles"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContactError {
    #[error("Please fill out all fields.")]
    MissingFields,

    #[error("Please enter a valid email address.")]
    InvalidEmail,
}

/// Pattern match plus lettre's address parser, since the result becomes the
/// Reply-To header.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email) && email.parse::<Address>().is_ok()
}

/// Required fields first, then the (trimmed) email format.
pub fn check_form(form: &ContactForm) -> Result<(), ContactError> {
    form.validate().map_err(|_| ContactError::MissingFields)?;
    if !is_valid_email(form.email.trim()) {
        return Err(ContactError::InvalidEmail);
    }
    Ok(())
}

/// The message delivered to the site owner for one form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub subject: String,
    pub reply_to: String,
    pub body: String,
}

impl ContactMessage {
    pub fn from_form(form: &ContactForm) -> Self {
        ContactMessage {
            subject: format!("Contact Form Submitted: {}", form.name),
            reply_to: form.email.trim().to_string(),
            body: format!(
                "Name: {}\nEmail: {}\n\nMessage:\n{}",
                form.name, form.email, form.message
            ),
        }
    }
}
