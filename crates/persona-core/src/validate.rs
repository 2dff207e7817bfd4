//! Form rules checked before any request leaves the client.

use persona_types::{
    PersonaError, Result,
    user::{ContactForm, LoginRequest, ProfileUpdate, RegisterRequest},
};

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn validate_login(req: &LoginRequest) -> Result<()> {
    validate_email(&req.email)?;
    validate_password(&req.password)
}

pub fn validate_registration(req: &RegisterRequest) -> Result<()> {
    require("Name", &req.name)?;
    validate_email(&req.email)?;
    validate_password(&req.password)
}

pub fn validate_profile_update(update: &ProfileUpdate) -> Result<()> {
    if update.is_empty() {
        return Err(PersonaError::Validation("Nothing to update".to_string()));
    }
    if let Some(name) = &update.name {
        require("Name", name)?;
    }
    Ok(())
}

pub fn validate_contact(form: &ContactForm) -> Result<()> {
    require("First name", &form.first_name)?;
    require("Last name", &form.last_name)?;
    validate_email(&form.email)?;
    require("Subject", &form.subject)?;
    require("Message", &form.message)
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PersonaError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<()> {
    require("Password", password)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PersonaError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<()> {
    require("Email", email)?;
    if !is_valid_email(email.trim()) {
        return Err(PersonaError::Validation("Invalid email address".to_string()));
    }
    Ok(())
}

/// `local@domain.tld` with an alphabetic TLD of two or more letters.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c));
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    let host_ok = !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    let tld_ok = tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic());
    local_ok && host_ok && tld_ok
}
