//! Field-level validation for inbound request data.
//!
//! Each validator returns `Ok(())` or a human-readable message that the API
//! layer maps to a 400 response. Limits match the database schema.

use std::sync::LazyLock;

use regex::Regex;

/// Maximum length of a username.
pub const MAX_USERNAME_LEN: usize = 150;

/// Maximum length of an email address (RFC 5321 path limit).
pub const MAX_EMAIL_LEN: usize = 254;

/// Maximum length of a category/genre/title name.
pub const MAX_NAME_LEN: usize = 256;

/// Maximum length of a category/genre slug.
pub const MAX_SLUG_LEN: usize = 50;

/// Usernames that collide with reserved route segments.
const RESERVED_USERNAMES: &[&str] = &["me"];

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("username regex must compile"));

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("slug regex must compile"));

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex must compile"));

/// Validate a username: non-empty, within length, word characters plus
/// `.@+-`, and not a reserved name.
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("username must not be empty".into());
    }
    if username.len() > MAX_USERNAME_LEN {
        return Err(format!(
            "username must be at most {MAX_USERNAME_LEN} characters"
        ));
    }
    if !USERNAME_RE.is_match(username) {
        return Err("username may only contain letters, digits and .@+- characters".into());
    }
    if RESERVED_USERNAMES.contains(&username) {
        return Err(format!("'{username}' is a reserved username"));
    }
    Ok(())
}

/// Validate an email address shape. Not a full RFC 5322 parse; rejects the
/// obviously malformed before the row is written.
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("email must not be empty".into());
    }
    if email.len() > MAX_EMAIL_LEN {
        return Err(format!("email must be at most {MAX_EMAIL_LEN} characters"));
    }
    if !EMAIL_RE.is_match(email) {
        return Err("email is not a valid address".into());
    }
    Ok(())
}

/// Validate a category or genre slug.
pub fn validate_slug(slug: &str) -> Result<(), String> {
    if slug.is_empty() {
        return Err("slug must not be empty".into());
    }
    if slug.len() > MAX_SLUG_LEN {
        return Err(format!("slug must be at most {MAX_SLUG_LEN} characters"));
    }
    if !SLUG_RE.is_match(slug) {
        return Err("slug may only contain letters, digits, hyphens and underscores".into());
    }
    Ok(())
}

/// Validate a display name (categories, genres, titles).
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("name must not be empty".into());
    }
    if name.len() > MAX_NAME_LEN {
        return Err(format!("name must be at most {MAX_NAME_LEN} characters"));
    }
    Ok(())
}

/// Validate a review score. Scores are integers from 1 to 10 inclusive.
pub fn validate_score(score: i32) -> Result<(), String> {
    if !(1..=10).contains(&score) {
        return Err("score must be between 1 and 10".into());
    }
    Ok(())
}
