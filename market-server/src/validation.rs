//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! PostgreSQL TEXT has no built-in length enforcement, so every
//! client-supplied string is checked here before it reaches the DB.

use shared::error::{AppError, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: category, product
pub const MAX_NAME_LEN: usize = 200;

/// Advertisement titles
pub const MAX_TITLE_LEN: usize = 200;

/// Descriptions (category, product, advertisement)
pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// Message bodies
pub const MAX_CONTENT_LEN: usize = 2000;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Usernames
pub const MAX_USERNAME_LEN: usize = 50;

/// Passwords (before hashing)
pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 128;

/// Image MIME types
pub const MAX_CONTENT_TYPE_LEN: usize = 100;

/// Uploaded image payloads, decoded size (2 MiB)
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

// ── Account field checks ────────────────────────────────────────────

/// Minimal structural email check: one `@`, non-empty local and domain
/// parts, a dot in the domain. Deliverability is not our problem.
pub fn validate_email(email: &str) -> Result<(), AppError> {
    if email.len() > MAX_EMAIL_LEN {
        return Err(AppError::new(ErrorCode::EmailInvalid));
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(AppError::new(ErrorCode::EmailInvalid));
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') || email.contains(' ') {
        return Err(AppError::new(ErrorCode::EmailInvalid));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::new(ErrorCode::PasswordTooShort));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password is too long (max {MAX_PASSWORD_LEN})"
        )));
    }
    Ok(())
}

// ── Image payload checks ────────────────────────────────────────────

pub fn validate_image_content_type(content_type: &str) -> Result<(), AppError> {
    if content_type.len() > MAX_CONTENT_TYPE_LEN || !content_type.starts_with("image/") {
        return Err(
            AppError::new(ErrorCode::UnsupportedFileFormat).with_detail("content_type", content_type)
        );
    }
    Ok(())
}

/// Validate an image payload: a URL passes as-is, anything else must be
/// valid base64 (optionally with a `data:` prefix) decoding to at most
/// [`MAX_IMAGE_BYTES`].
pub fn validate_image_data(data: &str) -> Result<(), AppError> {
    use base64::Engine;

    if data.starts_with("http://") || data.starts_with("https://") {
        return Ok(());
    }

    let payload = match data.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => data,
    };

    let decoded = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|_| AppError::new(ErrorCode::InvalidImageFile))?;

    if decoded.len() > MAX_IMAGE_BYTES {
        return Err(AppError::new(ErrorCode::FileTooLarge)
            .with_detail("size", decoded.len() as i64)
            .with_detail("max", MAX_IMAGE_BYTES as i64));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Electronics", "name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(201), "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "description", 10).is_ok());
        assert!(validate_optional_text(&Some("short".into()), "description", 10).is_ok());
        assert!(validate_optional_text(&Some("way too long".into()), "description", 10).is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("user.name+tag@sub.example.org").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("user@nodot").is_err());
        assert!(validate_email("has space@example.com").is_err());
    }

    #[test]
    fn test_password() {
        assert!(validate_password("12345678").is_ok());
        assert!(validate_password("1234567").is_err());
        assert!(validate_password(&"p".repeat(129)).is_err());
    }

    #[test]
    fn test_image_content_type() {
        assert!(validate_image_content_type("image/png").is_ok());
        assert!(validate_image_content_type("image/jpeg").is_ok());
        assert!(validate_image_content_type("text/html").is_err());
        assert!(validate_image_content_type("application/pdf").is_err());

        let err = validate_image_content_type("video/mp4").unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedFileFormat);
    }

    #[test]
    fn test_image_data_base64() {
        use base64::Engine;
        let small = base64::engine::general_purpose::STANDARD.encode([0u8; 64]);
        assert!(validate_image_data(&small).is_ok());
        assert!(validate_image_data(&format!("data:image/png;base64,{small}")).is_ok());

        let err = validate_image_data("not!!valid@@base64").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidImageFile);
    }

    #[test]
    fn test_image_data_size_limit() {
        use base64::Engine;
        let oversized =
            base64::engine::general_purpose::STANDARD.encode(vec![0u8; MAX_IMAGE_BYTES + 1]);
        let err = validate_image_data(&oversized).unwrap_err();
        assert_eq!(err.code, ErrorCode::FileTooLarge);
    }

    #[test]
    fn test_image_data_url_passthrough() {
        assert!(validate_image_data("https://cdn.example.com/img/42.png").is_ok());
        assert!(validate_image_data("http://cdn.example.com/img/42.png").is_ok());
    }
}
