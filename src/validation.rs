// Validation utilities module
// Custom validation functions for form fields and uploads

use std::sync::OnceLock;

use regex::Regex;
use validator::ValidationError;

/// Largest accepted payment proof, in bytes (20MB)
pub const MAX_PROOF_SIZE: usize = 20 * 1024 * 1024;

/// Rejects values that are empty once surrounding whitespace is removed
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank"))
    } else {
        Ok(())
    }
}

fn state_code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9/ -]{1,29}$").expect("state code pattern is valid")
    })
}

/// Validates an NYSC state code such as "LA/24A/1234".
/// Letters, digits, slashes, spaces and hyphens, 2 to 30 characters.
pub fn validate_state_code(code: &str) -> Result<(), ValidationError> {
    if state_code_pattern().is_match(code.trim()) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_state_code"))
    }
}

/// Stored file extension for each accepted proof type; anything else is refused
pub fn proof_type_extension(content_type: &str) -> Option<&'static str> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        "application/pdf" => Some("pdf"),
        _ => None,
    }
}

/// Accepts common raster images and PDF documents
pub fn is_allowed_proof_type(content_type: &str) -> bool {
    proof_type_extension(content_type).is_some()
}

/// Checks the trimmed length of free text lies within `min..=max` characters
pub fn validate_trimmed_length(
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let length = value.trim().chars().count();
    if length < min || length > max {
        let mut error = ValidationError::new("length");
        error.add_param("min".into(), &min);
        error.add_param("max".into(), &max);
        error.add_param("value".into(), &length);
        Err(error)
    } else {
        Ok(())
    }
}
