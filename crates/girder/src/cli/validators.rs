//! CLI input validation functions.
//!
//! These validators are used by clap's `value_parser` attribute so bad input
//! is rejected at parse time with a specific message.

/// Maximum length of a task title or project name
pub const MAX_NAME_LENGTH: usize = 200;

/// Validate a task title or project name.
///
/// Trims surrounding whitespace; rejects empty, overlong, multi-line and
/// control-character input.
pub fn validate_name(s: &str) -> Result<String, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    let chars = s.chars().count();
    if chars > MAX_NAME_LENGTH {
        return Err(format!(
            "Name cannot exceed {MAX_NAME_LENGTH} characters, got {chars} characters"
        ));
    }

    if s.contains('\n') || s.contains('\r') {
        return Err("Name cannot contain newline characters".to_string());
    }

    if let Some(pos) = s.chars().position(char::is_control) {
        return Err(format!("Name contains a control character at position {pos}"));
    }

    Ok(s.to_string())
}

/// Validate a numeric identifier.
///
/// Accepts a positive integer, optionally prefixed with `#`.
pub fn validate_id(s: &str) -> Result<i64, String> {
    let s = s.trim();
    let digits = s.strip_prefix('#').unwrap_or(s);

    let id: i64 = digits
        .parse()
        .map_err(|_| format!("Invalid id: '{s}'. Expected a positive integer"))?;
    if id <= 0 {
        return Err(format!("Invalid id: '{s}'. Ids start at 1"));
    }
    Ok(id)
}
