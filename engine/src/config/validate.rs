pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// Shared check for player-facing names in configs and peer messages.
pub fn validate_display_name(field: &str, name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(format!("{} must not be empty", field));
    }
    if trimmed.chars().count() > MAX_DISPLAY_NAME_CHARS {
        return Err(format!(
            "{} must be at most {} characters",
            field, MAX_DISPLAY_NAME_CHARS
        ));
    }
    Ok(())
}

pub const MAX_DISPLAY_NAME_CHARS: usize = 32;
