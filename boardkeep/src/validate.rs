//! Field checks shared by the commands

use crate::error::{BoardkeepError, Result};

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_BOARD_DESCRIPTION_LEN: usize = 500;
pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_TASK_DESCRIPTION_LEN: usize = 1000;

/// Non-blank, at most `max` characters
pub fn required_text(field: &str, value: &str, max: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BoardkeepError::validation(field, "must not be blank"));
    }
    max_len(field, value, max)
}

pub fn max_len(field: &str, value: &str, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len > max {
        return Err(BoardkeepError::validation(
            field,
            format!("must be at most {} characters, got {}", max, len),
        ));
    }
    Ok(())
}

/// `#rrggbb`
pub fn color(value: &str) -> Result<()> {
    let valid = value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(BoardkeepError::validation(
            "color",
            format!("expected #rrggbb, got '{}'", value),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(required_text("name", "Done", MAX_NAME_LEN).is_ok());
        assert!(required_text("name", "   ", MAX_NAME_LEN).is_err());
        assert!(required_text("name", &"x".repeat(101), MAX_NAME_LEN).is_err());
        assert!(required_text("name", &"é".repeat(100), MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn test_color() {
        assert!(color("#3498db").is_ok());
        assert!(color("#FFFFFF").is_ok());
        assert!(color("3498db").is_err());
        assert!(color("#34").is_err());
        assert!(color("#zzzzzz").is_err());
        assert!(color("#ééé").is_err());
    }
}
