//! Shared helpers for command implementations.

use anyhow::{Context, Result};
use claritutor_ai::TutorService;
use claritutor_storage::Database;

/// Safely truncate a string to a maximum number of characters (not bytes).
/// This avoids panics when slicing multi-byte UTF-8 characters.
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

/// Format a duration in seconds as "1h 05m" / "12m 30s"
pub fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    if hours > 0 {
        format!("{hours}h {minutes:02}m")
    } else if minutes > 0 {
        format!("{minutes}m {seconds:02}s")
    } else {
        format!("{seconds}s")
    }
}

/// Open the local database
pub fn open_database() -> Result<Database> {
    Database::new(None).context("Failed to open database")
}

/// Build the tutor service from the persisted AI configuration
pub fn tutor_service(db: &Database) -> Result<TutorService> {
    let config = db.get_ai_config()?;
    let service = TutorService::new(&config)?;
    Ok(service)
}

/// The standard sign-in prompt shown when persistence is requested without
/// an identity
pub const SIGN_IN_PROMPT: &str =
    "Please sign in to use this: set CLARITUTOR_USER or pass --user <id>.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str_counts_chars() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 5), "hello...");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(45), "45s");
        assert_eq!(format_duration(150), "2m 30s");
        assert_eq!(format_duration(3900), "1h 05m");
    }
}
