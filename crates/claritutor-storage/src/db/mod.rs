//! Database operations split into domain-specific modules.
//!
//! This module re-exports the main Database struct and all its operations.

mod achievements;
mod ai_config;
mod conversations;
mod helpers;
mod profiles;
mod study_sessions;

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::PathBuf;

use crate::migrations;
use crate::models::AiConfig;

/// Database connection wrapper
pub struct Database {
    pub(crate) conn: Connection,
}

// Implement Send and Sync for Database to allow sharing across threads
unsafe impl Send for Database {}
unsafe impl Sync for Database {}

impl Database {
    /// Create a new database connection
    ///
    /// # Errors
    ///
    /// Returns an error if database directory creation, connection opening,
    /// or schema initialization fails
    pub fn new(db_path: Option<PathBuf>) -> Result<Self> {
        let path = db_path.unwrap_or_else(Self::default_db_path);

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create database directory")?;
        }

        let conn = Connection::open(&path).context("Failed to open database connection")?;

        // Initialize schema
        migrations::init_schema(&conn)?;

        log::info!("Database initialized at: {}", path.display());

        Ok(Self { conn })
    }

    /// Get default database path
    fn default_db_path() -> PathBuf {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("claritutor");
        path.push("claritutor.db");
        path
    }

    /// Get AI provider configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub fn get_ai_config(&self) -> Result<AiConfig> {
        ai_config::get_ai_config(&self.conn)
    }

    /// Save AI provider configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub fn save_ai_config(&self, config: &AiConfig) -> Result<()> {
        ai_config::save_ai_config(&self.conn, config)
    }

    /// Update a single AI config field by key
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the database operation fails
    pub fn update_ai_config_field(&self, key: &str, value: Option<&str>) -> Result<()> {
        ai_config::update_ai_config_field(&self.conn, key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Achievement, AiProvider, BadgeTier, ChatMessage, Profile, SavedConversation,
        StudySessionLog,
    };

    fn open_test_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(Some(dir.path().join("test.db"))).unwrap();
        (dir, db)
    }

    #[test]
    fn test_conversation_round_trip_preserves_order() {
        let (_dir, db) = open_test_db();

        let mut conversation = SavedConversation::new(
            "user-1".to_string(),
            "Quadratic equations".to_string(),
            "Mathematics".to_string(),
            "math".to_string(),
        );
        conversation.tags = vec!["Mathematics".to_string()];

        let messages = vec![
            ChatMessage::user("What is the quadratic formula?"),
            ChatMessage::assistant("x = (-b ± sqrt(b² - 4ac)) / 2a"),
            ChatMessage::user("Can you provide some examples?"),
        ];
        db.save_conversation(&conversation, &messages).unwrap();

        let loaded = db
            .get_conversation(conversation.id, "user-1")
            .unwrap()
            .unwrap();
        assert_eq!(loaded.title, "Quadratic equations");
        assert_eq!(loaded.tags, vec!["Mathematics".to_string()]);

        let loaded_messages = db.get_conversation_messages(conversation.id).unwrap();
        assert_eq!(loaded_messages.len(), 3);
        for (stored, original) in loaded_messages.iter().zip(&messages) {
            assert_eq!(stored.content, original.content);
            assert_eq!(stored.role, original.role);
        }
        // Timestamps stay non-decreasing after the round trip
        for pair in loaded_messages.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }
    }

    #[test]
    fn test_conversation_scoped_to_owner() {
        let (_dir, db) = open_test_db();

        let conversation = SavedConversation::new(
            "user-1".to_string(),
            "Private notes".to_string(),
            "History".to_string(),
            "history".to_string(),
        );
        db.save_conversation(&conversation, &[]).unwrap();

        assert!(db
            .get_conversation(conversation.id, "someone-else")
            .unwrap()
            .is_none());
        assert!(!db
            .delete_conversation(conversation.id, "someone-else")
            .unwrap());
        assert!(db.delete_conversation(conversation.id, "user-1").unwrap());
    }

    #[test]
    fn test_resave_replaces_messages() {
        let (_dir, db) = open_test_db();

        let conversation = SavedConversation::new(
            "user-1".to_string(),
            "Draft".to_string(),
            "General Studies".to_string(),
            "general".to_string(),
        );
        db.save_conversation(&conversation, &[ChatMessage::user("first")])
            .unwrap();
        db.save_conversation(
            &conversation,
            &[
                ChatMessage::user("first"),
                ChatMessage::assistant("second"),
            ],
        )
        .unwrap();

        let messages = db.get_conversation_messages(conversation.id).unwrap();
        assert_eq!(messages.len(), 2);
    }

    #[test]
    fn test_study_session_totals() {
        let (_dir, db) = open_test_db();

        let mut log = StudySessionLog::new("user-1".to_string(), 1500, 8);
        log.subject = Some("Mathematics".to_string());
        db.insert_study_session(&log).unwrap();
        db.insert_study_session(&StudySessionLog::new("user-1".to_string(), 300, 5))
            .unwrap();

        assert_eq!(db.count_study_sessions("user-1").unwrap(), 2);
        assert_eq!(db.total_study_seconds("user-1").unwrap(), 1800);
        let by_subject = db.study_time_by_subject("user-1").unwrap();
        assert_eq!(by_subject[0], ("Mathematics".to_string(), 1500));
    }

    #[test]
    fn test_award_achievement_idempotent() {
        let (_dir, db) = open_test_db();

        let badge = Achievement::new(
            "user-1".to_string(),
            "focused-sessions".to_string(),
            BadgeTier::Bronze,
        );
        assert!(db.award_achievement(&badge).unwrap());

        let duplicate = Achievement::new(
            "user-1".to_string(),
            "focused-sessions".to_string(),
            BadgeTier::Bronze,
        );
        assert!(!db.award_achievement(&duplicate).unwrap());
        assert_eq!(db.list_achievements("user-1").unwrap().len(), 1);
    }

    #[test]
    fn test_profile_upsert_and_counters() {
        let (_dir, db) = open_test_db();

        let mut profile = Profile::new(
            "user-1".to_string(),
            "Ada Lovelace".to_string(),
            "ada@example.com".to_string(),
        );
        profile.primary_subjects = vec!["Mathematics".to_string()];
        db.upsert_profile(&profile).unwrap();
        db.add_study_hours("user-1", 1.5).unwrap();

        let loaded = db.get_profile("user-1").unwrap().unwrap();
        assert_eq!(loaded.full_name, "Ada Lovelace");
        assert!((loaded.total_study_hours - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ai_config_defaults_and_update() {
        let (_dir, db) = open_test_db();

        let config = db.get_ai_config().unwrap();
        assert_eq!(config.provider, AiProvider::OpenAi);
        assert!(config.enabled);

        db.update_ai_config_field("provider", Some("ollama")).unwrap();
        db.update_ai_config_field("model", Some("mistral")).unwrap();
        let config = db.get_ai_config().unwrap();
        assert_eq!(config.provider, AiProvider::Ollama);
        assert_eq!(config.effective_model(), "mistral");

        assert!(db.update_ai_config_field("provider", Some("skynet")).is_err());
        assert!(db.update_ai_config_field("nonsense", None).is_err());
    }
}
