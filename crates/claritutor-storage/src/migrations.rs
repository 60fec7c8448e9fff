use anyhow::Result;
use rusqlite::Connection;

/// Initialize database schema
///
/// # Errors
///
/// Returns an error if database table creation or index creation fails
pub fn init_schema(conn: &Connection) -> Result<()> {
    // Profiles table - student identity, preferences, and counters
    conn.execute(
        "CREATE TABLE IF NOT EXISTS profiles (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL UNIQUE,
            full_name TEXT NOT NULL,
            email TEXT NOT NULL,
            education_level TEXT,
            primary_subjects TEXT NOT NULL DEFAULT '[]',
            learning_style TEXT,
            study_goals TEXT,
            total_study_hours REAL NOT NULL DEFAULT 0,
            documents_uploaded INTEGER NOT NULL DEFAULT 0,
            notes_created INTEGER NOT NULL DEFAULT 0,
            learning_streak_days INTEGER NOT NULL DEFAULT 0,
            account_type TEXT NOT NULL DEFAULT 'free',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    // Conversations table - saved tutoring session headers
    conn.execute(
        "CREATE TABLE IF NOT EXISTS conversations (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            title TEXT NOT NULL,
            subject TEXT NOT NULL,
            tutor_persona TEXT NOT NULL,
            is_favorite INTEGER NOT NULL DEFAULT 0,
            tags TEXT NOT NULL DEFAULT '[]',
            summary TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_conversations_user
         ON conversations (user_id, updated_at)",
        [],
    )?;

    // Messages table - ordered turns belonging to a conversation
    conn.execute(
        "CREATE TABLE IF NOT EXISTS messages (
            id TEXT PRIMARY KEY,
            conversation_id TEXT NOT NULL,
            role TEXT NOT NULL,
            content TEXT NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY (conversation_id) REFERENCES conversations (id)
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_messages_conversation
         ON messages (conversation_id, created_at)",
        [],
    )?;

    // Study sessions table - completed focus sessions from the timer
    conn.execute(
        "CREATE TABLE IF NOT EXISTS study_sessions (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            duration_seconds INTEGER NOT NULL,
            session_type TEXT NOT NULL,
            focus_rating INTEGER NOT NULL,
            subject TEXT,
            notes TEXT,
            completed_at TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_study_sessions_user
         ON study_sessions (user_id, completed_at)",
        [],
    )?;

    // Achievements table - earned badges, one row per badge type + tier
    conn.execute(
        "CREATE TABLE IF NOT EXISTS achievements (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            badge_type TEXT NOT NULL,
            badge_tier TEXT NOT NULL,
            earned_at TEXT NOT NULL,
            progress_data TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_achievements_badge
         ON achievements (user_id, badge_type, badge_tier)",
        [],
    )?;

    // AI config table - single-row provider configuration
    conn.execute(
        "CREATE TABLE IF NOT EXISTS ai_config (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            provider TEXT NOT NULL,
            model TEXT,
            api_key TEXT,
            base_url TEXT,
            enabled INTEGER NOT NULL DEFAULT 1,
            updated_at TEXT
        )",
        [],
    )?;

    Ok(())
}
