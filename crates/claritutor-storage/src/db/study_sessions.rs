use anyhow::Result;
use rusqlite::params;

use super::helpers::{parse_datetime, parse_uuid};
use super::Database;
use crate::models::StudySessionLog;

impl Database {
    /// Record a completed study session
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub fn insert_study_session(&self, session: &StudySessionLog) -> Result<()> {
        self.conn.execute(
            "INSERT INTO study_sessions
             (id, user_id, duration_seconds, session_type, focus_rating, subject, notes, completed_at, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                session.id.to_string(),
                session.user_id,
                session.duration_seconds,
                session.session_type,
                session.focus_rating,
                session.subject,
                session.notes,
                session.completed_at.to_rfc3339(),
                session.created_at.to_rfc3339(),
            ],
        )?;
        log::info!(
            "Logged study session for {}: {}s, focus {}",
            session.user_id,
            session.duration_seconds,
            session.focus_rating
        );
        Ok(())
    }

    /// Get a user's most recent study sessions
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub fn get_recent_study_sessions(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<StudySessionLog>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, duration_seconds, session_type, focus_rating, subject, notes, completed_at, created_at
             FROM study_sessions
             WHERE user_id = ?1
             ORDER BY completed_at DESC
             LIMIT ?2",
        )?;

        let sessions = stmt
            .query_map(params![user_id, limit], Self::row_to_study_session)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(sessions)
    }

    /// Count a user's logged study sessions
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub fn count_study_sessions(&self, user_id: &str) -> Result<u32> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM study_sessions WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Total seconds of logged study time
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub fn total_study_seconds(&self, user_id: &str) -> Result<u64> {
        let total: Option<i64> = self.conn.query_row(
            "SELECT SUM(duration_seconds) FROM study_sessions WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        #[allow(clippy::cast_sign_loss)]
        Ok(total.unwrap_or(0).max(0) as u64)
    }

    /// Per-subject study time totals, most-studied first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub fn study_time_by_subject(&self, user_id: &str) -> Result<Vec<(String, u64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT COALESCE(subject, 'Unassigned'), SUM(duration_seconds)
             FROM study_sessions
             WHERE user_id = ?1
             GROUP BY COALESCE(subject, 'Unassigned')
             ORDER BY SUM(duration_seconds) DESC",
        )?;

        let totals = stmt
            .query_map(params![user_id], |row| {
                let seconds: i64 = row.get(1)?;
                #[allow(clippy::cast_sign_loss)]
                Ok((row.get::<_, String>(0)?, seconds.max(0) as u64))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(totals)
    }

    /// Helper function to parse `StudySessionLog` from database row
    pub(crate) fn row_to_study_session(row: &rusqlite::Row) -> rusqlite::Result<StudySessionLog> {
        Ok(StudySessionLog {
            id: parse_uuid(&row.get::<_, String>(0)?)?,
            user_id: row.get(1)?,
            duration_seconds: row.get(2)?,
            session_type: row.get(3)?,
            focus_rating: row.get(4)?,
            subject: row.get(5)?,
            notes: row.get(6)?,
            completed_at: parse_datetime(&row.get::<_, String>(7)?)?,
            created_at: parse_datetime(&row.get::<_, String>(8)?)?,
        })
    }
}
