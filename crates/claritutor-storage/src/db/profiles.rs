use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use super::helpers::{parse_datetime, parse_string_list, parse_uuid};
use super::Database;
use crate::models::Profile;

impl Database {
    /// Insert or update a student profile
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub fn upsert_profile(&self, profile: &Profile) -> Result<()> {
        self.conn.execute(
            "INSERT INTO profiles
             (id, user_id, full_name, email, education_level, primary_subjects, learning_style,
              study_goals, total_study_hours, documents_uploaded, notes_created,
              learning_streak_days, account_type, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
             ON CONFLICT(user_id) DO UPDATE SET
                full_name = excluded.full_name,
                email = excluded.email,
                education_level = excluded.education_level,
                primary_subjects = excluded.primary_subjects,
                learning_style = excluded.learning_style,
                study_goals = excluded.study_goals,
                total_study_hours = excluded.total_study_hours,
                documents_uploaded = excluded.documents_uploaded,
                notes_created = excluded.notes_created,
                learning_streak_days = excluded.learning_streak_days,
                account_type = excluded.account_type,
                updated_at = excluded.updated_at",
            params![
                profile.id.to_string(),
                profile.user_id,
                profile.full_name,
                profile.email,
                profile.education_level,
                serde_json::to_string(&profile.primary_subjects)?,
                profile.learning_style,
                profile.study_goals,
                profile.total_study_hours,
                profile.documents_uploaded,
                profile.notes_created,
                profile.learning_streak_days,
                profile.account_type,
                profile.created_at.to_rfc3339(),
                profile.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get a student profile by user id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub fn get_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        let result = self
            .conn
            .query_row(
                "SELECT id, user_id, full_name, email, education_level, primary_subjects,
                        learning_style, study_goals, total_study_hours, documents_uploaded,
                        notes_created, learning_streak_days, account_type, created_at, updated_at
                 FROM profiles
                 WHERE user_id = ?1",
                params![user_id],
                Self::row_to_profile,
            )
            .optional()?;

        Ok(result)
    }

    /// Add completed study time to the profile counter
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub fn add_study_hours(&self, user_id: &str, hours: f64) -> Result<()> {
        self.conn.execute(
            "UPDATE profiles
             SET total_study_hours = total_study_hours + ?1, updated_at = ?2
             WHERE user_id = ?3",
            params![hours, Utc::now().to_rfc3339(), user_id],
        )?;
        Ok(())
    }

    /// Helper function to parse `Profile` from database row
    pub(crate) fn row_to_profile(row: &rusqlite::Row) -> rusqlite::Result<Profile> {
        Ok(Profile {
            id: parse_uuid(&row.get::<_, String>(0)?)?,
            user_id: row.get(1)?,
            full_name: row.get(2)?,
            email: row.get(3)?,
            education_level: row.get(4)?,
            primary_subjects: parse_string_list(&row.get::<_, String>(5)?),
            learning_style: row.get(6)?,
            study_goals: row.get(7)?,
            total_study_hours: row.get(8)?,
            documents_uploaded: row.get(9)?,
            notes_created: row.get(10)?,
            learning_streak_days: row.get(11)?,
            account_type: row.get(12)?,
            created_at: parse_datetime(&row.get::<_, String>(13)?)?,
            updated_at: parse_datetime(&row.get::<_, String>(14)?)?,
        })
    }
}
