use anyhow::Result;
use rusqlite::params;

use super::helpers::{parse_datetime, parse_uuid};
use super::Database;
use crate::models::{Achievement, BadgeTier};

impl Database {
    /// Award a badge. Idempotent: awarding the same badge type and tier
    /// twice leaves a single row.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub fn award_achievement(&self, achievement: &Achievement) -> Result<bool> {
        let inserted = self.conn.execute(
            "INSERT INTO achievements (id, user_id, badge_type, badge_tier, earned_at, progress_data)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(user_id, badge_type, badge_tier) DO NOTHING",
            params![
                achievement.id.to_string(),
                achievement.user_id,
                achievement.badge_type,
                achievement.badge_tier.to_string(),
                achievement.earned_at.to_rfc3339(),
                achievement
                    .progress_data
                    .as_ref()
                    .map(std::string::ToString::to_string),
            ],
        )?;
        if inserted > 0 {
            log::info!(
                "Awarded {} {} badge to {}",
                achievement.badge_tier,
                achievement.badge_type,
                achievement.user_id
            );
        }
        Ok(inserted > 0)
    }

    /// List a user's earned badges, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub fn list_achievements(&self, user_id: &str) -> Result<Vec<Achievement>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, badge_type, badge_tier, earned_at, progress_data
             FROM achievements
             WHERE user_id = ?1
             ORDER BY earned_at DESC",
        )?;

        let achievements = stmt
            .query_map(params![user_id], |row| {
                let tier: String = row.get(3)?;
                let progress: Option<String> = row.get(5)?;
                Ok(Achievement {
                    id: parse_uuid(&row.get::<_, String>(0)?)?,
                    user_id: row.get(1)?,
                    badge_type: row.get(2)?,
                    badge_tier: tier.parse::<BadgeTier>().map_err(|_| {
                        rusqlite::Error::InvalidColumnType(
                            3,
                            "badge_tier".to_string(),
                            rusqlite::types::Type::Text,
                        )
                    })?,
                    earned_at: parse_datetime(&row.get::<_, String>(4)?)?,
                    progress_data: progress.and_then(|p| serde_json::from_str(&p).ok()),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(achievements)
    }
}
