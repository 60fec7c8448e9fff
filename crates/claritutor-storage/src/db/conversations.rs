use anyhow::Result;
use rusqlite::{params, OptionalExtension};
use uuid::Uuid;

use super::helpers::{parse_datetime, parse_string_list, parse_uuid};
use super::Database;
use crate::models::{ChatMessage, SavedConversation};

impl Database {
    /// Save a conversation and its full message list.
    ///
    /// Upserts the header and replaces all message rows in one transaction.
    /// Conflicting saves from multiple sessions resolve last-write-wins.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub fn save_conversation(
        &self,
        conversation: &SavedConversation,
        messages: &[ChatMessage],
    ) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;

        tx.execute(
            "INSERT INTO conversations
             (id, user_id, title, subject, tutor_persona, is_favorite, tags, summary, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                subject = excluded.subject,
                tutor_persona = excluded.tutor_persona,
                is_favorite = excluded.is_favorite,
                tags = excluded.tags,
                summary = excluded.summary,
                updated_at = excluded.updated_at",
            params![
                conversation.id.to_string(),
                conversation.user_id,
                conversation.title,
                conversation.subject,
                conversation.persona_id,
                i32::from(conversation.is_favorite),
                serde_json::to_string(&conversation.tags)?,
                conversation.summary,
                conversation.created_at.to_rfc3339(),
                conversation.updated_at.to_rfc3339(),
            ],
        )?;

        tx.execute(
            "DELETE FROM messages WHERE conversation_id = ?1",
            params![conversation.id.to_string()],
        )?;

        for message in messages {
            tx.execute(
                "INSERT INTO messages (id, conversation_id, role, content, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    message.id.to_string(),
                    conversation.id.to_string(),
                    message.role.to_string(),
                    message.content,
                    message.timestamp.to_rfc3339(),
                ],
            )?;
        }

        tx.commit()?;
        log::info!(
            "Saved conversation {} ({} messages)",
            conversation.id,
            messages.len()
        );
        Ok(())
    }

    /// Get a saved conversation header by id, scoped to its owner
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub fn get_conversation(
        &self,
        conversation_id: Uuid,
        user_id: &str,
    ) -> Result<Option<SavedConversation>> {
        let result = self
            .conn
            .query_row(
                "SELECT id, user_id, title, subject, tutor_persona, is_favorite, tags, summary, created_at, updated_at
                 FROM conversations
                 WHERE id = ?1 AND user_id = ?2",
                params![conversation_id.to_string(), user_id],
                Self::row_to_conversation,
            )
            .optional()?;

        Ok(result)
    }

    /// List a user's saved conversations, most recently updated first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub fn list_conversations(&self, user_id: &str) -> Result<Vec<SavedConversation>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, title, subject, tutor_persona, is_favorite, tags, summary, created_at, updated_at
             FROM conversations
             WHERE user_id = ?1
             ORDER BY updated_at DESC",
        )?;

        let conversations = stmt
            .query_map(params![user_id], Self::row_to_conversation)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(conversations)
    }

    /// Get a conversation's messages in append order
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub fn get_conversation_messages(&self, conversation_id: Uuid) -> Result<Vec<ChatMessage>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, role, content, created_at
             FROM messages
             WHERE conversation_id = ?1
             ORDER BY created_at, id",
        )?;

        let messages = stmt
            .query_map(params![conversation_id.to_string()], |row| {
                let role: String = row.get(1)?;
                Ok(ChatMessage {
                    id: parse_uuid(&row.get::<_, String>(0)?)?,
                    role: role.parse().map_err(|_| {
                        rusqlite::Error::InvalidColumnType(1, "role".to_string(), rusqlite::types::Type::Text)
                    })?,
                    content: row.get(2)?,
                    timestamp: parse_datetime(&row.get::<_, String>(3)?)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(messages)
    }

    /// Delete a conversation and its messages
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub fn delete_conversation(&self, conversation_id: Uuid, user_id: &str) -> Result<bool> {
        let tx = self.conn.unchecked_transaction()?;

        let deleted = tx.execute(
            "DELETE FROM conversations WHERE id = ?1 AND user_id = ?2",
            params![conversation_id.to_string(), user_id],
        )?;
        if deleted > 0 {
            tx.execute(
                "DELETE FROM messages WHERE conversation_id = ?1",
                params![conversation_id.to_string()],
            )?;
        }

        tx.commit()?;
        Ok(deleted > 0)
    }

    /// Helper function to parse `SavedConversation` from database row
    pub(crate) fn row_to_conversation(row: &rusqlite::Row) -> rusqlite::Result<SavedConversation> {
        Ok(SavedConversation {
            id: parse_uuid(&row.get::<_, String>(0)?)?,
            user_id: row.get(1)?,
            title: row.get(2)?,
            subject: row.get(3)?,
            persona_id: row.get(4)?,
            is_favorite: row.get::<_, i32>(5)? != 0,
            tags: parse_string_list(&row.get::<_, String>(6)?),
            summary: row.get(7)?,
            created_at: parse_datetime(&row.get::<_, String>(8)?)?,
            updated_at: parse_datetime(&row.get::<_, String>(9)?)?,
        })
    }
}
