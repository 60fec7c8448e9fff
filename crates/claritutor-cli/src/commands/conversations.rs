//! Saved conversation management.

use anyhow::Result;
use clap::Subcommand;
use tabled::{Table, Tabled};
use uuid::Uuid;

use claritutor_ai::personas;
use claritutor_core::config::RuntimeConfig;
use claritutor_storage::models::Role;

use super::helpers::{open_database, truncate_str, SIGN_IN_PROMPT};

#[derive(Subcommand, Debug)]
pub enum ConversationAction {
    /// List saved conversations
    List,
    /// Show a saved conversation transcript
    Show {
        /// Conversation id
        id: Uuid,
    },
    /// Delete a saved conversation
    Delete {
        /// Conversation id
        id: Uuid,
    },
}

#[derive(Tabled)]
struct ConversationRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Tutor")]
    tutor: String,
    #[tabled(rename = "Tags")]
    tags: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

/// Handle conversation commands
pub fn handle_conversation_command(
    config: &RuntimeConfig,
    action: ConversationAction,
) -> Result<()> {
    let Some(user_id) = config.user_id.as_deref() else {
        println!("{SIGN_IN_PROMPT}");
        return Ok(());
    };
    let db = open_database()?;

    match action {
        ConversationAction::List => {
            let conversations = db.list_conversations(user_id)?;
            if conversations.is_empty() {
                println!("No saved conversations.");
                return Ok(());
            }

            let rows: Vec<ConversationRow> = conversations
                .iter()
                .map(|c| ConversationRow {
                    id: c.id.to_string(),
                    title: truncate_str(&c.title, 32),
                    tutor: personas::find(&c.persona_id)
                        .map_or_else(|| c.persona_id.clone(), |p| p.name.to_string()),
                    tags: c.tags.join(", "),
                    updated: c.updated_at.format("%Y-%m-%d %H:%M").to_string(),
                })
                .collect();
            println!("{}", Table::new(rows));
        }
        ConversationAction::Show { id } => {
            let Some(conversation) = db.get_conversation(id, user_id)? else {
                println!("No saved conversation with that id.");
                return Ok(());
            };

            println!("{} [{}]", conversation.title, conversation.subject);
            if !conversation.tags.is_empty() {
                println!("tags: {}", conversation.tags.join(", "));
            }
            if let Some(summary) = &conversation.summary {
                println!("summary: {summary}");
            }
            println!();

            for message in db.get_conversation_messages(id)? {
                let speaker = match message.role {
                    Role::User => "You",
                    Role::Assistant => "Tutor",
                };
                println!("{speaker}: {}", message.content);
            }
        }
        ConversationAction::Delete { id } => {
            if db.delete_conversation(id, user_id)? {
                println!("Deleted.");
            } else {
                println!("No saved conversation with that id.");
            }
        }
    }

    Ok(())
}
