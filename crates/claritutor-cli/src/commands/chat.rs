//! Interactive tutoring session.

use std::io::{BufRead, Write};

use anyhow::Result;
use tabled::{Table, Tabled};
use uuid::Uuid;

use claritutor_ai::{personas, GenerationError};
use claritutor_core::config::RuntimeConfig;
use claritutor_core::{
    load_session, run_turn, save_session, LoadOutcome, SaveOutcome, SessionState, TutorSession,
    QUICK_ACTIONS,
};

use super::helpers::{open_database, truncate_str, tutor_service, SIGN_IN_PROMPT};

#[derive(Tabled)]
struct PersonaRow {
    #[tabled(rename = "Id")]
    id: &'static str,
    #[tabled(rename = "Tutor")]
    name: String,
    #[tabled(rename = "Subject")]
    subject: &'static str,
    #[tabled(rename = "Teaching style")]
    style: &'static str,
}

/// Print the persona catalog
pub fn print_personas() {
    let rows: Vec<PersonaRow> = personas::all()
        .iter()
        .map(|p| PersonaRow {
            id: p.id,
            name: format!("{} {}", p.icon, p.name),
            subject: p.subject,
            style: p.teaching_style,
        })
        .collect();
    println!("{}", Table::new(rows));
}

fn print_help() {
    println!("Commands:");
    println!("  /save            save this conversation");
    println!("  /load <id>       load a saved conversation");
    println!("  /reset           start a new conversation");
    println!("  /tutor <id>      switch tutor persona");
    println!("  /personas        list tutor personas");
    println!("  /quit            leave the session");
    println!("Quick actions:");
    for action in QUICK_ACTIONS {
        println!("  /{:<15} {}", quick_action_command(action.label), action.prompt);
    }
}

fn quick_action_command(label: &str) -> String {
    label
        .split_whitespace()
        .next()
        .unwrap_or(label)
        .to_lowercase()
}

fn find_quick_action(command: &str) -> Option<&'static str> {
    QUICK_ACTIONS
        .iter()
        .find(|action| quick_action_command(action.label) == command)
        .map(|action| action.prompt)
}

/// Run the interactive chat loop
pub async fn run_chat(
    config: &RuntimeConfig,
    tutor_id: Option<&str>,
    no_stream: bool,
) -> Result<()> {
    let db = open_database()?;
    let service = tutor_service(&db)?;

    let persona = tutor_id
        .and_then(personas::find)
        .unwrap_or_else(personas::default_persona);
    let mut session = TutorSession::new(persona.id);

    println!("{} Hi! I'm {}. {}", persona.icon, persona.name, persona.description);
    println!("Ask me anything about {}. Type /help for commands.", persona.subject);

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        if let Some(command) = input.strip_prefix('/') {
            let mut parts = command.splitn(2, ' ');
            let name = parts.next().unwrap_or_default();
            let argument = parts.next().unwrap_or_default().trim();

            match name {
                "quit" | "exit" => break,
                "help" => print_help(),
                "personas" => print_personas(),
                "reset" => {
                    session.reset();
                    println!("Conversation reset.");
                }
                "tutor" => {
                    if session.set_persona(argument) {
                        let persona = session.active_persona();
                        println!("Now chatting with {} {}.", persona.icon, persona.name);
                    } else {
                        println!("Unknown tutor '{argument}'. See /personas.");
                    }
                }
                "save" => {
                    if session.messages().is_empty() {
                        println!("Nothing to save yet.");
                        continue;
                    }
                    match save_session(&mut session, &service, &db, config.user_id.as_deref())
                        .await?
                    {
                        SaveOutcome::Saved { conversation_id } => {
                            println!("Saved \"{}\" ({conversation_id}).", session.title());
                        }
                        SaveOutcome::NotSignedIn => println!("{SIGN_IN_PROMPT}"),
                    }
                }
                "load" => {
                    let Ok(id) = argument.parse::<Uuid>() else {
                        println!("Usage: /load <conversation id>");
                        continue;
                    };
                    match load_session(&mut session, &db, config.user_id.as_deref(), id)? {
                        LoadOutcome::Loaded => {
                            println!(
                                "Loaded \"{}\" ({} messages).",
                                session.title(),
                                session.messages().len()
                            );
                        }
                        LoadOutcome::NotFound => println!("No saved conversation with that id."),
                        LoadOutcome::NotSignedIn => println!("{SIGN_IN_PROMPT}"),
                    }
                }
                other => {
                    if let Some(prompt) = find_quick_action(other) {
                        submit_turn(&mut session, &service, prompt, no_stream).await;
                    } else {
                        println!("Unknown command /{other}. Type /help.");
                    }
                }
            }
            continue;
        }

        submit_turn(&mut session, &service, input, no_stream).await;
    }

    Ok(())
}

async fn submit_turn(
    session: &mut TutorSession,
    service: &claritutor_ai::TutorService,
    text: &str,
    no_stream: bool,
) {
    let persona = session.active_persona();
    print!("{} ", persona.icon);
    std::io::stdout().flush().ok();

    let mut print_chunk = |chunk: &str| {
        print!("{chunk}");
        std::io::stdout().flush().ok();
    };

    let result = run_turn(session, service, text, !no_stream, Some(&mut print_chunk)).await;

    match result {
        Ok(true) => {
            if no_stream {
                if let Some(reply) = session.messages().last() {
                    print!("{}", reply.content);
                }
            }
            println!();
            if session.state() == SessionState::Settled && session.needs_clarification() {
                println!("It seems you might need clarification. Try these:");
                for action in QUICK_ACTIONS {
                    println!(
                        "  /{:<10} {}",
                        quick_action_command(action.label),
                        truncate_str(action.prompt, 60)
                    );
                }
            }
        }
        Ok(false) => println!("(still thinking, hold on)"),
        Err(e) => {
            println!();
            log::debug!("Generation failed: {e}");
            println!("Failed to get response. Please try again.");
            if matches!(e, GenerationError::MissingApiKey { .. } | GenerationError::Disabled) {
                println!("Hint: {e}. See `claritutor config`.");
            }
        }
    }
}
