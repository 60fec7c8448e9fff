//! Study content browsing commands.

use anyhow::{bail, Result};
use clap::Subcommand;
use tabled::{Table, Tabled};

use claritutor_content::{
    ContentClient, ContentKind, ContentMetadata, ContentObject, ContentRepository,
};
use claritutor_core::config::RuntimeConfig;

use super::helpers::truncate_str;

#[derive(Subcommand, Debug)]
pub enum ContentAction {
    /// List content of a kind
    List {
        /// Content kind: students, materials, notes, sessions, projects
        kind: String,
    },
    /// Show one content object
    Show {
        /// Content kind: students, materials, notes, sessions, projects
        kind: String,
        /// Object slug
        slug: String,
    },
}

#[derive(Tabled)]
struct ContentRow {
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Slug")]
    slug: String,
    #[tabled(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Modified")]
    modified: String,
}

fn content_client(config: &RuntimeConfig) -> Result<ContentClient> {
    let Some(bucket) = config.content_bucket.as_deref() else {
        bail!("Content access is not configured. Set CLARITUTOR_BUCKET and CLARITUTOR_READ_KEY.");
    };
    let Some(read_key) = config.content_read_key.as_deref() else {
        bail!("Content access is not configured. Set CLARITUTOR_BUCKET and CLARITUTOR_READ_KEY.");
    };
    Ok(ContentClient::new(&config.content_api_url, bucket, read_key)?)
}

/// Handle content commands
pub async fn handle_content_command(config: &RuntimeConfig, action: ContentAction) -> Result<()> {
    let client = content_client(config)?;

    match action {
        ContentAction::List { kind } => {
            let kind: ContentKind = kind.parse().map_err(anyhow::Error::msg)?;
            let objects = client.find(kind).await?;
            if objects.is_empty() {
                println!("No {kind} found.");
                return Ok(());
            }

            let rows: Vec<ContentRow> = objects
                .iter()
                .map(|object| ContentRow {
                    title: truncate_str(&object.title, 40),
                    slug: object.slug.clone(),
                    subject: object.metadata.subject().unwrap_or("-").to_string(),
                    modified: object.modified_at.format("%Y-%m-%d").to_string(),
                })
                .collect();
            println!("{}", Table::new(rows));
        }
        ContentAction::Show { kind, slug } => {
            let kind: ContentKind = kind.parse().map_err(anyhow::Error::msg)?;
            match client.find_one(kind, &slug).await? {
                Some(object) => {
                    print_object(&object);
                    if kind == ContentKind::StudentProfiles {
                        let projects = client.find_projects_by_student(&object.id).await?;
                        if !projects.is_empty() {
                            println!("  projects:");
                            for project in projects {
                                println!("    - {} ({})", project.title, project.slug);
                            }
                        }
                    }
                }
                None => println!("Not found: no {kind} object with slug '{slug}'."),
            }
        }
    }

    Ok(())
}

fn print_object(object: &ContentObject) {
    println!("{}", object.title);
    println!("  slug: {}", object.slug);
    println!("  modified: {}", object.modified_at.format("%Y-%m-%d %H:%M"));

    match &object.metadata {
        ContentMetadata::Student(student) => {
            println!("  name: {}", student.full_name);
            if let Some(level) = &student.education_level {
                println!("  education: {}", level.value);
            }
            if let Some(subjects) = &student.primary_subjects {
                println!("  subjects: {subjects}");
            }
            if let Some(goals) = &student.study_goals {
                println!("  goals: {goals}");
            }
            if let Some(hours) = student.total_study_hours {
                println!("  study hours: {hours}");
            }
            if let Some(streak) = student.learning_streak_days {
                println!("  streak: {streak} days");
            }
        }
        ContentMetadata::Material(material) => {
            if let Some(kind) = &material.document_type {
                println!("  type: {}", kind.value);
            }
            if let Some(subject) = &material.subject {
                println!("  subject: {subject}");
            }
            if let Some(level) = &material.difficulty_level {
                println!("  difficulty: {}", level.value);
            }
            if !material.key_concepts.is_empty() {
                println!("  key concepts: {}", material.key_concepts.join(", "));
            }
            if let Some(content) = &material.extracted_content {
                println!("\n{}", truncate_str(content, 600));
            }
        }
        ContentMetadata::Note(note) => {
            if let Some(subject) = &note.subject {
                println!("  subject: {subject}");
            }
            if note.ai_generated == Some(true) {
                println!("  ai generated: yes");
            }
            if !note.key_takeaways.is_empty() {
                println!("  key takeaways:");
                for takeaway in &note.key_takeaways {
                    println!("    - {takeaway}");
                }
            }
            if !note.study_questions.is_empty() {
                println!("  study questions:");
                for question in &note.study_questions {
                    println!("    - {question}");
                }
            }
            if let Some(content) = &note.content {
                println!("\n{}", truncate_str(content, 600));
            }
        }
        ContentMetadata::Session(session) => {
            if let Some(kind) = &session.session_type {
                println!("  type: {}", kind.value);
            }
            if let Some(minutes) = session.duration_minutes {
                println!("  duration: {minutes} minutes");
            }
            if let Some(questions) = session.questions_asked {
                println!("  questions asked: {questions}");
            }
            if let Some(score) = session.comprehension_score {
                println!("  comprehension: {score}%");
            }
            if let Some(insights) = &session.key_insights {
                println!("  insights: {insights}");
            }
            if !session.conversation_history.is_empty() {
                println!("  transcript:");
                for entry in &session.conversation_history {
                    println!("    [{}] {}", entry.entry_type, truncate_str(&entry.message, 80));
                }
            }
        }
        ContentMetadata::Project(project) => {
            if let Some(description) = &project.description {
                println!("  description: {description}");
            }
            if let Some(status) = &project.project_status {
                println!("  status: {}", status.value);
            }
            if let Some(progress) = project.progress_percentage {
                println!("  progress: {progress}%");
            }
            if let Some(target) = &project.target_date {
                println!("  target date: {target}");
            }
            if !project.learning_goals.is_empty() {
                println!("  learning goals:");
                for goal in &project.learning_goals {
                    println!("    - {goal}");
                }
            }
        }
    }
}
