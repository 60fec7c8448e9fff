mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use claritutor_core::config::RuntimeConfig;

#[derive(Parser)]
#[command(name = "claritutor")]
#[command(about = "AI study tutor and productivity companion", long_about = None)]
struct Cli {
    /// Signed-in user id (overrides CLARITUTOR_USER)
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start an interactive tutoring session
    Chat {
        /// Tutor persona id (see `claritutor personas`)
        #[arg(short, long)]
        tutor: Option<String>,
        /// Wait for complete replies instead of streaming them
        #[arg(long)]
        no_stream: bool,
    },
    /// List available tutor personas
    Personas,
    /// Browse study content
    Content {
        #[command(subcommand)]
        action: commands::content::ContentAction,
    },
    /// Manage saved conversations
    Conversations {
        #[command(subcommand)]
        action: commands::conversations::ConversationAction,
    },
    /// Run the focus timer
    Pomodoro {
        /// Work phase length in minutes
        #[arg(long, default_value_t = 25)]
        work: u32,
        /// Break length in minutes
        #[arg(long, default_value_t = 5)]
        break_minutes: u32,
        /// Long break length in minutes
        #[arg(long, default_value_t = 15)]
        long_break: u32,
        /// Work sessions before a long break
        #[arg(long, default_value_t = 4)]
        sessions: u32,
        /// Start each next phase paused
        #[arg(long)]
        manual: bool,
        /// Subject to attribute logged sessions to
        #[arg(short, long)]
        subject: Option<String>,
    },
    /// Get study recommendations
    Recommend,
    /// Generate practice problems
    Practice {
        /// Subject, e.g. "Mathematics"
        subject: String,
        /// Topic within the subject, e.g. "fractions"
        topic: String,
        /// Difficulty: easy, medium, hard
        #[arg(short, long, default_value = "medium")]
        difficulty: String,
        /// Number of problems
        #[arg(short, long, default_value_t = 3)]
        count: usize,
    },
    /// Show study progress and achievements
    Stats,
    /// AI provider configuration
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = RuntimeConfig::from_env();
    if cli.user.is_some() {
        config.user_id = cli.user;
    }

    match cli.command {
        Commands::Chat { tutor, no_stream } => {
            commands::chat::run_chat(&config, tutor.as_deref(), no_stream).await
        }
        Commands::Personas => {
            commands::chat::print_personas();
            Ok(())
        }
        Commands::Content { action } => commands::content::handle_content_command(&config, action).await,
        Commands::Conversations { action } => {
            commands::conversations::handle_conversation_command(&config, action)
        }
        Commands::Pomodoro {
            work,
            break_minutes,
            long_break,
            sessions,
            manual,
            subject,
        } => {
            let settings = claritutor_core::PomodoroSettings {
                work_minutes: work,
                break_minutes,
                long_break_minutes: long_break,
                sessions_until_long_break: sessions,
                auto_continue: !manual,
            };
            commands::pomodoro::run_pomodoro(&config, settings, subject).await
        }
        Commands::Recommend => commands::study::run_recommend(&config).await,
        Commands::Practice {
            subject,
            topic,
            difficulty,
            count,
        } => commands::study::run_practice(&subject, &topic, &difficulty, count).await,
        Commands::Stats => commands::study::run_stats(&config),
        Commands::Config { action } => commands::config::handle_config_command(action),
    }
}
