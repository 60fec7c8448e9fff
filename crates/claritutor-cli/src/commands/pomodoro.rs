//! Focus timer command.

use std::io::{BufRead, Write};
use std::time::Duration;

use anyhow::Result;

use claritutor_core::config::RuntimeConfig;
use claritutor_core::{log_completed_work, Phase, PomodoroSettings, PomodoroTimer};

use super::helpers::open_database;

fn format_clock(total_seconds: u32) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

fn read_focus_rating() -> u8 {
    print!("How focused were you? (1-10, enter to skip): ");
    std::io::stdout().flush().ok();

    let mut line = String::new();
    if std::io::stdin().lock().read_line(&mut line).is_err() {
        return 5;
    }
    line.trim().parse::<u8>().map_or(5, |r| r.clamp(1, 10))
}

fn read_notes() -> Option<String> {
    print!("Notes for this session (enter to skip): ");
    std::io::stdout().flush().ok();

    let mut line = String::new();
    if std::io::stdin().lock().read_line(&mut line).is_err() {
        return None;
    }
    let trimmed = line.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Run the focus timer until interrupted
pub async fn run_pomodoro(
    config: &RuntimeConfig,
    settings: PomodoroSettings,
    subject: Option<String>,
) -> Result<()> {
    let db = open_database()?;
    let mut timer = PomodoroTimer::new(settings);
    timer.start();

    if config.user_id.is_none() {
        println!("Not signed in: completed sessions will not be logged.");
    }
    println!(
        "Focus timer started: {} work / {} break / {} long break, long break every {} sessions.",
        timer.settings().work_minutes,
        timer.settings().break_minutes,
        timer.settings().long_break_minutes,
        timer.settings().sessions_until_long_break
    );
    println!("Press Ctrl-C to stop.\n");

    let mut interval = tokio::time::interval(Duration::from_secs(1));
    loop {
        interval.tick().await;

        let Some(completion) = timer.tick(1) else {
            print!(
                "\r{} {}  (session {})   ",
                timer.phase().label(),
                format_clock(timer.remaining_seconds()),
                timer.completed_work_sessions() + u32::from(timer.phase().is_work())
            );
            std::io::stdout().flush().ok();
            continue;
        };

        println!();
        match completion.next {
            Phase::LongBreak => println!("Time for a long break! Great work!"),
            Phase::Break => println!("Work session complete! Take a break."),
            Phase::Work => println!("Break finished! Ready to focus?"),
        }

        if let Some(work) = completion.work {
            if let Some(user_id) = config.user_id.as_deref() {
                let rating = read_focus_rating();
                let notes = read_notes();
                // Best-effort: the timer keeps going whatever happens here
                log_completed_work(&db, user_id, work, rating, subject.clone(), notes);
            }
        }

        if !timer.is_running() {
            print!("Start the next phase? (enter to continue): ");
            std::io::stdout().flush().ok();
            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line).ok();
            timer.start();
        }
    }
}
