//! Study recommendations, practice problems, and progress stats.

use anyhow::Result;
use tabled::{Table, Tabled};

use claritutor_ai::{Difficulty, SubjectScore};
use claritutor_core::config::RuntimeConfig;

use super::helpers::{format_duration, open_database, tutor_service, SIGN_IN_PROMPT};

/// Generate study recommendations from the profile and recent sessions
pub async fn run_recommend(config: &RuntimeConfig) -> Result<()> {
    let Some(user_id) = config.user_id.as_deref() else {
        println!("{SIGN_IN_PROMPT}");
        return Ok(());
    };
    let db = open_database()?;
    let service = tutor_service(&db)?;

    let topics = match db.get_profile(user_id)? {
        Some(profile) if !profile.primary_subjects.is_empty() => profile.primary_subjects,
        _ => db
            .study_time_by_subject(user_id)?
            .into_iter()
            .map(|(subject, _)| subject)
            .take(3)
            .collect(),
    };
    let topics = if topics.is_empty() {
        vec!["General Studies".to_string()]
    } else {
        topics
    };

    // Recent focus ratings stand in for performance scores
    let recent = db.get_recent_study_sessions(user_id, 20)?;
    let performance = if recent.is_empty() {
        75.0
    } else {
        let total: u32 = recent.iter().map(|s| u32::from(s.focus_rating)).sum();
        #[allow(clippy::cast_precision_loss)]
        let average = f64::from(total) / recent.len() as f64;
        average * 10.0
    };

    let history: Vec<SubjectScore> = recent
        .iter()
        .filter_map(|session| {
            session.subject.as_ref().map(|subject| SubjectScore {
                subject: subject.clone(),
                score: f64::from(session.focus_rating) * 10.0,
            })
        })
        .take(5)
        .collect();

    let recommendations = service
        .recommendations_for(&topics, performance, &history)
        .await;

    println!("Study recommendations:");
    for (index, recommendation) in recommendations.iter().enumerate() {
        println!("  {}. {recommendation}", index + 1);
    }
    Ok(())
}

/// Generate practice problems
pub async fn run_practice(subject: &str, topic: &str, difficulty: &str, count: usize) -> Result<()> {
    let db = open_database()?;
    let service = tutor_service(&db)?;

    let difficulty: Difficulty = difficulty.parse().map_err(anyhow::Error::msg)?;
    let problems = service
        .practice_problems_for(subject, topic, difficulty, count)
        .await;

    println!("{subject} practice - {topic} ({difficulty}):");
    for (index, problem) in problems.iter().enumerate() {
        println!("  {}. {problem}", index + 1);
    }
    Ok(())
}

#[derive(Tabled)]
struct SubjectRow {
    #[tabled(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Time")]
    time: String,
}

#[derive(Tabled)]
struct BadgeRow {
    #[tabled(rename = "Badge")]
    badge: String,
    #[tabled(rename = "Tier")]
    tier: String,
    #[tabled(rename = "Earned")]
    earned: String,
}

/// Show study progress and achievements
pub fn run_stats(config: &RuntimeConfig) -> Result<()> {
    let Some(user_id) = config.user_id.as_deref() else {
        println!("{SIGN_IN_PROMPT}");
        return Ok(());
    };
    let db = open_database()?;

    let session_count = db.count_study_sessions(user_id)?;
    let total_seconds = db.total_study_seconds(user_id)?;
    println!(
        "Logged focus sessions: {session_count} ({} total)",
        format_duration(total_seconds)
    );

    let by_subject = db.study_time_by_subject(user_id)?;
    if !by_subject.is_empty() {
        let rows: Vec<SubjectRow> = by_subject
            .into_iter()
            .map(|(subject, seconds)| SubjectRow {
                subject,
                time: format_duration(seconds),
            })
            .collect();
        println!("{}", Table::new(rows));
    }

    let achievements = db.list_achievements(user_id)?;
    if achievements.is_empty() {
        println!("No badges earned yet. Complete focus sessions to earn them.");
    } else {
        let rows: Vec<BadgeRow> = achievements
            .iter()
            .map(|badge| BadgeRow {
                badge: badge.badge_type.clone(),
                tier: badge.badge_tier.to_string(),
                earned: badge.earned_at.format("%Y-%m-%d").to_string(),
            })
            .collect();
        println!("{}", Table::new(rows));
    }

    Ok(())
}
