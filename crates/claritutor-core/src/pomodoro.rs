//! Productivity timer state machine.
//!
//! Independent of the tutoring flow: phases cycle Work -> Break (or
//! LongBreak every N completed work sessions) -> Work. Completed work
//! phases may be logged for a signed-in user; logging is best-effort and
//! never blocks the timer.

use claritutor_storage::models::{Achievement, BadgeTier, StudySessionLog};
use claritutor_storage::Database;

/// Timer phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Work,
    Break,
    LongBreak,
}

impl Phase {
    /// Get human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Break => "Break",
            Self::LongBreak => "Long break",
        }
    }

    /// Whether this phase counts as focused work
    #[must_use]
    pub const fn is_work(self) -> bool {
        matches!(self, Self::Work)
    }
}

/// Timer durations and behavior
#[derive(Debug, Clone)]
pub struct PomodoroSettings {
    pub work_minutes: u32,
    pub break_minutes: u32,
    pub long_break_minutes: u32,
    pub sessions_until_long_break: u32,
    /// Start the next phase running as soon as one completes
    pub auto_continue: bool,
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            break_minutes: 5,
            long_break_minutes: 15,
            sessions_until_long_break: 4,
            auto_continue: true,
        }
    }
}

/// A completed work phase, ready to be logged
#[derive(Debug, Clone, Copy)]
pub struct CompletedWork {
    pub duration_seconds: u32,
    /// 1-based count of work sessions completed so far
    pub session_number: u32,
}

/// Outcome of a phase completion
#[derive(Debug, Clone, Copy)]
pub struct PhaseCompletion {
    pub finished: Phase,
    pub next: Phase,
    /// Present when a work phase finished
    pub work: Option<CompletedWork>,
}

/// Pomodoro countdown state machine
pub struct PomodoroTimer {
    settings: PomodoroSettings,
    phase: Phase,
    running: bool,
    remaining_seconds: u32,
    completed_work_sessions: u32,
}

impl PomodoroTimer {
    #[must_use]
    pub fn new(settings: PomodoroSettings) -> Self {
        let remaining = settings.work_minutes * 60;
        Self {
            settings,
            phase: Phase::Work,
            running: false,
            remaining_seconds: remaining,
            completed_work_sessions: 0,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    #[must_use]
    pub fn completed_work_sessions(&self) -> u32 {
        self.completed_work_sessions
    }

    #[must_use]
    pub fn settings(&self) -> &PomodoroSettings {
        &self.settings
    }

    /// Configured duration of a phase, in seconds
    #[must_use]
    pub fn duration_of(&self, phase: Phase) -> u32 {
        let minutes = match phase {
            Phase::Work => self.settings.work_minutes,
            Phase::Break => self.settings.break_minutes,
            Phase::LongBreak => self.settings.long_break_minutes,
        };
        minutes * 60
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn toggle(&mut self) {
        self.running = !self.running;
    }

    /// Jump to a phase manually, restarting its countdown
    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.remaining_seconds = self.duration_of(phase);
    }

    /// Stop and return to a fresh Work phase. The completed-session counter
    /// is kept.
    pub fn reset(&mut self) {
        self.running = false;
        self.set_phase(Phase::Work);
    }

    /// Advance the countdown by `elapsed_seconds`. Returns the completion
    /// when the current phase finishes.
    pub fn tick(&mut self, elapsed_seconds: u32) -> Option<PhaseCompletion> {
        if !self.running {
            return None;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(elapsed_seconds);
        if self.remaining_seconds > 0 {
            return None;
        }
        Some(self.complete_phase())
    }

    /// Complete the current phase and transition to the next one
    pub fn complete_phase(&mut self) -> PhaseCompletion {
        let finished = self.phase;
        let mut work = None;

        let next = if finished.is_work() {
            self.completed_work_sessions += 1;
            work = Some(CompletedWork {
                duration_seconds: self.duration_of(Phase::Work),
                session_number: self.completed_work_sessions,
            });
            if self.completed_work_sessions % self.settings.sessions_until_long_break == 0 {
                Phase::LongBreak
            } else {
                Phase::Break
            }
        } else {
            Phase::Work
        };

        self.phase = next;
        self.remaining_seconds = self.duration_of(next);
        self.running = self.settings.auto_continue;

        PhaseCompletion {
            finished,
            next,
            work,
        }
    }
}

// ============================================================================
// Best-effort session logging
// ============================================================================

/// Milestones that earn a "focused-sessions" badge
const SESSION_MILESTONES: [(u32, BadgeTier); 3] = [
    (1, BadgeTier::Bronze),
    (10, BadgeTier::Silver),
    (50, BadgeTier::Gold),
];

/// Log a completed work phase for a signed-in user. Failures are swallowed
/// to diagnostics; the timer is never blocked by persistence.
pub fn log_completed_work(
    db: &Database,
    user_id: &str,
    work: CompletedWork,
    focus_rating: u8,
    subject: Option<String>,
    notes: Option<String>,
) {
    let mut log = StudySessionLog::new(user_id.to_string(), work.duration_seconds, focus_rating);
    log.subject = subject;
    log.notes = notes;

    if let Err(e) = db.insert_study_session(&log) {
        log::warn!("Failed to log study session: {e}");
        return;
    }

    if let Err(e) = db.add_study_hours(user_id, f64::from(work.duration_seconds) / 3600.0) {
        log::warn!("Failed to update study hours: {e}");
    }

    award_session_milestones(db, user_id);
}

fn award_session_milestones(db: &Database, user_id: &str) {
    let count = match db.count_study_sessions(user_id) {
        Ok(count) => count,
        Err(e) => {
            log::warn!("Failed to count study sessions: {e}");
            return;
        }
    };

    for (threshold, tier) in SESSION_MILESTONES {
        if count >= threshold {
            let badge = Achievement::new(
                user_id.to_string(),
                "focused-sessions".to_string(),
                tier,
            );
            if let Err(e) = db.award_achievement(&badge) {
                log::warn!("Failed to award achievement: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fourth_work_completion_is_long_break() {
        let mut timer = PomodoroTimer::new(PomodoroSettings::default());

        for expected_session in 1..=3 {
            let completion = timer.complete_phase();
            assert_eq!(completion.next, Phase::Break);
            assert_eq!(
                completion.work.unwrap().session_number,
                expected_session
            );
            // Finish the break to get back to work
            assert_eq!(timer.complete_phase().next, Phase::Work);
        }

        let fourth = timer.complete_phase();
        assert_eq!(fourth.next, Phase::LongBreak);
        assert_eq!(timer.completed_work_sessions(), 4);
    }

    #[test]
    fn test_break_always_returns_to_work() {
        let mut timer = PomodoroTimer::new(PomodoroSettings::default());
        timer.set_phase(Phase::LongBreak);
        let completion = timer.complete_phase();
        assert_eq!(completion.finished, Phase::LongBreak);
        assert_eq!(completion.next, Phase::Work);
        assert!(completion.work.is_none());
    }

    #[test]
    fn test_auto_continue_controls_running_state() {
        let mut auto = PomodoroTimer::new(PomodoroSettings::default());
        auto.start();
        auto.complete_phase();
        assert!(auto.is_running());

        let mut manual = PomodoroTimer::new(PomodoroSettings {
            auto_continue: false,
            ..PomodoroSettings::default()
        });
        manual.start();
        manual.complete_phase();
        assert!(!manual.is_running());
    }

    #[test]
    fn test_tick_counts_down_and_completes() {
        let mut timer = PomodoroTimer::new(PomodoroSettings {
            work_minutes: 1,
            ..PomodoroSettings::default()
        });

        // Paused timers do not advance
        assert!(timer.tick(10).is_none());
        assert_eq!(timer.remaining_seconds(), 60);

        timer.start();
        assert!(timer.tick(30).is_none());
        assert_eq!(timer.remaining_seconds(), 30);

        let completion = timer.tick(30).unwrap();
        assert_eq!(completion.finished, Phase::Work);
        assert_eq!(timer.phase(), Phase::Break);
    }

    #[test]
    fn test_reset_keeps_session_counter() {
        let mut timer = PomodoroTimer::new(PomodoroSettings::default());
        timer.complete_phase();
        timer.reset();
        assert_eq!(timer.phase(), Phase::Work);
        assert!(!timer.is_running());
        assert_eq!(timer.completed_work_sessions(), 1);
    }

    #[test]
    fn test_logging_awards_milestones() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(Some(dir.path().join("test.db"))).unwrap();

        let work = CompletedWork {
            duration_seconds: 1500,
            session_number: 1,
        };
        log_completed_work(&db, "user-1", work, 8, Some("Mathematics".to_string()), None);

        assert_eq!(db.count_study_sessions("user-1").unwrap(), 1);
        let achievements = db.list_achievements("user-1").unwrap();
        assert_eq!(achievements.len(), 1);
        assert_eq!(achievements[0].badge_tier, BadgeTier::Bronze);
        assert_eq!(achievements[0].badge_type, "focused-sessions");
    }
}
