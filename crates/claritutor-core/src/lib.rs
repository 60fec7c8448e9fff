pub mod config;
pub mod pomodoro;
pub mod session;

pub use pomodoro::{
    log_completed_work, CompletedWork, Phase, PhaseCompletion, PomodoroSettings, PomodoroTimer,
};
pub use session::{
    load_session, run_turn, save_session, LoadOutcome, PendingTurn, QuickAction, SaveOutcome,
    SessionState, TutorSession, QUICK_ACTIONS,
};
