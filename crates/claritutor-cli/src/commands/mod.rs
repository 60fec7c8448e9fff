pub mod chat;
pub mod config;
pub mod content;
pub mod conversations;
pub mod helpers;
pub mod pomodoro;
pub mod study;
