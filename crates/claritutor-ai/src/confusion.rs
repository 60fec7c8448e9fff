//! Lexical confusion detection over recent conversation turns.
//!
//! This is an approximate signal used to proactively offer clarification
//! actions, not a classifier. False positives are acceptable; the quick
//! actions it surfaces are available regardless.

use claritutor_storage::models::{ChatMessage, Role};

/// Substrings that indicate a student may need clarification
const CONFUSION_INDICATORS: [&str; 14] = [
    "confused",
    "don't understand",
    "what do you mean",
    "can you explain",
    "lost",
    "unclear",
    "not sure",
    "could you clarify",
    "what?",
    "how?",
    "why?",
    "doesn't make sense",
    "repeat",
    "again please",
];

/// How many trailing turns to inspect
const RECENT_WINDOW: usize = 3;

/// Check whether the recent turns suggest the student is confused.
///
/// Two signals, either of which fires: a user turn in the last three turns
/// containing a confusion indicator (case-insensitive), or the two most
/// recent user turns sharing a whitespace-delimited word (repeated,
/// unresolved questioning). Always `false` with fewer than two turns.
#[must_use]
pub fn is_confused(turns: &[ChatMessage]) -> bool {
    if turns.len() < 2 {
        return false;
    }

    let recent = &turns[turns.len().saturating_sub(RECENT_WINDOW)..];

    let has_confusion_keywords = recent.iter().any(|message| {
        message.role == Role::User && {
            let content = message.content.to_lowercase();
            CONFUSION_INDICATORS
                .iter()
                .any(|keyword| content.contains(keyword))
        }
    });
    if has_confusion_keywords {
        return true;
    }

    // Repeated questions: any word of the newest user turn appearing in the
    // one before it. Deliberately crude - common words will trigger it.
    let user_messages: Vec<String> = recent
        .iter()
        .filter(|message| message.role == Role::User)
        .map(|message| message.content.to_lowercase())
        .collect();

    if user_messages.len() >= 2 {
        let latest = &user_messages[user_messages.len() - 1];
        let previous = &user_messages[user_messages.len() - 2];
        return latest
            .split_whitespace()
            .any(|word| previous.contains(word));
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(content: &str) -> ChatMessage {
        ChatMessage::user(content)
    }

    fn assistant(content: &str) -> ChatMessage {
        ChatMessage::assistant(content)
    }

    #[test]
    fn test_fewer_than_two_turns_is_never_confused() {
        assert!(!is_confused(&[]));
        assert!(!is_confused(&[user("I don't understand anything")]));
    }

    #[test]
    fn test_keyword_in_last_user_turn() {
        let turns = vec![
            user("Explain photosynthesis"),
            assistant("Plants convert light into chemical energy."),
            user("I don't understand"),
        ];
        assert!(is_confused(&turns));
    }

    #[test]
    fn test_keyword_is_case_insensitive() {
        let turns = vec![
            user("Explain photosynthesis"),
            assistant("Plants convert light into chemical energy."),
            user("That DOESN'T MAKE SENSE to me"),
        ];
        assert!(is_confused(&turns));
    }

    #[test]
    fn test_keyword_outside_window_is_ignored() {
        let turns = vec![
            user("I'm so confused"),
            assistant("Let me break it down."),
            user("Okay tell me about derivatives"),
            assistant("A derivative measures instantaneous change."),
            user("Integrals next please"),
        ];
        assert!(!is_confused(&turns));
    }

    #[test]
    fn test_repeated_word_across_user_turns() {
        let turns = vec![
            user("explain derivatives"),
            assistant("A derivative measures instantaneous change."),
            user("derivatives again"),
        ];
        assert!(is_confused(&turns));
    }

    #[test]
    fn test_disjoint_user_turns_without_keywords() {
        let turns = vec![
            user("explain derivatives"),
            assistant("A derivative measures instantaneous change."),
            user("integrals next"),
        ];
        assert!(!is_confused(&turns));
    }

    #[test]
    fn test_assistant_keywords_do_not_count() {
        let turns = vec![
            user("explain derivatives"),
            assistant("Many students say they are confused at first."),
        ];
        assert!(!is_confused(&turns));
    }
}
