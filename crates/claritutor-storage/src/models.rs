use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a chat turn
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            _ => Err(format!("Unknown message role: {s}")),
        }
    }
}

/// One turn in a tutoring conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    #[must_use]
    pub fn new(role: Role, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content,
            timestamp: Utc::now(),
        }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content.into())
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content.into())
    }
}

/// Saved tutoring conversation header - message rows are stored separately
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedConversation {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub subject: String,
    pub persona_id: String,
    pub is_favorite: bool,
    pub tags: Vec<String>,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SavedConversation {
    #[must_use]
    pub fn new(user_id: String, title: String, subject: String, persona_id: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            subject,
            persona_id,
            is_favorite: false,
            tags: Vec::new(),
            summary: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Completed focus session logged from the productivity timer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudySessionLog {
    pub id: Uuid,
    pub user_id: String,
    pub duration_seconds: u32,
    pub session_type: String,
    /// Self-reported focus quality, 1-10
    pub focus_rating: u8,
    pub subject: Option<String>,
    pub notes: Option<String>,
    pub completed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl StudySessionLog {
    #[must_use]
    pub fn new(user_id: String, duration_seconds: u32, focus_rating: u8) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            duration_seconds,
            session_type: "pomodoro".to_string(),
            focus_rating: focus_rating.clamp(1, 10),
            subject: None,
            notes: None,
            completed_at: now,
            created_at: now,
        }
    }
}

/// Achievement badge tier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl std::fmt::Display for BadgeTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bronze => write!(f, "bronze"),
            Self::Silver => write!(f, "silver"),
            Self::Gold => write!(f, "gold"),
            Self::Platinum => write!(f, "platinum"),
        }
    }
}

impl std::str::FromStr for BadgeTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bronze" => Ok(Self::Bronze),
            "silver" => Ok(Self::Silver),
            "gold" => Ok(Self::Gold),
            "platinum" => Ok(Self::Platinum),
            _ => Err(format!("Unknown badge tier: {s}")),
        }
    }
}

/// Earned achievement badge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub id: Uuid,
    pub user_id: String,
    pub badge_type: String,
    pub badge_tier: BadgeTier,
    pub earned_at: DateTime<Utc>,
    pub progress_data: Option<serde_json::Value>,
}

impl Achievement {
    #[must_use]
    pub fn new(user_id: String, badge_type: String, badge_tier: BadgeTier) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            badge_type,
            badge_tier,
            earned_at: Utc::now(),
            progress_data: None,
        }
    }
}

/// Student profile and preference record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: String,
    pub full_name: String,
    pub email: String,
    pub education_level: Option<String>,
    pub primary_subjects: Vec<String>,
    pub learning_style: Option<String>,
    pub study_goals: Option<String>,
    pub total_study_hours: f64,
    pub documents_uploaded: u32,
    pub notes_created: u32,
    pub learning_streak_days: u32,
    pub account_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    #[must_use]
    pub fn new(user_id: String, full_name: String, email: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            full_name,
            email,
            education_level: None,
            primary_subjects: Vec::new(),
            learning_style: None,
            study_goals: None,
            total_study_hours: 0.0,
            documents_uploaded: 0,
            notes_created: 0,
            learning_streak_days: 0,
            account_type: "free".to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

// ============================================================================
// Student Level
// ============================================================================

/// Estimated proficiency level, derived from content-complexity analysis
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StudentLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl StudentLevel {
    /// Get human-readable label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl std::fmt::Display for StudentLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for StudentLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(format!(
                "Unknown student level: {s}. Use: beginner, intermediate, advanced"
            )),
        }
    }
}

// ============================================================================
// AI Provider Configuration
// ============================================================================

/// Supported AI chat providers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    OpenAi,
    Anthropic,
    Google,
    Ollama,
}

impl AiProvider {
    /// Parse a provider name, `None` if unrecognized
    #[must_use]
    pub fn parse_provider(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Some(Self::OpenAi),
            "anthropic" => Some(Self::Anthropic),
            "google" => Some(Self::Google),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }

    /// Default chat model for this provider
    #[must_use]
    pub fn default_model(self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-4-turbo-preview",
            Self::Anthropic => "claude-3-5-sonnet-latest",
            Self::Google => "gemini-1.5-flash",
            Self::Ollama => "llama3.1",
        }
    }

    /// Default API base URL for this provider
    #[must_use]
    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1",
            Self::Anthropic => "https://api.anthropic.com/v1",
            Self::Google => "https://generativelanguage.googleapis.com/v1beta",
            Self::Ollama => "http://localhost:11434",
        }
    }

    /// Environment variable consulted when no API key is configured
    #[must_use]
    pub fn api_key_env(self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::Google => "GOOGLE_API_KEY",
            Self::Ollama => "OLLAMA_API_KEY",
        }
    }
}

impl std::fmt::Display for AiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenAi => write!(f, "openai"),
            Self::Anthropic => write!(f, "anthropic"),
            Self::Google => write!(f, "google"),
            Self::Ollama => write!(f, "ollama"),
        }
    }
}

/// AI provider configuration, persisted as a single row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    pub provider: AiProvider,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub enabled: bool,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: AiProvider::default(),
            model: None,
            api_key: None,
            base_url: None,
            enabled: true,
        }
    }
}

impl AiConfig {
    /// Model to use: configured value or the provider default
    #[must_use]
    pub fn effective_model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    /// API key: configured value or the provider's environment variable
    #[must_use]
    pub fn effective_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(self.provider.api_key_env()).ok())
    }

    /// Base URL: configured value or the provider default
    #[must_use]
    pub fn effective_base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| self.provider.default_base_url().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::User, Role::Assistant] {
            let parsed: Role = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
        assert!("system".parse::<Role>().is_err());
    }

    #[test]
    fn test_student_level_defaults_to_intermediate() {
        assert_eq!(StudentLevel::default(), StudentLevel::Intermediate);
        assert!("expert".parse::<StudentLevel>().is_err());
    }

    #[test]
    fn test_focus_rating_clamped() {
        let log = StudySessionLog::new("u1".to_string(), 1500, 14);
        assert_eq!(log.focus_rating, 10);
        let log = StudySessionLog::new("u1".to_string(), 1500, 0);
        assert_eq!(log.focus_rating, 1);
    }

    #[test]
    fn test_ai_config_effective_values() {
        let config = AiConfig {
            provider: AiProvider::Ollama,
            model: Some("mistral".to_string()),
            api_key: None,
            base_url: None,
            enabled: true,
        };
        assert_eq!(config.effective_model(), "mistral");
        assert_eq!(config.effective_base_url(), "http://localhost:11434");
    }
}
