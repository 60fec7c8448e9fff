/// Runtime configuration read from the environment.
///
/// The signed-in user is optional: every persistence operation degrades to
/// "not saved" without one.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Identity of the signed-in student, if any
    pub user_id: Option<String>,
    /// Content API root
    pub content_api_url: String,
    /// Content bucket slug
    pub content_bucket: Option<String>,
    /// Read-only content API key
    pub content_read_key: Option<String>,
}

const DEFAULT_CONTENT_API_URL: &str = "https://api.cosmicjs.com/v3";

impl RuntimeConfig {
    /// Read configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            user_id: std::env::var("CLARITUTOR_USER").ok().filter(|s| !s.is_empty()),
            content_api_url: std::env::var("CLARITUTOR_CONTENT_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_CONTENT_API_URL.to_string()),
            content_bucket: std::env::var("CLARITUTOR_BUCKET").ok().filter(|s| !s.is_empty()),
            content_read_key: std::env::var("CLARITUTOR_READ_KEY")
                .ok()
                .filter(|s| !s.is_empty()),
        }
    }
}
