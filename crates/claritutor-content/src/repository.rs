//! Repository seam for content access, so callers can substitute fakes.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{ContentKind, ContentObject};

/// Content fetch failure. Not-found is never an error: the repository
/// operations return empty/absent results for missing objects.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("content API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("content request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to decode content response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Read-only access to the content store
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Fetch all objects of a kind. Empty when the kind has no objects.
    ///
    /// # Errors
    ///
    /// Returns an error on any failure other than not-found
    async fn find(&self, kind: ContentKind) -> Result<Vec<ContentObject>, ContentError>;

    /// Fetch a single object by slug. `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error on any failure other than not-found
    async fn find_one(
        &self,
        kind: ContentKind,
        slug: &str,
    ) -> Result<Option<ContentObject>, ContentError>;

    /// Fetch the study projects owned by a student
    ///
    /// # Errors
    ///
    /// Returns an error on any failure other than not-found
    async fn find_projects_by_student(
        &self,
        student_id: &str,
    ) -> Result<Vec<ContentObject>, ContentError>;
}
