//! HTTP client for the headless CMS object store.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::repository::{ContentError, ContentRepository};
use crate::types::{ContentKind, ContentMetadata, ContentObject};

/// Minimum interval between CMS requests
const RATE_LIMIT_INTERVAL_MS: u64 = 200;

/// Request timeout for CMS calls
const REQUEST_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Rate Limiter
// ============================================================================

/// Simple rate limiter for the CMS API
struct RateLimiter {
    last_request: Mutex<Instant>,
    interval: Duration,
}

impl RateLimiter {
    fn new(interval_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(
                Instant::now()
                    .checked_sub(Duration::from_millis(interval_ms))
                    .unwrap_or_else(Instant::now),
            ),
            interval: Duration::from_millis(interval_ms),
        }
    }

    async fn wait(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();
        if elapsed < self.interval {
            tokio::time::sleep(self.interval - elapsed).await;
        }
        *last = Instant::now();
    }
}

// ============================================================================
// Content Client
// ============================================================================

/// Wire shape of a content object before metadata typing
#[derive(Debug, Deserialize)]
struct RawObject {
    id: String,
    slug: String,
    title: String,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
    #[serde(default)]
    metadata: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ObjectListResponse {
    #[serde(default)]
    objects: Vec<RawObject>,
}

#[derive(Debug, Deserialize)]
struct SingleObjectResponse {
    object: RawObject,
}

/// CMS API client
pub struct ContentClient {
    base_url: String,
    bucket: String,
    read_key: String,
    client: reqwest::Client,
    rate_limiter: Arc<RateLimiter>,
}

impl ContentClient {
    /// Create a new content client
    ///
    /// # Arguments
    /// * `base_url` - API root, e.g. `https://api.cosmicjs.com/v3`
    /// * `bucket` - bucket slug identifying the content store
    /// * `read_key` - read-only API key
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn new(base_url: &str, bucket: &str, read_key: &str) -> Result<Self, ContentError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
            read_key: read_key.to_string(),
            client,
            rate_limiter: Arc::new(RateLimiter::new(RATE_LIMIT_INTERVAL_MS)),
        })
    }

    fn objects_url(&self) -> String {
        format!("{}/buckets/{}/objects", self.base_url, self.bucket)
    }

    /// Make a rate-limited GET request. A 404 maps to `Ok(None)`; any other
    /// non-success status is a `ContentError::Api`.
    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<T>, ContentError> {
        self.rate_limiter.wait().await;

        log::debug!("GET {url}");

        let response = self
            .client
            .get(url)
            .query(&[("read_key", self.read_key.as_str())])
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ContentError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed = response.json().await?;
        Ok(Some(parsed))
    }

    /// Convert a wire object into a typed `ContentObject`, or `None` when
    /// its metadata does not decode for the requested kind.
    fn convert_object(kind: ContentKind, raw: RawObject) -> Option<ContentObject> {
        match ContentMetadata::from_value(kind, raw.metadata) {
            Ok(metadata) => Some(ContentObject {
                id: raw.id,
                slug: raw.slug,
                title: raw.title,
                kind,
                created_at: raw.created_at,
                modified_at: raw.modified_at,
                metadata,
            }),
            Err(e) => {
                log::warn!("Skipping malformed {kind} object: {e}");
                None
            }
        }
    }

    async fn find_with_query(
        &self,
        kind: ContentKind,
        extra_query: &[(&str, &str)],
    ) -> Result<Vec<ContentObject>, ContentError> {
        let mut query = vec![("type", kind.api_name())];
        query.extend_from_slice(extra_query);

        let response: Option<ObjectListResponse> = self.get(&self.objects_url(), &query).await?;

        let objects = response
            .map(|r| r.objects)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|raw| Self::convert_object(kind, raw))
            .collect();

        Ok(objects)
    }
}

#[async_trait]
impl ContentRepository for ContentClient {
    async fn find(&self, kind: ContentKind) -> Result<Vec<ContentObject>, ContentError> {
        self.find_with_query(kind, &[]).await
    }

    async fn find_one(
        &self,
        kind: ContentKind,
        slug: &str,
    ) -> Result<Option<ContentObject>, ContentError> {
        let url = format!("{}/{}", self.objects_url(), slug);
        let response: Option<SingleObjectResponse> =
            self.get(&url, &[("type", kind.api_name())]).await?;

        Ok(response.and_then(|r| Self::convert_object(kind, r.object)))
    }

    async fn find_projects_by_student(
        &self,
        student_id: &str,
    ) -> Result<Vec<ContentObject>, ContentError> {
        self.find_with_query(
            ContentKind::StudyProjects,
            &[("metadata.student_owner", student_id)],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_convert_object_skips_malformed_metadata() {
        let raw: RawObject = serde_json::from_value(json!({
            "id": "1",
            "slug": "bad-note",
            "title": "Bad note",
            "created_at": "2024-01-01T00:00:00Z",
            "modified_at": "2024-01-01T00:00:00Z",
            "metadata": {"note_title": ["not", "a", "string"]}
        }))
        .unwrap();

        assert!(ContentClient::convert_object(ContentKind::Notes, raw).is_none());
    }

    #[test]
    fn test_convert_object_defaults_missing_metadata() {
        let raw: RawObject = serde_json::from_value(json!({
            "id": "1",
            "slug": "algebra-basics",
            "title": "Algebra Basics",
            "created_at": "2024-01-01T00:00:00Z",
            "modified_at": "2024-02-01T00:00:00Z"
        }))
        .unwrap();

        let object = ContentClient::convert_object(ContentKind::StudyMaterials, raw).unwrap();
        assert_eq!(object.slug, "algebra-basics");
        match object.metadata {
            ContentMetadata::Material(m) => assert!(m.subject.is_none()),
            other => panic!("expected material metadata, got {other:?}"),
        }
    }
}
