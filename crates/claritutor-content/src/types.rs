//! Typed content objects fetched from the headless CMS.
//!
//! The CMS stores metadata as a free-form map per object type. Here each
//! recognized type gets its own metadata struct with explicitly optional
//! fields, and unknown fields are ignored on decode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recognized content object types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentKind {
    StudentProfiles,
    StudyMaterials,
    Notes,
    StudySessions,
    StudyProjects,
}

impl ContentKind {
    /// The type slug used by the CMS API
    #[must_use]
    pub fn api_name(self) -> &'static str {
        match self {
            Self::StudentProfiles => "student-profiles",
            Self::StudyMaterials => "study-materials",
            Self::Notes => "notes",
            Self::StudySessions => "study-sessions",
            Self::StudyProjects => "study-projects",
        }
    }

}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.api_name())
    }
}

impl std::str::FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "student-profiles" | "students" => Ok(Self::StudentProfiles),
            "study-materials" | "materials" => Ok(Self::StudyMaterials),
            "notes" => Ok(Self::Notes),
            "study-sessions" | "sessions" => Ok(Self::StudySessions),
            "study-projects" | "projects" => Ok(Self::StudyProjects),
            _ => Err(format!(
                "Unknown content kind: {s}. Use: students, materials, notes, sessions, projects"
            )),
        }
    }
}

/// A dropdown-style CMS field: machine key plus display value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectValue {
    pub key: String,
    pub value: String,
}

/// Reference to another content object. The CMS returns either a full
/// embedded object or a bare id string depending on query depth.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObjectRef {
    Embedded {
        id: String,
        slug: String,
        title: String,
    },
    Id(String),
}

impl ObjectRef {
    /// The referenced object's id, regardless of representation
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Embedded { id, .. } => id,
            Self::Id(id) => id,
        }
    }
}

/// One entry of a study session's recorded conversation history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub message: String,
}

/// Student profile metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentMetadata {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    pub education_level: Option<SelectValue>,
    pub primary_subjects: Option<String>,
    pub learning_style: Option<SelectValue>,
    pub study_goals: Option<String>,
    pub total_study_hours: Option<f64>,
    pub documents_uploaded: Option<u32>,
    pub notes_created: Option<u32>,
    pub learning_streak_days: Option<u32>,
    pub account_type: Option<SelectValue>,
    pub join_date: Option<String>,
    pub last_active: Option<String>,
}

/// Study material metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaterialMetadata {
    #[serde(default)]
    pub document_title: String,
    pub document_type: Option<SelectValue>,
    pub subject: Option<String>,
    pub extracted_content: Option<String>,
    #[serde(default)]
    pub key_concepts: Vec<String>,
    pub source_url: Option<String>,
    pub author: Option<String>,
    pub publication_date: Option<String>,
    pub page_count: Option<u32>,
    pub difficulty_level: Option<SelectValue>,
    pub tags: Option<String>,
    pub student_owner: Option<ObjectRef>,
    pub processing_status: Option<SelectValue>,
}

/// Note metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoteMetadata {
    #[serde(default)]
    pub note_title: String,
    pub note_type: Option<SelectValue>,
    pub content: Option<String>,
    #[serde(default)]
    pub key_takeaways: Vec<String>,
    #[serde(default)]
    pub study_questions: Vec<String>,
    pub subject: Option<String>,
    pub tags: Option<String>,
    pub priority: Option<SelectValue>,
    pub ai_generated: Option<bool>,
    pub student_owner: Option<ObjectRef>,
    pub created_date: Option<String>,
    pub last_reviewed: Option<String>,
    pub review_count: Option<u32>,
}

/// Study session metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionMetadata {
    #[serde(default)]
    pub session_title: String,
    pub session_type: Option<SelectValue>,
    #[serde(default)]
    pub conversation_history: Vec<HistoryEntry>,
    pub key_insights: Option<String>,
    pub questions_asked: Option<u32>,
    pub comprehension_score: Option<f64>,
    pub duration_minutes: Option<u32>,
    pub student: Option<ObjectRef>,
    pub session_date: Option<String>,
    pub status: Option<SelectValue>,
    pub follow_up_suggested: Option<bool>,
}

/// Study project metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectMetadata {
    #[serde(default)]
    pub project_name: String,
    pub project_type: Option<SelectValue>,
    pub description: Option<String>,
    #[serde(default)]
    pub learning_goals: Vec<String>,
    pub progress_percentage: Option<f64>,
    pub target_date: Option<String>,
    pub student_owner: Option<ObjectRef>,
    pub project_status: Option<SelectValue>,
    pub priority: Option<SelectValue>,
}

/// Metadata variants, one per recognized content kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ContentMetadata {
    Student(StudentMetadata),
    Material(MaterialMetadata),
    Note(NoteMetadata),
    Session(SessionMetadata),
    Project(ProjectMetadata),
}

impl ContentMetadata {
    /// Decode the CMS metadata map into the typed variant for `kind`.
    /// Missing fields default; unknown fields are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if a present field has an incompatible shape
    pub fn from_value(kind: ContentKind, value: serde_json::Value) -> serde_json::Result<Self> {
        // Objects created without metadata come through as null
        let value = if value.is_null() {
            serde_json::Value::Object(serde_json::Map::new())
        } else {
            value
        };
        Ok(match kind {
            ContentKind::StudentProfiles => Self::Student(serde_json::from_value(value)?),
            ContentKind::StudyMaterials => Self::Material(serde_json::from_value(value)?),
            ContentKind::Notes => Self::Note(serde_json::from_value(value)?),
            ContentKind::StudySessions => Self::Session(serde_json::from_value(value)?),
            ContentKind::StudyProjects => Self::Project(serde_json::from_value(value)?),
        })
    }

    /// Subject field, where the kind carries one
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        match self {
            Self::Student(m) => m.primary_subjects.as_deref(),
            Self::Material(m) => m.subject.as_deref(),
            Self::Note(m) => m.subject.as_deref(),
            Self::Session(_) | Self::Project(_) => None,
        }
    }
}

/// A content object fetched from the CMS
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentObject {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub kind: ContentKind,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub metadata: ContentMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_parse_aliases() {
        assert_eq!("materials".parse::<ContentKind>().unwrap(), ContentKind::StudyMaterials);
        assert_eq!(
            "study-materials".parse::<ContentKind>().unwrap(),
            ContentKind::StudyMaterials
        );
        assert!("homework".parse::<ContentKind>().is_err());
    }

    #[test]
    fn test_metadata_decode_with_missing_fields() {
        let metadata = ContentMetadata::from_value(
            ContentKind::Notes,
            json!({
                "note_title": "Photosynthesis",
                "subject": "Biology",
                "key_takeaways": ["Light reactions", "Calvin cycle"],
                "unknown_field": 42
            }),
        )
        .unwrap();

        match metadata {
            ContentMetadata::Note(note) => {
                assert_eq!(note.note_title, "Photosynthesis");
                assert_eq!(note.key_takeaways.len(), 2);
                assert!(note.content.is_none());
            }
            other => panic!("expected note metadata, got {other:?}"),
        }
    }

    #[test]
    fn test_object_ref_accepts_id_or_embedded() {
        let bare: ObjectRef = serde_json::from_value(json!("abc123")).unwrap();
        assert_eq!(bare.id(), "abc123");

        let embedded: ObjectRef = serde_json::from_value(json!({
            "id": "abc123",
            "slug": "ada",
            "title": "Ada"
        }))
        .unwrap();
        assert_eq!(embedded.id(), "abc123");
    }
}
