pub mod client;
pub mod repository;
pub mod types;

pub use client::ContentClient;
pub use repository::{ContentError, ContentRepository};
pub use types::{
    ContentKind, ContentMetadata, ContentObject, HistoryEntry, MaterialMetadata, NoteMetadata,
    ObjectRef, ProjectMetadata, SelectValue, SessionMetadata, StudentMetadata,
};
