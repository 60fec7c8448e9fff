pub mod confusion;
pub mod personas;
pub mod provider;
pub mod providers;
pub mod sse;
pub mod tutor;

pub use confusion::is_confused;
pub use personas::TutorPersona;
pub use provider::{create_provider, ChatProvider, ChatRequest, GenerationError, Turn};
pub use tutor::{
    ConversationContext, Difficulty, SubjectScore, TutorService, DEFAULT_TITLE, FALLBACK_TAG,
    FALLBACK_TITLE,
};
