//! Tutoring session orchestration.
//!
//! `TutorSession` is the state machine owning one open conversation:
//! message list, derived title/tags/context, streaming buffer, and the
//! confusion flag. All transitions are synchronous; the async glue that
//! drives providers and persistence lives in [`run_turn`], [`save_session`],
//! and [`load_session`].
//!
//! Every generation carries the session epoch at submit time. `reset()`,
//! `load()`, and `cancel()` bump the epoch, so a late-arriving result for a
//! conversation that no longer exists is discarded instead of applied.

use anyhow::{Context as _, Result};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use claritutor_ai::tutor::ConversationContext;
use claritutor_ai::{is_confused, personas, GenerationError, TutorPersona, TutorService};
use claritutor_storage::models::{ChatMessage, SavedConversation};
use claritutor_storage::Database;

/// Lifecycle state of an open conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No messages yet
    Idle,
    /// User submitted, generation in flight
    Awaiting,
    /// Partial content arriving
    Streaming,
    /// Assistant reply appended (or generation failed / was cancelled)
    Settled,
}

/// A pre-canned clarification prompt re-entering `submit`
#[derive(Debug, Clone, Copy)]
pub struct QuickAction {
    pub label: &'static str,
    pub prompt: &'static str,
}

/// Quick actions surfaced under the input, highlighted when the confusion
/// heuristic fires
pub const QUICK_ACTIONS: [QuickAction; 4] = [
    QuickAction {
        label: "Explain differently",
        prompt: "Can you explain that in a different way?",
    },
    QuickAction {
        label: "Give examples",
        prompt: "Can you provide some examples?",
    },
    QuickAction {
        label: "Show code",
        prompt: "Can you show me the code for this?",
    },
    QuickAction {
        label: "Simplify",
        prompt: "Can you simplify this explanation?",
    },
];

/// Token tying an in-flight generation to the session epoch it started in
#[derive(Debug, Clone, Copy)]
pub struct PendingTurn {
    epoch: u64,
}

/// Result of an explicit save request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved { conversation_id: Uuid },
    /// No signed-in user; nothing was persisted and the caller should
    /// prompt once to sign in
    NotSignedIn,
}

/// Result of an explicit load request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    NotFound,
    NotSignedIn,
}

/// One open tutoring conversation
pub struct TutorSession {
    persona_id: String,
    title: String,
    tags: Vec<String>,
    messages: Vec<ChatMessage>,
    state: SessionState,
    partial: String,
    context: Option<ConversationContext>,
    confused: bool,
    epoch: u64,
    conversation_id: Option<Uuid>,
    cancel: Option<CancellationToken>,
}

impl TutorSession {
    #[must_use]
    pub fn new(persona_id: &str) -> Self {
        Self {
            persona_id: persona_id.to_string(),
            title: claritutor_ai::DEFAULT_TITLE.to_string(),
            tags: Vec::new(),
            messages: Vec::new(),
            state: SessionState::Idle,
            partial: String::new(),
            context: None,
            confused: false,
            epoch: 0,
            conversation_id: None,
            cancel: None,
        }
    }

    // ==================== Accessors ====================

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn partial(&self) -> &str {
        &self.partial
    }

    #[must_use]
    pub fn context(&self) -> Option<&ConversationContext> {
        self.context.as_ref()
    }

    /// Whether the confusion heuristic fired after the last settled turn
    #[must_use]
    pub fn needs_clarification(&self) -> bool {
        self.confused
    }

    #[must_use]
    pub fn conversation_id(&self) -> Option<Uuid> {
        self.conversation_id
    }

    #[must_use]
    pub fn persona_id(&self) -> &str {
        &self.persona_id
    }

    /// The active persona. An unknown id (catalog changed since the
    /// conversation was saved) falls back to the default persona.
    #[must_use]
    pub fn active_persona(&self) -> &'static TutorPersona {
        personas::find(&self.persona_id).unwrap_or_else(personas::default_persona)
    }

    fn is_current(&self, turn: PendingTurn) -> bool {
        turn.epoch == self.epoch
    }

    fn generation_in_flight(&self) -> bool {
        matches!(self.state, SessionState::Awaiting | SessionState::Streaming)
    }

    // ==================== Transitions ====================

    /// Switch the active persona. Ignored while a generation is in flight.
    pub fn set_persona(&mut self, persona_id: &str) -> bool {
        if self.generation_in_flight() || personas::find(persona_id).is_none() {
            return false;
        }
        self.persona_id = persona_id.to_string();
        true
    }

    /// Append a user message and move to Awaiting. Returns `None` while a
    /// generation is already in flight.
    pub fn submit(&mut self, text: &str) -> Option<PendingTurn> {
        if self.generation_in_flight() || text.trim().is_empty() {
            return None;
        }
        self.messages.push(ChatMessage::user(text));
        self.state = SessionState::Awaiting;
        Some(PendingTurn { epoch: self.epoch })
    }

    /// Whether the pending turn is the conversation's first message
    #[must_use]
    pub fn is_first_turn(&self) -> bool {
        self.messages.len() == 1
    }

    /// Move a pending turn into Streaming, holding its cancellation token
    pub fn begin_streaming(&mut self, turn: PendingTurn, cancel: CancellationToken) {
        if self.is_current(turn) && self.state == SessionState::Awaiting {
            self.state = SessionState::Streaming;
            self.partial.clear();
            self.cancel = Some(cancel);
        }
    }

    /// Accumulate a streamed chunk. Returns false when the chunk belongs to
    /// a reset or cancelled generation and was discarded.
    pub fn push_chunk(&mut self, turn: PendingTurn, chunk: &str) -> bool {
        if self.is_current(turn) && self.state == SessionState::Streaming {
            self.partial.push_str(chunk);
            true
        } else {
            false
        }
    }

    /// Finish a streamed generation: append the accumulated text as the
    /// assistant reply. Stale turns are discarded.
    pub fn finish_stream(&mut self, turn: PendingTurn) {
        if !self.is_current(turn) || self.state != SessionState::Streaming {
            return;
        }
        let text = std::mem::take(&mut self.partial);
        self.cancel = None;
        if text.is_empty() {
            // Nothing arrived before the stream closed; treat like a failure
            self.state = SessionState::Settled;
            return;
        }
        self.append_assistant(text);
    }

    /// Apply a completed non-streaming generation. Stale turns are discarded.
    pub fn complete(&mut self, turn: PendingTurn, text: String) {
        if !self.is_current(turn) || self.state != SessionState::Awaiting {
            return;
        }
        self.append_assistant(text);
    }

    fn append_assistant(&mut self, text: String) {
        self.messages.push(ChatMessage::assistant(text));
        self.confused = is_confused(&self.messages);
        self.state = SessionState::Settled;
    }

    /// Record a failed generation: no message appended, the user may resend
    pub fn fail(&mut self, turn: PendingTurn) {
        if self.is_current(turn) && self.generation_in_flight() {
            self.partial.clear();
            self.cancel = None;
            self.state = SessionState::Settled;
        }
    }

    /// Abort an in-flight streamed generation, discarding the partial
    /// buffer. Meaningful only during Streaming.
    pub fn cancel(&mut self) {
        if self.state != SessionState::Streaming {
            return;
        }
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
        self.partial.clear();
        self.epoch += 1;
        self.state = SessionState::Settled;
    }

    /// Discard all conversation state and return to Idle
    pub fn reset(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
        self.title = claritutor_ai::DEFAULT_TITLE.to_string();
        self.tags.clear();
        self.messages.clear();
        self.partial.clear();
        self.context = None;
        self.confused = false;
        self.conversation_id = None;
        self.epoch += 1;
        self.state = SessionState::Idle;
    }

    // ==================== Derived metadata ====================

    /// Apply an asynchronously derived title, unless the conversation it was
    /// derived for is gone
    pub fn apply_title(&mut self, turn: PendingTurn, title: String) {
        if self.is_current(turn) {
            self.title = title;
        }
    }

    /// Apply asynchronously derived tags
    pub fn apply_tags(&mut self, turn: PendingTurn, tags: Vec<String>) {
        if self.is_current(turn) {
            self.tags = tags;
        }
    }

    /// Apply the derived conversation context
    pub fn apply_context(&mut self, turn: PendingTurn, context: ConversationContext) {
        if self.is_current(turn) {
            self.context = Some(context);
        }
    }

    // ==================== Persistence ====================

    /// Build the persistable record for this session
    fn to_record(&self, user_id: &str, summary: String) -> SavedConversation {
        let mut record = SavedConversation::new(
            user_id.to_string(),
            self.title.clone(),
            self.active_persona().subject.to_string(),
            self.persona_id.clone(),
        );
        if let Some(id) = self.conversation_id {
            record.id = id;
        }
        if let Some(first) = self.messages.first() {
            record.created_at = first.timestamp;
        }
        record.tags = self.tags.clone();
        record.summary = Some(summary);
        record
    }

    /// Replace in-memory state with a persisted conversation
    pub fn load(&mut self, conversation: &SavedConversation, messages: Vec<ChatMessage>) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
        self.persona_id = conversation.persona_id.clone();
        self.title = conversation.title.clone();
        self.tags = conversation.tags.clone();
        self.messages = messages;
        self.partial.clear();
        self.context = None;
        self.confused = is_confused(&self.messages);
        self.conversation_id = Some(conversation.id);
        self.epoch += 1;
        self.state = SessionState::Settled;
    }
}

// ============================================================================
// Async drivers
// ============================================================================

/// Chunk sink invoked as streamed content arrives
pub type ChunkSink<'a> = &'a mut dyn FnMut(&str);

async fn consume_stream(
    session: &mut TutorSession,
    tutor: &TutorService,
    turn: PendingTurn,
    on_chunk: Option<ChunkSink<'_>>,
) -> Result<(), GenerationError> {
    let turns = session.messages().to_vec();
    let persona = session.active_persona();
    let context = session.context().cloned();

    let cancel = CancellationToken::new();
    session.begin_streaming(turn, cancel.clone());

    let mut rx = match tutor
        .stream_reply(&turns, persona, context.as_ref(), cancel)
        .await
    {
        Ok(rx) => rx,
        Err(e) => {
            session.fail(turn);
            return Err(e);
        }
    };

    let mut sink = on_chunk;
    while let Some(chunk) = rx.recv().await {
        if !session.push_chunk(turn, &chunk) {
            // Session was reset or cancelled under us; stop consuming
            break;
        }
        if let Some(sink) = sink.as_mut() {
            sink(&chunk);
        }
    }
    session.finish_stream(turn);
    Ok(())
}

async fn complete_blocking(
    session: &mut TutorSession,
    tutor: &TutorService,
    turn: PendingTurn,
) -> Result<(), GenerationError> {
    let turns = session.messages().to_vec();
    let persona = session.active_persona();
    let context = session.context().cloned();

    match tutor.generate_reply(&turns, persona, context.as_ref()).await {
        Ok(reply) => {
            session.complete(turn, reply);
            Ok(())
        }
        Err(e) => {
            session.fail(turn);
            Err(e)
        }
    }
}

/// Run one user turn to completion: submit, generate (optionally streaming),
/// and on the conversation's first message concurrently derive title, tags,
/// and context.
///
/// Returns `Ok(false)` when the submission was ignored because a generation
/// is already in flight.
///
/// # Errors
///
/// Returns the generation error after recording the failure on the session;
/// the conversation keeps its messages and the user may resend.
pub async fn run_turn(
    session: &mut TutorSession,
    tutor: &TutorService,
    text: &str,
    streaming: bool,
    mut on_chunk: Option<ChunkSink<'_>>,
) -> Result<bool, GenerationError> {
    let Some(turn) = session.submit(text) else {
        return Ok(false);
    };

    if session.is_first_turn() {
        // Metadata derivation runs alongside the generation call and is
        // applied whenever it resolves
        let (outcome, title, tags, level) = tokio::join!(
            async {
                let sink = on_chunk.take();
                if streaming {
                    consume_stream(&mut *session, tutor, turn, sink).await
                } else {
                    complete_blocking(&mut *session, tutor, turn).await
                }
            },
            tutor.title_for(text),
            tutor.tags_for(text),
            tutor.complexity_of(text),
        );

        session.apply_title(turn, title);
        session.apply_context(
            turn,
            ConversationContext {
                student_level: level,
                prior_topics: tags.clone(),
            },
        );
        session.apply_tags(turn, tags);
        outcome?;
    } else if streaming {
        consume_stream(session, tutor, turn, on_chunk).await?;
    } else {
        complete_blocking(session, tutor, turn).await?;
    }

    Ok(true)
}

/// Persist the session under the signed-in user, with a freshly computed
/// summary. Without a user this is a no-op the caller prompts about.
///
/// # Errors
///
/// Returns an error if the database write fails
pub async fn save_session(
    session: &mut TutorSession,
    tutor: &TutorService,
    db: &Database,
    user_id: Option<&str>,
) -> Result<SaveOutcome> {
    let Some(user_id) = user_id else {
        return Ok(SaveOutcome::NotSignedIn);
    };

    let summary = tutor.summarize(session.messages()).await;
    let record = session.to_record(user_id, summary);
    db.save_conversation(&record, session.messages())
        .context("Failed to save conversation")?;
    session.conversation_id = Some(record.id);

    Ok(SaveOutcome::Saved {
        conversation_id: record.id,
    })
}

/// Replace the session with a previously saved conversation
///
/// # Errors
///
/// Returns an error if the database read fails
pub fn load_session(
    session: &mut TutorSession,
    db: &Database,
    user_id: Option<&str>,
    conversation_id: Uuid,
) -> Result<LoadOutcome> {
    let Some(user_id) = user_id else {
        return Ok(LoadOutcome::NotSignedIn);
    };

    let Some(conversation) = db
        .get_conversation(conversation_id, user_id)
        .context("Failed to load conversation")?
    else {
        return Ok(LoadOutcome::NotFound);
    };

    let messages = db
        .get_conversation_messages(conversation_id)
        .context("Failed to load conversation messages")?;
    session.load(&conversation, messages);

    Ok(LoadOutcome::Loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use claritutor_ai::{ChatProvider, ChatRequest};
    use claritutor_storage::models::Role;
    use tokio::sync::mpsc;

    /// Provider answering every request with a fixed reply
    struct FakeProvider {
        reply: String,
    }

    impl FakeProvider {
        fn service(reply: &str) -> TutorService {
            TutorService::from_provider(Box::new(Self {
                reply: reply.to_string(),
            }))
        }
    }

    #[async_trait]
    impl ChatProvider for FakeProvider {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn model_name(&self) -> &str {
            "fake-model"
        }

        async fn complete(&self, _request: &ChatRequest) -> Result<String, GenerationError> {
            Ok(self.reply.clone())
        }

        async fn stream(
            &self,
            _request: &ChatRequest,
            _cancel: CancellationToken,
        ) -> Result<mpsc::Receiver<String>, GenerationError> {
            let (tx, rx) = mpsc::channel(8);
            let reply = self.reply.clone();
            tokio::spawn(async move {
                for chunk in reply.split_inclusive(' ') {
                    if tx.send(chunk.to_string()).await.is_err() {
                        return;
                    }
                }
            });
            Ok(rx)
        }
    }

    /// Provider that fails every request
    struct FailingProvider;

    #[async_trait]
    impl ChatProvider for FailingProvider {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn model_name(&self) -> &str {
            "failing-model"
        }

        async fn complete(&self, _request: &ChatRequest) -> Result<String, GenerationError> {
            Err(GenerationError::Api {
                provider: "failing",
                status: 500,
                body: "boom".to_string(),
            })
        }

        async fn stream(
            &self,
            _request: &ChatRequest,
            _cancel: CancellationToken,
        ) -> Result<mpsc::Receiver<String>, GenerationError> {
            Err(GenerationError::Api {
                provider: "failing",
                status: 500,
                body: "boom".to_string(),
            })
        }
    }

    fn open_test_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(Some(dir.path().join("test.db"))).unwrap();
        (dir, db)
    }

    #[tokio::test]
    async fn test_first_turn_appends_reply_and_metadata() {
        let service = FakeProvider::service("4");
        let mut session = TutorSession::new("math");

        let ran = run_turn(&mut session, &service, "What is 2+2?", false, None)
            .await
            .unwrap();
        assert!(ran);

        assert_eq!(session.state(), SessionState::Settled);
        let messages = session.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "What is 2+2?");
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].content, "4");
        assert!(!session.needs_clarification());

        // Title, tags, and context derived from the same fake provider
        assert_eq!(session.title(), "4");
        assert_eq!(session.tags(), ["4".to_string()]);
        assert!(session.context().is_some());
        assert!(messages[0].timestamp <= messages[1].timestamp);
    }

    #[tokio::test]
    async fn test_streaming_turn_accumulates_chunks() {
        let service = FakeProvider::service("one two three");
        let mut session = TutorSession::new("general");

        let mut seen = String::new();
        let mut sink = |chunk: &str| seen.push_str(chunk);
        run_turn(&mut session, &service, "count", true, Some(&mut sink))
            .await
            .unwrap();

        assert_eq!(seen, "one two three");
        assert_eq!(session.state(), SessionState::Settled);
        assert_eq!(session.messages().last().unwrap().content, "one two three");
        assert!(session.partial().is_empty());
    }

    #[tokio::test]
    async fn test_failure_preserves_messages_and_allows_resend() {
        let service = TutorService::from_provider(Box::new(FailingProvider));
        let mut session = TutorSession::new("math");

        let result = run_turn(&mut session, &service, "Help", false, None).await;
        assert!(matches!(result, Err(GenerationError::Api { .. })));
        assert_eq!(session.state(), SessionState::Settled);
        assert_eq!(session.messages().len(), 1);

        // The user may retry by submitting again
        assert!(session.submit("Help again").is_some());
    }

    #[test]
    fn test_reset_returns_to_idle_from_any_state() {
        let mut session = TutorSession::new("science");
        let turn = session.submit("hello").unwrap();
        session.begin_streaming(turn, CancellationToken::new());
        assert!(session.push_chunk(turn, "partial "));

        session.reset();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.messages().is_empty());
        assert!(session.tags().is_empty());
        assert_eq!(session.title(), claritutor_ai::DEFAULT_TITLE);
        assert!(session.partial().is_empty());
        assert!(!session.needs_clarification());
    }

    #[test]
    fn test_late_completion_after_reset_is_discarded() {
        let mut session = TutorSession::new("math");
        let turn = session.submit("first question").unwrap();
        session.reset();

        session.complete(turn, "late reply".to_string());
        assert!(session.messages().is_empty());
        assert_eq!(session.state(), SessionState::Idle);

        session.apply_title(turn, "stale title".to_string());
        assert_eq!(session.title(), claritutor_ai::DEFAULT_TITLE);
    }

    #[test]
    fn test_cancel_discards_partial_buffer() {
        let mut session = TutorSession::new("math");
        let turn = session.submit("question").unwrap();
        let token = CancellationToken::new();
        session.begin_streaming(turn, token.clone());
        assert!(session.push_chunk(turn, "half a rep"));

        session.cancel();
        assert!(token.is_cancelled());
        assert_eq!(session.state(), SessionState::Settled);
        assert!(session.partial().is_empty());
        assert_eq!(session.messages().len(), 1);

        // The stream end for the cancelled turn is stale now
        session.finish_stream(turn);
        assert_eq!(session.messages().len(), 1);
    }

    #[test]
    fn test_cancel_outside_streaming_is_a_no_op() {
        let mut session = TutorSession::new("math");
        session.cancel();
        assert_eq!(session.state(), SessionState::Idle);

        let turn = session.submit("question").unwrap();
        session.cancel();
        assert_eq!(session.state(), SessionState::Awaiting);
        session.complete(turn, "fine".to_string());
        assert_eq!(session.state(), SessionState::Settled);
    }

    #[test]
    fn test_submit_ignored_while_in_flight() {
        let mut session = TutorSession::new("math");
        let first = session.submit("one");
        assert!(first.is_some());
        assert!(session.submit("two").is_none());
        assert_eq!(session.messages().len(), 1);
    }

    #[test]
    fn test_unknown_persona_falls_back_for_display() {
        let mut session = TutorSession::new("math");
        let conversation = SavedConversation::new(
            "user-1".to_string(),
            "Old chat".to_string(),
            "Alchemy".to_string(),
            "alchemy".to_string(),
        );
        session.load(&conversation, vec![ChatMessage::user("hi")]);

        assert_eq!(session.persona_id(), "alchemy");
        assert_eq!(session.active_persona().id, personas::default_persona().id);
    }

    #[tokio::test]
    async fn test_save_without_user_is_a_gated_no_op() {
        let (_dir, db) = open_test_db();
        let service = FakeProvider::service("4");
        let mut session = TutorSession::new("math");
        run_turn(&mut session, &service, "What is 2+2?", false, None)
            .await
            .unwrap();

        let before = session.messages().len();
        let outcome = save_session(&mut session, &service, &db, None).await.unwrap();
        assert_eq!(outcome, SaveOutcome::NotSignedIn);
        assert_eq!(session.messages().len(), before);
        assert!(session.conversation_id().is_none());
        assert!(db.list_conversations("user-1").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let (_dir, db) = open_test_db();
        let service = FakeProvider::service("The mitochondria is the powerhouse of the cell.");
        let mut session = TutorSession::new("science");
        run_turn(&mut session, &service, "What do mitochondria do?", false, None)
            .await
            .unwrap();

        let outcome = save_session(&mut session, &service, &db, Some("user-1"))
            .await
            .unwrap();
        let SaveOutcome::Saved { conversation_id } = outcome else {
            panic!("expected a saved conversation");
        };
        assert_eq!(session.conversation_id(), Some(conversation_id));

        let mut restored = TutorSession::new("math");
        let loaded = load_session(&mut restored, &db, Some("user-1"), conversation_id).unwrap();
        assert_eq!(loaded, LoadOutcome::Loaded);
        assert_eq!(restored.state(), SessionState::Settled);
        assert_eq!(restored.persona_id(), "science");
        assert_eq!(restored.messages().len(), 2);
        for pair in restored.messages().windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }

        // Unknown id and missing identity are normal outcomes, not errors
        assert_eq!(
            load_session(&mut restored, &db, Some("user-1"), Uuid::new_v4()).unwrap(),
            LoadOutcome::NotFound
        );
        assert_eq!(
            load_session(&mut restored, &db, None, conversation_id).unwrap(),
            LoadOutcome::NotSignedIn
        );
    }

    #[tokio::test]
    async fn test_resave_updates_existing_record() {
        let (_dir, db) = open_test_db();
        let service = FakeProvider::service("Sure.");
        let mut session = TutorSession::new("general");
        run_turn(&mut session, &service, "First question", false, None)
            .await
            .unwrap();
        save_session(&mut session, &service, &db, Some("user-1"))
            .await
            .unwrap();

        run_turn(&mut session, &service, "Second question", false, None)
            .await
            .unwrap();
        save_session(&mut session, &service, &db, Some("user-1"))
            .await
            .unwrap();

        let saved = db.list_conversations("user-1").unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(
            db.get_conversation_messages(saved[0].id).unwrap().len(),
            4
        );
    }

    #[test]
    fn test_quick_actions_are_submittable_prompts() {
        let mut session = TutorSession::new("math");
        let turn = session.submit(QUICK_ACTIONS[0].prompt).unwrap();
        session.complete(turn, "Of course.".to_string());
        assert_eq!(
            session.messages()[0].content,
            "Can you explain that in a different way?"
        );
    }
}
