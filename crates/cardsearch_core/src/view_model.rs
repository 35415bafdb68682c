use crate::{Card, CardId, ChatMessage, DocumentHit, NoteHit, Suggestion, TrackerId};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub query: String,
    pub suggestions: SuggestionsView,
    /// Shown while loading with nothing else to display.
    pub show_spinner: bool,
    pub error: Option<String>,
    /// "Found N results for ..." after a search.
    pub results_info: Option<String>,
    /// Shown on an empty, unsearched page.
    pub show_empty_hint: bool,
    pub cards: Vec<CardView>,
    pub notes: Vec<NoteHit>,
    pub documents: Vec<DocumentHit>,
    pub uploads: Vec<UploadProgressView>,
    /// Present while the chat panel is open.
    pub chat: Option<ChatView>,
    pub alerts: Vec<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SuggestionsView {
    pub visible: bool,
    pub items: Vec<Suggestion>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub card: Card,
    pub note: String,
    pub note_changed: bool,
    pub note_saving: bool,
    pub uploading: bool,
    pub uploaded_files: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Active,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadProgressView {
    pub tracker_id: TrackerId,
    pub card_id: CardId,
    pub filename: String,
    pub progress: u8,
    pub message: String,
    /// `(indexed, total)`; absent when the backend reports no chunks.
    pub chunks: Option<(u64, u64)>,
    pub outcome: UploadOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatView {
    pub messages: Vec<ChatMessage>,
    pub waiting: bool,
}
