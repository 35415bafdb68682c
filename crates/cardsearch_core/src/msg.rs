use std::path::PathBuf;

use crate::{
    Card, CardId, Generation, SearchResults, Suggestion, TrackerId, UploadReceipt, UploadStatus,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// First render; loads every card.
    Started,
    /// User edited the search input.
    QueryChanged(String),
    /// User pressed Enter or the search button.
    SearchSubmitted,
    /// User clicked Retry after an error.
    ReloadRequested,
    CardsLoaded(Result<Vec<Card>, String>),
    SearchCompleted {
        query: String,
        result: Result<SearchResults, String>,
    },
    SuggestionsLoaded {
        generation: Generation,
        result: Result<Vec<Suggestion>, String>,
    },
    /// User picked the suggestion at this index.
    SuggestionSelected(usize),
    InputFocused,
    InputBlurred,
    EscapePressed,
    /// User picked a local file to attach to a card.
    UploadRequested {
        card_id: CardId,
        path: PathBuf,
        filename: String,
        content_type: String,
    },
    UploadCompleted {
        card_id: CardId,
        filename: String,
        result: Result<UploadReceipt, String>,
    },
    UploadStatusReceived {
        tracker_id: TrackerId,
        status: UploadStatus,
    },
    /// The poller finished its dismiss delay after a terminal status.
    UploadTrackingFinished {
        tracker_id: TrackerId,
    },
    NoteRequested {
        card_id: CardId,
    },
    NoteLoaded {
        card_id: CardId,
        result: Result<String, String>,
    },
    NoteEdited {
        card_id: CardId,
        text: String,
    },
    NoteSaveRequested {
        card_id: CardId,
    },
    NoteSaved {
        card_id: CardId,
        result: Result<(), String>,
    },
    FilesRequested {
        card_id: CardId,
    },
    FilesListed {
        card_id: CardId,
        result: Result<Vec<String>, String>,
    },
    FileDeleteRequested {
        card_id: CardId,
        filename: String,
    },
    FileDeleted {
        card_id: CardId,
        filename: String,
        result: Result<(), String>,
    },
    ChatToggled,
    ChatSubmitted {
        text: String,
        sent_at: String,
    },
    ChatReplied {
        result: Result<String, String>,
        received_at: String,
    },
    /// Shell loop tick.
    Tick,
}
