//! Card search core: pure state machine and view-model helpers.
mod card;
mod chat;
mod effect;
mod msg;
mod panel;
mod state;
mod suggest;
mod update;
mod upload;
mod view_model;

pub use card::{Card, CardId, CompanyCard, DocumentHit, NoteHit, PersonCard, SearchResults, Suggestion};
pub use chat::{ChatMessage, ChatSender, ChatTurn, CHAT_FALLBACK_REPLY, CHAT_GREETING};
pub use effect::Effect;
pub use msg::Msg;
pub use state::AppState;
pub use suggest::{meets_suggest_threshold, Generation, MIN_SUGGEST_CHARS};
pub use update::{
    update, ALERT_FILE_DELETE_FAILED, ALERT_NOTE_SAVE_FAILED, ALERT_UNSUPPORTED_FILE,
    ALERT_UPLOAD_FAILED, ALERT_UPLOAD_SUCCEEDED,
};
pub use upload::{
    is_allowed_upload_type, TrackerId, UploadReceipt, UploadState, UploadStatus, UploadTracker,
    ALLOWED_UPLOAD_TYPES,
};
pub use view_model::{
    AppViewModel, CardView, ChatView, SuggestionsView, UploadOutcome, UploadProgressView,
};
