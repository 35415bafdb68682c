//! Card search engine: API client, timers and effect execution.
mod api;
mod debounce;
mod engine;
mod poller;
mod sink;
mod timer;
mod types;

pub use api::{ApiClient, ApiSettings, FileUpload, ReqwestApiClient, API_PREFIX, DEFAULT_BASE_URL};
pub use debounce::Debouncer;
pub use engine::{Dispatcher, EngineCommand, EngineConfig, EngineError, EngineHandle};
pub use poller::{PollerHandle, StatusPoller, TimingSettings};
pub use sink::{ChannelEventSink, EventSink};
pub use timer::TimerHandle;
pub use types::{
    ApiError, CardRecord, ChatRequest, ChatTurn, CompanyRecord, DocumentHit, EngineEvent,
    FailureKind, Generation, NoteHit, PersonRecord, SearchResults, SuggestionRecord, TrackerId,
    UploadPhase, UploadReceipt, UploadStatusPayload,
};
