use std::fmt;

use serde::{Deserialize, Serialize};

pub type TrackerId = u64;
pub type Generation = u64;

/// A result card as served by the backend, discriminated by `card_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "card_type", rename_all = "lowercase")]
pub enum CardRecord {
    Company(CompanyRecord),
    Person(PersonRecord),
}

impl CardRecord {
    pub fn id(&self) -> &str {
        match self {
            CardRecord::Company(company) => &company.id,
            CardRecord::Person(person) => &person.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub founded: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub linkedin_id: String,
    #[serde(default)]
    pub linkedin_url: String,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub experience_years: Option<u32>,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteHit {
    pub card_id: String,
    #[serde(default)]
    pub card_name: Option<String>,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentHit {
    pub card_id: String,
    pub filename: String,
    #[serde(default)]
    pub snippet: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchResults {
    pub companies: Vec<CompanyRecord>,
    pub persons: Vec<PersonRecord>,
    pub notes: Vec<NoteHit>,
    pub documents: Vec<DocumentHit>,
}

/// The search endpoint answers either with a flat card list or with the
/// four result groups.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum SearchPayload {
    Flat(Vec<CardRecord>),
    Grouped {
        #[serde(default)]
        companies: Vec<CompanyRecord>,
        #[serde(default)]
        persons: Vec<PersonRecord>,
        #[serde(default)]
        notes: Vec<NoteHit>,
        #[serde(default)]
        documents: Vec<DocumentHit>,
    },
}

impl From<SearchPayload> for SearchResults {
    fn from(payload: SearchPayload) -> Self {
        match payload {
            SearchPayload::Flat(cards) => {
                let mut results = SearchResults::default();
                for card in cards {
                    match card {
                        CardRecord::Company(company) => results.companies.push(company),
                        CardRecord::Person(person) => results.persons.push(person),
                    }
                }
                results
            }
            SearchPayload::Grouped {
                companies,
                persons,
                notes,
                documents,
            } => SearchResults {
                companies,
                persons,
                notes,
                documents,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionRecord {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadPhase {
    Queued,
    Processing,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl UploadPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, UploadPhase::Completed | UploadPhase::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadStatusPayload {
    pub status: UploadPhase,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub chunks_total: u64,
    #[serde(default)]
    pub chunks_indexed: u64,
}

impl UploadStatusPayload {
    /// Progress rounded and clamped into 0..=100.
    pub fn progress_percent(&self) -> u8 {
        if self.progress.is_nan() {
            return 0;
        }
        self.progress.round().clamp(0.0, 100.0) as u8
    }

    /// Indexed chunk count, never above the total.
    pub fn chunks_indexed_clamped(&self) -> u64 {
        self.chunks_indexed.min(self.chunks_total)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub filename: String,
    #[serde(default)]
    pub status_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct NotePayload {
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum FileListPayload {
    Names(Vec<String>),
    Wrapped { files: Vec<String> },
}

impl FileListPayload {
    pub(crate) fn into_names(self) -> Vec<String> {
        match self {
            FileListPayload::Names(files) | FileListPayload::Wrapped { files } => files,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub conversation_history: Vec<ChatTurn>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    CardsLoaded(Result<Vec<CardRecord>, ApiError>),
    SearchCompleted {
        query: String,
        result: Result<SearchResults, ApiError>,
    },
    SuggestionsLoaded {
        generation: Generation,
        query: String,
        result: Result<Vec<SuggestionRecord>, ApiError>,
    },
    UploadCompleted {
        card_id: String,
        filename: String,
        result: Result<UploadReceipt, ApiError>,
    },
    UploadStatus {
        tracker_id: TrackerId,
        status: UploadStatusPayload,
    },
    TrackingFinished {
        tracker_id: TrackerId,
    },
    NoteLoaded {
        card_id: String,
        result: Result<String, ApiError>,
    },
    NoteSaved {
        card_id: String,
        result: Result<(), ApiError>,
    },
    FilesListed {
        card_id: String,
        result: Result<Vec<String>, ApiError>,
    },
    FileDeleted {
        card_id: String,
        filename: String,
        result: Result<(), ApiError>,
    },
    ChatReplied(Result<String, ApiError>),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    MalformedBody,
    FileRead,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::MalformedBody => write!(f, "malformed response body"),
            FailureKind::FileRead => write!(f, "could not read upload file"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
