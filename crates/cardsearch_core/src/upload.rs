use crate::CardId;

pub type TrackerId = u64;

/// Content types accepted for card uploads: PDF, DOCX and legacy DOC.
pub const ALLOWED_UPLOAD_TYPES: [&str; 3] = [
    "application/pdf",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/msword",
];

pub fn is_allowed_upload_type(content_type: &str) -> bool {
    ALLOWED_UPLOAD_TYPES
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(content_type.trim()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadState {
    #[default]
    Queued,
    Processing,
    Completed,
    Failed,
}

impl UploadState {
    pub fn is_terminal(self) -> bool {
        matches!(self, UploadState::Completed | UploadState::Failed)
    }
}

/// One status snapshot. Always satisfies `progress <= 100` and
/// `chunks_indexed <= chunks_total`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadStatus {
    state: UploadState,
    progress: u8,
    message: String,
    chunks_total: u64,
    chunks_indexed: u64,
}

impl UploadStatus {
    pub fn new(
        state: UploadState,
        progress: u8,
        message: impl Into<String>,
        chunks_total: u64,
        chunks_indexed: u64,
    ) -> Self {
        Self {
            state,
            progress: progress.min(100),
            message: message.into(),
            chunks_total,
            chunks_indexed: chunks_indexed.min(chunks_total),
        }
    }

    pub fn state(&self) -> UploadState {
        self.state
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn chunks_indexed(&self) -> u64 {
        self.chunks_indexed
    }

    /// `(indexed, total)` when the backend reports chunking.
    pub fn chunk_counter(&self) -> Option<(u64, u64)> {
        (self.chunks_total > 0).then_some((self.chunks_indexed, self.chunks_total))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTracker {
    pub tracker_id: TrackerId,
    pub card_id: CardId,
    pub filename: String,
    /// None until the first poll answers.
    pub status: Option<UploadStatus>,
}

/// What the backend acknowledged for an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub filename: String,
    pub status_id: Option<String>,
}
