use std::path::PathBuf;

use crate::{CardId, ChatTurn, Generation, TrackerId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadCards,
    Search {
        query: String,
    },
    /// Restart the suggestion quiet period; fetch `query` when it elapses.
    ScheduleSuggest {
        generation: Generation,
        query: String,
    },
    CancelSuggest,
    UploadFile {
        card_id: CardId,
        path: PathBuf,
        filename: String,
        content_type: String,
    },
    TrackUpload {
        tracker_id: TrackerId,
        status_id: String,
    },
    StopTracking {
        tracker_id: TrackerId,
    },
    LoadNote {
        card_id: CardId,
    },
    SaveNote {
        card_id: CardId,
        note: String,
    },
    ListFiles {
        card_id: CardId,
    },
    DeleteFile {
        card_id: CardId,
        filename: String,
    },
    SendChat {
        message: String,
        history: Vec<ChatTurn>,
    },
}
