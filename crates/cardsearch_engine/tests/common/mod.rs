#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use cardsearch_engine::{
    ApiClient, ApiError, CardRecord, ChatRequest, EngineEvent, EventSink, FailureKind,
    FileUpload, SearchResults, SuggestionRecord, UploadPhase, UploadReceipt,
    UploadStatusPayload,
};
use tokio::time::Instant;

pub fn init_logging() {
    client_logging::initialize_for_tests();
}

pub fn status(phase: UploadPhase, progress: f64) -> UploadStatusPayload {
    UploadStatusPayload {
        status: phase,
        progress,
        message: format!("{phase:?}"),
        chunks_total: 8,
        chunks_indexed: (progress / 100.0 * 8.0) as u64,
    }
}

pub fn network_error() -> ApiError {
    ApiError {
        kind: FailureKind::Network,
        message: "connection refused".to_string(),
    }
}

/// In-memory `ApiClient` that records when suggestion and status calls happen.
#[derive(Default)]
pub struct ScriptedClient {
    suggest_calls: Mutex<Vec<(String, Instant)>>,
    status_calls: Mutex<Vec<Instant>>,
    statuses: Mutex<VecDeque<Result<UploadStatusPayload, ApiError>>>,
}

impl ScriptedClient {
    /// Status responses are served in order; the last one repeats forever.
    pub fn with_statuses(statuses: Vec<Result<UploadStatusPayload, ApiError>>) -> Self {
        Self {
            statuses: Mutex::new(statuses.into()),
            ..Self::default()
        }
    }

    pub fn suggest_queries(&self) -> Vec<String> {
        self.suggest_calls
            .lock()
            .unwrap()
            .iter()
            .map(|(query, _)| query.clone())
            .collect()
    }

    pub fn suggest_times(&self) -> Vec<Instant> {
        self.suggest_calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, at)| *at)
            .collect()
    }

    pub fn status_times(&self) -> Vec<Instant> {
        self.status_calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ApiClient for ScriptedClient {
    async fn list_cards(&self) -> Result<Vec<CardRecord>, ApiError> {
        Ok(Vec::new())
    }

    async fn search_cards(&self, _query: &str) -> Result<SearchResults, ApiError> {
        Ok(SearchResults::default())
    }

    async fn suggest(&self, query: &str) -> Result<Vec<SuggestionRecord>, ApiError> {
        self.suggest_calls
            .lock()
            .unwrap()
            .push((query.to_string(), Instant::now()));
        Ok(vec![SuggestionRecord {
            text: format!("{query} inc"),
            kind: "company".to_string(),
            id: "c-1".to_string(),
        }])
    }

    async fn upload_file(
        &self,
        _card_id: &str,
        upload: &FileUpload,
    ) -> Result<UploadReceipt, ApiError> {
        Ok(UploadReceipt {
            filename: upload.filename.clone(),
            status_id: None,
        })
    }

    async fn upload_status(&self, _status_id: &str) -> Result<UploadStatusPayload, ApiError> {
        self.status_calls.lock().unwrap().push(Instant::now());
        let mut statuses = self.statuses.lock().unwrap();
        if statuses.len() > 1 {
            statuses.pop_front().unwrap()
        } else {
            statuses
                .front()
                .cloned()
                .unwrap_or_else(|| Err(network_error()))
        }
    }

    async fn load_note(&self, _card_id: &str) -> Result<String, ApiError> {
        Ok(String::new())
    }

    async fn save_note(&self, _card_id: &str, _note: &str) -> Result<(), ApiError> {
        Ok(())
    }

    async fn list_files(&self, _card_id: &str) -> Result<Vec<String>, ApiError> {
        Ok(Vec::new())
    }

    async fn delete_file(&self, _card_id: &str, _filename: &str) -> Result<(), ApiError> {
        Ok(())
    }

    async fn chat(&self, request: &ChatRequest) -> Result<String, ApiError> {
        Ok(format!("echo: {}", request.message))
    }
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<(Instant, EngineEvent)>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<(Instant, EngineEvent)> {
        self.events.lock().unwrap().clone()
    }

    pub fn finished_times(&self) -> Vec<Instant> {
        self.events()
            .into_iter()
            .filter_map(|(at, event)| match event {
                EngineEvent::TrackingFinished { .. } => Some(at),
                _ => None,
            })
            .collect()
    }

    pub fn statuses(&self) -> Vec<(Instant, UploadStatusPayload)> {
        self.events()
            .into_iter()
            .filter_map(|(at, event)| match event {
                EngineEvent::UploadStatus { status, .. } => Some((at, status)),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push((Instant::now(), event));
    }
}
