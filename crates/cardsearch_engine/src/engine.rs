use std::collections::HashMap;
use std::future::Future;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use client_logging::{client_debug, client_info, client_warn};
use tokio::sync::mpsc as async_mpsc;
use tokio_util::sync::CancellationToken;

use crate::api::{ApiSettings, FileUpload, ReqwestApiClient};
use crate::debounce::Debouncer;
use crate::poller::{PollerHandle, StatusPoller, TimingSettings};
use crate::sink::ChannelEventSink;
use crate::{ApiClient, ApiError, ChatRequest, EngineEvent, EventSink, Generation, TrackerId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    LoadCards,
    Search {
        query: String,
    },
    /// Restart the suggestion quiet period for `query`.
    ScheduleSuggest {
        generation: Generation,
        query: String,
    },
    CancelSuggest,
    Upload {
        card_id: String,
        upload: FileUpload,
    },
    TrackUpload {
        tracker_id: TrackerId,
        status_id: String,
    },
    StopTracking {
        tracker_id: TrackerId,
    },
    LoadNote {
        card_id: String,
    },
    SaveNote {
        card_id: String,
        note: String,
    },
    ListFiles {
        card_id: String,
    },
    DeleteFile {
        card_id: String,
        filename: String,
    },
    SendChat(ChatRequest),
}

#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub api: ApiSettings,
    pub timing: TimingSettings,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to build api client: {0}")]
    Api(#[from] ApiError),
}

/// Owns the debounce timer and the upload pollers. All commands are handled
/// on a single task, so neither is ever shared.
pub struct Dispatcher {
    client: Arc<dyn ApiClient>,
    sink: Arc<dyn EventSink>,
    timing: TimingSettings,
    suggest: Debouncer,
    pollers: HashMap<TrackerId, PollerHandle>,
    shutdown: CancellationToken,
}

impl Dispatcher {
    pub fn new(
        client: Arc<dyn ApiClient>,
        sink: Arc<dyn EventSink>,
        timing: TimingSettings,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            client,
            sink,
            timing,
            suggest: Debouncer::new(timing.suggest_quiet_period),
            pollers: HashMap::new(),
            shutdown,
        }
    }

    /// Number of pollers that have not yet finished.
    pub fn active_pollers(&self) -> usize {
        self.pollers
            .values()
            .filter(|poller| !poller.is_finished())
            .count()
    }

    pub fn suggest_pending(&self) -> bool {
        self.suggest.is_pending()
    }

    /// Must be called from within a tokio runtime.
    pub fn handle(&mut self, command: EngineCommand) {
        self.pollers.retain(|_, poller| !poller.is_finished());

        match command {
            EngineCommand::LoadCards => {
                self.spawn_request(|client| async move {
                    EngineEvent::CardsLoaded(client.list_cards().await)
                });
            }
            EngineCommand::Search { query } => {
                self.spawn_request(|client| async move {
                    let result = client.search_cards(&query).await;
                    EngineEvent::SearchCompleted { query, result }
                });
            }
            EngineCommand::ScheduleSuggest { generation, query } => {
                let client = self.client.clone();
                let sink = self.sink.clone();
                self.suggest.schedule(async move {
                    client_debug!("suggest generation={} query={:?}", generation, query);
                    let result = client.suggest(&query).await;
                    sink.emit(EngineEvent::SuggestionsLoaded {
                        generation,
                        query,
                        result,
                    });
                });
            }
            EngineCommand::CancelSuggest => self.suggest.cancel(),
            EngineCommand::Upload { card_id, upload } => {
                client_info!(
                    "upload card_id={} filename={} content_type={}",
                    card_id,
                    upload.filename,
                    upload.content_type
                );
                self.spawn_request(|client| async move {
                    let result = client.upload_file(&card_id, &upload).await;
                    EngineEvent::UploadCompleted {
                        card_id,
                        filename: upload.filename,
                        result,
                    }
                });
            }
            EngineCommand::TrackUpload {
                tracker_id,
                status_id,
            } => {
                client_info!("tracking upload tracker_id={} status_id={}", tracker_id, status_id);
                let poller = StatusPoller::new(
                    tracker_id,
                    status_id,
                    self.client.clone(),
                    self.sink.clone(),
                    self.timing,
                )
                .spawn(&self.shutdown);
                if self.pollers.insert(tracker_id, poller).is_some() {
                    client_warn!("tracker_id={} replaced an existing poller", tracker_id);
                }
            }
            EngineCommand::StopTracking { tracker_id } => {
                if self.pollers.remove(&tracker_id).is_some() {
                    client_debug!("stopped poller tracker_id={}", tracker_id);
                }
            }
            EngineCommand::LoadNote { card_id } => {
                self.spawn_request(|client| async move {
                    let result = client.load_note(&card_id).await;
                    EngineEvent::NoteLoaded { card_id, result }
                });
            }
            EngineCommand::SaveNote { card_id, note } => {
                self.spawn_request(|client| async move {
                    let result = client.save_note(&card_id, &note).await;
                    EngineEvent::NoteSaved { card_id, result }
                });
            }
            EngineCommand::ListFiles { card_id } => {
                self.spawn_request(|client| async move {
                    let result = client.list_files(&card_id).await;
                    EngineEvent::FilesListed { card_id, result }
                });
            }
            EngineCommand::DeleteFile { card_id, filename } => {
                self.spawn_request(|client| async move {
                    let result = client.delete_file(&card_id, &filename).await;
                    EngineEvent::FileDeleted {
                        card_id,
                        filename,
                        result,
                    }
                });
            }
            EngineCommand::SendChat(request) => {
                self.spawn_request(|client| async move {
                    EngineEvent::ChatReplied(client.chat(&request).await)
                });
            }
        }
    }

    /// Runs `job` to completion on its own task and emits the resulting event.
    /// Plain requests are never cancelled once issued.
    fn spawn_request<F, Fut>(&self, job: F)
    where
        F: FnOnce(Arc<dyn ApiClient>) -> Fut,
        Fut: Future<Output = EngineEvent> + Send + 'static,
    {
        let request = job(self.client.clone());
        let sink = self.sink.clone();
        tokio::spawn(async move {
            sink.emit(request.await);
        });
    }

    async fn run(mut self, mut cmd_rx: async_mpsc::UnboundedReceiver<EngineCommand>) {
        let shutdown = self.shutdown.clone();
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                command = cmd_rx.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },
            }
        }
        client_info!("engine dispatcher stopped");
    }
}

/// Handle to the engine thread. Commands go in, events come out.
pub struct EngineHandle {
    cmd_tx: async_mpsc::UnboundedSender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    shutdown: CancellationToken,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let client = ReqwestApiClient::new(config.api)?;
        Self::with_client(Arc::new(client), config.timing)
    }

    pub fn with_client(
        client: Arc<dyn ApiClient>,
        timing: TimingSettings,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("cardsearch-engine-worker")
            .build()?;
        let (cmd_tx, cmd_rx) = async_mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel();
        let shutdown = CancellationToken::new();

        let sink: Arc<dyn EventSink> = Arc::new(ChannelEventSink::new(event_tx));
        let dispatcher = Dispatcher::new(client, sink, timing, shutdown.clone());

        thread::Builder::new()
            .name("cardsearch-engine".to_string())
            .spawn(move || {
                runtime.block_on(dispatcher.run(cmd_rx));
            })?;

        Ok(Self {
            cmd_tx,
            event_rx,
            shutdown,
        })
    }

    pub fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            client_warn!("engine is stopped; command dropped");
        }
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
