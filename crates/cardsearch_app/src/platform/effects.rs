use cardsearch_core::{
    Card, ChatTurn, CompanyCard, DocumentHit, Effect, Msg, NoteHit, PersonCard, SearchResults,
    Suggestion, UploadReceipt, UploadState, UploadStatus,
};
use cardsearch_engine::{
    ApiError, CardRecord, ChatRequest, EngineCommand, EngineConfig, EngineError, EngineEvent,
    EngineHandle, FileUpload, UploadPhase, UploadStatusPayload,
};
use chrono::Local;
use client_logging::{client_debug, client_info, client_warn};

/// Bridges the pure core and the engine thread.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(api_base_url: String) -> Result<Self, EngineError> {
        let mut config = EngineConfig::default();
        config.api.base_url = api_base_url;
        let engine = EngineHandle::new(config)?;
        Ok(Self { engine })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            self.engine.send(command_for(effect));
        }
    }

    /// Converts every event that has arrived since the last call.
    pub fn drain_events(&self) -> Vec<Msg> {
        std::iter::from_fn(|| self.engine.try_recv())
            .map(msg_for_event)
            .collect()
    }

    pub fn shutdown(&self) {
        self.engine.shutdown();
    }
}

pub(crate) fn command_for(effect: Effect) -> EngineCommand {
    match effect {
        Effect::LoadCards => EngineCommand::LoadCards,
        Effect::Search { query } => {
            client_info!("search query={:?}", query);
            EngineCommand::Search { query }
        }
        Effect::ScheduleSuggest { generation, query } => {
            EngineCommand::ScheduleSuggest { generation, query }
        }
        Effect::CancelSuggest => EngineCommand::CancelSuggest,
        Effect::UploadFile {
            card_id,
            path,
            filename,
            content_type,
        } => EngineCommand::Upload {
            card_id,
            upload: FileUpload {
                path,
                filename,
                content_type,
            },
        },
        Effect::TrackUpload {
            tracker_id,
            status_id,
        } => EngineCommand::TrackUpload {
            tracker_id,
            status_id,
        },
        Effect::StopTracking { tracker_id } => EngineCommand::StopTracking { tracker_id },
        Effect::LoadNote { card_id } => EngineCommand::LoadNote { card_id },
        Effect::SaveNote { card_id, note } => EngineCommand::SaveNote { card_id, note },
        Effect::ListFiles { card_id } => EngineCommand::ListFiles { card_id },
        Effect::DeleteFile { card_id, filename } => {
            EngineCommand::DeleteFile { card_id, filename }
        }
        Effect::SendChat { message, history } => EngineCommand::SendChat(ChatRequest {
            message,
            conversation_history: history.into_iter().map(chat_turn).collect(),
        }),
    }
}

pub(crate) fn msg_for_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::CardsLoaded(result) => Msg::CardsLoaded(
            logged("load cards", result)
                .map(|cards| cards.into_iter().map(card_from_record).collect()),
        ),
        EngineEvent::SearchCompleted { query, result } => Msg::SearchCompleted {
            result: logged("search", result).map(results_from_wire),
            query,
        },
        EngineEvent::SuggestionsLoaded {
            generation,
            query,
            result,
        } => {
            client_debug!("suggestions generation={} query={:?}", generation, query);
            Msg::SuggestionsLoaded {
                generation,
                result: logged("suggest", result).map(|records| {
                    records
                        .into_iter()
                        .map(|record| Suggestion {
                            text: record.text,
                            kind: record.kind,
                            id: record.id,
                        })
                        .collect()
                }),
            }
        }
        EngineEvent::UploadCompleted {
            card_id,
            filename,
            result,
        } => Msg::UploadCompleted {
            card_id,
            filename,
            result: logged("upload", result).map(|receipt| UploadReceipt {
                filename: receipt.filename,
                status_id: receipt.status_id,
            }),
        },
        EngineEvent::UploadStatus { tracker_id, status } => Msg::UploadStatusReceived {
            tracker_id,
            status: status_from_wire(&status),
        },
        EngineEvent::TrackingFinished { tracker_id } => {
            Msg::UploadTrackingFinished { tracker_id }
        }
        EngineEvent::NoteLoaded { card_id, result } => Msg::NoteLoaded {
            result: logged("load note", result),
            card_id,
        },
        EngineEvent::NoteSaved { card_id, result } => Msg::NoteSaved {
            result: logged("save note", result),
            card_id,
        },
        EngineEvent::FilesListed { card_id, result } => Msg::FilesListed {
            result: logged("list files", result),
            card_id,
        },
        EngineEvent::FileDeleted {
            card_id,
            filename,
            result,
        } => Msg::FileDeleted {
            result: logged("delete file", result),
            card_id,
            filename,
        },
        EngineEvent::ChatReplied(result) => Msg::ChatReplied {
            result: logged("chat", result),
            received_at: clock_hhmm(),
        },
    }
}

/// Wall-clock time as shown next to chat messages.
pub(crate) fn clock_hhmm() -> String {
    Local::now().format("%H:%M").to_string()
}

fn logged<T>(operation: &str, result: Result<T, ApiError>) -> Result<T, String> {
    result.map_err(|err| {
        client_warn!("{} failed: {}", operation, err);
        err.to_string()
    })
}

fn chat_turn(turn: ChatTurn) -> cardsearch_engine::ChatTurn {
    cardsearch_engine::ChatTurn {
        role: turn.role.to_string(),
        content: turn.content,
    }
}

fn card_from_record(record: CardRecord) -> Card {
    match record {
        CardRecord::Company(company) => Card::Company(company_from_record(company)),
        CardRecord::Person(person) => Card::Person(person_from_record(person)),
    }
}

fn company_from_record(record: cardsearch_engine::CompanyRecord) -> CompanyCard {
    CompanyCard {
        id: record.id,
        name: record.name,
        industry: record.industry,
        description: record.description,
        founded: record.founded,
        location: record.location,
        website: record.website,
        linkedin_url: record.linkedin_url,
    }
}

fn person_from_record(record: cardsearch_engine::PersonRecord) -> PersonCard {
    PersonCard {
        id: record.id,
        name: record.name,
        designation: record.designation,
        company: record.company,
        linkedin_id: record.linkedin_id,
        linkedin_url: record.linkedin_url,
        education: record.education,
        experience_years: record.experience_years,
        location: record.location,
    }
}

fn results_from_wire(results: cardsearch_engine::SearchResults) -> SearchResults {
    SearchResults {
        companies: results
            .companies
            .into_iter()
            .map(company_from_record)
            .collect(),
        persons: results.persons.into_iter().map(person_from_record).collect(),
        notes: results
            .notes
            .into_iter()
            .map(|hit| NoteHit {
                card_id: hit.card_id,
                card_name: hit.card_name,
                note: hit.note,
            })
            .collect(),
        documents: results
            .documents
            .into_iter()
            .map(|hit| DocumentHit {
                card_id: hit.card_id,
                filename: hit.filename,
                snippet: hit.snippet,
            })
            .collect(),
    }
}

fn status_from_wire(payload: &UploadStatusPayload) -> UploadStatus {
    let state = match payload.status {
        UploadPhase::Queued => UploadState::Queued,
        UploadPhase::Processing | UploadPhase::Unknown => UploadState::Processing,
        UploadPhase::Completed => UploadState::Completed,
        UploadPhase::Failed => UploadState::Failed,
    };
    UploadStatus::new(
        state,
        payload.progress_percent(),
        payload.message.clone(),
        payload.chunks_total,
        payload.chunks_indexed_clamped(),
    )
}
