use std::collections::BTreeMap;

use crate::chat::{ChatSender, ChatState};
use crate::panel::CardPanel;
use crate::suggest::SuggestState;
use crate::view_model::{
    AppViewModel, CardView, ChatView, SuggestionsView, UploadOutcome, UploadProgressView,
};
use crate::{Card, CardId, SearchResults, TrackerId, UploadTracker};

pub(crate) const LOAD_FAILED: &str = "Failed to fetch cards";
pub(crate) const SEARCH_FAILED: &str = "Search failed";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct SearchState {
    /// Text currently in the input box.
    pub(crate) input: String,
    /// Last submitted query; empty means "all cards".
    pub(crate) active_query: String,
    pub(crate) results: SearchResults,
    /// Cards in display order.
    pub(crate) cards: Vec<Card>,
    pub(crate) loading: bool,
    pub(crate) searching: bool,
    pub(crate) error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pub(crate) search: SearchState,
    pub(crate) suggest: SuggestState,
    pub(crate) panels: BTreeMap<CardId, CardPanel>,
    pub(crate) trackers: BTreeMap<TrackerId, UploadTracker>,
    next_tracker_id: TrackerId,
    pub(crate) chat: ChatState,
    alerts: Vec<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let search = &self.search;
        let cards: Vec<CardView> = search
            .cards
            .iter()
            .cloned()
            .map(|card| {
                let panel = self.panels.get(card.id()).cloned().unwrap_or_default();
                CardView {
                    card,
                    note: panel.note.text,
                    note_changed: panel.note.changed,
                    note_saving: panel.note.saving,
                    uploading: panel.uploading,
                    uploaded_files: panel.uploaded_files,
                }
            })
            .collect();

        let busy = search.loading || search.searching;
        let results_info = (!search.active_query.is_empty() && !search.searching).then(|| {
            let count = search.results.total();
            if count > 0 {
                format!(
                    "Found {} result{} for \"{}\"",
                    count,
                    if count == 1 { "" } else { "s" },
                    search.active_query
                )
            } else {
                format!("No results found for \"{}\"", search.active_query)
            }
        });

        AppViewModel {
            query: search.input.clone(),
            suggestions: SuggestionsView {
                visible: self.suggest.visible,
                items: self.suggest.suggestions.clone(),
            },
            show_spinner: busy && cards.is_empty() && search.error.is_none(),
            error: search.error.clone(),
            results_info: results_info.filter(|_| search.error.is_none()),
            show_empty_hint: search.active_query.is_empty()
                && !busy
                && cards.is_empty()
                && search.error.is_none(),
            cards,
            notes: search.results.notes.clone(),
            documents: search.results.documents.clone(),
            uploads: self.upload_views(),
            chat: self.chat.open.then(|| ChatView {
                messages: self.chat.messages.clone(),
                waiting: self.chat.waiting,
            }),
            alerts: self.alerts.clone(),
            dirty: self.dirty,
        }
    }

    fn upload_views(&self) -> Vec<UploadProgressView> {
        self.trackers
            .values()
            .filter_map(|tracker| {
                let status = tracker.status.as_ref()?;
                Some(UploadProgressView {
                    tracker_id: tracker.tracker_id,
                    card_id: tracker.card_id.clone(),
                    filename: tracker.filename.clone(),
                    progress: status.progress(),
                    message: status.message().to_string(),
                    chunks: status.chunk_counter(),
                    outcome: match status.state() {
                        crate::UploadState::Completed => UploadOutcome::Completed,
                        crate::UploadState::Failed => UploadOutcome::Failed,
                        _ => UploadOutcome::Active,
                    },
                })
            })
            .collect()
    }

    /// Returns whether a render is needed and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Drains blocking alerts raised since the last call.
    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }

    /// Trackers that have not been dismissed yet, in creation order.
    pub fn trackers(&self) -> impl Iterator<Item = &UploadTracker> {
        self.trackers.values()
    }

    pub fn tracker(&self, tracker_id: TrackerId) -> Option<&UploadTracker> {
        self.trackers.get(&tracker_id)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn alert(&mut self, message: impl Into<String>) {
        self.alerts.push(message.into());
        self.dirty = true;
    }

    pub(crate) fn panel_mut(&mut self, card_id: &str) -> &mut CardPanel {
        self.panels.entry(card_id.to_string()).or_default()
    }

    pub(crate) fn start_tracker(&mut self, card_id: CardId, filename: String) -> TrackerId {
        self.next_tracker_id += 1;
        let tracker_id = self.next_tracker_id;
        self.trackers.insert(
            tracker_id,
            UploadTracker {
                tracker_id,
                card_id,
                filename,
                status: None,
            },
        );
        tracker_id
    }

    /// Installs a new result set shown as `cards`, and drops trackers whose
    /// card is no longer shown. Returns the dropped tracker ids.
    pub(crate) fn replace_results(
        &mut self,
        results: SearchResults,
        cards: Vec<Card>,
    ) -> Vec<TrackerId> {
        self.search.results = results;
        self.search.cards = cards;
        let results = &self.search.results;
        let orphaned: Vec<TrackerId> = self
            .trackers
            .values()
            .filter(|tracker| !results.contains_card(&tracker.card_id))
            .map(|tracker| tracker.tracker_id)
            .collect();
        for tracker_id in &orphaned {
            self.trackers.remove(tracker_id);
        }
        orphaned
    }

    /// Opens a panel for every shown card that has none yet and returns
    /// their ids; those notes still need loading.
    pub(crate) fn open_new_panels(&mut self) -> Vec<CardId> {
        let mut fresh = Vec::new();
        for card in &self.search.cards {
            if !self.panels.contains_key(card.id()) {
                self.panels.insert(card.id().to_string(), CardPanel::default());
                fresh.push(card.id().to_string());
            }
        }
        fresh
    }

    pub(crate) fn push_chat(&mut self, sender: ChatSender, text: String, timestamp: String) {
        self.chat.push(sender, text, timestamp);
    }
}
