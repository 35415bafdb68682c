use crate::chat::{ChatSender, ChatState};
use crate::state::{LOAD_FAILED, SEARCH_FAILED};
use crate::suggest::meets_suggest_threshold;
use crate::{is_allowed_upload_type, AppState, Card, Effect, Msg, SearchResults};

pub const ALERT_UNSUPPORTED_FILE: &str = "Please upload a PDF or DOCX file";
pub const ALERT_UPLOAD_SUCCEEDED: &str = "File uploaded successfully!";
pub const ALERT_UPLOAD_FAILED: &str = "Failed to upload file";
pub const ALERT_NOTE_SAVE_FAILED: &str = "Failed to save note";
pub const ALERT_FILE_DELETE_FAILED: &str = "Failed to delete file";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started | Msg::ReloadRequested => load_all_cards(&mut state),
        Msg::QueryChanged(text) => {
            // Typing implies the input has focus.
            state.suggest.focused = true;
            state.search.input = text;
            state.mark_dirty();
            if meets_suggest_threshold(&state.search.input) {
                let generation = state.suggest.next_generation();
                vec![Effect::ScheduleSuggest {
                    generation,
                    query: state.search.input.trim().to_string(),
                }]
            } else {
                state.suggest.clear();
                vec![Effect::CancelSuggest]
            }
        }
        Msg::SearchSubmitted => {
            let query = state.search.input.trim().to_string();
            submit_search(&mut state, query)
        }
        Msg::CardsLoaded(result) => {
            state.search.loading = false;
            state.mark_dirty();
            if !state.search.active_query.is_empty() {
                // A search was submitted while the full list was loading.
                return (state, Vec::new());
            }
            match result {
                Ok(cards) => {
                    state.search.error = None;
                    let results = SearchResults::from_cards(cards.iter().cloned());
                    install_results(&mut state, results, cards)
                }
                Err(_) => {
                    state.search.error = Some(LOAD_FAILED.to_string());
                    Vec::new()
                }
            }
        }
        Msg::SearchCompleted { query, result } => {
            if query != state.search.active_query {
                return (state, Vec::new());
            }
            state.search.searching = false;
            state.mark_dirty();
            match result {
                Ok(results) => {
                    state.search.error = None;
                    let cards = results.cards().collect();
                    install_results(&mut state, results, cards)
                }
                Err(_) => {
                    state.search.error = Some(SEARCH_FAILED.to_string());
                    Vec::new()
                }
            }
        }
        Msg::SuggestionsLoaded { generation, result } => {
            if generation != state.suggest.generation {
                return (state, Vec::new());
            }
            // Failures leave the previous list in place.
            if let Ok(suggestions) = result {
                state.suggest.suggestions = suggestions;
                state.suggest.visible = state.suggest.focused;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SuggestionSelected(index) => {
            let Some(suggestion) = state.suggest.suggestions.get(index).cloned() else {
                return (state, Vec::new());
            };
            state.search.input = suggestion.text.clone();
            submit_search(&mut state, suggestion.text)
        }
        Msg::InputFocused => {
            state.suggest.focused = true;
            if !state.suggest.suggestions.is_empty() && meets_suggest_threshold(&state.search.input)
            {
                state.suggest.visible = true;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::InputBlurred => {
            state.suggest.focused = false;
            if state.suggest.visible {
                state.suggest.hide();
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::EscapePressed => {
            if state.suggest.visible {
                state.suggest.hide();
                state.mark_dirty();
                Vec::new()
            } else {
                state.search.input.clear();
                submit_search(&mut state, String::new())
            }
        }
        Msg::UploadRequested {
            card_id,
            path,
            filename,
            content_type,
        } => {
            if !is_allowed_upload_type(&content_type) {
                state.alert(ALERT_UNSUPPORTED_FILE);
                return (state, Vec::new());
            }
            let panel = state.panel_mut(&card_id);
            if panel.uploading {
                return (state, Vec::new());
            }
            panel.uploading = true;
            state.mark_dirty();
            vec![Effect::UploadFile {
                card_id,
                path,
                filename,
                content_type,
            }]
        }
        Msg::UploadCompleted {
            card_id,
            filename,
            result,
        } => {
            state.panel_mut(&card_id).uploading = false;
            state.mark_dirty();
            match result {
                Ok(receipt) => {
                    state.panel_mut(&card_id).uploaded_files.push(receipt.filename);
                    match receipt.status_id {
                        Some(status_id) => {
                            let tracker_id = state.start_tracker(card_id, filename);
                            vec![Effect::TrackUpload {
                                tracker_id,
                                status_id,
                            }]
                        }
                        None => {
                            state.alert(ALERT_UPLOAD_SUCCEEDED);
                            Vec::new()
                        }
                    }
                }
                Err(_) => {
                    state.alert(ALERT_UPLOAD_FAILED);
                    Vec::new()
                }
            }
        }
        Msg::UploadStatusReceived { tracker_id, status } => {
            if let Some(tracker) = state.trackers.get_mut(&tracker_id) {
                tracker.status = Some(status);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::UploadTrackingFinished { tracker_id } => {
            if state.trackers.remove(&tracker_id).is_some() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::NoteRequested { card_id } => {
            state.panel_mut(&card_id);
            vec![Effect::LoadNote { card_id }]
        }
        Msg::NoteLoaded { card_id, result } => {
            // Load failures are only logged by the shell.
            if let Ok(text) = result {
                let note = &mut state.panel_mut(&card_id).note;
                if !note.changed {
                    note.text = text;
                    state.mark_dirty();
                }
            }
            Vec::new()
        }
        Msg::NoteEdited { card_id, text } => {
            let note = &mut state.panel_mut(&card_id).note;
            note.text = text;
            note.changed = true;
            state.mark_dirty();
            Vec::new()
        }
        Msg::NoteSaveRequested { card_id } => {
            let note = &mut state.panel_mut(&card_id).note;
            if !note.changed || note.saving {
                return (state, Vec::new());
            }
            note.saving = true;
            note.pending_save = Some(note.text.clone());
            let text = note.text.clone();
            state.mark_dirty();
            vec![Effect::SaveNote {
                card_id,
                note: text,
            }]
        }
        Msg::NoteSaved { card_id, result } => {
            let note = &mut state.panel_mut(&card_id).note;
            note.saving = false;
            let sent = note.pending_save.take();
            let failed = result.is_err();
            if !failed && sent.as_deref() == Some(note.text.as_str()) {
                note.changed = false;
            }
            if failed {
                state.alert(ALERT_NOTE_SAVE_FAILED);
            }
            state.mark_dirty();
            Vec::new()
        }
        Msg::FilesRequested { card_id } => vec![Effect::ListFiles { card_id }],
        Msg::FilesListed { card_id, result } => {
            if let Ok(files) = result {
                state.panel_mut(&card_id).uploaded_files = files;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::FileDeleteRequested { card_id, filename } => {
            vec![Effect::DeleteFile { card_id, filename }]
        }
        Msg::FileDeleted {
            card_id,
            filename,
            result,
        } => {
            match result {
                Ok(()) => {
                    state
                        .panel_mut(&card_id)
                        .uploaded_files
                        .retain(|name| name != &filename);
                    state.mark_dirty();
                }
                Err(_) => state.alert(ALERT_FILE_DELETE_FAILED),
            }
            Vec::new()
        }
        Msg::ChatToggled => {
            if state.chat.open {
                // Closing discards the conversation; reopening starts over.
                state.chat = ChatState::default();
            } else {
                state.chat.open = true;
            }
            state.mark_dirty();
            Vec::new()
        }
        Msg::ChatSubmitted { text, sent_at } => {
            let message = text.trim().to_string();
            if message.is_empty() || state.chat.waiting {
                return (state, Vec::new());
            }
            state.chat.open = true;
            let history = state.chat.history();
            state.push_chat(ChatSender::User, message.clone(), sent_at);
            state.chat.waiting = true;
            state.mark_dirty();
            vec![Effect::SendChat { message, history }]
        }
        Msg::ChatReplied {
            result,
            received_at,
        } => {
            if !state.chat.waiting {
                // The conversation it answers was closed.
                return (state, Vec::new());
            }
            let reply = result.unwrap_or_else(|_| crate::CHAT_FALLBACK_REPLY.to_string());
            state.chat.waiting = false;
            state.push_chat(ChatSender::Ai, reply, received_at);
            state.mark_dirty();
            Vec::new()
        }
        Msg::Tick => Vec::new(),
    };

    (state, effects)
}

fn load_all_cards(state: &mut AppState) -> Vec<Effect> {
    state.search.active_query.clear();
    state.search.loading = true;
    state.search.searching = false;
    state.search.error = None;
    state.mark_dirty();
    vec![Effect::LoadCards]
}

/// Runs a search for `query`, or reloads all cards when it is empty. Either
/// way the suggestion dropdown is dismissed and any pending fetch dropped.
fn submit_search(state: &mut AppState, query: String) -> Vec<Effect> {
    state.suggest.clear();
    let mut effects = vec![Effect::CancelSuggest];
    if query.is_empty() {
        effects.extend(load_all_cards(state));
        return effects;
    }
    state.search.active_query = query.clone();
    state.search.searching = true;
    state.search.error = None;
    state.mark_dirty();
    effects.push(Effect::Search { query });
    effects
}

/// Shows a new result set: stops trackers of cards that went away and loads
/// the note of each card seen for the first time.
fn install_results(
    state: &mut AppState,
    results: SearchResults,
    cards: Vec<Card>,
) -> Vec<Effect> {
    let mut effects: Vec<Effect> = state
        .replace_results(results, cards)
        .into_iter()
        .map(|tracker_id| Effect::StopTracking { tracker_id })
        .collect();
    effects.extend(
        state
            .open_new_panels()
            .into_iter()
            .map(|card_id| Effect::LoadNote { card_id }),
    );
    effects
}
