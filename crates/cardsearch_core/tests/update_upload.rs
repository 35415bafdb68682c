use std::path::PathBuf;
use std::sync::Once;

use cardsearch_core::{
    update, AppState, Card, CompanyCard, Effect, Msg, SearchResults, UploadOutcome,
    UploadReceipt, UploadState, UploadStatus, ALERT_UNSUPPORTED_FILE, ALERT_UPLOAD_FAILED,
    ALERT_UPLOAD_SUCCEEDED,
};
use pretty_assertions::assert_eq;

const PDF: &str = "application/pdf";

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

fn company(id: &str) -> Card {
    Card::Company(CompanyCard {
        id: id.to_string(),
        name: format!("Company {id}"),
        ..CompanyCard::default()
    })
}

fn with_cards(ids: &[&str]) -> AppState {
    let (state, _) = update(AppState::new(), Msg::Started);
    update(
        state,
        Msg::CardsLoaded(Ok(ids.iter().map(|id| company(id)).collect())),
    )
    .0
}

fn request_upload(state: AppState, card_id: &str, content_type: &str) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::UploadRequested {
            card_id: card_id.to_string(),
            path: PathBuf::from("/tmp/deck.pdf"),
            filename: "deck.pdf".to_string(),
            content_type: content_type.to_string(),
        },
    )
}

fn complete_upload(state: AppState, card_id: &str, status_id: Option<&str>) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::UploadCompleted {
            card_id: card_id.to_string(),
            filename: "deck.pdf".to_string(),
            result: Ok(UploadReceipt {
                filename: "deck.pdf".to_string(),
                status_id: status_id.map(ToOwned::to_owned),
            }),
        },
    )
}

fn status(state: UploadState, progress: u8) -> UploadStatus {
    UploadStatus::new(state, progress, format!("{state:?}"), 10, u64::from(progress) / 10)
}

#[test]
fn unsupported_type_alerts_without_request() {
    init_logging();
    let (mut state, effects) = request_upload(with_cards(&["c1"]), "c1", "image/png");

    assert!(effects.is_empty());
    assert_eq!(state.take_alerts(), vec![ALERT_UNSUPPORTED_FILE.to_string()]);
    assert!(!state.view().cards[0].uploading);
}

#[test]
fn supported_upload_emits_effect_and_marks_uploading() {
    init_logging();
    let (state, effects) = request_upload(
        with_cards(&["c1"]),
        "c1",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    );

    assert_eq!(effects.len(), 1);
    assert!(matches!(&effects[0], Effect::UploadFile { card_id, .. } if card_id == "c1"));
    assert!(state.view().cards[0].uploading);

    let (_, effects) = request_upload(state, "c1", PDF);
    assert!(effects.is_empty(), "second upload waits for the first");
}

#[test]
fn receipt_with_status_id_starts_tracking() {
    init_logging();
    let (state, _) = request_upload(with_cards(&["c1"]), "c1", PDF);
    let (mut state, effects) = complete_upload(state, "c1", Some("s-1"));

    assert_eq!(
        effects,
        vec![Effect::TrackUpload {
            tracker_id: 1,
            status_id: "s-1".to_string()
        }]
    );
    assert!(state.take_alerts().is_empty());
    let view = state.view();
    assert!(!view.cards[0].uploading);
    assert_eq!(view.cards[0].uploaded_files, vec!["deck.pdf".to_string()]);
    assert!(view.uploads.is_empty(), "hidden until the first status arrives");
}

#[test]
fn receipt_without_status_id_alerts_success() {
    init_logging();
    let (state, _) = request_upload(with_cards(&["c1"]), "c1", PDF);
    let (mut state, effects) = complete_upload(state, "c1", None);

    assert!(effects.is_empty());
    assert_eq!(state.take_alerts(), vec![ALERT_UPLOAD_SUCCEEDED.to_string()]);
}

#[test]
fn upload_failure_alerts() {
    init_logging();
    let (state, _) = request_upload(with_cards(&["c1"]), "c1", PDF);
    let (mut state, effects) = update(
        state,
        Msg::UploadCompleted {
            card_id: "c1".to_string(),
            filename: "deck.pdf".to_string(),
            result: Err("http status 413".to_string()),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.take_alerts(), vec![ALERT_UPLOAD_FAILED.to_string()]);
    assert!(state.view().cards[0].uploaded_files.is_empty());
}

#[test]
fn status_sequence_drives_progress_view_until_dismissed() {
    init_logging();
    let (state, _) = request_upload(with_cards(&["c1"]), "c1", PDF);
    let (mut state, _) = complete_upload(state, "c1", Some("s-1"));

    for (phase, progress) in [
        (UploadState::Processing, 40),
        (UploadState::Processing, 75),
        (UploadState::Completed, 100),
    ] {
        let (next, effects) = update(
            state,
            Msg::UploadStatusReceived {
                tracker_id: 1,
                status: status(phase, progress),
            },
        );
        assert!(effects.is_empty());
        state = next;
        assert_eq!(state.view().uploads[0].progress, progress);
    }

    let upload = state.view().uploads[0].clone();
    assert_eq!(upload.outcome, UploadOutcome::Completed);
    assert_eq!(upload.chunks, Some((10, 10)));
    assert_eq!(upload.filename, "deck.pdf");

    let (state, effects) = update(state, Msg::UploadTrackingFinished { tracker_id: 1 });
    assert!(effects.is_empty());
    assert!(state.view().uploads.is_empty());
    assert!(state.tracker(1).is_none());
}

#[test]
fn snapshot_keeps_chunks_within_total() {
    let status = UploadStatus::new(UploadState::Processing, 180, "Indexing", 3, 7);

    assert_eq!(status.progress(), 100);
    assert_eq!(status.chunks_indexed(), 3);
    assert_eq!(status.chunk_counter(), Some((3, 3)));
    assert_eq!(
        UploadStatus::new(UploadState::Queued, 0, "", 0, 0).chunk_counter(),
        None
    );
}

#[test]
fn independent_uploads_get_independent_trackers() {
    init_logging();
    let (state, _) = request_upload(with_cards(&["c1", "c2"]), "c1", PDF);
    let (state, _) = request_upload(state, "c2", PDF);
    let (state, first) = complete_upload(state, "c1", Some("s-1"));
    let (state, second) = complete_upload(state, "c2", Some("s-2"));

    assert_eq!(
        [first, second].concat(),
        vec![
            Effect::TrackUpload {
                tracker_id: 1,
                status_id: "s-1".to_string()
            },
            Effect::TrackUpload {
                tracker_id: 2,
                status_id: "s-2".to_string()
            },
        ]
    );
    assert_eq!(state.trackers().count(), 2);
}

#[test]
fn replacing_results_stops_trackers_of_hidden_cards() {
    init_logging();
    let (state, _) = request_upload(with_cards(&["c1", "c2"]), "c1", PDF);
    let (state, _) = request_upload(state, "c2", PDF);
    let (state, _) = complete_upload(state, "c1", Some("s-1"));
    let (state, _) = complete_upload(state, "c2", Some("s-2"));

    let (state, _) = update(state, Msg::QueryChanged("second".to_string()));
    let (state, _) = update(state, Msg::SearchSubmitted);
    let (state, effects) = update(
        state,
        Msg::SearchCompleted {
            query: "second".to_string(),
            result: Ok(SearchResults::from_cards(vec![company("c2")])),
        },
    );

    assert_eq!(effects, vec![Effect::StopTracking { tracker_id: 1 }]);
    let remaining: Vec<_> = state.trackers().map(|t| t.tracker_id).collect();
    assert_eq!(remaining, vec![2]);
}
