mod common;

use std::sync::Arc;
use std::time::Duration;

use cardsearch_engine::{Dispatcher, EngineCommand, EngineEvent, TimingSettings};
use common::{init_logging, RecordingSink, ScriptedClient};
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;

fn dispatcher(client: &Arc<ScriptedClient>, sink: &Arc<RecordingSink>) -> Dispatcher {
    Dispatcher::new(
        client.clone(),
        sink.clone(),
        TimingSettings::default(),
        CancellationToken::new(),
    )
}

fn schedule(generation: u64, query: &str) -> EngineCommand {
    EngineCommand::ScheduleSuggest {
        generation,
        query: query.to_string(),
    }
}

#[tokio::test(start_paused = true)]
async fn only_the_last_query_in_the_window_is_sent() {
    init_logging();
    let client = Arc::new(ScriptedClient::default());
    let sink = Arc::new(RecordingSink::default());
    let mut dispatcher = dispatcher(&client, &sink);

    dispatcher.handle(schedule(1, "ac"));
    sleep(Duration::from_millis(100)).await;
    let last_keystroke = Instant::now();
    dispatcher.handle(schedule(2, "acm"));
    sleep(Duration::from_secs(1)).await;

    assert_eq!(client.suggest_queries(), vec!["acm".to_string()]);
    assert_eq!(
        client.suggest_times()[0] - last_keystroke,
        Duration::from_millis(300)
    );

    let loaded: Vec<_> = sink
        .events()
        .into_iter()
        .filter_map(|(_, event)| match event {
            EngineEvent::SuggestionsLoaded {
                generation, query, ..
            } => Some((generation, query)),
            _ => None,
        })
        .collect();
    assert_eq!(loaded, vec![(2, "acm".to_string())]);
}

#[tokio::test(start_paused = true)]
async fn burst_of_keystrokes_yields_one_request() {
    init_logging();
    let client = Arc::new(ScriptedClient::default());
    let sink = Arc::new(RecordingSink::default());
    let mut dispatcher = dispatcher(&client, &sink);

    for (generation, query) in ["ac", "acm", "acme", "acme ", "acme c"].iter().enumerate() {
        dispatcher.handle(schedule(generation as u64 + 1, query));
        sleep(Duration::from_millis(250)).await;
    }
    assert!(client.suggest_queries().is_empty());
    assert!(dispatcher.suggest_pending());

    sleep(Duration::from_millis(100)).await;
    assert_eq!(client.suggest_queries(), vec!["acme c".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn separate_quiet_periods_each_send_a_request() {
    init_logging();
    let client = Arc::new(ScriptedClient::default());
    let sink = Arc::new(RecordingSink::default());
    let mut dispatcher = dispatcher(&client, &sink);

    dispatcher.handle(schedule(1, "ac"));
    sleep(Duration::from_millis(400)).await;
    dispatcher.handle(schedule(2, "acm"));
    sleep(Duration::from_millis(400)).await;

    assert_eq!(
        client.suggest_queries(),
        vec!["ac".to_string(), "acm".to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn cancel_clears_pending_request() {
    init_logging();
    let client = Arc::new(ScriptedClient::default());
    let sink = Arc::new(RecordingSink::default());
    let mut dispatcher = dispatcher(&client, &sink);

    dispatcher.handle(schedule(1, "ac"));
    sleep(Duration::from_millis(200)).await;
    dispatcher.handle(EngineCommand::CancelSuggest);
    sleep(Duration::from_secs(1)).await;

    assert!(client.suggest_queries().is_empty());
    assert!(!dispatcher.suggest_pending());
    assert!(sink.events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn stop_tracking_cancels_the_poller() {
    init_logging();
    let client = Arc::new(ScriptedClient::with_statuses(vec![Ok(common::status(
        cardsearch_engine::UploadPhase::Processing,
        10.0,
    ))]));
    let sink = Arc::new(RecordingSink::default());
    let mut dispatcher = dispatcher(&client, &sink);

    dispatcher.handle(EngineCommand::TrackUpload {
        tracker_id: 3,
        status_id: "s-3".to_string(),
    });
    sleep(Duration::from_millis(1_100)).await;
    assert_eq!(dispatcher.active_pollers(), 1);

    dispatcher.handle(EngineCommand::StopTracking { tracker_id: 3 });
    let polls = client.status_times().len();
    sleep(Duration::from_secs(2)).await;

    assert_eq!(dispatcher.active_pollers(), 0);
    assert_eq!(client.status_times().len(), polls);
}
