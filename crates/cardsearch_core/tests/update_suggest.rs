use std::sync::Once;

use cardsearch_core::{update, AppState, Effect, Msg, Suggestion};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

fn suggestion(text: &str) -> Suggestion {
    Suggestion {
        text: text.to_string(),
        kind: "company".to_string(),
        id: format!("id-{text}"),
    }
}

fn type_query(state: AppState, text: &str) -> (AppState, Vec<Effect>) {
    update(state, Msg::QueryChanged(text.to_string()))
}

fn focused() -> AppState {
    update(AppState::new(), Msg::InputFocused).0
}

/// Types `text` and answers its scheduled fetch with `items`.
fn with_suggestions(text: &str, items: Vec<Suggestion>) -> AppState {
    let (state, effects) = type_query(focused(), text);
    let generation = match effects.as_slice() {
        [Effect::ScheduleSuggest { generation, .. }] => *generation,
        other => panic!("expected a scheduled fetch, got {other:?}"),
    };
    update(
        state,
        Msg::SuggestionsLoaded {
            generation,
            result: Ok(items),
        },
    )
    .0
}

#[test]
fn short_queries_never_schedule_a_fetch() {
    init_logging();
    for text in ["", "a", " a ", "é"] {
        let (_, effects) = type_query(focused(), text);
        assert_eq!(effects, vec![Effect::CancelSuggest], "query {text:?}");
    }
}

#[test]
fn each_keystroke_reschedules_with_a_new_generation() {
    init_logging();
    let (state, first) = type_query(focused(), "ac");
    let (_, second) = type_query(state, "acm");

    assert_eq!(
        first,
        vec![Effect::ScheduleSuggest {
            generation: 1,
            query: "ac".to_string()
        }]
    );
    assert_eq!(
        second,
        vec![Effect::ScheduleSuggest {
            generation: 2,
            query: "acm".to_string()
        }]
    );
}

#[test]
fn scheduled_query_is_trimmed() {
    init_logging();
    let (_, effects) = type_query(focused(), "  acme  ");
    assert_eq!(
        effects,
        vec![Effect::ScheduleSuggest {
            generation: 1,
            query: "acme".to_string()
        }]
    );
}

#[test]
fn response_replaces_and_reveals_list() {
    init_logging();
    let state = with_suggestions("ac", vec![suggestion("Acme"), suggestion("Acorn")]);
    let view = state.view();

    assert!(view.suggestions.visible);
    assert_eq!(view.suggestions.items.len(), 2);
    assert_eq!(view.suggestions.items[0].text, "Acme");
}

#[test]
fn stale_response_is_dropped() {
    init_logging();
    let (state, _) = type_query(focused(), "ac");
    let (state, _) = type_query(state, "acm");

    let (mut state, effects) = update(
        state,
        Msg::SuggestionsLoaded {
            generation: 1,
            result: Ok(vec![suggestion("Acorn")]),
        },
    );

    assert!(effects.is_empty());
    assert!(state.view().suggestions.items.is_empty());
    assert!(!state.view().suggestions.visible);
    state.consume_dirty();

    let (state, _) = update(
        state,
        Msg::SuggestionsLoaded {
            generation: 2,
            result: Ok(vec![suggestion("Acme")]),
        },
    );
    assert_eq!(state.view().suggestions.items, vec![suggestion("Acme")]);
}

#[test]
fn failed_fetch_keeps_previous_suggestions() {
    init_logging();
    let state = with_suggestions("ac", vec![suggestion("Acme")]);
    let (state, effects) = type_query(state, "acx");
    let generation = match effects.as_slice() {
        [Effect::ScheduleSuggest { generation, .. }] => *generation,
        other => panic!("unexpected effects {other:?}"),
    };

    let (state, _) = update(
        state,
        Msg::SuggestionsLoaded {
            generation,
            result: Err("http status 500".to_string()),
        },
    );

    let view = state.view();
    assert_eq!(view.suggestions.items, vec![suggestion("Acme")]);
    assert!(view.suggestions.visible);
}

#[test]
fn shortening_below_threshold_clears_list_and_cancels() {
    init_logging();
    let state = with_suggestions("ac", vec![suggestion("Acme")]);
    let (state, effects) = type_query(state, "a");

    assert_eq!(effects, vec![Effect::CancelSuggest]);
    assert!(state.view().suggestions.items.is_empty());
    assert!(!state.view().suggestions.visible);
}

#[test]
fn response_after_clearing_is_stale() {
    init_logging();
    let (state, _) = type_query(focused(), "ac");
    let (state, _) = type_query(state, "");

    let (state, _) = update(
        state,
        Msg::SuggestionsLoaded {
            generation: 1,
            result: Ok(vec![suggestion("Acme")]),
        },
    );

    assert!(state.view().suggestions.items.is_empty());
}

#[test]
fn selecting_a_suggestion_hides_it_and_searches() {
    init_logging();
    let state = with_suggestions("ac", vec![suggestion("Acme"), suggestion("Acorn")]);
    let (state, effects) = update(state, Msg::SuggestionSelected(1));

    assert_eq!(
        effects,
        vec![
            Effect::CancelSuggest,
            Effect::Search {
                query: "Acorn".to_string()
            }
        ]
    );
    let view = state.view();
    assert_eq!(view.query, "Acorn");
    assert!(!view.suggestions.visible);
}

#[test]
fn selecting_out_of_range_is_ignored() {
    init_logging();
    let state = with_suggestions("ac", vec![suggestion("Acme")]);
    let (state, effects) = update(state, Msg::SuggestionSelected(3));

    assert!(effects.is_empty());
    assert!(state.view().suggestions.visible);
}

#[test]
fn blur_hides_and_focus_reveals() {
    init_logging();
    let state = with_suggestions("ac", vec![suggestion("Acme")]);

    let (state, effects) = update(state, Msg::InputBlurred);
    assert!(effects.is_empty());
    assert!(!state.view().suggestions.visible);

    let (state, _) = update(state, Msg::InputFocused);
    assert!(state.view().suggestions.visible);
}

#[test]
fn typing_after_blur_reveals_the_response() {
    init_logging();
    let (state, _) = update(focused(), Msg::InputBlurred);
    let (state, effects) = type_query(state, "ac");
    let generation = match effects.as_slice() {
        [Effect::ScheduleSuggest { generation, .. }] => *generation,
        other => panic!("expected a scheduled fetch, got {other:?}"),
    };

    let (state, _) = update(
        state,
        Msg::SuggestionsLoaded {
            generation,
            result: Ok(vec![suggestion("Acme")]),
        },
    );

    let view = state.view();
    assert!(view.suggestions.visible);
    assert_eq!(view.suggestions.items, vec![suggestion("Acme")]);
}

#[test]
fn response_while_unfocused_stays_hidden() {
    init_logging();
    let (state, _) = type_query(focused(), "ac");
    let (state, _) = update(state, Msg::InputBlurred);
    let (state, _) = update(
        state,
        Msg::SuggestionsLoaded {
            generation: 1,
            result: Ok(vec![suggestion("Acme")]),
        },
    );

    let view = state.view();
    assert_eq!(view.suggestions.items.len(), 1);
    assert!(!view.suggestions.visible);
}

#[test]
fn escape_hides_then_clears() {
    init_logging();
    let state = with_suggestions("ac", vec![suggestion("Acme")]);

    let (state, effects) = update(state, Msg::EscapePressed);
    assert!(effects.is_empty());
    assert!(!state.view().suggestions.visible);
    assert_eq!(state.view().query, "ac");

    let (state, effects) = update(state, Msg::EscapePressed);
    assert_eq!(effects, vec![Effect::CancelSuggest, Effect::LoadCards]);
    assert_eq!(state.view().query, "");
}
