use crate::Suggestion;

pub type Generation = u64;

/// Queries shorter than this (in characters, after trimming) never fetch.
pub const MIN_SUGGEST_CHARS: usize = 2;

pub fn meets_suggest_threshold(query: &str) -> bool {
    query.trim().chars().count() >= MIN_SUGGEST_CHARS
}

/// Autosuggest dropdown state.
///
/// `generation` identifies the latest scheduled fetch; responses carrying any
/// other generation are stale and dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SuggestState {
    pub(crate) generation: Generation,
    pub(crate) suggestions: Vec<Suggestion>,
    pub(crate) visible: bool,
    pub(crate) focused: bool,
}

impl SuggestState {
    pub(crate) fn next_generation(&mut self) -> Generation {
        self.generation += 1;
        self.generation
    }

    /// Drops the list and invalidates any request in flight.
    pub(crate) fn clear(&mut self) {
        self.suggestions.clear();
        self.visible = false;
        self.generation += 1;
    }

    pub(crate) fn hide(&mut self) {
        self.visible = false;
    }
}
