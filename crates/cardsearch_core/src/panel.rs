/// Note editor for one card.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NoteEditor {
    pub(crate) text: String,
    pub(crate) changed: bool,
    pub(crate) saving: bool,
    /// Text sent by the save in flight.
    pub(crate) pending_save: Option<String>,
}

/// Per-card view state: note editor, upload button and file list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CardPanel {
    pub(crate) note: NoteEditor,
    pub(crate) uploading: bool,
    pub(crate) uploaded_files: Vec<String>,
}
