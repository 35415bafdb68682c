use std::path::{Path, PathBuf};

use cardsearch_core::Msg;

pub(crate) const HELP: &str = "\
commands:
  type <text>          edit the search box (suggestions after a short pause)
  search [text]        run a search; empty reloads every card
  pick <n>             choose suggestion n
  focus | blur | esc   search box focus and Escape
  reload               reload all cards
  upload <card> <path> attach a PDF or DOCX file to a card
  note <card>          load a card's note
  edit <card> [text]   replace a card's note text (empty clears it)
  save <card>          save a card's note
  files <card>         list a card's files
  rm <card> <file>     delete a card file
  chat <text>          ask the assistant
  chat-toggle          open or close the chat panel
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Input {
    Msgs(Vec<Msg>),
    Help,
    Quit,
    Empty,
    Invalid(String),
}

/// Parses one shell line. `now` stamps chat messages.
pub(crate) fn parse_line(line: &str, now: &str) -> Input {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Input::Empty;
    }
    let (command, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (trimmed, ""),
    };

    match command {
        "type" => one(Msg::QueryChanged(rest.to_string())),
        "search" if rest.is_empty() => one(Msg::SearchSubmitted),
        "search" => Input::Msgs(vec![
            Msg::QueryChanged(rest.to_string()),
            Msg::SearchSubmitted,
        ]),
        "pick" => match rest.parse::<usize>() {
            Ok(n) if n > 0 => one(Msg::SuggestionSelected(n - 1)),
            _ => Input::Invalid(format!("pick expects a suggestion number, got {rest:?}")),
        },
        "focus" => one(Msg::InputFocused),
        "blur" => one(Msg::InputBlurred),
        "esc" => one(Msg::EscapePressed),
        "reload" => one(Msg::ReloadRequested),
        "upload" => match card_and_rest(rest) {
            Some((card_id, path)) => upload(card_id, Path::new(path)),
            None => usage("upload <card> <path>"),
        },
        "note" => with_card(rest, "note <card>", |card_id| Msg::NoteRequested { card_id }),
        "edit" => edit_note(line.trim_start()),
        "save" => with_card(rest, "save <card>", |card_id| Msg::NoteSaveRequested {
            card_id,
        }),
        "files" => with_card(rest, "files <card>", |card_id| Msg::FilesRequested { card_id }),
        "rm" => match card_and_rest(rest) {
            Some((card_id, filename)) => one(Msg::FileDeleteRequested {
                card_id: card_id.to_string(),
                filename: filename.to_string(),
            }),
            None => usage("rm <card> <file>"),
        },
        "chat" if rest.is_empty() => usage("chat <text>"),
        "chat" => one(Msg::ChatSubmitted {
            text: rest.to_string(),
            sent_at: now.to_string(),
        }),
        "chat-toggle" => one(Msg::ChatToggled),
        "help" | "?" => Input::Help,
        "quit" | "exit" => Input::Quit,
        other => Input::Invalid(format!("unknown command {other:?}; type help")),
    }
}

/// Content type a file picker would report for `path`.
pub(crate) fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("doc") => "application/msword",
        Some("txt") => "text/plain",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

fn upload(card_id: &str, path: &Path) -> Input {
    let Some(filename) = path.file_name().and_then(|name| name.to_str()) else {
        return Input::Invalid(format!("{} is not a file path", path.display()));
    };
    one(Msg::UploadRequested {
        card_id: card_id.to_string(),
        path: PathBuf::from(path),
        filename: filename.to_string(),
        content_type: content_type_for(path).to_string(),
    })
}

/// `edit <card> [text]`: the text is kept exactly as typed after the single
/// space following the card id, and may be empty to clear the note.
fn edit_note(line: &str) -> Input {
    let args = line
        .strip_prefix("edit")
        .unwrap_or_default()
        .trim_start();
    let (card_id, text) = match args.split_once(char::is_whitespace) {
        Some((card_id, text)) => (card_id, text),
        None => (args.trim_end(), ""),
    };
    if card_id.is_empty() {
        return usage("edit <card> [text]");
    }
    one(Msg::NoteEdited {
        card_id: card_id.to_string(),
        text: text.to_string(),
    })
}

fn one(msg: Msg) -> Input {
    Input::Msgs(vec![msg])
}

fn usage(form: &str) -> Input {
    Input::Invalid(format!("usage: {form}"))
}

fn with_card(rest: &str, form: &str, build: impl FnOnce(String) -> Msg) -> Input {
    match rest.split_whitespace().next() {
        Some(card_id) => one(build(card_id.to_string())),
        None => usage(form),
    }
}

/// Splits `<card> <remainder>`; the remainder may contain spaces.
fn card_and_rest(rest: &str) -> Option<(&str, &str)> {
    let (card_id, remainder) = rest.split_once(char::is_whitespace)?;
    let remainder = remainder.trim();
    (!remainder.is_empty()).then_some((card_id, remainder))
}
