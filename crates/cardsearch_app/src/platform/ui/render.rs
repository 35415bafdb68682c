use cardsearch_core::{
    AppViewModel, Card, CardView, ChatSender, ChatView, CompanyCard, PersonCard, UploadOutcome,
    UploadProgressView,
};

const EMPTY_HINT: &str = "Start searching to find companies and people";
const SPINNER: &str = "Loading cards...";
const THINKING: &str = "AI is thinking...";

/// Renders the whole view as plain text, one frame per call.
pub fn render(view: &AppViewModel) -> String {
    let mut lines = vec![String::new(), "== Search ==".to_string(), format!("> {}", view.query)];

    if view.suggestions.visible {
        for (index, suggestion) in view.suggestions.items.iter().enumerate() {
            lines.push(format!(
                "   {}. {} ({})",
                index + 1,
                suggestion.text,
                suggestion.kind
            ));
        }
    }

    if let Some(error) = &view.error {
        lines.push(format!("{error} (type `reload` to retry)"));
    }
    if view.show_spinner {
        lines.push(SPINNER.to_string());
    }
    if let Some(info) = &view.results_info {
        lines.push(info.clone());
    }

    for card in &view.cards {
        render_card(&mut lines, card);
    }

    if !view.notes.is_empty() {
        lines.push("-- Notes --".to_string());
        for hit in &view.notes {
            let owner = hit.card_name.as_deref().unwrap_or(&hit.card_id);
            lines.push(format!("  {owner}: {}", hit.note));
        }
    }
    if !view.documents.is_empty() {
        lines.push("-- Documents --".to_string());
        for hit in &view.documents {
            match &hit.snippet {
                Some(snippet) => {
                    lines.push(format!("  {} [{}]: {snippet}", hit.filename, hit.card_id))
                }
                None => lines.push(format!("  {} [{}]", hit.filename, hit.card_id)),
            }
        }
    }

    if view.show_empty_hint {
        lines.push(EMPTY_HINT.to_string());
    }

    for upload in &view.uploads {
        lines.push(upload_line(upload));
    }

    if let Some(chat) = &view.chat {
        render_chat(&mut lines, chat);
    }

    for alert in &view.alerts {
        lines.push(format!("!! {alert}"));
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn render_card(lines: &mut Vec<String>, view: &CardView) {
    let kind = match &view.card {
        Card::Company(_) => "company",
        Card::Person(_) => "person",
    };
    lines.push(format!("[{kind} {}] {}", view.card.id(), view.card.name()));
    match &view.card {
        Card::Company(company) => render_company(lines, company),
        Card::Person(person) => render_person(lines, person),
    }

    if !view.note.is_empty() || view.note_changed {
        let marker = if view.note_saving {
            " (saving...)"
        } else if view.note_changed {
            " (unsaved)"
        } else {
            ""
        };
        lines.push(format!("    note{marker}: {}", view.note));
    }
    if view.uploading {
        lines.push("    uploading...".to_string());
    }
    if !view.uploaded_files.is_empty() {
        lines.push(format!("    files: {}", view.uploaded_files.join(", ")));
    }
}

fn render_company(lines: &mut Vec<String>, company: &CompanyCard) {
    push_field(lines, None, company.industry.as_deref());
    push_field(lines, None, company.description.as_deref());
    push_field(lines, Some("Founded"), company.founded.as_deref());
    push_field(lines, Some("Location"), company.location.as_deref());
    push_field(lines, Some("Website"), company.website.as_deref());
    push_field(lines, Some("LinkedIn"), company.linkedin_url.as_deref());
}

fn render_person(lines: &mut Vec<String>, person: &PersonCard) {
    let role = match (&person.designation, &person.company) {
        (Some(designation), Some(company)) => Some(format!("{designation} at {company}")),
        (Some(designation), None) => Some(designation.clone()),
        (None, Some(company)) => Some(company.clone()),
        (None, None) => None,
    };
    push_field(lines, None, role.as_deref());
    push_field(lines, Some("Education"), person.education.as_deref());
    if let Some(years) = person.experience_years {
        lines.push(format!("    {years} years experience"));
    }
    push_field(lines, Some("Location"), person.location.as_deref());
    if !person.linkedin_url.is_empty() {
        lines.push(format!("    LinkedIn: {}", person.linkedin_url));
    }
}

fn push_field(lines: &mut Vec<String>, label: Option<&str>, value: Option<&str>) {
    let Some(value) = value.filter(|value| !value.is_empty()) else {
        return;
    };
    match label {
        Some(label) => lines.push(format!("    {label}: {value}")),
        None => lines.push(format!("    {value}")),
    }
}

fn upload_line(upload: &UploadProgressView) -> String {
    let outcome = match upload.outcome {
        UploadOutcome::Active => "",
        UploadOutcome::Completed => " [done]",
        UploadOutcome::Failed => " [failed]",
    };
    let chunks = upload
        .chunks
        .map(|(indexed, total)| format!(" ({indexed}/{total} chunks)"))
        .unwrap_or_default();
    format!(
        "upload {} -> {}: {:>3}% {}{chunks}{outcome}",
        upload.filename, upload.card_id, upload.progress, upload.message
    )
}

fn render_chat(lines: &mut Vec<String>, chat: &ChatView) {
    lines.push("== Chat ==".to_string());
    for message in &chat.messages {
        let who = match message.sender {
            ChatSender::User => "You",
            ChatSender::Ai => "AI",
        };
        match &message.timestamp {
            Some(at) => lines.push(format!("[{at}] {who}: {}", message.text)),
            None => lines.push(format!("{who}: {}", message.text)),
        }
    }
    if chat.waiting {
        lines.push(THINKING.to_string());
    }
}
