use pdfchat_core::{
    ActiveView, AppViewModel, CatalogStatus, ChatView, DocumentStatus, MessageView, Sender,
    UploadView, ViewerView,
};

const RULE: &str = "----------------------------------------";

/// Renders the view model as console lines. Citations are numbered `[n]` in
/// display order so `cite <n>` can refer back to them.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = vec![RULE.to_string()];
    match view.active_view {
        ActiveView::Upload => render_upload(&view.upload, &mut lines),
        ActiveView::Conversation => {
            render_chat(&view.chat, &mut lines);
            lines.push(String::new());
            render_viewer(&view.viewer, &mut lines);
        }
    }
    lines
}

fn render_upload(upload: &UploadView, lines: &mut Vec<String>) {
    lines.push("Upload PDFs".to_string());
    if upload.files.is_empty() {
        lines.push("  (no files selected; use 'files <path>...')".to_string());
    } else {
        for name in &upload.files {
            lines.push(format!("  * {name}"));
        }
    }
    lines.push(format!("[{}]", upload.button_label()));
    if !upload.status.is_empty() {
        lines.push(upload.status.clone());
    }
}

fn render_chat(chat: &ChatView, lines: &mut Vec<String>) {
    lines.push("Chat".to_string());
    let mut citation_number = 0usize;
    for message in &chat.messages {
        lines.push(format_message(message));
        for citation in &message.citations {
            citation_number += 1;
            lines.push(format!(
                "    [{citation_number}] {} (page {})",
                citation.source, citation.page
            ));
        }
    }
    if !chat.input_enabled() {
        lines.push("  ... waiting for an answer".to_string());
    }
}

fn format_message(message: &MessageView) -> String {
    let who = match message.sender {
        Sender::User => "You",
        Sender::Bot => "Bot",
    };
    format!("{who}: {}", message.text)
}

fn render_viewer(viewer: &ViewerView, lines: &mut Vec<String>) {
    lines.push(match &viewer.catalog_status {
        CatalogStatus::NotRequested => "Documents: --".to_string(),
        CatalogStatus::Loading => "Documents: loading...".to_string(),
        CatalogStatus::Failed(reason) => format!("Documents: unavailable ({reason})"),
        CatalogStatus::Loaded if viewer.catalog.is_empty() => "Documents: none".to_string(),
        CatalogStatus::Loaded => format!("Documents: {}", numbered(&viewer.catalog)),
    });

    let selected = if viewer.selected_document.is_empty() {
        "(none)".to_string()
    } else if viewer.selector_visible {
        format!("{} (selected from list)", viewer.selected_document)
    } else {
        format!("{} (opened from citation)", viewer.selected_document)
    };
    let document = match &viewer.document {
        DocumentStatus::Empty => String::new(),
        DocumentStatus::Loading => " loading...".to_string(),
        DocumentStatus::Ready { .. } => String::new(),
        DocumentStatus::Failed(reason) => format!(" failed: {reason}"),
    };
    lines.push(format!("Viewing: {selected}{document}"));
    let page_line = format!(
        "{} {}{}",
        viewer.page_label(),
        if viewer.previous_enabled() { "<prev " } else { "" },
        if viewer.next_enabled() { "next>" } else { "" },
    );
    lines.push(page_line.trim_end().to_string());
    if let Some(path) = viewer.local_path() {
        lines.push(format!("Local copy: {}", path.display()));
    }
}

fn numbered(names: &[String]) -> String {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| format!("#{} {name}", i + 1))
        .collect::<Vec<_>>()
        .join("  ")
}
