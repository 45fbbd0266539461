use std::path::PathBuf;

use crate::conversation::{ChatPhase, Citation, Message, Sender};
use crate::upload::UploadState;
use crate::viewer::{CatalogStatus, DocumentStatus, ViewerState};
use crate::{ActiveView, AppMode};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub active_view: ActiveView,
    pub mode: AppMode,
    pub upload: UploadView,
    pub chat: ChatView,
    pub viewer: ViewerView,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadView {
    pub files: Vec<String>,
    pub busy: bool,
    pub status: String,
}

impl UploadView {
    pub(crate) fn from_state(upload: &UploadState) -> Self {
        Self {
            files: upload
                .batch()
                .iter()
                .map(|path| {
                    path.file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.display().to_string())
                })
                .collect(),
            busy: upload.is_busy(),
            status: upload.status().to_string(),
        }
    }

    pub fn button_label(&self) -> &'static str {
        if self.busy {
            "Uploading..."
        } else {
            "Upload"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatView {
    pub messages: Vec<MessageView>,
    pub draft: String,
    pub phase: ChatPhase,
}

impl ChatView {
    pub fn input_enabled(&self) -> bool {
        self.phase == ChatPhase::Idle
    }

    /// Citations in display order, as numbered by the renderer.
    pub fn citations(&self) -> impl Iterator<Item = &Citation> {
        self.messages.iter().flat_map(|message| message.citations.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    pub sender: Sender,
    pub text: String,
    pub citations: Vec<Citation>,
}

impl MessageView {
    pub(crate) fn from_message(message: &Message) -> Self {
        Self {
            sender: message.sender,
            text: message.text.clone(),
            citations: message.citations.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewerView {
    pub catalog: Vec<String>,
    pub catalog_status: CatalogStatus,
    pub selected_document: String,
    pub page: u32,
    pub total_pages: Option<u32>,
    pub selector_visible: bool,
    pub document: DocumentStatus,
}

impl ViewerView {
    pub(crate) fn from_state(viewer: &ViewerState) -> Self {
        Self {
            catalog: viewer.catalog().to_vec(),
            catalog_status: viewer.catalog_status().clone(),
            selected_document: viewer.selected_document().to_string(),
            page: viewer.page(),
            total_pages: viewer.total_pages(),
            selector_visible: viewer.selector_visible(),
            document: viewer.document().clone(),
        }
    }

    /// "Page 3 of 10", with placeholders while the page count is unknown.
    pub fn page_label(&self) -> String {
        match self.total_pages {
            Some(total) => format!("Page {} of {}", self.page, total),
            None => "Page -- of --".to_string(),
        }
    }

    pub fn previous_enabled(&self) -> bool {
        self.total_pages.is_some() && self.page > 1
    }

    pub fn next_enabled(&self) -> bool {
        self.total_pages.is_some_and(|total| self.page < total)
    }

    pub fn local_path(&self) -> Option<&PathBuf> {
        match &self.document {
            DocumentStatus::Ready { local_path } => local_path.as_ref(),
            _ => None,
        }
    }
}
