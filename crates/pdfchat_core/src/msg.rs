use std::path::PathBuf;

use crate::{Citation, FetchGeneration, RequestId, Route};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked a new set of files; replaces the previous batch.
    FilesSelected(Vec<PathBuf>),
    /// User clicked Upload.
    UploadClicked,
    /// Server accepted the batch.
    UploadSucceeded { message: String },
    /// Upload failed; `error` is the server's error payload when there was one.
    UploadFailed { error: Option<String> },
    /// User or handoff navigation.
    NavigateTo(Route),
    /// Engine delivered the document catalog.
    CatalogLoaded(Vec<String>),
    CatalogFailed { reason: String },
    /// User picked a document from the selector.
    DocumentSelected(String),
    /// User clicked a citation under a bot answer.
    CitationClicked(Citation),
    /// Engine finished fetching a document and counted its pages.
    DocumentLoaded {
        generation: FetchGeneration,
        total_pages: u32,
        local_path: Option<PathBuf>,
    },
    DocumentFailed {
        generation: FetchGeneration,
        reason: String,
    },
    /// Previous/next buttons (offset -1 / +1).
    PageStepped(i32),
    /// Numeric page entry.
    PageEntered(u32),
    /// Raw text from the page input box.
    PageInput(String),
    /// User edited the question box.
    QuestionChanged(String),
    /// User submitted the pending question.
    QuestionSubmitted,
    AnswerReceived {
        request_id: RequestId,
        answer: String,
        citations: Vec<Citation>,
    },
    AnswerFailed {
        request_id: RequestId,
        error: Option<String>,
    },
}
