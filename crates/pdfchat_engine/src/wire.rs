//! JSON bodies exchanged with the question-answering server.
use serde::{Deserialize, Serialize};

use crate::{Answer, CitedPage, UploadReceipt};

#[derive(Debug, Deserialize)]
pub(crate) struct PdfNamesResponse {
    #[serde(rename = "pdfNames", default)]
    pub pdf_names: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AskRequest<'a> {
    pub question: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContextEntry {
    pub source: String,
    pub page: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AskResponse {
    pub answer: String,
    #[serde(default)]
    pub context: Option<Vec<ContextEntry>>,
}

impl From<AskResponse> for Answer {
    fn from(response: AskResponse) -> Self {
        Self {
            text: response.answer,
            citations: response
                .context
                .unwrap_or_default()
                .into_iter()
                .map(|entry| CitedPage {
                    source: entry.source,
                    page: entry.page,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub uploaded_files: Vec<String>,
}

impl From<UploadResponse> for UploadReceipt {
    fn from(response: UploadResponse) -> Self {
        Self {
            message: response.message,
            uploaded_files: response.uploaded_files,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: Option<String>,
}

/// Pulls `error` out of a failure body; anything else yields `None`.
pub(crate) fn server_error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorResponse>(body)
        .ok()
        .and_then(|payload| payload.error)
}
