use std::fmt;
use std::path::PathBuf;

/// Tag of a document fetch, echoed back in its completion event.
pub type FetchGeneration = u64;
/// Tag of a question, echoed back with its answer.
pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    CatalogLoaded(Result<Vec<String>, ApiError>),
    DocumentFetched {
        generation: FetchGeneration,
        name: String,
        result: Result<FetchedDocument, ApiError>,
    },
    UploadCompleted(Result<UploadReceipt, ApiError>),
    AnswerReady {
        request_id: RequestId,
        result: Result<Answer, ApiError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedDocument {
    pub name: String,
    pub total_pages: u32,
    pub byte_len: u64,
    /// Where the bytes were cached for an external viewer, if caching is on.
    pub local_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub message: String,
    pub uploaded_files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitedPage {
    pub source: String,
    pub page: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub citations: Vec<CitedPage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
    /// The `error` field of the server's JSON payload, when it sent one.
    pub server_message: Option<String>,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            server_message: None,
        }
    }

    pub(crate) fn with_server_message(mut self, server_message: Option<String>) -> Self {
        self.server_message = server_message;
        self
    }

    /// Text for the user: the server's own words when available.
    pub fn user_message(&self) -> Option<&str> {
        self.server_message.as_deref()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.server_message {
            Some(server) => write!(f, "{}: {} ({})", self.kind, self.message, server),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
    Decode,
    InvalidDocument,
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::InvalidDocument => write!(f, "invalid pdf"),
            FailureKind::Io => write!(f, "io error"),
        }
    }
}
