use std::path::Path;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use pdfchat_logging::{pdfchat_debug, pdfchat_info};
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use serde::de::DeserializeOwned;
use url::Url;

use crate::wire::{server_error_message, AskRequest, AskResponse, PdfNamesResponse, UploadResponse};
use crate::{Answer, ApiError, FailureKind, UploadReceipt};

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_document_bytes: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            // Uploads re-embed every document server-side.
            request_timeout: Duration::from_secs(120),
            redirect_limit: 5,
            max_document_bytes: 50 * 1024 * 1024,
        }
    }
}

/// A file ready to go into the upload form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Reads `path` from disk; the part name is the path's file name.
    pub async fn read(path: &Path) -> Result<Self, ApiError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|err| ApiError::new(FailureKind::Io, format!("{}: {err}", path.display())))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { file_name, bytes })
    }
}

/// The remote question-answering API.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn list_documents(&self) -> Result<Vec<String>, ApiError>;

    async fn fetch_document(&self, name: &str) -> Result<Bytes, ApiError>;

    async fn upload(&self, files: Vec<UploadFile>) -> Result<UploadReceipt, ApiError>;

    async fn ask(&self, question: &str) -> Result<Answer, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    settings: ApiSettings,
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be used as a base url", settings.base_url),
            ));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            settings,
            base_url,
            client,
        })
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    /// Appends path segments to the base url; each segment is percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::new(FailureKind::InvalidUrl, "base url cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl Backend for ReqwestBackend {
    async fn list_documents(&self) -> Result<Vec<String>, ApiError> {
        let url = self.endpoint(&["get-pdf-names"])?;
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let parsed: PdfNamesResponse = read_json(response).await?;
        pdfchat_debug!("Catalog lists {} document(s)", parsed.pdf_names.len());
        Ok(parsed.pdf_names)
    }

    async fn fetch_document(&self, name: &str) -> Result<Bytes, ApiError> {
        let url = self.endpoint(&["get-pdf", name])?;
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let response = ensure_success(response).await?;

        let max_bytes = self.settings.max_document_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(ApiError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "document too large",
                ));
            }
        }

        let mut bytes = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(ApiError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "document too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        pdfchat_debug!("Fetched {} ({} bytes)", name, bytes.len());
        Ok(bytes.freeze())
    }

    async fn upload(&self, files: Vec<UploadFile>) -> Result<UploadReceipt, ApiError> {
        let url = self.endpoint(&["upload"])?;
        let count = files.len();
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str("application/pdf")
                .map_err(map_reqwest_error)?;
            form = form.part("files", part);
        }

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let parsed: UploadResponse = read_json(response).await?;
        pdfchat_info!("Upload of {} file(s) accepted: {}", count, parsed.message);
        Ok(parsed.into())
    }

    async fn ask(&self, question: &str) -> Result<Answer, ApiError> {
        let url = self.endpoint(&["ask"])?;
        let response = self
            .client
            .post(url)
            .json(&AskRequest { question })
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let parsed: AskResponse = read_json(response).await?;
        Ok(parsed.into())
    }
}

/// Turns a non-2xx response into an error carrying the server's `error` text.
async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.bytes().await.unwrap_or_default();
    Err(
        ApiError::new(FailureKind::HttpStatus(status.as_u16()), status.to_string())
            .with_server_message(server_error_message(&body)),
    )
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let response = ensure_success(response).await?;
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&body).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return ApiError::new(FailureKind::InvalidUrl, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
