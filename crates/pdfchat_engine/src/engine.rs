use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use pdfchat_logging::{pdfchat_debug, pdfchat_error, pdfchat_warn};
use tokio_util::sync::CancellationToken;

use crate::api::{ApiSettings, Backend, ReqwestBackend, UploadFile};
use crate::cache::DocumentCache;
use crate::pages::count_pages;
use crate::{ApiError, EngineEvent, FetchGeneration, FetchedDocument, RequestId, UploadReceipt};

#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub api: ApiSettings,
    pub cache_dir: Option<PathBuf>,
}

enum EngineCommand {
    LoadCatalog,
    FetchDocument {
        generation: FetchGeneration,
        name: String,
    },
    Upload {
        files: Vec<PathBuf>,
    },
    Ask {
        request_id: RequestId,
        question: String,
    },
}

/// Handle to the background IO thread. Commands go in, `EngineEvent`s come out.
///
/// The thread stops once every handle is dropped; `EngineEvents` then reports
/// `Disconnected`.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    events: EngineEvents,
}

/// Receiving side of the engine, detached from the command channel so a
/// listener does not keep the engine alive.
#[derive(Clone)]
pub struct EngineEvents {
    rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineEvents {
    pub fn try_recv(&self) -> Result<EngineEvent, mpsc::TryRecvError> {
        match self.rx.lock() {
            Ok(rx) => rx.try_recv(),
            Err(_) => Err(mpsc::TryRecvError::Disconnected),
        }
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<EngineEvent, mpsc::RecvTimeoutError> {
        match self.rx.lock() {
            Ok(rx) => rx.recv_timeout(timeout),
            Err(_) => Err(mpsc::RecvTimeoutError::Disconnected),
        }
    }
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, ApiError> {
        let backend = Arc::new(ReqwestBackend::new(config.api)?);
        Ok(Self::with_backend(backend, config.cache_dir.map(DocumentCache::new)))
    }

    pub fn with_backend(backend: Arc<dyn Backend>, cache: Option<DocumentCache>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    pdfchat_error!("Failed to start engine runtime: {}", err);
                    return;
                }
            };
            // Only one document fetch matters at a time; a new one cancels the last.
            let mut document_fetch: Option<CancellationToken> = None;
            while let Ok(command) = cmd_rx.recv() {
                let cancel = CancellationToken::new();
                if matches!(command, EngineCommand::FetchDocument { .. }) {
                    if let Some(previous) = document_fetch.replace(cancel.clone()) {
                        previous.cancel();
                    }
                }
                let backend = backend.clone();
                let cache = cache.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(backend.as_ref(), cache.as_ref(), command, cancel, event_tx)
                        .await;
                });
            }
        });

        Self {
            cmd_tx,
            events: EngineEvents {
                rx: Arc::new(Mutex::new(event_rx)),
            },
        }
    }

    pub fn load_catalog(&self) {
        self.send(EngineCommand::LoadCatalog);
    }

    pub fn fetch_document(&self, generation: FetchGeneration, name: impl Into<String>) {
        self.send(EngineCommand::FetchDocument {
            generation,
            name: name.into(),
        });
    }

    pub fn upload(&self, files: Vec<PathBuf>) {
        self.send(EngineCommand::Upload { files });
    }

    pub fn ask(&self, request_id: RequestId, question: impl Into<String>) {
        self.send(EngineCommand::Ask {
            request_id,
            question: question.into(),
        });
    }

    pub fn events(&self) -> EngineEvents {
        self.events.clone()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<EngineEvent, mpsc::RecvTimeoutError> {
        self.events.recv_timeout(timeout)
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            pdfchat_warn!("Engine thread is gone; command dropped");
        }
    }
}

async fn handle_command(
    backend: &dyn Backend,
    cache: Option<&DocumentCache>,
    command: EngineCommand,
    cancel: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::LoadCatalog => EngineEvent::CatalogLoaded(backend.list_documents().await),
        EngineCommand::FetchDocument { generation, name } => {
            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    pdfchat_debug!("Document fetch {} for {} superseded", generation, name);
                    return;
                }
                result = load_document(backend, cache, &name) => result,
            };
            EngineEvent::DocumentFetched {
                generation,
                name,
                result,
            }
        }
        EngineCommand::Upload { files } => EngineEvent::UploadCompleted(upload(backend, files).await),
        EngineCommand::Ask {
            request_id,
            question,
        } => EngineEvent::AnswerReady {
            request_id,
            result: backend.ask(&question).await,
        },
    };
    let _ = event_tx.send(event);
}

async fn load_document(
    backend: &dyn Backend,
    cache: Option<&DocumentCache>,
    name: &str,
) -> Result<FetchedDocument, ApiError> {
    let bytes = backend.fetch_document(name).await?;
    let total_pages = count_pages(&bytes)?;
    let local_path = match cache {
        Some(cache) => match cache.store(name, &bytes) {
            Ok(path) => Some(path),
            Err(err) => {
                // The page count is still good; the viewer just has no local copy.
                pdfchat_warn!("Could not cache {} in {:?}: {}", name, cache.dir(), err);
                None
            }
        },
        None => None,
    };
    Ok(FetchedDocument {
        name: name.to_string(),
        total_pages,
        byte_len: bytes.len() as u64,
        local_path,
    })
}

async fn upload(backend: &dyn Backend, paths: Vec<PathBuf>) -> Result<UploadReceipt, ApiError> {
    let mut files = Vec::with_capacity(paths.len());
    for path in &paths {
        files.push(UploadFile::read(path).await?);
    }
    backend.upload(files).await
}
