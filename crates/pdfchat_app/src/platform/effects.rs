use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use pdfchat_core::{Citation, Effect, Msg};
use pdfchat_engine::{ApiError, EngineEvent, EngineHandle};
use pdfchat_logging::{pdfchat_debug, pdfchat_info, pdfchat_warn};

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    /// Starts forwarding engine events into `msg_tx` as `Msg`s.
    pub fn new<T>(engine: EngineHandle, msg_tx: mpsc::Sender<T>) -> Self
    where
        T: From<Msg> + Send + 'static,
    {
        let runner = Self { engine };
        runner.spawn_event_loop(msg_tx);
        runner
    }

    /// Hands IO effects to the engine. Returns prompts the caller must show.
    pub fn enqueue(&self, effects: Vec<Effect>) -> Vec<String> {
        let mut prompts = Vec::new();
        for effect in effects {
            match effect {
                Effect::UploadFiles { files } => {
                    pdfchat_info!("UploadFiles count={}", files.len());
                    self.engine.upload(files);
                }
                Effect::LoadCatalog => {
                    pdfchat_info!("LoadCatalog");
                    self.engine.load_catalog();
                }
                Effect::FetchDocument { generation, name } => {
                    pdfchat_info!("FetchDocument generation={} name={}", generation, name);
                    self.engine.fetch_document(generation, name);
                }
                Effect::AskQuestion {
                    request_id,
                    question,
                } => {
                    pdfchat_info!(
                        "AskQuestion request_id={} question_len={}",
                        request_id,
                        question.len()
                    );
                    self.engine.ask(request_id, question);
                }
                Effect::Prompt { message } => prompts.push(message),
            }
        }
        prompts
    }

    fn spawn_event_loop<T>(&self, msg_tx: mpsc::Sender<T>)
    where
        T: From<Msg> + Send + 'static,
    {
        let events = self.engine.events();
        thread::spawn(move || loop {
            match events.recv_timeout(Duration::from_millis(100)) {
                Ok(event) => {
                    if msg_tx.send(map_event(event).into()).is_err() {
                        pdfchat_debug!("Main loop is gone; engine event loop stopping");
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    pdfchat_debug!("Engine stopped; engine event loop stopping");
                    break;
                }
            }
        });
    }
}

pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::CatalogLoaded(Ok(names)) => Msg::CatalogLoaded(names),
        EngineEvent::CatalogLoaded(Err(err)) => {
            pdfchat_warn!("Catalog request failed: {}", err);
            Msg::CatalogFailed {
                reason: failure_reason(&err),
            }
        }
        EngineEvent::DocumentFetched {
            generation,
            name,
            result,
        } => match result {
            Ok(document) => {
                pdfchat_debug!(
                    "Document {} ready: {} page(s), {} bytes",
                    name,
                    document.total_pages,
                    document.byte_len
                );
                Msg::DocumentLoaded {
                    generation,
                    total_pages: document.total_pages,
                    local_path: document.local_path,
                }
            }
            Err(err) => {
                pdfchat_warn!("Document {} (generation {}) failed: {}", name, generation, err);
                Msg::DocumentFailed {
                    generation,
                    reason: failure_reason(&err),
                }
            }
        },
        EngineEvent::UploadCompleted(Ok(receipt)) => Msg::UploadSucceeded {
            message: receipt.message,
        },
        EngineEvent::UploadCompleted(Err(err)) => {
            pdfchat_warn!("Upload failed: {}", err);
            Msg::UploadFailed {
                error: err.user_message().map(str::to_string),
            }
        }
        EngineEvent::AnswerReady { request_id, result } => match result {
            Ok(answer) => Msg::AnswerReceived {
                request_id,
                answer: answer.text,
                citations: answer
                    .citations
                    .into_iter()
                    .map(|cited| Citation::new(cited.source, cited.page))
                    .collect(),
            },
            Err(err) => {
                pdfchat_warn!("Question {} failed: {}", request_id, err);
                Msg::AnswerFailed {
                    request_id,
                    error: err.user_message().map(str::to_string),
                }
            }
        },
    }
}

fn failure_reason(err: &ApiError) -> String {
    match err.user_message() {
        Some(server) => server.to_string(),
        None => err.kind.to_string(),
    }
}
