mod common;

use std::path::PathBuf;
use std::sync::mpsc::{RecvTimeoutError, TryRecvError};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use bytes::Bytes;
use pdfchat_engine::{
    Answer, ApiError, ApiSettings, Backend, CitedPage, DocumentCache, EngineConfig, EngineEvent,
    EngineHandle, FailureKind, UploadFile, UploadReceipt,
};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// In-memory backend; documents named `slow*` take a while to arrive.
#[derive(Default)]
struct FakeBackend {
    uploaded: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl Backend for FakeBackend {
    async fn list_documents(&self) -> Result<Vec<String>, ApiError> {
        Ok(vec!["a.pdf".to_string(), "slow.pdf".to_string()])
    }

    async fn fetch_document(&self, name: &str) -> Result<Bytes, ApiError> {
        if name.starts_with("slow") {
            tokio::time::sleep(Duration::from_millis(300)).await;
            return Ok(Bytes::from(common::sample_pdf(9)));
        }
        Ok(Bytes::from(common::sample_pdf(2)))
    }

    async fn upload(&self, files: Vec<UploadFile>) -> Result<UploadReceipt, ApiError> {
        let names: Vec<String> = files.into_iter().map(|file| file.file_name).collect();
        self.uploaded.lock().unwrap().extend(names.clone());
        Ok(UploadReceipt {
            message: "ok".to_string(),
            uploaded_files: names,
        })
    }

    async fn ask(&self, question: &str) -> Result<Answer, ApiError> {
        Ok(Answer {
            text: format!("echo: {question}"),
            citations: vec![CitedPage {
                source: "a.pdf".to_string(),
                page: 1,
            }],
        })
    }
}

fn next_event(engine: &EngineHandle) -> EngineEvent {
    engine
        .recv_timeout(Duration::from_secs(5))
        .expect("engine event")
}

fn drain_for(engine: &EngineHandle, window: Duration) -> Vec<EngineEvent> {
    let deadline = Instant::now() + window;
    let mut events = Vec::new();
    while let Some(remaining) = deadline.checked_duration_since(Instant::now()) {
        if let Ok(event) = engine.recv_timeout(remaining) {
            events.push(event);
        }
    }
    events
}

#[test]
fn superseded_document_fetch_never_reports() {
    pdfchat_logging::initialize_for_tests();
    let engine = EngineHandle::with_backend(Arc::new(FakeBackend::default()), None);

    engine.fetch_document(1, "slow.pdf");
    engine.fetch_document(2, "a.pdf");

    let events = drain_for(&engine, Duration::from_millis(700));
    assert_eq!(events.len(), 1, "{events:?}");
    match &events[0] {
        EngineEvent::DocumentFetched {
            generation,
            name,
            result,
        } => {
            assert_eq!(*generation, 2);
            assert_eq!(name, "a.pdf");
            assert_eq!(result.as_ref().unwrap().total_pages, 2);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn dropping_the_last_handle_disconnects_listeners() {
    let engine = EngineHandle::with_backend(Arc::new(FakeBackend::default()), None);
    let events = engine.events();
    assert_eq!(events.try_recv().unwrap_err(), TryRecvError::Empty);

    drop(engine);
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        match events.recv_timeout(Duration::from_millis(50)) {
            Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {
                assert!(Instant::now() < deadline, "engine thread never stopped")
            }
            Ok(event) => panic!("unexpected event {event:?}"),
        }
    }
}

#[test]
fn fetched_document_is_cached_for_the_viewer() {
    let temp = TempDir::new().unwrap();
    let cache = DocumentCache::new(temp.path().join("viewer"));
    let engine = EngineHandle::with_backend(Arc::new(FakeBackend::default()), Some(cache));

    engine.fetch_document(7, "a.pdf");
    let EngineEvent::DocumentFetched { result, .. } = next_event(&engine) else {
        panic!("expected document event");
    };
    let document = result.unwrap();
    let local = document.local_path.expect("cached path");
    assert_eq!(local, temp.path().join("viewer").join("a.pdf"));
    assert_eq!(std::fs::read(&local).unwrap().len() as u64, document.byte_len);
}

#[test]
fn upload_reads_files_from_disk() {
    let temp = TempDir::new().unwrap();
    let a = temp.path().join("a.pdf");
    let b = temp.path().join("b.pdf");
    std::fs::write(&a, b"%PDF-a").unwrap();
    std::fs::write(&b, b"%PDF-b").unwrap();

    let backend = Arc::new(FakeBackend::default());
    let engine = EngineHandle::with_backend(backend.clone(), None);
    engine.upload(vec![a, b]);

    match next_event(&engine) {
        EngineEvent::UploadCompleted(Ok(receipt)) => {
            assert_eq!(receipt.uploaded_files, vec!["a.pdf", "b.pdf"]);
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(*backend.uploaded.lock().unwrap(), vec!["a.pdf", "b.pdf"]);
}

#[test]
fn unreadable_upload_file_fails_without_request() {
    let backend = Arc::new(FakeBackend::default());
    let engine = EngineHandle::with_backend(backend.clone(), None);
    engine.upload(vec![PathBuf::from("/definitely/missing/file.pdf")]);

    match next_event(&engine) {
        EngineEvent::UploadCompleted(Err(err)) => {
            assert_eq!(err.kind, FailureKind::Io);
            assert_eq!(err.user_message(), None);
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert!(backend.uploaded.lock().unwrap().is_empty());
}

#[test]
fn answers_carry_their_request_id() {
    let engine = EngineHandle::with_backend(Arc::new(FakeBackend::default()), None);
    engine.ask(41, "hello");

    match next_event(&engine) {
        EngineEvent::AnswerReady { request_id, result } => {
            assert_eq!(request_id, 41);
            assert_eq!(result.unwrap().text, "echo: hello");
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn engine_talks_to_the_http_api() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get-pdf-names"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "pdfNames": ["a.pdf"] })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/get-pdf/a.pdf"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(common::sample_pdf(4), "application/pdf"),
        )
        .mount(&server)
        .await;

    let engine = EngineHandle::new(EngineConfig {
        api: ApiSettings {
            base_url: server.uri(),
            ..ApiSettings::default()
        },
        cache_dir: None,
    })
    .expect("engine");

    let receiver = engine.clone();
    let events = tokio::task::spawn_blocking(move || {
        receiver.load_catalog();
        let catalog = next_event(&receiver);
        receiver.fetch_document(1, "a.pdf");
        let document = next_event(&receiver);
        (catalog, document)
    })
    .await
    .unwrap();

    assert_eq!(
        events.0,
        EngineEvent::CatalogLoaded(Ok(vec!["a.pdf".to_string()]))
    );
    match events.1 {
        EngineEvent::DocumentFetched {
            generation, result, ..
        } => {
            assert_eq!(generation, 1);
            assert_eq!(result.unwrap().total_pages, 4);
        }
        other => panic!("unexpected event {other:?}"),
    }
}
