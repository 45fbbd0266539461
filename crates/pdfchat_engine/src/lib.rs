//! PDF chat engine: remote API client, page counting and effect execution.
mod api;
mod cache;
mod engine;
mod pages;
mod types;
mod wire;

pub use api::{ApiSettings, Backend, ReqwestBackend, UploadFile};
pub use cache::{ensure_cache_dir, DocumentCache, PersistError};
pub use engine::{EngineConfig, EngineEvents, EngineHandle};
pub use pages::count_pages;
pub use types::{
    Answer, ApiError, CitedPage, EngineEvent, FailureKind, FetchGeneration, FetchedDocument,
    RequestId, UploadReceipt,
};
