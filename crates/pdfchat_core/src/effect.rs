use std::path::PathBuf;

use crate::{FetchGeneration, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    UploadFiles { files: Vec<PathBuf> },
    LoadCatalog,
    FetchDocument { generation: FetchGeneration, name: String },
    AskQuestion { request_id: RequestId, question: String },
    /// Blocking notice for the user (validation failures).
    Prompt { message: String },
}
