//! PDF chat core: pure state machine for the upload handoff, the conversation
//! log and the document viewer, plus view-model helpers.
mod conversation;
mod effect;
mod msg;
mod state;
mod update;
mod upload;
mod view_model;
mod viewer;

pub use conversation::{
    ChatPhase, Citation, ConversationState, Message, RequestId, Sender, EMPTY_QUESTION_PROMPT,
};
pub use effect::Effect;
pub use msg::Msg;
pub use state::{ActiveView, AppMode, AppState, Route};
pub use update::update;
pub use upload::{UploadState, EMPTY_BATCH_STATUS, GENERIC_FAILURE};
pub use view_model::{AppViewModel, ChatView, MessageView, UploadView, ViewerView};
pub use viewer::{CatalogStatus, DocumentStatus, FetchGeneration, ViewerState};
