use crate::conversation::ConversationState;
use crate::upload::UploadState;
use crate::view_model::{AppViewModel, ChatView, MessageView, UploadView, ViewerView};
use crate::viewer::ViewerState;

/// Top-level mode flag; only a successful upload moves it to `Conversing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    #[default]
    Uploading,
    Conversing,
}

/// Navigation target requested by the user or by the upload handoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Upload,
    Chat,
}

/// The view that is actually shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Upload,
    Conversation,
}

impl ActiveView {
    /// The chat route only renders the conversation once the upload has succeeded.
    pub fn resolve(route: Route, mode: AppMode) -> Self {
        match (route, mode) {
            (Route::Chat, AppMode::Conversing) => ActiveView::Conversation,
            _ => ActiveView::Upload,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    mode: AppMode,
    route: Route,
    upload: UploadState,
    conversation: ConversationState,
    viewer: ViewerState,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> AppMode {
        self.mode
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn active_view(&self) -> ActiveView {
        ActiveView::resolve(self.route, self.mode)
    }

    pub fn upload(&self) -> &UploadState {
        &self.upload
    }

    pub fn conversation(&self) -> &ConversationState {
        &self.conversation
    }

    pub fn viewer(&self) -> &ViewerState {
        &self.viewer
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            active_view: self.active_view(),
            mode: self.mode,
            upload: UploadView::from_state(&self.upload),
            chat: ChatView {
                messages: self
                    .conversation
                    .messages()
                    .iter()
                    .map(MessageView::from_message)
                    .collect(),
                draft: self.conversation.draft().to_string(),
                phase: self.conversation.phase(),
            },
            viewer: ViewerView::from_state(&self.viewer),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_mode(&mut self, mode: AppMode) {
        self.mode = mode;
    }

    pub(crate) fn set_route(&mut self, route: Route) {
        self.route = route;
    }

    pub(crate) fn upload_mut(&mut self) -> &mut UploadState {
        &mut self.upload
    }

    pub(crate) fn conversation_mut(&mut self) -> &mut ConversationState {
        &mut self.conversation
    }

    pub(crate) fn viewer_mut(&mut self) -> &mut ViewerState {
        &mut self.viewer
    }
}
