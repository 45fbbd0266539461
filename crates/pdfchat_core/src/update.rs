use pdfchat_logging::{pdfchat_debug, pdfchat_info};

use crate::conversation::{SubmitRejection, EMPTY_QUESTION_PROMPT};
use crate::{ActiveView, AppMode, AppState, Effect, Msg, Route};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FilesSelected(files) => {
            state.upload_mut().select_files(files);
            state.mark_dirty();
            Vec::new()
        }
        Msg::UploadClicked => {
            // The button is disabled while busy.
            if state.upload().is_busy() {
                return (state, Vec::new());
            }
            state.mark_dirty();
            match state.upload_mut().begin_submit() {
                Some(files) => {
                    pdfchat_info!("Uploading {} file(s)", files.len());
                    vec![Effect::UploadFiles { files }]
                }
                None => Vec::new(),
            }
        }
        Msg::UploadSucceeded { message } => {
            state.upload_mut().finish_success(message);
            state.viewer_mut().start_session();
            state.set_mode(AppMode::Conversing);
            state.set_route(Route::Chat);
            state.mark_dirty();
            enter_conversation(&mut state)
        }
        Msg::UploadFailed { error } => {
            state.upload_mut().finish_failure(error);
            state.set_mode(AppMode::Uploading);
            state.mark_dirty();
            Vec::new()
        }
        Msg::NavigateTo(route) => {
            if state.route() != route {
                state.set_route(route);
                state.mark_dirty();
            }
            enter_conversation(&mut state)
        }
        Msg::CatalogLoaded(names) => {
            if state.viewer_mut().catalog_loaded(names) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::CatalogFailed { reason } => {
            if state.viewer_mut().catalog_failed(reason) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::DocumentSelected(name) => {
            let generation = state.viewer_mut().select_document(name.clone());
            state.mark_dirty();
            vec![Effect::FetchDocument { generation, name }]
        }
        Msg::CitationClicked(citation) => {
            let generation = state
                .viewer_mut()
                .jump_to_citation(citation.source.clone(), citation.page);
            state.mark_dirty();
            vec![Effect::FetchDocument {
                generation,
                name: citation.source,
            }]
        }
        Msg::DocumentLoaded {
            generation,
            total_pages,
            local_path,
        } => {
            if state
                .viewer_mut()
                .document_loaded(generation, total_pages, local_path)
            {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::DocumentFailed { generation, reason } => {
            if state.viewer_mut().document_failed(generation, reason) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::PageStepped(offset) => {
            if state.viewer_mut().change_page(offset) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::PageEntered(page) => {
            if state.viewer_mut().set_page(page) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::PageInput(raw) => {
            match raw.trim().parse::<u32>() {
                Ok(page) => {
                    if state.viewer_mut().set_page(page) {
                        state.mark_dirty();
                    }
                }
                Err(_) => pdfchat_debug!("Ignoring non-numeric page input {:?}", raw),
            }
            Vec::new()
        }
        Msg::QuestionChanged(text) => {
            if state.conversation_mut().set_draft(text) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::QuestionSubmitted => match state.conversation_mut().submit() {
            Ok((request_id, question)) => {
                state.mark_dirty();
                vec![Effect::AskQuestion {
                    request_id,
                    question,
                }]
            }
            Err(SubmitRejection::EmptyQuestion) => vec![Effect::Prompt {
                message: EMPTY_QUESTION_PROMPT.to_string(),
            }],
            Err(SubmitRejection::Busy) => Vec::new(),
        },
        Msg::AnswerReceived {
            request_id,
            answer,
            citations,
        } => {
            if state
                .conversation_mut()
                .answer_received(request_id, answer, citations)
            {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::AnswerFailed { request_id, error } => {
            if state.conversation_mut().answer_failed(request_id, error) {
                state.mark_dirty();
            }
            Vec::new()
        }
    };

    (state, effects)
}

/// Loads the catalog the first time the conversation view becomes active after an upload.
fn enter_conversation(state: &mut AppState) -> Vec<Effect> {
    if state.active_view() != ActiveView::Conversation {
        return Vec::new();
    }
    if state.viewer_mut().request_catalog() {
        state.mark_dirty();
        vec![Effect::LoadCatalog]
    } else {
        Vec::new()
    }
}
