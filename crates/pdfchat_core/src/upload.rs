use std::path::PathBuf;

pub const EMPTY_BATCH_STATUS: &str = "Please select files to upload";
pub const GENERIC_FAILURE: &str = "An error occurred";

/// Upload workflow: the selected batch, the in-flight flag and the status line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadState {
    batch: Vec<PathBuf>,
    busy: bool,
    status: String,
}

impl UploadState {
    pub fn batch(&self) -> &[PathBuf] {
        &self.batch
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Replaces the batch wholesale; a new selection never merges with the old one.
    pub(crate) fn select_files(&mut self, files: Vec<PathBuf>) {
        self.batch = files;
    }

    /// Returns the batch to send, or `None` when nothing may be sent.
    pub(crate) fn begin_submit(&mut self) -> Option<Vec<PathBuf>> {
        if self.busy {
            return None;
        }
        if self.batch.is_empty() {
            self.status = EMPTY_BATCH_STATUS.to_string();
            return None;
        }
        self.busy = true;
        Some(self.batch.clone())
    }

    pub(crate) fn finish_success(&mut self, message: String) {
        self.busy = false;
        self.status = message;
    }

    pub(crate) fn finish_failure(&mut self, error: Option<String>) {
        self.busy = false;
        self.status = error.unwrap_or_else(|| GENERIC_FAILURE.to_string());
    }
}
