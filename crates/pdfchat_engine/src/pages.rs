use lopdf::Document;

use crate::{ApiError, FailureKind};

/// Parses the PDF and returns its page count. A document without pages is invalid.
pub fn count_pages(bytes: &[u8]) -> Result<u32, ApiError> {
    let document = Document::load_mem(bytes)
        .map_err(|err| ApiError::new(FailureKind::InvalidDocument, err.to_string()))?;
    let pages = document.get_pages().len();
    if pages == 0 {
        return Err(ApiError::new(
            FailureKind::InvalidDocument,
            "document has no pages",
        ));
    }
    u32::try_from(pages)
        .map_err(|_| ApiError::new(FailureKind::InvalidDocument, "page count out of range"))
}
