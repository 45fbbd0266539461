use std::path::PathBuf;

use pdfchat_logging::pdfchat_debug;

/// Tag of a document fetch; only the latest issued generation may land.
pub type FetchGeneration = u64;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CatalogStatus {
    #[default]
    NotRequested,
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DocumentStatus {
    #[default]
    Empty,
    Loading,
    Ready { local_path: Option<PathBuf> },
    Failed(String),
}

/// Viewer state controller.
///
/// Invariant: whenever `total_pages` is known, `1 <= page <= total_pages`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerState {
    catalog: Vec<String>,
    catalog_status: CatalogStatus,
    selected_document: String,
    page: u32,
    total_pages: Option<u32>,
    selector_visible: bool,
    document: DocumentStatus,
    generation: FetchGeneration,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            catalog: Vec::new(),
            catalog_status: CatalogStatus::NotRequested,
            selected_document: String::new(),
            page: 1,
            total_pages: None,
            selector_visible: false,
            document: DocumentStatus::Empty,
            generation: 0,
        }
    }
}

impl ViewerState {
    pub fn catalog(&self) -> &[String] {
        &self.catalog
    }

    pub fn catalog_status(&self) -> &CatalogStatus {
        &self.catalog_status
    }

    pub fn selected_document(&self) -> &str {
        &self.selected_document
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    pub fn selector_visible(&self) -> bool {
        self.selector_visible
    }

    pub fn document(&self) -> &DocumentStatus {
        &self.document
    }

    pub fn generation(&self) -> FetchGeneration {
        self.generation
    }

    /// Forgets the catalog and the selected document after a new upload replaced
    /// the server's documents. The generation moves on so in-flight fetches land stale.
    pub(crate) fn start_session(&mut self) {
        let generation = self.generation + 1;
        *self = Self {
            generation,
            ..Self::default()
        };
    }

    /// Returns true once per upload session: the first time the catalog is needed.
    pub(crate) fn request_catalog(&mut self) -> bool {
        if self.catalog_status != CatalogStatus::NotRequested {
            return false;
        }
        self.catalog_status = CatalogStatus::Loading;
        true
    }

    pub(crate) fn catalog_loaded(&mut self, names: Vec<String>) -> bool {
        if self.catalog_status != CatalogStatus::Loading {
            return false;
        }
        self.catalog = names;
        self.catalog_status = CatalogStatus::Loaded;
        true
    }

    pub(crate) fn catalog_failed(&mut self, reason: String) -> bool {
        if self.catalog_status != CatalogStatus::Loading {
            return false;
        }
        self.catalog_status = CatalogStatus::Failed(reason);
        true
    }

    /// Selector-driven selection: starts at page 1 with the selector shown.
    pub(crate) fn select_document(&mut self, name: String) -> FetchGeneration {
        self.begin_load(name, 1, true)
    }

    /// Citation-driven selection: targets `page` with the selector hidden.
    pub(crate) fn jump_to_citation(&mut self, name: String, page: u32) -> FetchGeneration {
        self.begin_load(name, page.max(1), false)
    }

    fn begin_load(&mut self, name: String, page: u32, selector_visible: bool) -> FetchGeneration {
        self.generation += 1;
        self.selected_document = name;
        self.page = page;
        self.total_pages = None;
        self.selector_visible = selector_visible;
        self.document = DocumentStatus::Loading;
        self.generation
    }

    /// Applies a finished fetch if it is still the latest one.
    pub(crate) fn document_loaded(
        &mut self,
        generation: FetchGeneration,
        total_pages: u32,
        local_path: Option<PathBuf>,
    ) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        let total = total_pages.max(1);
        self.total_pages = Some(total);
        self.page = self.page.clamp(1, total);
        self.document = DocumentStatus::Ready { local_path };
        true
    }

    pub(crate) fn document_failed(&mut self, generation: FetchGeneration, reason: String) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.document = DocumentStatus::Failed(reason);
        true
    }

    fn is_current(&self, generation: FetchGeneration) -> bool {
        if generation != self.generation {
            pdfchat_debug!(
                "Discarding stale document result generation={} latest={}",
                generation,
                self.generation
            );
            return false;
        }
        self.document == DocumentStatus::Loading
    }

    /// Moves by `offset` pages, clamped. Rejected while the page count is unknown.
    pub(crate) fn change_page(&mut self, offset: i32) -> bool {
        let Some(total) = self.total_pages else {
            return false;
        };
        let target = (i64::from(self.page) + i64::from(offset)).clamp(1, i64::from(total));
        // `target` is within [1, total], so it fits in u32.
        let target = target as u32;
        if target == self.page {
            return false;
        }
        self.page = target;
        true
    }

    /// Direct page entry; out-of-range numbers are rejected without a message.
    pub(crate) fn set_page(&mut self, page: u32) -> bool {
        match self.total_pages {
            Some(total) if (1..=total).contains(&page) => {
                let changed = self.page != page;
                self.page = page;
                changed
            }
            _ => {
                pdfchat_debug!(
                    "Rejected page entry {} (total pages {:?})",
                    page,
                    self.total_pages
                );
                false
            }
        }
    }
}
