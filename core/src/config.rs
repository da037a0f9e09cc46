use crate::extract::ExtractionPolicy;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

pub const DEFAULT_TOP_K_DOCS: usize = 3;
pub const DEFAULT_TOP_PAGES_PER_DOC: usize = 2;
pub const DEFAULT_SNIPPET_CHARS: usize = 300;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Distinct documents cited per answer.
    pub top_k_docs: usize,
    pub top_pages_per_doc: usize,
    pub snippet_chars: usize,
    pub policy: ExtractionPolicy,
    /// Enables the page cache with this many documents; `None` extracts every time.
    pub cache_capacity: Option<NonZeroUsize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            top_k_docs: DEFAULT_TOP_K_DOCS,
            top_pages_per_doc: DEFAULT_TOP_PAGES_PER_DOC,
            snippet_chars: DEFAULT_SNIPPET_CHARS,
            policy: ExtractionPolicy::default(),
            cache_capacity: None,
        }
    }
}

impl EngineConfig {
    /// Number of top-ranked pages the draft is built from.
    pub fn draft_window(&self) -> usize { self.top_k_docs.saturating_mul(self.top_pages_per_doc) }
}
