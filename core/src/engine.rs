use crate::aggregate::{aggregate, cite};
use crate::cache::PageCache;
use crate::config::EngineConfig;
use crate::draft::{synthesize, NO_RESULTS_DRAFT};
use crate::error::{EngineError, Result};
use crate::extract::{extract_pages, placeholder_document, ExtractionPolicy};
use crate::index::index;
use crate::model::{Answer, Corpus, Document, Query, RankedHit};
use crate::rank::rank;
use crate::source::DocumentSource;
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Answers queries against the documents of one source. Holds no per-query state.
pub struct Engine {
    source: Arc<dyn DocumentSource>,
    config: EngineConfig,
    cache: Option<PageCache>,
}

struct LoadFailure {
    id: String,
    message: String,
    unreachable: bool,
}

impl Engine {
    pub fn new(source: Arc<dyn DocumentSource>, config: EngineConfig) -> Self {
        let cache = config.cache_capacity.map(PageCache::new);
        Self { source, config, cache }
    }

    pub fn config(&self) -> &EngineConfig { &self.config }
    pub fn source(&self) -> &dyn DocumentSource { self.source.as_ref() }
    pub fn cache(&self) -> Option<&PageCache> { self.cache.as_ref() }

    /// Configured document identifiers; empty or unlistable is a configuration error.
    pub fn list_documents(&self) -> Result<Vec<String>> {
        let ids = self.source.list().map_err(|e| EngineError::Configuration(format!("{e:#}")))?;
        if ids.is_empty() {
            return Err(EngineError::Configuration(format!("No PDFs found in: {}", self.source.describe())));
        }
        Ok(ids)
    }

    /// Number of configured documents.
    pub fn health(&self) -> Result<usize> { self.list_documents().map(|ids| ids.len()) }

    /// Fetch and extract every document in parallel, returned in listing order.
    pub fn load_documents(&self) -> Result<Vec<Document>> {
        let ids = self.list_documents()?;
        let loaded: Vec<std::result::Result<Document, LoadFailure>> =
            ids.par_iter().map(|id| self.load_one(id)).collect();

        if loaded.iter().all(|r| matches!(r, Err(f) if f.unreachable)) {
            return Err(EngineError::Configuration(format!(
                "none of the {} documents in {} could be read",
                ids.len(),
                self.source.describe()
            )));
        }

        loaded
            .into_iter()
            .map(|r| match r {
                Ok(doc) => Ok(doc),
                Err(failure) => match self.config.policy {
                    ExtractionPolicy::Abort => {
                        Err(EngineError::Extraction { document: failure.id, message: failure.message })
                    }
                    ExtractionPolicy::Isolate => {
                        warn!(document = %failure.id, error = %failure.message, "using placeholder page");
                        Ok(placeholder_document(&failure.id, &failure.message))
                    }
                },
            })
            .collect()
    }

    fn load_one(&self, id: &str) -> std::result::Result<Document, LoadFailure> {
        let bytes = self.source.fetch(id).map_err(|e| LoadFailure {
            id: id.to_string(),
            message: format!("{e:#}"),
            unreachable: true,
        })?;
        let pages = match &self.cache {
            Some(cache) => cache.get_or_extract(&bytes, extract_pages).map(|p| p.as_ref().clone()),
            None => extract_pages(&bytes),
        }
        .map_err(|e| LoadFailure { id: id.to_string(), message: e.to_string(), unreachable: false })?;
        debug!(document = %id, pages = pages.len(), "extracted");
        Ok(Document::new(id, pages))
    }

    /// Full pipeline for one validated query.
    pub fn query(&self, query: &Query) -> Result<Answer> {
        let documents = self.load_documents()?;
        Ok(answer(query, &documents, &self.config))
    }

    /// The loaded documents and the complete page ranking for `question`.
    pub fn rank(&self, question: &str) -> Result<(Vec<Document>, Vec<RankedHit>)> {
        let documents = self.load_documents()?;
        let hits = rank_documents(question, &documents);
        Ok((documents, hits))
    }
}

/// Rank every page of `documents` against `question`. Empty when there are no pages.
pub fn rank_documents(question: &str, documents: &[Document]) -> Vec<RankedHit> {
    let corpus = Corpus::from_documents(documents);
    if corpus.is_empty() {
        return Vec::new();
    }
    let indexed = index(&corpus.texts, question);
    debug!(vocabulary = indexed.index.vocabulary_size(), pages = corpus.len(), "indexed corpus");
    rank(&indexed.query, &indexed.pages, &corpus.meta)
}

/// Rank, aggregate and synthesize over already loaded documents.
pub fn answer(query: &Query, documents: &[Document], config: &EngineConfig) -> Answer {
    let hits = rank_documents(query.question(), documents);
    if hits.is_empty() {
        info!(documents = documents.len(), "no pages to rank");
        return Answer { draft: NO_RESULTS_DRAFT.to_string(), sources: Vec::new() };
    }

    let sources = aggregate(&hits, config.top_k_docs)
        .iter()
        .filter_map(|best| cite(best, documents, config.snippet_chars))
        .collect::<Vec<_>>();
    let draft = synthesize(query.mode(), &hits, documents, config.draft_window());

    info!(
        documents = documents.len(),
        pages = hits.len(),
        sources = sources.len(),
        mode = %query.mode(),
        "answered query"
    );
    Answer { draft, sources }
}
