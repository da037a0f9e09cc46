//! Retrieval and draft synthesis over a fixed set of PDF procedure documents.
//!
//! Per query: fetch and extract every document, fit a TF-IDF space over all
//! pages plus the question, rank pages by cosine similarity, then cite the best
//! page of the top documents and build a templated draft from the top pages.

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod draft;
pub mod engine;
pub mod error;
pub mod extract;
pub mod index;
pub mod model;
pub mod rank;
pub mod source;
pub mod tokenizer;

pub use config::EngineConfig;
pub use engine::{answer, rank_documents, Engine};
pub use error::{EngineError, Result, ValidationError};
pub use extract::ExtractionPolicy;
pub use model::{Answer, Document, Mode, Page, Query, RankedHit, SourceCitation};
pub use source::{DirectorySource, DocumentSource, MemorySource, StaticSource};
