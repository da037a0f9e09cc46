//! Per-page text extraction from PDF bytes.

use crate::model::{display_name, Document};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;
use thiserror::Error;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("valid regex");
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("{0}")]
    Malformed(String),
    #[error("PDF parser panicked: {0}")]
    Panicked(String),
}

/// What to do with a document that cannot be fetched or parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionPolicy {
    /// Substitute a single placeholder page and keep answering.
    #[default]
    Isolate,
    /// Fail the whole query.
    Abort,
}

impl fmt::Display for ExtractionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExtractionPolicy::Isolate => "isolate",
            ExtractionPolicy::Abort => "abort",
        })
    }
}

impl FromStr for ExtractionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "isolate" => Ok(ExtractionPolicy::Isolate),
            "abort" => Ok(ExtractionPolicy::Abort),
            other => Err(format!("unknown extraction policy '{other}' (expected isolate or abort)")),
        }
    }
}

/// Collapse every whitespace run to one space and trim.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Decode PDF bytes into one normalized string per physical page.
pub fn extract_pages(bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
    let pages = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem_by_pages(bytes)))
        .map_err(|payload| ExtractError::Panicked(panic_message(payload.as_ref())))?
        .map_err(|e| ExtractError::Malformed(e.to_string()))?;
    Ok(pages.iter().map(|p| normalize_whitespace(p)).collect())
}

/// Text standing in for a document that could not be read.
pub fn placeholder(name: &str, error: &dyn fmt::Display) -> String {
    format!("[Error reading {name}: {error}]")
}

/// A one-page document carrying the placeholder text for `id`.
pub fn placeholder_document(id: &str, error: &dyn fmt::Display) -> Document {
    let name = display_name(id);
    Document::new(id, [placeholder(&name, error)])
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
