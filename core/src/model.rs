use crate::error::ValidationError;
use crate::extract::normalize_whitespace;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Draft template selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Simple,
    Bullets,
    #[default]
    Standard,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Simple, Mode::Bullets, Mode::Standard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Simple => "simple",
            Mode::Bullets => "bullets",
            Mode::Standard => "standard",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Mode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(Mode::Simple),
            "bullets" => Ok(Mode::Bullets),
            "standard" => Ok(Mode::Standard),
            other => Err(ValidationError::InvalidMode(other.to_string())),
        }
    }
}

/// A validated question. Construction is the only place validation happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    question: String,
    mode: Mode,
}

impl Query {
    pub fn new(question: impl Into<String>, mode: Mode) -> Result<Self, ValidationError> {
        let question = question.into();
        if question.trim().is_empty() {
            return Err(ValidationError::EmptyQuestion);
        }
        Ok(Self { question, mode })
    }

    /// Validates a raw mode string and question, mode first.
    pub fn parse(question: &str, mode: &str) -> Result<Self, ValidationError> {
        let mode = mode.parse()?;
        Self::new(question, mode)
    }

    pub fn question(&self) -> &str { &self.question }
    pub fn mode(&self) -> Mode { self.mode }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Zero-based position within the document.
    pub index: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub name: String,
    pub pages: Vec<Page>,
}

impl Document {
    /// Builds a document from raw page texts; every page is whitespace-normalized.
    pub fn new<I, S>(id: impl Into<String>, pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let id = id.into();
        let name = display_name(&id);
        let pages = pages
            .into_iter()
            .enumerate()
            .map(|(index, text)| Page { index, text: normalize_whitespace(text.as_ref()) })
            .collect();
        Self { id, name, pages }
    }

    pub fn page(&self, index: usize) -> Option<&Page> { self.pages.get(index) }
}

/// Final path segment of an identifier (path, URI or bare name).
pub fn display_name(id: &str) -> String {
    id.rsplit(['/', '\\'])
        .find(|segment| !segment.is_empty())
        .unwrap_or(id)
        .to_string()
}

/// Position of one corpus row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRef {
    pub doc: usize,
    pub page: usize,
}

/// Flattened page texts in document-major, page-minor order.
#[derive(Debug, Default)]
pub struct Corpus<'a> {
    pub texts: Vec<&'a str>,
    pub meta: Vec<PageRef>,
}

impl<'a> Corpus<'a> {
    pub fn from_documents(documents: &'a [Document]) -> Self {
        let mut corpus = Corpus::default();
        for (doc, document) in documents.iter().enumerate() {
            for page in &document.pages {
                corpus.texts.push(page.text.as_str());
                corpus.meta.push(PageRef { doc, page: page.index });
            }
        }
        corpus
    }

    pub fn len(&self) -> usize { self.texts.len() }
    pub fn is_empty(&self) -> bool { self.texts.is_empty() }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedHit {
    pub score: f32,
    pub doc: usize,
    pub page: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCitation {
    pub filename: String,
    /// 1-based page number, stringified.
    pub page: String,
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub draft: String,
    pub sources: Vec<SourceCitation>,
}
