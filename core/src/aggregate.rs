use crate::model::{Document, RankedHit, SourceCitation};

/// Highest-scoring page of one document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocumentBest {
    pub doc: usize,
    pub page: usize,
    pub score: f32,
}

/// Collapse a page ranking into at most `max_documents` distinct documents,
/// best first.
pub fn aggregate(hits: &[RankedHit], max_documents: usize) -> Vec<DocumentBest> {
    let mut bests: Vec<DocumentBest> = Vec::new();
    for hit in hits {
        match bests.iter_mut().find(|b| b.doc == hit.doc) {
            Some(best) if hit.score > best.score => {
                best.page = hit.page;
                best.score = hit.score;
            }
            Some(_) => {}
            None => bests.push(DocumentBest { doc: hit.doc, page: hit.page, score: hit.score }),
        }
    }
    bests.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    bests.truncate(max_documents);
    bests
}

/// First `max_chars` characters of `text`.
pub fn snippet(text: &str, max_chars: usize) -> String { text.chars().take(max_chars).collect() }

pub fn cite(best: &DocumentBest, documents: &[Document], snippet_chars: usize) -> Option<SourceCitation> {
    let document = documents.get(best.doc)?;
    let page = document.page(best.page)?;
    Some(SourceCitation {
        filename: document.name.clone(),
        page: (page.index + 1).to_string(),
        snippet: snippet(&page.text, snippet_chars),
    })
}
