use crate::tokenizer::analyze;
use std::collections::{BTreeSet, HashMap};

pub type TermId = u32;

/// L2-normalized sparse row, entries sorted by term id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(TermId, f32)>,
}

impl SparseVector {
    pub fn from_weights(mut entries: Vec<(TermId, f32)>) -> Self {
        entries.retain(|(_, w)| *w != 0.0);
        entries.sort_by_key(|(tid, _)| *tid);
        Self { entries }
    }

    pub fn entries(&self) -> &[(TermId, f32)] { &self.entries }
    pub fn is_zero(&self) -> bool { self.entries.is_empty() }

    pub fn norm(&self) -> f32 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f32>().sqrt()
    }

    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j, mut acc) = (0, 0, 0.0f32);
        while i < self.entries.len() && j < other.entries.len() {
            let (a, wa) = self.entries[i];
            let (b, wb) = other.entries[j];
            if a == b {
                acc += wa * wb;
                i += 1;
                j += 1;
            } else if a < b {
                i += 1;
            } else {
                j += 1;
            }
        }
        acc
    }

    fn normalized(mut self) -> Self {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, w) in self.entries.iter_mut() { *w /= norm; }
        }
        self
    }
}

/// Vocabulary and document frequencies fitted over pages plus the query.
#[derive(Debug, Default)]
pub struct TfidfIndex {
    pub dictionary: HashMap<String, TermId>,
    pub df: Vec<u32>,
    /// Rows used for fitting: every page and the query.
    pub num_rows: u32,
}

/// Output of fitting: one vector for the query, one per page in corpus order.
#[derive(Debug)]
pub struct IndexedCorpus {
    pub index: TfidfIndex,
    pub query: SparseVector,
    pub pages: Vec<SparseVector>,
}

impl TfidfIndex {
    /// Smoothed idf: ln((1 + n) / (1 + df)) + 1.
    pub fn idf(&self, term_id: TermId) -> f32 {
        let n = self.num_rows as f32;
        let df = self.df.get(term_id as usize).copied().unwrap_or(0) as f32;
        ((1.0 + n) / (1.0 + df)).ln() + 1.0
    }

    pub fn term_id(&self, term: &str) -> Option<TermId> { self.dictionary.get(term).copied() }
    pub fn vocabulary_size(&self) -> usize { self.dictionary.len() }
}

/// Fit the vocabulary on `pages` with `query` appended as the last row and
/// vectorize every row in that shared space.
pub fn index(pages: &[&str], query: &str) -> IndexedCorpus {
    let rows: Vec<Vec<String>> = pages.iter().copied().chain(std::iter::once(query)).map(analyze).collect();

    // Term ids follow lexical order so the space never depends on hash order.
    let terms: BTreeSet<&str> = rows.iter().flatten().map(String::as_str).collect();
    let dictionary: HashMap<String, TermId> =
        terms.into_iter().enumerate().map(|(id, t)| (t.to_string(), id as TermId)).collect();

    let mut df = vec![0u32; dictionary.len()];
    let counts: Vec<HashMap<TermId, u32>> = rows
        .iter()
        .map(|row| {
            let mut tf: HashMap<TermId, u32> = HashMap::new();
            for term in row {
                // every analyzed term was inserted above
                if let Some(&tid) = dictionary.get(term) {
                    *tf.entry(tid).or_insert(0) += 1;
                }
            }
            for tid in tf.keys() { df[*tid as usize] += 1; }
            tf
        })
        .collect();

    let index = TfidfIndex { dictionary, df, num_rows: rows.len() as u32 };
    let mut vectors: Vec<SparseVector> = counts
        .into_iter()
        .map(|tf| {
            let weights = tf.into_iter().map(|(tid, c)| (tid, c as f32 * index.idf(tid))).collect();
            SparseVector::from_weights(weights).normalized()
        })
        .collect();

    let query = vectors.pop().unwrap_or_default();
    IndexedCorpus { index, query, pages: vectors }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_terms_share_the_page_vocabulary() {
        let out = index(&["wire transfer cutoff", "margin call deadline"], "margin deadline");
        assert_eq!(out.pages.len(), 2);
        assert!(out.index.term_id("wire transfer").is_some());
        assert!(out.index.term_id("margin call").is_none());
        assert!(out.index.term_id("margin deadline").is_some());
        assert_eq!(out.index.num_rows, 3);
    }

    #[test]
    fn query_only_terms_are_in_vocabulary() {
        let out = index(&["wire transfer"], "beneficiary");
        let tid = out.index.term_id("beneficiary").unwrap();
        assert_eq!(out.index.df[tid as usize], 1);
        assert!(!out.query.is_zero());
    }

    #[test]
    fn rows_are_unit_length_or_zero() {
        let out = index(&["ACAT transfer form", "", "the and of"], "ACAT form");
        assert!((out.pages[0].norm() - 1.0).abs() < 1e-5);
        assert!(out.pages[1].is_zero());
        assert!(out.pages[2].is_zero());
        assert!((out.query.norm() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn rare_terms_outweigh_common_ones() {
        let out = index(&["cash sweep", "cash journal", "cash wire"], "cash sweep");
        let common = out.index.idf(out.index.term_id("cash").unwrap());
        let rare = out.index.idf(out.index.term_id("sweep").unwrap());
        assert!(rare > common);
    }
}
