//! Template-driven draft composition from the top of the page ranking.

use crate::model::{Document, Mode, RankedHit};

pub const NO_RESULTS_DRAFT: &str = "No relevant text found in procedures.";

const BULLETS_LIMIT: usize = 8;
const STANDARD_LIMIT: usize = 6;

const BULLETS_LEAD: &str = "Below are concise steps/points related to your request:";
const BULLETS_EMPTY: &str = "- No specific instructions found.";
const BULLETS_CLOSING: &str = "If you’d like, I can execute or clarify any step.";

const SIMPLE_FALLBACK: &str =
    "We located relevant guidance and can proceed with the requested action once you confirm.";
const SIMPLE_CLOSING: &str = "Reply if you want us to proceed, or let me know if you need a different approach.";

const STANDARD_LEAD: &str = "Thanks for your question. Based on our procedures, here’s the guidance:";
const STANDARD_EMPTY: &str = "- Relevant guidance identified; confirm next steps.";
const STANDARD_CLOSING: &str = "Please confirm if you’d like us to proceed or if further detail is needed.";

/// Split after every `.`, `!` or `?` that is followed by whitespace.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let end = i + c.len_utf8();
        if !chars.peek().is_some_and(|(_, next)| next.is_whitespace()) {
            continue;
        }
        sentences.push(&text[start..end]);
        while chars.peek().is_some_and(|(_, next)| next.is_whitespace()) {
            chars.next();
        }
        start = chars.peek().map(|(j, _)| *j).unwrap_or(text.len());
    }
    if start < text.len() || sentences.is_empty() {
        sentences.push(&text[start..]);
    }
    sentences
}

/// First two sentences of a page, or `None` when nothing is left after trimming.
pub fn nugget(text: &str) -> Option<String> {
    let joined = split_sentences(text).into_iter().take(2).collect::<Vec<_>>().join(" ");
    let trimmed = joined.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Nuggets of the first `window` hits, in ranking order.
pub fn nuggets(hits: &[RankedHit], documents: &[Document], window: usize) -> Vec<String> {
    hits.iter()
        .take(window)
        .filter_map(|hit| documents.get(hit.doc)?.page(hit.page))
        .filter_map(|page| nugget(&page.text))
        .collect()
}

/// Assemble the draft for `mode`. Always returns non-empty text.
pub fn synthesize(mode: Mode, hits: &[RankedHit], documents: &[Document], window: usize) -> String {
    let nuggets = nuggets(hits, documents, window);
    match mode {
        Mode::Bullets => {
            let body = bullet_body(&nuggets, BULLETS_LIMIT, BULLETS_EMPTY);
            format!("{BULLETS_LEAD}\n\n{body}\n\n{BULLETS_CLOSING}")
        }
        Mode::Simple => {
            let summary = nuggets.first().map(String::as_str).unwrap_or(SIMPLE_FALLBACK);
            format!("{summary}\n\n{SIMPLE_CLOSING}")
        }
        Mode::Standard => {
            let body = bullet_body(&nuggets, STANDARD_LIMIT, STANDARD_EMPTY);
            format!("{STANDARD_LEAD}\n\n{body}\n\n{STANDARD_CLOSING}")
        }
    }
}

fn bullet_body(nuggets: &[String], limit: usize, empty: &str) -> String {
    if nuggets.is_empty() {
        return empty.to_string();
    }
    nuggets.iter().take(limit).map(|n| format!("- {n}")).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked(docs: &[Document]) -> Vec<RankedHit> {
        docs.iter()
            .enumerate()
            .flat_map(|(d, doc)| doc.pages.iter().map(move |p| RankedHit { score: 0.5, doc: d, page: p.index }))
            .collect()
    }

    #[test]
    fn splits_on_terminal_punctuation_followed_by_space() {
        assert_eq!(split_sentences("Call ops. Then wait! Done? yes"), vec!["Call ops.", "Then wait!", "Done?", "yes"]);
        assert_eq!(split_sentences("Form 1.5 applies. Ok."), vec!["Form 1.5 applies.", "Ok."]);
        assert_eq!(split_sentences(""), vec![""]);
    }

    #[test]
    fn nugget_joins_two_sentences() {
        assert_eq!(nugget("One. Two. Three.").as_deref(), Some("One. Two."));
        assert_eq!(nugget("   "), None);
    }

    #[test]
    fn bullets_caps_at_eight() {
        let pages: Vec<String> = (0..10).map(|i| format!("Step {i} applies.")).collect();
        let docs = vec![Document::new("steps.pdf", &pages)];
        let draft = synthesize(Mode::Bullets, &ranked(&docs), &docs, 10);
        assert_eq!(draft.lines().filter(|l| l.starts_with("- ")).count(), 8);
        assert!(draft.starts_with(BULLETS_LEAD));
        assert!(draft.ends_with(BULLETS_CLOSING));
    }

    #[test]
    fn standard_caps_at_six_within_window() {
        let pages: Vec<String> = (0..10).map(|i| format!("Rule {i}.")).collect();
        let docs = vec![Document::new("rules.pdf", &pages)];
        let draft = synthesize(Mode::Standard, &ranked(&docs), &docs, 6);
        assert_eq!(draft.lines().filter(|l| l.starts_with("- ")).count(), 6);
        let draft = synthesize(Mode::Standard, &ranked(&docs), &docs, 3);
        assert_eq!(draft.lines().filter(|l| l.starts_with("- ")).count(), 3);
    }

    #[test]
    fn simple_uses_first_nugget_without_marker() {
        let docs = vec![Document::new("a.pdf", ["Submit the form. Wait a day. Then call."])];
        let draft = synthesize(Mode::Simple, &ranked(&docs), &docs, 6);
        assert!(draft.starts_with("Submit the form. Wait a day.\n\n"));
    }

    #[test]
    fn empty_inputs_fall_back_to_placeholders() {
        let docs = vec![Document::new("blank.pdf", ["   ", ""])];
        let hits = ranked(&docs);
        assert!(synthesize(Mode::Simple, &hits, &docs, 6).starts_with(SIMPLE_FALLBACK));
        assert!(synthesize(Mode::Bullets, &hits, &docs, 6).contains(BULLETS_EMPTY));
        assert!(synthesize(Mode::Standard, &[], &[], 6).contains(STANDARD_EMPTY));
        for mode in Mode::ALL {
            assert!(!synthesize(mode, &[], &[], 6).is_empty());
        }
    }

    #[test]
    fn out_of_range_hits_are_skipped() {
        let hits = [RankedHit { score: 1.0, doc: 4, page: 9 }];
        assert!(synthesize(Mode::Simple, &hits, &[], 6).starts_with(SIMPLE_FALLBACK));
    }
}
