use procdraft_core::tokenizer::{analyze, tokenize};

#[test]
fn it_normalizes_and_lowercases() {
    let words = tokenize("Ｗｉｒｅ Transfers ＡＣＡＴ");
    assert_eq!(words, vec!["wire", "transfers", "acat"]);
}

#[test]
fn it_filters_stopwords() {
    let words = tokenize("The quick brown fox and the lazy dog");
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
    assert!(words.contains(&"quick".to_string()));
}

#[test]
fn it_emits_unigrams_then_bigrams() {
    let terms = analyze("Form 4506 signature required");
    assert_eq!(
        terms,
        vec!["form", "4506", "signature", "required", "form 4506", "4506 signature", "signature required"]
    );
}
