use nli_keywords::keywords::StopwordFilter;
use nli_keywords::utils::test::WordListExtractor;
use nli_keywords::{
    ExtractorConfig, ExtractorKind, KeywordError, KeywordExtractor, TextRankExtractor,
    build_extractor, process_item, word_extraction,
};

const ABSTRACT: &str = "Compatibility of systems of linear constraints over the set of natural \
    numbers. Criteria of compatibility of a system of linear Diophantine equations, strict \
    inequations, and nonstrict inequations are considered. Upper bounds for components of a \
    minimal set of solutions and algorithms of construction of minimal generating sets of \
    solutions for all types of systems are given.";

#[test]
fn test_textrank_scores_descending() {
    let extractor = TextRankExtractor::new(ExtractorConfig::default()).unwrap();
    let keywords = extractor.extract_keywords(ABSTRACT).unwrap();

    assert_eq!(keywords.len(), 5);
    let lower = ABSTRACT.to_lowercase();
    assert!(keywords.iter().all(|k| lower.contains(k.text.as_str())));
    for pair in keywords.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn test_textrank_phrases() {
    let config = ExtractorConfig {
        ngram_range: (1, 2),
        top_n: 20,
        ..ExtractorConfig::default()
    };
    let extractor = TextRankExtractor::new(config).unwrap();
    let set = word_extraction(&extractor, ABSTRACT).unwrap();

    assert!(set.contains("linear constraints"));
    assert!(set.iter().all(|k| k.split(' ').count() <= 2));
}

#[test]
fn test_custom_stopwords() {
    let extractor = TextRankExtractor::with_stopwords(
        ExtractorConfig::default(),
        StopwordFilter::from_list(&["cream", "skimming"]),
    )
    .unwrap();
    let set = word_extraction(&extractor, "Cream skimming has two basic dimensions").unwrap();

    assert!(!set.contains("cream"));
    assert!(!set.contains("skimming"));
    assert!(set.contains("dimensions"));
}

#[test]
fn test_process_item_is_union() {
    let extractor = WordListExtractor;
    let premise = "Product and geography";
    let hypothesis = "Geography matters";

    let union = process_item(&extractor, Some(premise), Some(hypothesis)).unwrap();
    let mut expected = word_extraction(&extractor, premise).unwrap();
    expected.extend(word_extraction(&extractor, hypothesis).unwrap());

    assert_eq!(union, expected);
    assert_eq!(
        union.into_iter().collect::<Vec<_>>(),
        vec!["and", "geography", "matters", "product"]
    );
}

#[test]
fn test_blank_texts_have_no_keywords() {
    let extractor = TextRankExtractor::new(ExtractorConfig::default()).unwrap();
    assert!(process_item(&extractor, Some("   "), None).unwrap().is_empty());
    assert!(word_extraction(&extractor, "").unwrap().is_empty());
}

#[test]
fn test_batch_matches_single_extraction() {
    let extractor = TextRankExtractor::new(ExtractorConfig::default()).unwrap();
    let texts = [
        "Red apples grow on tall trees.",
        "The committee approved the budget.",
    ];

    let batch = extractor.extract_keywords_batch(&texts).unwrap();
    for (text, keywords) in texts.iter().zip(batch) {
        assert_eq!(keywords, extractor.extract_keywords(text).unwrap());
    }
}

#[test]
fn test_build_extractor() {
    let extractor = build_extractor(ExtractorKind::TextRank, ExtractorConfig::default()).unwrap();
    assert_eq!(extractor.name(), "textrank");

    let invalid = ExtractorConfig {
        top_n: 0,
        ..ExtractorConfig::default()
    };
    let err = build_extractor(ExtractorKind::TextRank, invalid).err().unwrap();
    assert!(matches!(err, KeywordError::Config(_)));
}

#[cfg(not(feature = "embeddings"))]
#[test]
fn test_embedding_requires_feature() {
    let err = build_extractor(ExtractorKind::Embedding, ExtractorConfig::default())
        .err()
        .unwrap();
    assert!(matches!(err, KeywordError::Config(_)));
}
