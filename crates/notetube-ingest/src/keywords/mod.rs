//! Keyword extraction: pluggable phrase rankers behind one adapter.
//!
//! The adapter normalizes text, resolves the language (explicit, detected,
//! or the configured fallback) and dispatches to the strategy selected by
//! configuration. Strategies share candidate generation: stop words split
//! the token stream into runs, and runs are cut to the configured n-gram
//! range.

pub mod rake;
pub mod stopwords;
pub mod textrank;

pub use rake::Rake;
pub use textrank::TextRank;

use std::collections::HashSet;
use std::str::FromStr;

use notetube_core::{Error, Keyword};
use tracing::debug;

use crate::language::detect_language;
use crate::text::normalize;

/// Parameters shared by every strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionParams {
    pub top_n: usize,
    /// Minimum and maximum phrase length in words.
    pub ngram_range: (usize, usize),
    /// ISO 639-1 code selecting the stop-word table.
    pub language: String,
}

/// A phrase-ranking strategy. `text` is already normalized.
pub trait KeywordExtractor: Send + Sync {
    fn name(&self) -> &'static str;

    fn extract(&self, text: &str, params: &ExtractionParams) -> Vec<Keyword>;
}

/// Strategy selector used in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Statistical co-occurrence ranker.
    Rake,
    /// Graph ranker over a co-occurrence window.
    TextRank,
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rake" => Ok(Self::Rake),
            "textrank" | "text_rank" => Ok(Self::TextRank),
            other => Err(Error::Config(format!("unknown keyword algorithm: {}", other))),
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rake => write!(f, "rake"),
            Self::TextRank => write!(f, "textrank"),
        }
    }
}

impl Algorithm {
    pub fn build(&self) -> Box<dyn KeywordExtractor> {
        match self {
            Self::Rake => Box::new(Rake::new()),
            Self::TextRank => Box::new(TextRank::default()),
        }
    }
}

/// Keywords plus the language they were extracted under.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedKeywords {
    pub keywords: Vec<Keyword>,
    pub language: String,
}

/// Front door for keyword extraction.
pub struct KeywordAdapter {
    extractor: Box<dyn KeywordExtractor>,
    fallback_language: String,
}

impl KeywordAdapter {
    pub fn new(algorithm: Algorithm, fallback_language: impl Into<String>) -> Self {
        Self::with_extractor(algorithm.build(), fallback_language)
    }

    pub fn with_extractor(
        extractor: Box<dyn KeywordExtractor>,
        fallback_language: impl Into<String>,
    ) -> Self {
        Self {
            extractor,
            fallback_language: fallback_language.into(),
        }
    }

    pub fn algorithm_name(&self) -> &'static str {
        self.extractor.name()
    }

    /// Explicit language if given, else detected, else the fallback.
    pub fn resolve_language(&self, text: &str, language: Option<&str>) -> String {
        if let Some(lang) = language.map(str::trim).filter(|l| !l.is_empty()) {
            return lang.to_lowercase();
        }
        match detect_language(text).language {
            Some(lang) => lang.to_string(),
            None => {
                debug!(
                    "Language detection failed, using fallback '{}'",
                    self.fallback_language
                );
                self.fallback_language.clone()
            }
        }
    }

    /// Extract up to `top_n` keywords ordered by descending score.
    pub fn extract(
        &self,
        text: &str,
        top_n: usize,
        ngram_range: (usize, usize),
        language: Option<&str>,
    ) -> ExtractedKeywords {
        let language = self.resolve_language(text, language);
        let clean = normalize(text);
        if clean.is_empty() || top_n == 0 {
            return ExtractedKeywords {
                keywords: Vec::new(),
                language,
            };
        }

        let min = ngram_range.0.max(1);
        let params = ExtractionParams {
            top_n,
            ngram_range: (min, ngram_range.1.max(min)),
            language: language.clone(),
        };
        let keywords = finalize(self.extractor.extract(&clean, &params), top_n);
        debug!(
            "{} extracted {} keywords (language={})",
            self.extractor.name(),
            keywords.len(),
            language
        );

        ExtractedKeywords { keywords, language }
    }
}

/// Split normalized text into runs of consecutive non-stop words.
pub(crate) fn content_runs<'a>(text: &'a str, language: &str) -> Vec<Vec<&'a str>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for token in text.split_whitespace() {
        if stopwords::is_stopword(language, token) {
            if !current.is_empty() {
                runs.push(std::mem::take(&mut current));
            }
        } else {
            current.push(token);
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Cut runs to the n-gram range: runs inside the range are kept whole,
/// longer runs yield every window of the maximum length, shorter runs are
/// dropped. Order of first appearance is preserved.
pub(crate) fn candidate_phrases<'a>(
    runs: &[Vec<&'a str>],
    ngram_range: (usize, usize),
) -> Vec<Vec<&'a str>> {
    let (min, max) = ngram_range;
    let mut out = Vec::new();
    for run in runs {
        if run.len() < min {
            continue;
        }
        if run.len() <= max {
            out.push(run.clone());
        } else {
            for window in run.windows(max) {
                out.push(window.to_vec());
            }
        }
    }
    out
}

/// Deduplicate by phrase (first wins), stable-sort by descending score,
/// truncate to `top_n`.
pub(crate) fn finalize(scored: Vec<Keyword>, top_n: usize) -> Vec<Keyword> {
    let mut seen = HashSet::new();
    let mut unique: Vec<Keyword> = scored
        .into_iter()
        .filter(|k| seen.insert(k.phrase.clone()))
        .collect();
    unique.sort_by(|a, b| b.score.total_cmp(&a.score));
    unique.truncate(top_n);
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTES: &str = "The central processing unit executes instructions. \
        The central processing unit reads instructions from main memory. \
        Cache memory reduces memory latency for the central processing unit.";

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!("rake".parse::<Algorithm>().unwrap(), Algorithm::Rake);
        assert_eq!("TextRank".parse::<Algorithm>().unwrap(), Algorithm::TextRank);
        assert!("keybert".parse::<Algorithm>().is_err());
    }

    #[test]
    fn test_content_runs_split_on_stopwords() {
        let runs = content_runs("the cache memory reduces the latency", "en");
        assert_eq!(runs, vec![vec!["cache", "memory", "reduces"], vec!["latency"]]);
    }

    #[test]
    fn test_candidate_phrases_respect_range() {
        let runs = vec![vec!["a1", "b1", "c1", "d1"], vec!["e1"], vec!["f1", "g1"]];
        let phrases = candidate_phrases(&runs, (2, 3));
        assert_eq!(
            phrases,
            vec![vec!["a1", "b1", "c1"], vec!["b1", "c1", "d1"], vec!["f1", "g1"]]
        );
    }

    #[test]
    fn test_finalize_dedup_sort_ties() {
        let scored = vec![
            Keyword::new("memory", 1.0),
            Keyword::new("cpu", 2.0),
            Keyword::new("memory", 5.0),
            Keyword::new("cache", 1.0),
        ];
        let out = finalize(scored, 10);
        let phrases: Vec<&str> = out.iter().map(|k| k.phrase.as_str()).collect();
        // First occurrence of "memory" wins; ties keep first-seen order.
        assert_eq!(phrases, vec!["cpu", "memory", "cache"]);
        assert_eq!(out[1].score, 1.0);
    }

    #[test]
    fn test_adapter_contract_for_both_algorithms() {
        for algorithm in [Algorithm::Rake, Algorithm::TextRank] {
            let adapter = KeywordAdapter::new(algorithm, "it");
            let result = adapter.extract(NOTES, 3, (1, 3), None);

            assert_eq!(result.language, "en");
            assert!(!result.keywords.is_empty(), "{} found nothing", algorithm);
            assert!(result.keywords.len() <= 3);
            for pair in result.keywords.windows(2) {
                assert!(pair[0].score >= pair[1].score);
            }
            for k in &result.keywords {
                let words = k.phrase.split(' ').count();
                assert!((1..=3).contains(&words), "{} violates range", k.phrase);
            }
            let unique: HashSet<_> = result.keywords.iter().map(|k| &k.phrase).collect();
            assert_eq!(unique.len(), result.keywords.len());
        }
    }

    #[test]
    fn test_adapter_explicit_language_and_fallback() {
        let adapter = KeywordAdapter::new(Algorithm::Rake, "it");
        assert_eq!(adapter.resolve_language("cpu ram", Some("EN")), "en");
        assert_eq!(adapter.resolve_language("cpu ram", None), "it");
    }

    #[test]
    fn test_adapter_empty_text_yields_no_keywords() {
        let adapter = KeywordAdapter::new(Algorithm::TextRank, "it");
        let result = adapter.extract("123 ... !!!", 5, (1, 4), None);
        assert!(result.keywords.is_empty());
        assert_eq!(result.language, "it");
    }

    #[test]
    fn test_adapter_only_stopwords_yields_no_keywords() {
        let adapter = KeywordAdapter::new(Algorithm::Rake, "en");
        let result = adapter.extract("the and of which", 5, (1, 4), None);
        assert!(result.keywords.is_empty());
    }
}
