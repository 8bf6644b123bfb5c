//! RAKE: rapid automatic keyword extraction.
//!
//! Word score is degree / frequency over the stop-word-delimited runs; a
//! phrase scores the sum of its word scores.

use std::collections::HashMap;

use notetube_core::Keyword;

use super::{candidate_phrases, content_runs, ExtractionParams, KeywordExtractor};

#[derive(Debug, Default, Clone)]
pub struct Rake;

impl Rake {
    pub fn new() -> Self {
        Self
    }
}

impl KeywordExtractor for Rake {
    fn name(&self) -> &'static str {
        "rake"
    }

    fn extract(&self, text: &str, params: &ExtractionParams) -> Vec<Keyword> {
        let runs = content_runs(text, &params.language);

        let mut freq: HashMap<&str, f64> = HashMap::new();
        let mut degree: HashMap<&str, f64> = HashMap::new();
        for run in &runs {
            let co = (run.len() - 1) as f64;
            for word in run {
                *freq.entry(*word).or_default() += 1.0;
                *degree.entry(*word).or_default() += co;
            }
        }

        let word_score = |w: &str| -> f64 {
            let f = freq.get(w).copied().unwrap_or(0.0);
            if f == 0.0 {
                return 0.0;
            }
            (degree.get(w).copied().unwrap_or(0.0) + f) / f
        };

        candidate_phrases(&runs, params.ngram_range)
            .into_iter()
            .map(|words| {
                let score = words.iter().map(|w| word_score(*w)).sum();
                Keyword::new(words.join(" "), score)
            })
            .collect()
    }
}
