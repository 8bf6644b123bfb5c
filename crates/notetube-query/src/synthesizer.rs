//! Keyword-to-query synthesis with a keyword fallback.

use std::sync::Arc;
use std::time::Duration;

use notetube_core::Keyword;
use tracing::{debug, info, warn};

use crate::providers::GenerativeBackend;
use crate::types::GenerateOutcome;

/// Writes video search queries from ranked keywords.
pub struct QuerySynthesizer {
    backend: Arc<dyn GenerativeBackend>,
    model: String,
    timeout: Duration,
}

impl QuerySynthesizer {
    pub fn new(backend: Arc<dyn GenerativeBackend>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            backend,
            model: model.into(),
            timeout,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask the backend whether the configured model is available.
    pub async fn health_check(&self) -> bool {
        self.backend.health_check(&self.model).await
    }

    /// Produce `num_queries` queries, or fewer only when keywords run out.
    pub async fn synthesize(
        &self,
        keywords: &[Keyword],
        num_queries: usize,
        language: Option<&str>,
    ) -> Vec<String> {
        if keywords.is_empty() || num_queries == 0 {
            return Vec::new();
        }

        let prompt = build_prompt(keywords, num_queries, language);
        debug!("Query prompt:\n{}", prompt);

        let mut queries = match self.backend.generate(&prompt, &self.model, self.timeout).await {
            GenerateOutcome::Generated(text) => parse_lines(&text),
            GenerateOutcome::Empty => Vec::new(),
            GenerateOutcome::Unavailable(reason) => {
                warn!("Generative backend unavailable ({}), using keywords as queries", reason);
                return fallback(keywords, num_queries);
            }
        };

        if queries.is_empty() {
            warn!("Generative backend returned no usable lines, using keywords as queries");
            return fallback(keywords, num_queries);
        }

        if queries.len() < num_queries {
            let missing = num_queries - queries.len();
            let padding: Vec<String> = keywords
                .iter()
                .map(|k| k.phrase.clone())
                .filter(|p| !queries.contains(p))
                .take(missing)
                .collect();
            debug!("Padding {} generated queries with {} keywords", queries.len(), padding.len());
            queries.extend(padding);
        }
        queries.truncate(num_queries);

        info!("Generated {} search queries", queries.len());
        queries
    }
}

/// Instruction prompt naming the count and the keywords.
pub fn build_prompt(keywords: &[Keyword], num_queries: usize, language: Option<&str>) -> String {
    let phrases: Vec<&str> = keywords.iter().map(|k| k.phrase.as_str()).collect();
    let language_rule = match language {
        Some(lang) if lang != "en" => format!(
            "- Be written in the language of the notes (ISO code \"{}\") or in English",
            lang
        ),
        _ => "- Be written in English".to_string(),
    };

    format!(
        "Generate {n} YouTube search queries to find educational videos \
         about the following keywords, extracted from study notes:\n\
         {keywords}\n\n\
         Each query must:\n\
         - Maximize the relevance of YouTube results\n\
         - Include the most important keywords\n\
         - Be understandable without further context\n\
         {language_rule}\n\
         - Be 3 to 7 words long\n\n\
         Return ONLY the queries, one per line, without numbering or any other text.",
        n = num_queries,
        keywords = phrases.join(", "),
        language_rule = language_rule,
    )
}

/// Trim lines, strip a leading `<digit>.` ordinal, drop blanks.
pub fn parse_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .map(|line| {
            let mut chars = line.chars();
            match (chars.next(), chars.next()) {
                (Some(d), Some('.')) if d.is_ascii_digit() => line[2..].trim(),
                _ => line,
            }
        })
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn fallback(keywords: &[Keyword], num_queries: usize) -> Vec<String> {
    keywords
        .iter()
        .take(num_queries)
        .map(|k| k.phrase.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeBackend {
        outcome: GenerateOutcome,
        calls: AtomicUsize,
    }

    impl FakeBackend {
        fn new(outcome: GenerateOutcome) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl GenerativeBackend for FakeBackend {
        async fn generate(&self, _prompt: &str, _model: &str, _timeout: Duration) -> GenerateOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }

        async fn health_check(&self, _model: &str) -> bool {
            true
        }
    }

    fn keywords() -> Vec<Keyword> {
        vec![Keyword::new("cpu", 0.9), Keyword::new("memory", 0.5)]
    }

    fn synthesizer(backend: Arc<FakeBackend>) -> QuerySynthesizer {
        QuerySynthesizer::new(backend, "gemma3:4b", Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_generated_lines_returned_verbatim() {
        let backend = FakeBackend::new(GenerateOutcome::Generated(
            "1. how a cpu works explained\nmemory hierarchy for beginners\n".into(),
        ));
        let queries = synthesizer(backend).synthesize(&keywords(), 2, Some("en")).await;
        assert_eq!(
            queries,
            vec!["how a cpu works explained", "memory hierarchy for beginners"]
        );
    }

    #[tokio::test]
    async fn test_timeout_falls_back_to_keywords() {
        let backend = FakeBackend::new(GenerateOutcome::Unavailable("timed out".into()));
        let queries = synthesizer(backend).synthesize(&keywords(), 2, None).await;
        assert_eq!(queries, vec!["cpu", "memory"]);
    }

    #[tokio::test]
    async fn test_empty_output_falls_back_to_keywords() {
        let backend = FakeBackend::new(GenerateOutcome::Generated("\n  \n1.\n".into()));
        let queries = synthesizer(backend).synthesize(&keywords(), 2, None).await;
        assert_eq!(queries, vec!["cpu", "memory"]);
    }

    #[tokio::test]
    async fn test_shortfall_padded_with_unused_keywords() {
        let backend = FakeBackend::new(GenerateOutcome::Generated("cpu\n".into()));
        let kws = vec![
            Keyword::new("cpu", 0.9),
            Keyword::new("memory", 0.5),
            Keyword::new("cache", 0.4),
        ];
        let queries = synthesizer(backend).synthesize(&kws, 3, None).await;
        assert_eq!(queries, vec!["cpu", "memory", "cache"]);
    }

    #[tokio::test]
    async fn test_overflow_truncated() {
        let backend = FakeBackend::new(GenerateOutcome::Generated("a b c\nd e f\ng h i\n".into()));
        let queries = synthesizer(backend).synthesize(&keywords(), 2, None).await;
        assert_eq!(queries, vec!["a b c", "d e f"]);
    }

    #[tokio::test]
    async fn test_exact_count_for_various_sizes() {
        let kws: Vec<Keyword> = (0..6)
            .map(|i| Keyword::new(format!("keyword{}", i), 1.0 - i as f64 / 10.0))
            .collect();
        for outcome in [
            GenerateOutcome::Generated("only one query here".into()),
            GenerateOutcome::Generated("q1\nq2\nq3\nq4\nq5\nq6\nq7\nq8".into()),
            GenerateOutcome::Empty,
            GenerateOutcome::Unavailable("down".into()),
        ] {
            for n in 1..=6 {
                let backend = FakeBackend::new(outcome.clone());
                let queries = synthesizer(backend).synthesize(&kws, n, None).await;
                assert_eq!(queries.len(), n, "outcome {:?}, n={}", outcome, n);
            }
        }
    }

    #[tokio::test]
    async fn test_no_keywords_skips_backend() {
        let backend = FakeBackend::new(GenerateOutcome::Generated("x".into()));
        let queries = synthesizer(backend.clone()).synthesize(&[], 3, None).await;
        assert!(queries.is_empty());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_parse_lines_strips_ordinals() {
        let lines = parse_lines("  1. cpu pipeline stages \n\n2.memory\n10. registers\nplain query");
        assert_eq!(
            lines,
            vec!["cpu pipeline stages", "memory", "10. registers", "plain query"]
        );
    }

    #[test]
    fn test_prompt_mentions_count_and_keywords() {
        let prompt = build_prompt(&keywords(), 3, Some("it"));
        assert!(prompt.contains("Generate 3 YouTube search queries"));
        assert!(prompt.contains("cpu, memory"));
        assert!(prompt.contains("\"it\""));
        assert!(prompt.contains("3 to 7 words"));
    }
}
