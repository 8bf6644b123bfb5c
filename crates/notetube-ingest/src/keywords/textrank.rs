//! TextRank: PageRank over a word co-occurrence graph.
//!
//! Nodes are content words added in first-seen order, so node indices and
//! scores are deterministic. Two words are linked once, in both directions,
//! when they co-occur inside the window. A phrase scores the sum of its
//! word ranks.

use std::collections::{HashMap, HashSet};

use notetube_core::Keyword;
use petgraph::algo::page_rank;
use petgraph::graph::{Graph, NodeIndex};

use super::{candidate_phrases, content_runs, ExtractionParams, KeywordExtractor};

#[derive(Debug, Clone)]
pub struct TextRank {
    /// Co-occurrence window over the content-word sequence.
    pub window: usize,
    pub damping: f64,
    pub iterations: usize,
}

impl Default for TextRank {
    fn default() -> Self {
        Self {
            window: 3,
            damping: 0.85,
            iterations: 30,
        }
    }
}

impl TextRank {
    fn rank_words<'a>(&self, sequence: &[&'a str]) -> HashMap<&'a str, f64> {
        let mut graph: Graph<&'a str, ()> = Graph::new();
        let mut nodes: HashMap<&'a str, NodeIndex> = HashMap::new();
        for &w in sequence {
            nodes.entry(w).or_insert_with(|| graph.add_node(w));
        }

        if graph.node_count() == 0 {
            return HashMap::new();
        }

        let window = self.window.max(2);
        let mut linked: HashSet<(NodeIndex, NodeIndex)> = HashSet::new();
        for i in 0..sequence.len() {
            let a = nodes[sequence[i]];
            for j in (i + 1)..(i + window).min(sequence.len()) {
                let b = nodes[sequence[j]];
                if a != b && linked.insert((a.min(b), a.max(b))) {
                    graph.add_edge(a, b, ());
                    graph.add_edge(b, a, ());
                }
            }
        }

        let scores = page_rank(&graph, self.damping, self.iterations);
        graph
            .node_indices()
            .map(|idx| (graph[idx], scores[idx.index()]))
            .collect()
    }
}

impl KeywordExtractor for TextRank {
    fn name(&self) -> &'static str {
        "textrank"
    }

    fn extract(&self, text: &str, params: &ExtractionParams) -> Vec<Keyword> {
        let runs = content_runs(text, &params.language);
        let sequence: Vec<&str> = runs.iter().flatten().copied().collect();
        let ranks = self.rank_words(&sequence);

        candidate_phrases(&runs, params.ngram_range)
            .into_iter()
            .map(|words| {
                let score = words.iter().map(|w| ranks.get(w).copied().unwrap_or(0.0)).sum();
                Keyword::new(words.join(" "), score)
            })
            .collect()
    }
}
