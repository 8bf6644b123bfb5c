//! Cross-query merge and ordering.

use std::collections::HashSet;

use notetube_core::RankedVideo;

/// Merge per-query lists in query order. The first occurrence of a video id
/// wins, including its per-query normalized score. The result is stably
/// sorted by descending engagement and not truncated.
pub fn rank(candidate_lists: Vec<Vec<RankedVideo>>) -> Vec<RankedVideo> {
    let mut seen = HashSet::new();
    let mut merged: Vec<RankedVideo> = candidate_lists
        .into_iter()
        .flatten()
        .filter(|v| seen.insert(v.video_id.clone()))
        .collect();
    merged.sort_by(|a, b| b.engagement_score.total_cmp(&a.engagement_score));
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(id: &str, score: f64) -> RankedVideo {
        RankedVideo {
            title: id.to_uppercase(),
            description: String::new(),
            thumbnail_url: String::new(),
            video_id: id.into(),
            url: format!("https://www.youtube.com/watch?v={}", id),
            channel_id: "chan".into(),
            channel_subscribers: 50_000,
            like_count: 1_000,
            view_count: 10_000,
            engagement_score: score,
            relevance_score: 0.0,
        }
    }

    #[test]
    fn test_first_occurrence_wins() {
        let ranked = rank(vec![
            vec![video("x", 0.5), video("a", 1.0)],
            vec![video("x", 1.0), video("b", 0.2)],
        ]);
        let xs: Vec<&RankedVideo> = ranked.iter().filter(|v| v.video_id == "x").collect();
        assert_eq!(xs.len(), 1);
        assert_eq!(xs[0].engagement_score, 0.5);
    }

    #[test]
    fn test_sorted_descending_and_stable() {
        let ranked = rank(vec![
            vec![video("a", 0.3), video("b", 0.9)],
            vec![video("c", 0.3), video("d", 1.0)],
        ]);
        let ids: Vec<&str> = ranked.iter().map(|v| v.video_id.as_str()).collect();
        assert_eq!(ids, vec!["d", "b", "a", "c"]);
        for pair in ranked.windows(2) {
            assert!(pair[0].engagement_score >= pair[1].engagement_score);
        }
    }

    #[test]
    fn test_empty_lists() {
        assert!(rank(Vec::new()).is_empty());
        assert!(rank(vec![Vec::new(), Vec::new()]).is_empty());
    }
}
