//! Candidate ranking for karaoke search results
//!
//! Every candidate is scored independently; the highest score wins and ties
//! keep the first candidate in search order. Scoring is pure and performs no I/O.

use std::collections::HashSet;

use super::channels::{ChannelLists, ChannelVerdict};
use crate::error::{FinderError, FinderResult};
use shared::Candidate;

const PREFERRED_CHANNEL_BONUS: f64 = 30.0;
const BLOCKED_CHANNEL_PENALTY: f64 = -120.0;
const OVERLAP_POINTS_PER_TOKEN: f64 = 4.0;
const VIEW_WEIGHT: f64 = 6.0;
const MIN_TOKEN_LEN: usize = 3;

/// Title keyword score; all checks are independent substring matches
pub fn keyword_score(title: &str) -> f64 {
    let t = title.to_lowercase();
    let mut score = 0.0;

    if t.contains("karaoke") {
        score += 30.0;
    }
    if t.contains("karaoke version") {
        score += 20.0;
    }
    if t.contains("instrumental") {
        score += 8.0;
    }
    if t.contains("lyrics") {
        score += 4.0;
    }
    // "no vocal" also covers "no vocals"
    if t.contains("no vocal") {
        score += 8.0;
    }

    if t.contains("live") {
        score -= 8.0;
    }
    if t.contains("cover") {
        score -= 4.0;
    }
    if t.contains("reaction") {
        score -= 20.0;
    }

    score
}

/// Channel score from the curated allow/block lists
pub fn channel_score(channel_name: &str, lists: &ChannelLists) -> f64 {
    match lists.classify(channel_name) {
        ChannelVerdict::Preferred => PREFERRED_CHANNEL_BONUS,
        ChannelVerdict::Blocked => BLOCKED_CHANNEL_PENALTY,
        ChannelVerdict::Neutral => 0.0,
    }
}

fn query_tokens(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .filter(|token| token.chars().count() >= MIN_TOKEN_LEN)
        .map(str::to_string)
        .collect()
}

/// Four points per whitespace token (3+ chars) shared by title and query
pub fn query_overlap_score(title: &str, query: &str) -> f64 {
    let title_tokens = query_tokens(title);
    let overlap = query_tokens(query).intersection(&title_tokens).count();
    overlap as f64 * OVERLAP_POINTS_PER_TOKEN
}

/// Log-scaled popularity; a million views is worth about 36 points
pub fn view_score(view_count: Option<u64>) -> f64 {
    match view_count {
        Some(views) if views > 0 => VIEW_WEIGHT * (views as f64 + 1.0).log10(),
        _ => 0.0,
    }
}

/// Scores search candidates against a song query
#[derive(Debug, Clone, Default)]
pub struct CandidateRanker {
    channels: ChannelLists,
}

impl CandidateRanker {
    pub fn new(channels: ChannelLists) -> Self {
        Self { channels }
    }

    pub fn score(&self, candidate: &Candidate, query: &str) -> f64 {
        keyword_score(&candidate.title)
            + channel_score(&candidate.channel_name, &self.channels)
            + query_overlap_score(&candidate.title, query)
            + view_score(candidate.view_count)
    }

    /// Best candidate with its score filled in
    pub fn rank(&self, candidates: &[Candidate], query: &str) -> FinderResult<Candidate> {
        let mut best: Option<Candidate> = None;

        for candidate in candidates {
            let score = self.score(candidate, query);
            // Strictly greater keeps the earliest candidate on ties
            if best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(Candidate {
                    score,
                    ..candidate.clone()
                });
            }
        }

        best.ok_or_else(|| FinderError::NotFound {
            query: query.to_string(),
        })
    }
}

/// Rank with the default channel lists
pub fn rank(candidates: &[Candidate], query: &str) -> FinderResult<Candidate> {
    CandidateRanker::default().rank(candidates, query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, title: &str, channel: &str, views: Option<u64>) -> Candidate {
        Candidate::new(id, title, channel, views)
    }

    #[test]
    fn test_karaoke_version_beats_live_recording() {
        let candidates = vec![
            candidate("a", "Dancing Queen - Karaoke Version", "Sing King", Some(5_000_000)),
            candidate("b", "Dancing Queen (Live)", "Random Channel", Some(50_000)),
        ];

        let best = rank(&candidates, "dancing queen").unwrap();
        assert_eq!(best.external_id, "a");

        // 50 keywords + 30 channel + 8 overlap + 6*log10(5_000_001)
        let expected = 88.0 + 6.0 * 5_000_001f64.log10();
        assert!((best.score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_keyword_score_is_additive() {
        assert_eq!(keyword_score("Song (Karaoke Version) Instrumental Lyrics"), 62.0);
        assert_eq!(keyword_score("Song - No Vocals"), 8.0);
        assert_eq!(keyword_score("Song - no vocal"), 8.0);
        assert_eq!(keyword_score("Live Cover Reaction"), -32.0);
        assert_eq!(keyword_score("Plain title"), 0.0);
    }

    #[test]
    fn test_channel_score_values() {
        let lists = ChannelLists::default();
        assert_eq!(channel_score("KaraFun", &lists), 30.0);
        assert_eq!(channel_score("Some Band - Topic", &lists), -120.0);
        assert_eq!(channel_score("Random Channel", &lists), 0.0);
    }

    #[test]
    fn test_query_overlap_ignores_short_tokens() {
        // "a", "on" and "me" are below the length cut-off
        assert_eq!(query_overlap_score("Take a Chance on Me", "take a chance on me"), 8.0);
        assert_eq!(query_overlap_score("DANCING QUEEN", "dancing queen"), 8.0);
        assert_eq!(query_overlap_score("Waterloo", "fernando"), 0.0);
    }

    #[test]
    fn test_view_score_missing_or_zero() {
        assert_eq!(view_score(None), 0.0);
        assert_eq!(view_score(Some(0)), 0.0);
        assert!((view_score(Some(999_999)) - 36.0).abs() < 1e-9);
    }

    #[test]
    fn test_ties_keep_first_candidate() {
        let candidates = vec![
            candidate("first", "Waterloo", "Channel A", None),
            candidate("second", "Waterloo", "Channel B", None),
        ];

        let best = rank(&candidates, "waterloo").unwrap();
        assert_eq!(best.external_id, "first");
    }

    #[test]
    fn test_empty_candidates_is_not_found() {
        let result = rank(&[], "dancing queen");
        assert!(matches!(result, Err(FinderError::NotFound { query }) if query == "dancing queen"));
    }

    #[test]
    fn test_blocked_channel_sinks_candidate() {
        let candidates = vec![
            candidate("official", "Dancing Queen Karaoke", "ABBA - Topic", Some(900_000_000)),
            candidate("fan", "Dancing Queen", "Party Songs", Some(100)),
        ];

        let best = rank(&candidates, "dancing queen").unwrap();
        assert_eq!(best.external_id, "fan");
    }

    #[test]
    fn test_custom_channel_lists() {
        let ranker = CandidateRanker::new(ChannelLists::new(&["Party Songs"], &[]));
        let candidates = vec![
            candidate("a", "Waterloo", "Other", None),
            candidate("b", "Waterloo", "Party Songs", None),
        ];

        let best = ranker.rank(&candidates, "waterloo").unwrap();
        assert_eq!(best.external_id, "b");
        assert_eq!(best.score, 34.0);
    }
}
