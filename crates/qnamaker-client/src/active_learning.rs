//! Low-score variation: decides which answers are close enough to the top answer that the
//! user should be asked to pick one.

use crate::types::QueryResult;

const PREVIOUS_LOW_SCORE_VARIATION_MULTIPLIER: f32 = 0.7;
const MAX_LOW_SCORE_VARIATION_MULTIPLIER: f32 = 1.0;
const MAXIMUM_SCORE_FOR_LOW_SCORE_VARIATION: f32 = 95.0;
const MINIMUM_SCORE_FOR_LOW_SCORE_VARIATION: f32 = 20.0;

/// Returns the results clustered around the top answer.
///
/// Input must be sorted by score, descending. Scores are compared on the 0..100 scale.
/// A top score above 95 is unambiguous (only the top result is returned); a top score of 20
/// or less is too weak to suggest anything (empty result).
pub fn get_low_score_variation(results: &[QueryResult]) -> Vec<QueryResult> {
    let Some(top) = results.first() else {
        return Vec::new();
    };
    if results.len() == 1 {
        return results.to_vec();
    }

    let top_score = top.score * 100.0;
    if top_score > MAXIMUM_SCORE_FOR_LOW_SCORE_VARIATION {
        return vec![top.clone()];
    }
    if top_score <= MINIMUM_SCORE_FOR_LOW_SCORE_VARIATION {
        return Vec::new();
    }

    let mut filtered = vec![top.clone()];
    let mut prev_score = top_score;
    for result in &results[1..] {
        let score = result.score * 100.0;
        if include_for_clustering(prev_score, score, PREVIOUS_LOW_SCORE_VARIATION_MULTIPLIER)
            && include_for_clustering(top_score, score, MAX_LOW_SCORE_VARIATION_MULTIPLIER)
        {
            prev_score = score;
            filtered.push(result.clone());
        }
    }
    filtered
}

fn include_for_clustering(prev_score: f32, current_score: f32, multiplier: f32) -> bool {
    (prev_score - current_score) < multiplier * prev_score.sqrt()
}
