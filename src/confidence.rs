use crate::data_models::{ConfidenceLabel, ConfidenceScore, SearchDepth, SearchResult};

const FULL_SOURCE_COUNT: f64 = 5.0;
const MAX_SOURCE_CONFIDENCE: f64 = 0.6;
const MAX_RELEVANCE_BONUS: f64 = 0.4;
const ADVANCED_MULTIPLIER: f64 = 1.2;

const HIGH_THRESHOLD: f64 = 0.8;
const MEDIUM_THRESHOLD: f64 = 0.6;

/// Heuristic grounding score from result count, search depth and relevance.
///
/// This is not a calibrated probability. The relevance bonus only applies
/// when the *first* result carries a score, but the average is then taken
/// over every result with missing scores counted as zero.
pub fn calculate_confidence(results: &[SearchResult], depth: SearchDepth) -> ConfidenceScore {
    let source_confidence = (results.len() as f64 / FULL_SOURCE_COUNT).min(MAX_SOURCE_CONFIDENCE);

    let relevance_bonus = match results.first() {
        Some(first) if first.relevance_score.is_some() => {
            let total: f64 = results
                .iter()
                .map(|r| r.relevance_score.unwrap_or(0.0))
                .sum();
            let avg = total / results.len() as f64;
            (avg * MAX_RELEVANCE_BONUS).min(MAX_RELEVANCE_BONUS)
        }
        _ => 0.0,
    };

    let multiplier = match depth {
        SearchDepth::Advanced => ADVANCED_MULTIPLIER,
        SearchDepth::Basic => 1.0,
    };

    let value = ((source_confidence + relevance_bonus) * multiplier).clamp(0.0, 1.0);
    ConfidenceScore {
        label: label_for(value),
        value,
    }
}

fn label_for(value: f64) -> ConfidenceLabel {
    if value >= HIGH_THRESHOLD {
        ConfidenceLabel::High
    } else if value >= MEDIUM_THRESHOLD {
        ConfidenceLabel::Medium
    } else {
        ConfidenceLabel::Low
    }
}
