//! Deterministic safety scoring over matched cameras.

use crate::models::{ProximityMatch, SafetyLevel, SafetyScore};

/// Score a route from the safety levels of its nearby cameras.
///
/// Hazardous cameras cost 30 points, caution 10; safe cameras earn 5 back.
/// The categorical rating is deliberately decoupled from the score: one
/// hazardous camera makes the whole route hazardous no matter how many
/// safe cameras offset the number.
pub fn score_route_safety(matches: &[ProximityMatch]) -> SafetyScore {
    if matches.is_empty() {
        // No evidence means no penalty.
        return SafetyScore {
            score: 100.0,
            rating: SafetyLevel::Unknown,
            hazard_count: 0,
            caution_count: 0,
            safe_count: 0,
            total: 0,
        };
    }

    let hazard_count = count_level(matches, SafetyLevel::Hazardous);
    let caution_count = count_level(matches, SafetyLevel::Caution);
    let safe_count = count_level(matches, SafetyLevel::Safe);
    let total = matches.len();

    let score = (100.0 - 30.0 * hazard_count as f64 - 10.0 * caution_count as f64
        + 5.0 * safe_count as f64)
        .clamp(0.0, 100.0);

    let rating = if hazard_count > 0 {
        SafetyLevel::Hazardous
    } else if caution_count as f64 > 0.3 * total as f64 {
        SafetyLevel::Caution
    } else if safe_count > 0 {
        SafetyLevel::Safe
    } else {
        SafetyLevel::Unknown
    };

    SafetyScore {
        score: (score * 10.0).round() / 10.0,
        rating,
        hazard_count,
        caution_count,
        safe_count,
        total,
    }
}

fn count_level(matches: &[ProximityMatch], level: SafetyLevel) -> usize {
    matches.iter().filter(|m| m.safety_level == level).count()
}
