//! Time-decayed, usage-boosted relevance scoring.

use std::time::Duration;

use ordered_float::OrderedFloat;

/// Recency weight for a chunk of the given age.
///
/// Equals `1.0` for a brand-new chunk and `0.5` at `half_life`. Negative ages count as zero.
#[must_use]
pub fn decay(age_seconds: f64, half_life: Duration) -> f64 {
    let half_life = half_life.as_secs_f64();
    if half_life <= 0.0 {
        return 1.0;
    }
    1.0 / (1.0 + age_seconds.max(0.0) / half_life)
}

/// Ranking score of a chunk: similarity, damped by age and boosted by prior retrievals.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn relevance_score(
    similarity: f32,
    age_seconds: f64,
    use_count: u32,
    half_life: Duration,
    usage_boost: f32,
) -> f32 {
    let boost = f64::from(usage_boost).mul_add(f64::from(use_count), 1.0);
    (f64::from(similarity) * decay(age_seconds, half_life) * boost) as f32
}

/// Sorts items by score, highest first. Equal scores keep their input order.
pub fn rank_by<T>(items: &mut [T], score: impl Fn(&T) -> f32) {
    items.sort_by_key(|item| std::cmp::Reverse(OrderedFloat(score(item))));
}

#[cfg(test)]
mod tests {
    use super::*;

    const HALF_LIFE: Duration = Duration::from_secs(300);

    #[test]
    fn decay_halves_at_half_life() {
        assert!((decay(0.0, HALF_LIFE) - 1.0).abs() < f64::EPSILON);
        assert!((decay(300.0, HALF_LIFE) - 0.5).abs() < f64::EPSILON);
        assert!((decay(-10.0, HALF_LIFE) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn newer_chunk_scores_higher() {
        let newer = relevance_score(0.8, 10.0, 0, HALF_LIFE, 0.1);
        let older = relevance_score(0.8, 600.0, 0, HALF_LIFE, 0.1);
        assert!(newer > older);
    }

    #[test]
    fn usage_boosts_score() {
        let fresh = relevance_score(0.5, 0.0, 0, HALF_LIFE, 0.1);
        let used = relevance_score(0.5, 0.0, 3, HALF_LIFE, 0.1);
        assert!((fresh - 0.5).abs() < 1e-6);
        assert!((used - 0.65).abs() < 1e-6);
    }

    #[test]
    fn rank_is_stable() {
        let mut items = vec![("a", 0.2), ("b", 0.9), ("c", 0.2), ("d", 0.5)];
        rank_by(&mut items, |item| item.1);
        let order: Vec<&str> = items.iter().map(|item| item.0).collect();
        assert_eq!(order, ["b", "d", "a", "c"]);
    }
}
