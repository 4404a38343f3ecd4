use crate::model::Metric;

/// Scale of a raw score batch, decided once for the whole batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreScale {
    /// Every value is `<= 1.0`: fractions, rescaled to percent.
    Fraction,
    /// At least one value exceeds `1.0`: already a percentage / index.
    Percent,
}

/// Decide the batch scale from its maximum. An empty batch is `Percent`.
pub fn detect_scale(raw_scores: &[f64]) -> ScoreScale {
    let max = raw_scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if raw_scores.is_empty() || max > 1.0 {
        ScoreScale::Percent
    } else {
        ScoreScale::Fraction
    }
}

/// Map one benchmark's raw scores from one sync pass onto `[0, 100]`.
///
/// The fraction/percent decision is made from the batch maximum and applied
/// to every value, so a model sitting exactly at `1.0` in a percent batch is
/// never mistaken for a fraction. Results are rounded to two decimals.
pub fn normalize(raw_scores: &[f64], metric: &Metric) -> Vec<f64> {
    let scale = detect_scale(raw_scores);
    if scale == ScoreScale::Fraction {
        log::debug!(
            "rescaling {} fractional scores to percent (unit {})",
            raw_scores.len(),
            metric.unit
        );
    }

    raw_scores
        .iter()
        .map(|&raw| {
            let value = match scale {
                ScoreScale::Fraction => raw * 100.0,
                ScoreScale::Percent => raw,
            };
            round2(value)
        })
        .collect()
}

/// Round half away from zero at two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
