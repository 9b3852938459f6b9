use crate::aggregate::PairWidths;
use crate::model::{StackPosition, StripLayout};
use indexmap::IndexMap;

// A strip edge starts as a step: half the samples at the left offset, half
// at the right offset. Two passes of a uniform moving average turn the step
// into an S-curve; each "valid" pass shortens the curve by WINDOW - 1.
const STEP_HALF: usize = 50;
const SMOOTH_WINDOW: usize = 20;

/// Points per strip edge after both smoothing passes.
pub(crate) const CURVE_SAMPLES: usize = 2 * STEP_HALF - 2 * (SMOOTH_WINDOW - 1);

const FALLBACK_COLOR: &str = "#808080";

/// Uniform moving average, "valid" mode: output length `n - window + 1`.
fn moving_average(samples: &[f64], window: usize) -> Vec<f64> {
    let weight = 1.0 / window as f64;
    samples
        .windows(window)
        .map(|w| w.iter().sum::<f64>() * weight)
        .collect()
}

/// Smoothed transition curve from `from` to `to`, clamped to the two
/// endpoint values and monotone between them.
fn smooth_step(from: f64, to: f64) -> Vec<f64> {
    let mut ys = Vec::with_capacity(2 * STEP_HALF);
    ys.extend(std::iter::repeat_n(from, STEP_HALF));
    ys.extend(std::iter::repeat_n(to, STEP_HALF));
    let ys = moving_average(&ys, SMOOTH_WINDOW);
    moving_average(&ys, SMOOTH_WINDOW)
}

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    let step = (end - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

/// Builds one strip per (left, right) pair with at least one matching
/// record, in nested order: left labels outer, right labels inner.
///
/// Strips within a label's column stack bottom-up in that iteration order;
/// the per-label bottom cursors advance by each pair's weight so the next
/// strip starts immediately above.
pub(crate) fn build_strips(
    widths: &PairWidths,
    left_labels: &[String],
    right_labels: &[String],
    left_positions: &[StackPosition],
    right_positions: &[StackPosition],
    colors: &IndexMap<String, String>,
    right_color: bool,
    x_max: f64,
) -> Vec<StripLayout> {
    let x = linspace(0.0, x_max, CURVE_SAMPLES);

    let mut left_bottoms: Vec<f64> = left_positions.iter().map(|p| p.bottom).collect();
    let mut right_bottoms: Vec<f64> = right_positions.iter().map(|p| p.bottom).collect();

    let mut strips = Vec::new();
    for (li, left_label) in left_labels.iter().enumerate() {
        for (ri, right_label) in right_labels.iter().enumerate() {
            if !widths.has_records(li, ri) {
                continue;
            }
            let left_weight = widths.left_weight(li, ri);
            let right_weight = widths.right_weight(li, ri);

            let y_lower = smooth_step(left_bottoms[li], right_bottoms[ri]);
            let y_upper = smooth_step(
                left_bottoms[li] + left_weight,
                right_bottoms[ri] + right_weight,
            );

            left_bottoms[li] += left_weight;
            right_bottoms[ri] += right_weight;

            let color_label = if right_color { right_label } else { left_label };
            let color = colors
                .get(color_label)
                .cloned()
                .unwrap_or_else(|| FALLBACK_COLOR.to_string());

            strips.push(StripLayout {
                left_label: left_label.clone(),
                right_label: right_label.clone(),
                left_weight,
                right_weight,
                color,
                x: x.clone(),
                y_lower,
                y_upper,
            });
        }
    }
    strips
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smooth_step_has_the_expected_sample_count() {
        assert_eq!(CURVE_SAMPLES, 62);
        assert_eq!(smooth_step(0.0, 1.0).len(), CURVE_SAMPLES);
    }

    #[test]
    fn smooth_step_is_monotone_without_overshoot() {
        let curve = smooth_step(1.0, 5.0);
        assert!((curve[0] - 1.0).abs() < 1e-12);
        assert!((curve[CURVE_SAMPLES - 1] - 5.0).abs() < 1e-12);
        for pair in curve.windows(2) {
            assert!(pair[1] >= pair[0] - 1e-12);
        }
        for &y in &curve {
            assert!((1.0..=5.0 + 1e-12).contains(&y));
        }

        let falling = smooth_step(5.0, 1.0);
        for pair in falling.windows(2) {
            assert!(pair[1] <= pair[0] + 1e-12);
        }
    }

    #[test]
    fn flat_step_stays_flat() {
        assert!(smooth_step(2.5, 2.5).iter().all(|&y| (y - 2.5).abs() < 1e-12));
    }

    #[test]
    fn moving_average_matches_valid_convolution_length() {
        let sig = vec![1.0; 100];
        assert_eq!(moving_average(&sig, 20).len(), 81);
        assert_eq!(moving_average(&moving_average(&sig, 20), 20).len(), 62);
    }
}
