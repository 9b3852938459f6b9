use crate::input::FlowRecord;
use indexmap::IndexMap;

/// Summed weights per (left label, right label) pair, plus per-side label
/// totals, in the label sets' stacking order.
#[derive(Debug, Clone)]
pub struct PairWidths {
    n_right: usize,
    left: Vec<f64>,
    right: Vec<f64>,
    matches: Vec<u32>,
    pub left_totals: Vec<f64>,
    pub right_totals: Vec<f64>,
}

impl PairWidths {
    /// Summed left weight of records matching the pair; 0 without a match.
    pub fn left_weight(&self, li: usize, ri: usize) -> f64 {
        self.left[li * self.n_right + ri]
    }

    pub fn right_weight(&self, li: usize, ri: usize) -> f64 {
        self.right[li * self.n_right + ri]
    }

    /// Whether any record matches the pair, independent of its weight.
    pub fn has_records(&self, li: usize, ri: usize) -> bool {
        self.matches[li * self.n_right + ri] > 0
    }
}

pub fn pair_widths(
    records: &[FlowRecord],
    left_labels: &[String],
    right_labels: &[String],
) -> PairWidths {
    let n_left = left_labels.len();
    let n_right = right_labels.len();

    let left_index: IndexMap<&str, usize> = left_labels
        .iter()
        .enumerate()
        .map(|(i, l)| (l.as_str(), i))
        .collect();
    let right_index: IndexMap<&str, usize> = right_labels
        .iter()
        .enumerate()
        .map(|(i, l)| (l.as_str(), i))
        .collect();

    let mut widths = PairWidths {
        n_right,
        left: vec![0.0; n_left * n_right],
        right: vec![0.0; n_left * n_right],
        matches: vec![0; n_left * n_right],
        left_totals: vec![0.0; n_left],
        right_totals: vec![0.0; n_right],
    };

    for record in records {
        // Validation guarantees both labels are present in their label set.
        let (Some(&li), Some(&ri)) = (
            left_index.get(record.left.as_str()),
            right_index.get(record.right.as_str()),
        ) else {
            continue;
        };
        let cell = li * n_right + ri;
        widths.left[cell] += record.left_weight;
        widths.right[cell] += record.right_weight;
        widths.matches[cell] += 1;
        widths.left_totals[li] += record.left_weight;
        widths.right_totals[ri] += record.right_weight;
    }

    widths
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(left: &str, right: &str, lw: f64, rw: f64) -> FlowRecord {
        FlowRecord {
            left: left.to_string(),
            right: right.to_string(),
            left_weight: lw,
            right_weight: rw,
        }
    }

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn sums_weights_per_pair() {
        let records = vec![
            record("a", "x", 1.0, 1.0),
            record("a", "y", 1.0, 1.0),
            record("b", "x", 1.0, 1.0),
        ];
        let w = pair_widths(&records, &labels(&["a", "b"]), &labels(&["x", "y"]));
        assert_eq!(w.left_weight(0, 0), 1.0);
        assert_eq!(w.left_weight(0, 1), 1.0);
        assert_eq!(w.left_weight(1, 0), 1.0);
        assert_eq!(w.left_weight(1, 1), 0.0);
        assert!(!w.has_records(1, 1));
        assert_eq!(w.left_totals, [2.0, 1.0]);
        assert_eq!(w.right_totals, [2.0, 1.0]);
    }

    #[test]
    fn repeated_pairs_accumulate() {
        let records = vec![
            record("a", "x", 0.5, 0.25),
            record("a", "x", 1.5, 0.75),
        ];
        let w = pair_widths(&records, &labels(&["a"]), &labels(&["x"]));
        assert_eq!(w.left_weight(0, 0), 2.0);
        assert_eq!(w.right_weight(0, 0), 1.0);
        assert!(w.has_records(0, 0));
    }

    #[test]
    fn pair_sums_cover_label_totals() {
        let records = vec![
            record("a", "x", 1.25, 2.0),
            record("a", "y", 0.75, 0.5),
            record("b", "y", 3.0, 1.5),
        ];
        let left_labels = labels(&["a", "b"]);
        let right_labels = labels(&["x", "y"]);
        let w = pair_widths(&records, &left_labels, &right_labels);

        for li in 0..left_labels.len() {
            let sum: f64 = (0..right_labels.len()).map(|ri| w.left_weight(li, ri)).sum();
            assert!((sum - w.left_totals[li]).abs() < 1e-12);
        }
        for ri in 0..right_labels.len() {
            let sum: f64 = (0..left_labels.len()).map(|li| w.right_weight(li, ri)).sum();
            assert!((sum - w.right_totals[ri]).abs() < 1e-12);
        }
    }
}
