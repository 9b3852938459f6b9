use crate::input::{FlowRecord, SankeyInput, Side};
use crate::{Error, Result};
use indexmap::IndexSet;

#[derive(Debug, Clone)]
pub(crate) struct ValidatedFrame {
    pub records: Vec<FlowRecord>,
    pub left_labels: Vec<String>,
    pub right_labels: Vec<String>,
    /// Distinct labels in first-seen order across the left column, then the
    /// right column. Drives default palette assignment.
    pub all_labels: Vec<String>,
}

pub(crate) fn validate_input(input: &SankeyInput) -> Result<ValidatedFrame> {
    let len = input.left.len();
    check_length("right", len, input.right.len())?;
    if let Some(w) = &input.left_weight {
        check_length("leftWeight", len, w.len())?;
    }
    if let Some(w) = &input.right_weight {
        check_length("rightWeight", len, w.len())?;
    }
    if len == 0 {
        return Err(Error::EmptyInput);
    }

    let mut records = Vec::with_capacity(len);
    for i in 0..len {
        let (Some(left), Some(right)) = (&input.left[i], &input.right[i]) else {
            return Err(Error::NullsInFrame);
        };
        let left_weight = match &input.left_weight {
            Some(w) => w[i],
            None => 1.0,
        };
        let right_weight = match &input.right_weight {
            Some(w) => w[i],
            None => left_weight,
        };
        records.push(FlowRecord {
            left: left.clone(),
            right: right.clone(),
            left_weight,
            right_weight,
        });
    }

    let seen_left: IndexSet<String> = records.iter().map(|r| r.left.clone()).collect();
    let seen_right: IndexSet<String> = records.iter().map(|r| r.right.clone()).collect();

    let left_labels = resolve_labels(Side::Left, input.left_labels.as_deref(), &seen_left)?;
    let right_labels = resolve_labels(Side::Right, input.right_labels.as_deref(), &seen_right)?;

    let mut all_labels: IndexSet<String> = seen_left;
    all_labels.extend(seen_right);
    let all_labels: Vec<String> = all_labels.into_iter().collect();
    tracing::debug!(labels = ?all_labels, "labels to handle");

    Ok(ValidatedFrame {
        records,
        left_labels,
        right_labels,
        all_labels,
    })
}

fn check_length(column: &'static str, expected: usize, actual: usize) -> Result<()> {
    if actual != expected {
        return Err(Error::LengthMismatch {
            column,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Caller-supplied orderings must match the data as a set; without one, the
/// data's first-seen order stands.
fn resolve_labels(
    side: Side,
    explicit: Option<&[String]>,
    seen: &IndexSet<String>,
) -> Result<Vec<String>> {
    let Some(labels) = explicit else {
        return Ok(seen.iter().cloned().collect());
    };

    let label_set: IndexSet<&str> = labels.iter().map(String::as_str).collect();
    let only_in_labels: Vec<String> = labels
        .iter()
        .filter(|l| !seen.contains(l.as_str()))
        .cloned()
        .collect();
    let only_in_data: Vec<String> = seen
        .iter()
        .filter(|l| !label_set.contains(l.as_str()))
        .cloned()
        .collect();
    if !only_in_labels.is_empty() || !only_in_data.is_empty() || labels.len() != label_set.len() {
        return Err(Error::LabelMismatch {
            side,
            only_in_labels,
            only_in_data,
        });
    }
    Ok(labels.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(left: &[&str], right: &[&str]) -> SankeyInput {
        SankeyInput::new(left.iter().copied(), right.iter().copied())
    }

    #[test]
    fn defaults_weights_to_ones_and_mirrors_left() {
        let frame = validate_input(&input(&["a", "b"], &["x", "y"])).unwrap();
        assert!(
            frame
                .records
                .iter()
                .all(|r| r.left_weight == 1.0 && r.right_weight == 1.0)
        );

        let frame =
            validate_input(&input(&["a", "b"], &["x", "y"]).with_left_weights([2.0, 3.0])).unwrap();
        assert_eq!(frame.records[0].right_weight, 2.0);
        assert_eq!(frame.records[1].right_weight, 3.0);
    }

    #[test]
    fn labels_default_to_first_seen_order() {
        let frame = validate_input(&input(&["b", "a", "b"], &["y", "x", "x"])).unwrap();
        assert_eq!(frame.left_labels, ["b", "a"]);
        assert_eq!(frame.right_labels, ["y", "x"]);
        assert_eq!(frame.all_labels, ["b", "a", "y", "x"]);
    }

    #[test]
    fn rejects_mismatched_column_lengths() {
        let mut bad = input(&["a", "b"], &["x"]);
        assert!(matches!(
            validate_input(&bad),
            Err(Error::LengthMismatch {
                column: "right",
                expected: 2,
                actual: 1,
            })
        ));

        bad = input(&["a", "b"], &["x", "y"]).with_left_weights([1.0]);
        assert!(matches!(
            validate_input(&bad),
            Err(Error::LengthMismatch {
                column: "leftWeight",
                ..
            })
        ));
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(
            validate_input(&SankeyInput::default()),
            Err(Error::EmptyInput)
        ));
    }

    #[test]
    fn rejects_null_entries() {
        let bad = SankeyInput::from_nullable(
            vec![Some("a".to_string()), None],
            vec![Some("x".to_string()), Some("y".to_string())],
        );
        assert!(matches!(validate_input(&bad), Err(Error::NullsInFrame)));
    }

    #[test]
    fn explicit_ordering_must_match_data_as_a_set() {
        let ok = input(&["a", "b"], &["x", "y"]).with_left_labels(["b", "a"]);
        let frame = validate_input(&ok).unwrap();
        assert_eq!(frame.left_labels, ["b", "a"]);

        let bad = input(&["a", "b"], &["x", "y"]).with_left_labels(["a", "c"]);
        match validate_input(&bad) {
            Err(Error::LabelMismatch {
                side,
                only_in_labels,
                only_in_data,
            }) => {
                assert_eq!(side, Side::Left);
                assert_eq!(only_in_labels, ["c"]);
                assert_eq!(only_in_data, ["b"]);
            }
            other => panic!("expected LabelMismatch, got {other:?}"),
        }
    }
}
