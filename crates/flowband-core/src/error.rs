use crate::input::Side;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{column} column has length {actual}, expected {expected} to match the left column")]
    LengthMismatch {
        column: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("expected at least one flow record")]
    EmptyInput,

    #[error("flow diagram does not support null values")]
    NullsInFrame,

    #[error(
        "{side} labels and data do not match. Labels only: {} Data only: {}",
        format_labels(.only_in_labels),
        format_labels(.only_in_data)
    )]
    LabelMismatch {
        side: Side,
        only_in_labels: Vec<String>,
        only_in_data: Vec<String>,
    },

    #[error("the color mapping is missing values for the following labels: {}", .missing.join(", "))]
    ColorMappingIncomplete { missing: Vec<String> },
}

fn format_labels(labels: &[String]) -> String {
    if labels.is_empty() {
        return "(none)".to_string();
    }
    labels.join(", ")
}
