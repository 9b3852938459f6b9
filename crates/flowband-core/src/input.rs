use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One of the two columns of the diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn name(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One validated observation: an item moving from a left category to a right
/// category, with one weight per side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowRecord {
    pub left: String,
    pub right: String,
    pub left_weight: f64,
    pub right_weight: f64,
}

/// Input to the layout computation.
///
/// `left` and `right` are parallel columns of category assignments; `None`
/// entries represent missing values and are rejected by validation. Weight
/// columns are optional: absent left weights default to all ones, absent
/// right weights default to the left weights.
#[derive(Debug, Clone)]
pub struct SankeyInput {
    pub left: Vec<Option<String>>,
    pub right: Vec<Option<String>>,
    pub left_weight: Option<Vec<f64>>,
    pub right_weight: Option<Vec<f64>>,
    /// Explicit stacking order for the left side. Must match the distinct
    /// values present in the left column as a set.
    pub left_labels: Option<Vec<String>>,
    pub right_labels: Option<Vec<String>>,
    /// Explicit label -> color mapping. Must cover every label on either
    /// side; extra entries are allowed and pass through untouched.
    pub colors: Option<IndexMap<String, String>>,
    /// Vertical extent of the diagram in units of horizontal extent.
    pub aspect: f64,
    /// Color strips by their right label instead of their left label.
    pub right_color: bool,
}

impl Default for SankeyInput {
    fn default() -> Self {
        Self {
            left: Vec::new(),
            right: Vec::new(),
            left_weight: None,
            right_weight: None,
            left_labels: None,
            right_labels: None,
            colors: None,
            aspect: 4.0,
            right_color: false,
        }
    }
}

impl SankeyInput {
    pub fn new<L, R>(left: L, right: R) -> Self
    where
        L: IntoIterator,
        L::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            left: left.into_iter().map(|v| Some(v.into())).collect(),
            right: right.into_iter().map(|v| Some(v.into())).collect(),
            ..Self::default()
        }
    }

    /// Columns with possibly-missing entries; validation reports these as
    /// [`Error::NullsInFrame`](crate::Error::NullsInFrame).
    pub fn from_nullable(left: Vec<Option<String>>, right: Vec<Option<String>>) -> Self {
        Self {
            left,
            right,
            ..Self::default()
        }
    }

    pub fn with_left_weights(mut self, weights: impl IntoIterator<Item = f64>) -> Self {
        self.left_weight = Some(weights.into_iter().collect());
        self
    }

    pub fn with_right_weights(mut self, weights: impl IntoIterator<Item = f64>) -> Self {
        self.right_weight = Some(weights.into_iter().collect());
        self
    }

    pub fn with_left_labels<I>(mut self, labels: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.left_labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_right_labels<I>(mut self, labels: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.right_labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_colors<I, K, V>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.colors = Some(
            colors
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    pub fn with_aspect(mut self, aspect: f64) -> Self {
        self.aspect = aspect;
        self
    }

    pub fn color_by_right(mut self, right_color: bool) -> Self {
        self.right_color = right_color;
        self
    }
}
