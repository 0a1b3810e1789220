//! Face labels and face sets

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::{McError, McResult};

/// A single face label: either a number or a piece of text
///
/// Numbers compare with [`f64::total_cmp`] after folding `-0.0` into `0.0`,
/// so labels can be hashed, sorted and grouped. All numbers sort before all
/// text labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FaceLabel {
    Number(f64),
    Text(String),
}

impl FaceLabel {
    /// Create a numeric label, rejecting NaN and infinities
    pub fn number(value: f64) -> McResult<Self> {
        if value.is_finite() {
            Ok(FaceLabel::Number(fold_zero(value)))
        } else {
            Err(McError::InvalidFace(format!(
                "numeric faces must be finite, got {}",
                value
            )))
        }
    }

    /// Interpret user text as a label: finite numbers become `Number`,
    /// everything else stays `Text`
    pub fn infer(text: &str) -> Self {
        let trimmed = text.trim();
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => FaceLabel::Number(fold_zero(v)),
            _ => FaceLabel::Text(trimmed.to_string()),
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, FaceLabel::Number(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FaceLabel::Number(v) => Some(*v),
            FaceLabel::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FaceLabel::Number(_) => None,
            FaceLabel::Text(s) => Some(s),
        }
    }

    fn is_valid(&self) -> bool {
        match self {
            FaceLabel::Number(v) => v.is_finite(),
            FaceLabel::Text(_) => true,
        }
    }
}

#[inline]
fn fold_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

impl PartialEq for FaceLabel {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FaceLabel {}

impl PartialOrd for FaceLabel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FaceLabel {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (FaceLabel::Number(a), FaceLabel::Number(b)) => fold_zero(*a).total_cmp(&fold_zero(*b)),
            (FaceLabel::Number(_), FaceLabel::Text(_)) => Ordering::Less,
            (FaceLabel::Text(_), FaceLabel::Number(_)) => Ordering::Greater,
            (FaceLabel::Text(a), FaceLabel::Text(b)) => a.cmp(b),
        }
    }
}

impl Hash for FaceLabel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            FaceLabel::Number(v) => {
                0u8.hash(state);
                fold_zero(*v).to_bits().hash(state);
            }
            FaceLabel::Text(s) => {
                1u8.hash(state);
                s.hash(state);
            }
        }
    }
}

impl fmt::Display for FaceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Integral values print without a trailing ".0"
            FaceLabel::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => {
                write!(f, "{}", *v as i64)
            }
            FaceLabel::Number(v) => write!(f, "{}", v),
            FaceLabel::Text(s) => f.write_str(s),
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for FaceLabel {
                fn from(value: $t) -> Self {
                    FaceLabel::Number(value as f64)
                }
            }
        )*
    };
}

impl_from_int!(u8, u16, u32, i32);

impl TryFrom<i64> for FaceLabel {
    type Error = McError;

    /// Fails for integers an `f64` cannot hold exactly
    fn try_from(value: i64) -> McResult<Self> {
        let number = value as f64;
        if number as i128 != i128::from(value) {
            return Err(McError::InvalidFace(format!(
                "{} is not exactly representable",
                value
            )));
        }
        Ok(FaceLabel::Number(number))
    }
}

impl From<f64> for FaceLabel {
    fn from(value: f64) -> Self {
        FaceLabel::Number(fold_zero(value))
    }
}

impl From<&str> for FaceLabel {
    fn from(value: &str) -> Self {
        FaceLabel::Text(value.to_string())
    }
}

impl From<String> for FaceLabel {
    fn from(value: String) -> Self {
        FaceLabel::Text(value)
    }
}

impl From<&FaceLabel> for FaceLabel {
    fn from(value: &FaceLabel) -> Self {
        value.clone()
    }
}

impl From<char> for FaceLabel {
    fn from(value: char) -> Self {
        FaceLabel::Text(value.to_string())
    }
}

/// Ordered, non-empty, duplicate-free set of face labels
///
/// The order is the order the faces were given in and is preserved by every
/// table built from this set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FaceLabel>", into = "Vec<FaceLabel>")]
pub struct FaceSet {
    labels: Vec<FaceLabel>,
}

impl FaceSet {
    /// Build a face set, validating shape and uniqueness
    pub fn new<I, L>(faces: I) -> McResult<Self>
    where
        I: IntoIterator<Item = L>,
        L: Into<FaceLabel>,
    {
        let labels: Vec<FaceLabel> = faces.into_iter().map(Into::into).collect();
        Self::from_labels(labels)
    }

    /// Build a numeric face set; NaN or infinite values are rejected
    pub fn from_numbers(values: &[f64]) -> McResult<Self> {
        let labels = values
            .iter()
            .map(|&v| FaceLabel::number(v))
            .collect::<McResult<Vec<_>>>()?;
        Self::from_labels(labels)
    }

    /// Standard `1..=sides` numeric faces
    pub fn standard(sides: u32) -> McResult<Self> {
        Self::new(1..=sides)
    }

    fn from_labels(labels: Vec<FaceLabel>) -> McResult<Self> {
        if labels.is_empty() {
            return Err(McError::EmptyFaceSet);
        }
        if let Some(bad) = labels.iter().find(|l| !l.is_valid()) {
            return Err(McError::InvalidFace(format!(
                "numeric faces must be finite, got {}",
                bad
            )));
        }
        let mut seen = std::collections::HashSet::with_capacity(labels.len());
        for label in &labels {
            if !seen.insert(label) {
                return Err(McError::DuplicateFace(label.clone()));
            }
        }
        Ok(Self { labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always false for a constructed set; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FaceLabel> {
        self.labels.iter()
    }

    pub fn labels(&self) -> &[FaceLabel] {
        &self.labels
    }

    /// Index of a face in set order
    pub fn position(&self, face: &FaceLabel) -> Option<usize> {
        self.labels.iter().position(|l| l == face)
    }

    pub fn contains(&self, face: &FaceLabel) -> bool {
        self.position(face).is_some()
    }

    /// Same labels, ignoring order
    pub fn same_faces(&self, other: &FaceSet) -> bool {
        self.len() == other.len() && other.iter().all(|l| self.contains(l))
    }
}

impl TryFrom<Vec<FaceLabel>> for FaceSet {
    type Error = McError;

    fn try_from(labels: Vec<FaceLabel>) -> McResult<Self> {
        Self::from_labels(labels)
    }
}

impl From<FaceSet> for Vec<FaceLabel> {
    fn from(set: FaceSet) -> Self {
        set.labels
    }
}

impl<'a> IntoIterator for &'a FaceSet {
    type Item = &'a FaceLabel;
    type IntoIter = std::slice::Iter<'a, FaceLabel>;

    fn into_iter(self) -> Self::IntoIter {
        self.labels.iter()
    }
}
