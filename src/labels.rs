//! The finite set of label tags a deployment recognises.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::{Error, Result};

/// Ordered, duplicate-free set of label tags.
///
/// The order is significant: the identification pipeline processes labels in
/// this order, which fixes the order in which new tracks are created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    /// Create a label set, rejecting empty sets, empty tags and duplicates.
    pub fn new<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set = Self {
            labels: labels.into_iter().map(Into::into).collect(),
        };
        set.validate()?;
        Ok(set)
    }

    /// The six colour classes of the colour-segmentation front end.
    pub fn colors() -> Self {
        Self::from_static(&["red", "green", "blue", "yellow", "purple", "orange"])
    }

    /// Material classes used for waste sorting.
    pub fn trash_types() -> Self {
        Self::from_static(&["metal", "glass", "paper", "plastic", "food", "textile"])
    }

    fn from_static(labels: &[&str]) -> Self {
        Self {
            labels: labels.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Check the set invariants (used after deserialisation).
    pub fn validate(&self) -> Result<()> {
        if self.labels.is_empty() {
            return Err(Error::InvalidConfig("label set must not be empty".to_string()));
        }

        let mut seen = HashSet::with_capacity(self.labels.len());
        for label in &self.labels {
            if label.is_empty() {
                return Err(Error::InvalidConfig("label set contains an empty label".to_string()));
            }
            if !seen.insert(label.as_str()) {
                return Err(Error::InvalidConfig(format!("duplicate label '{}'", label)));
            }
        }
        Ok(())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Position of `label` in the set.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Return the position of `label`, or [`Error::UnknownLabel`].
    pub fn require(&self, label: &str) -> Result<usize> {
        self.index_of(label)
            .ok_or_else(|| Error::UnknownLabel(label.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Default for LabelSet {
    fn default() -> Self {
        Self::colors()
    }
}
