//! Part selections.
//!
//! Each build record maps part categories (`fc`, `receiver`, `blackbox`, ...)
//! to the identifier of the chosen part. The comparator only reads them.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Well-known part category for the flight controller.
pub const FLIGHT_CONTROLLER: &str = "fc";

/// Well-known part category for the receiver.
pub const RECEIVER: &str = "receiver";

/// Well-known part category for the blackbox logger.
pub const BLACKBOX: &str = "blackbox";

/// Mapping from part category to the selected part identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartSelection {
    parts: BTreeMap<String, String>,
}

impl PartSelection {
    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a part for a category, returning the updated selection.
    #[must_use]
    pub fn with(mut self, category: impl Into<String>, part: impl Into<String>) -> Self {
        self.insert(category, part);
        self
    }

    /// Select a part for a category.
    pub fn insert(&mut self, category: impl Into<String>, part: impl Into<String>) {
        self.parts.insert(category.into(), part.into());
    }

    /// Get the selected part for a category.
    #[must_use]
    pub fn get(&self, category: &str) -> Option<&str> {
        self.parts.get(category).map(String::as_str)
    }

    /// Number of selected categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Check if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Build a selection from `category=part` strings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPartSelection`] for the first malformed entry.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = Self::new();
        for pair in pairs {
            let PartPair { category, part } = pair.as_ref().parse()?;
            selection.insert(category, part);
        }
        Ok(selection)
    }
}

impl<C: Into<String>, P: Into<String>> FromIterator<(C, P)> for PartSelection {
    fn from_iter<I: IntoIterator<Item = (C, P)>>(iter: I) -> Self {
        let mut selection = Self::new();
        for (category, part) in iter {
            selection.insert(category, part);
        }
        selection
    }
}

/// A single `category=part` assignment, as accepted on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartPair {
    /// Part category.
    pub category: String,
    /// Selected part identifier.
    pub part: String,
}

impl FromStr for PartPair {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('=') {
            Some((category, part)) if !category.trim().is_empty() && !part.trim().is_empty() => {
                Ok(Self {
                    category: category.trim().to_string(),
                    part: part.trim().to_string(),
                })
            }
            _ => Err(Error::invalid_part_selection(s)),
        }
    }
}
