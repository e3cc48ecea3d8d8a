//! Core types for the junction simulation
//!
//! Identifiers and timestamp helpers shared by every model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A wrapper type for junction IDs
///
/// Junction ids come from static configuration and never change while the
/// engine runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JunctionId(pub String);

impl JunctionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JunctionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for JunctionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for JunctionId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for JunctionId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Round to the nearest integer with halves going up (2.5 -> 3, -2.5 -> -2)
pub(crate) fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

/// Round to a fixed number of decimal places
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
