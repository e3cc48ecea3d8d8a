//! Static junction configuration
//!
//! Junction definitions are supplied once when the engine is built. They can
//! come from the built-in set or from a TOML file of `[[junctions]]` tables:
//!
//! ```toml
//! [[junctions]]
//! id = "junction-1"
//! name = "MG Road & Residency Road"
//! approaches = ["north", "south", "east", "west"]
//! baseline_cycle_seconds = 120
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Static description of one junction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JunctionDefinition {
    pub id: String,
    pub name: String,
    /// Approach names in declared order; the first one starts green
    pub approaches: Vec<String>,
    #[serde(alias = "baselineCycleSeconds")]
    pub baseline_cycle_seconds: u32,
}

impl JunctionDefinition {
    pub fn new<I, S>(id: &str, name: &str, approaches: I, baseline_cycle_seconds: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            approaches: approaches.into_iter().map(Into::into).collect(),
            baseline_cycle_seconds,
        }
    }

    /// Check a single definition in isolation
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.id.trim().is_empty() {
            return Err(ConfigError::EmptyId);
        }
        if self.approaches.len() < 2 {
            return Err(ConfigError::TooFewApproaches {
                id: self.id.clone(),
                count: self.approaches.len(),
            });
        }
        let mut seen = HashSet::new();
        for approach in &self.approaches {
            if !seen.insert(approach.as_str()) {
                return Err(ConfigError::DuplicateApproach {
                    id: self.id.clone(),
                    approach: approach.clone(),
                });
            }
        }
        Ok(())
    }
}

/// The three junctions the simulator ships with
pub fn default_junctions() -> Vec<JunctionDefinition> {
    vec![
        JunctionDefinition::new(
            "junction-1",
            "MG Road & Residency Road",
            ["north", "south", "east", "west"],
            120,
        ),
        JunctionDefinition::new(
            "junction-2",
            "Indiranagar 100ft & CMH Road",
            ["north", "south", "east", "west"],
            110,
        ),
        JunctionDefinition::new(
            "junction-3",
            "Silk Board Junction",
            ["north", "south", "east", "west", "service"],
            150,
        ),
    ]
}

/// Validate a full junction list: each definition, plus unique ids
pub fn validate_junctions(definitions: &[JunctionDefinition]) -> Result<(), ConfigError> {
    if definitions.is_empty() {
        return Err(ConfigError::NoJunctions);
    }
    let mut ids = HashSet::new();
    for definition in definitions {
        definition.validate()?;
        if !ids.insert(definition.id.as_str()) {
            return Err(ConfigError::DuplicateId {
                id: definition.id.clone(),
            });
        }
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct JunctionFile {
    junctions: Vec<JunctionDefinition>,
}

/// Parse and validate junction definitions from TOML text
pub fn parse_junctions(text: &str) -> Result<Vec<JunctionDefinition>, ConfigError> {
    let file: JunctionFile = toml::from_str(text)?;
    validate_junctions(&file.junctions)?;
    Ok(file.junctions)
}

/// Load and validate junction definitions from a TOML file
pub fn load_junctions(path: &Path) -> Result<Vec<JunctionDefinition>, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_junctions(&text)
}
