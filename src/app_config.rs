use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Orchestrator configuration module
/// This module handles loading, validating and saving the manifest
/// declarations an orchestrator builder can be assembled from.
/// Represents the orchestrator configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct OrchestratorConfig {
    /// Input files to ingest during bulk reads, in order
    #[serde(default)]
    pub inputs: Vec<InputPathConfig>,

    /// Output slots keyed by class and scenario
    #[serde(default)]
    pub outputs: Vec<OutputPathConfig>,
}

/// One declared input file
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InputPathConfig {
    /// Path of the file on disk
    pub path: PathBuf,

    /// Name of the declared wire class; matched against the full type
    /// name or its trailing segment
    pub class: String,

    /// Id of the engine owning the file's format
    pub engine: String,
}

/// One declared output slot
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OutputPathConfig {
    /// Path the slot writes to
    pub path: PathBuf,

    /// Name of the app class routed to this slot
    pub class: String,

    /// Scenario discriminator; 0 when omitted
    #[serde(default)]
    pub scenario: u64,

    /// Id of the engine owning the slot's format
    pub engine: String,
}

impl OrchestratorConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow!("Failed to read config file {:?}: {}", path.as_ref(), e))?;
        let config: OrchestratorConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {:?}: {}", path.as_ref(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)
            .map_err(|e| anyhow!("Failed to write config file {:?}: {}", path.as_ref(), e))?;
        Ok(())
    }

    /// Validate the configuration
    ///
    /// Checks that every entry names a class and an engine, and that no
    /// path appears twice within its manifest. Existence of the paths on
    /// disk is checked later, when the entries are applied to a builder.
    pub fn validate(&self) -> Result<()> {
        let mut input_paths = HashSet::new();
        for input in &self.inputs {
            if input.class.is_empty() {
                return Err(anyhow!("Input entry {:?} has an empty class", input.path));
            }
            if input.engine.is_empty() {
                return Err(anyhow!("Input entry {:?} has an empty engine", input.path));
            }
            if !input_paths.insert(&input.path) {
                return Err(anyhow!("Duplicate input path in config: {:?}", input.path));
            }
        }
        let mut output_paths = HashSet::new();
        let mut slots = HashSet::new();
        for output in &self.outputs {
            if output.class.is_empty() {
                return Err(anyhow!("Output entry {:?} has an empty class", output.path));
            }
            if output.engine.is_empty() {
                return Err(anyhow!("Output entry {:?} has an empty engine", output.path));
            }
            if !output_paths.insert(&output.path) {
                return Err(anyhow!("Duplicate output path in config: {:?}", output.path));
            }
            if !slots.insert((&output.class, output.scenario)) {
                return Err(anyhow!(
                    "Duplicate output slot in config: ({}, scenario {})",
                    output.class,
                    output.scenario
                ));
            }
        }
        Ok(())
    }
}
