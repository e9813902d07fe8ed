/*!
 * Tests for orchestrator configuration loading, validation and saving
 */

use anyhow::Result;
use std::path::PathBuf;

use transwire::app_config::{InputPathConfig, OrchestratorConfig, OutputPathConfig};

use crate::common::{create_temp_dir, create_test_file};

fn sample_config() -> OrchestratorConfig {
    OrchestratorConfig {
        inputs: vec![InputPathConfig {
            path: PathBuf::from("data/people.mem"),
            class: "PersonRecord".to_string(),
            engine: "mem".to_string(),
        }],
        outputs: vec![OutputPathConfig {
            path: PathBuf::from("out/people.mem"),
            class: "Person".to_string(),
            scenario: 0,
            engine: "mem".to_string(),
        }],
    }
}

/// Saving and reloading a config preserves every field
#[test]
fn test_configRoundTrip_validConfig_shouldPreserveFields() -> Result<()> {
    let dir = create_temp_dir()?;
    let path = dir.path().join("config.json");

    let config = sample_config();
    config.to_file(&path)?;
    let loaded = OrchestratorConfig::from_file(&path)?;

    assert_eq!(loaded, config);
    Ok(())
}

/// An omitted scenario field deserializes to zero
#[test]
fn test_fromFile_omittedScenario_shouldDefaultToZero() -> Result<()> {
    let dir = create_temp_dir()?;
    let json = r#"{
        "inputs": [],
        "outputs": [
            { "path": "out/people.mem", "class": "Person", "engine": "mem" }
        ]
    }"#;
    let path = create_test_file(dir.path(), "config.json", json)?;

    let loaded = OrchestratorConfig::from_file(&path)?;
    assert_eq!(loaded.outputs[0].scenario, 0);
    Ok(())
}

/// Omitted manifests deserialize to empty lists
#[test]
fn test_fromFile_emptyObject_shouldDefaultToEmptyManifests() -> Result<()> {
    let dir = create_temp_dir()?;
    let path = create_test_file(dir.path(), "config.json", "{}")?;

    let loaded = OrchestratorConfig::from_file(&path)?;
    assert!(loaded.inputs.is_empty());
    assert!(loaded.outputs.is_empty());
    Ok(())
}

/// Unparseable JSON is rejected with a parse error
#[test]
fn test_fromFile_malformedJson_shouldFail() -> Result<()> {
    let dir = create_temp_dir()?;
    let path = create_test_file(dir.path(), "config.json", "{ not json")?;

    let result = OrchestratorConfig::from_file(&path);
    assert!(result.is_err());
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("Failed to parse config file")
    );
    Ok(())
}

/// A missing config file fails with a read error
#[test]
fn test_fromFile_missingFile_shouldFail() -> Result<()> {
    let dir = create_temp_dir()?;
    let result = OrchestratorConfig::from_file(dir.path().join("absent.json"));
    assert!(result.is_err());
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("Failed to read config file")
    );
    Ok(())
}

/// Empty class names fail validation
#[test]
fn test_validate_emptyClassName_shouldFail() {
    let mut config = sample_config();
    config.inputs[0].class.clear();
    assert!(config.validate().is_err());
}

/// Empty engine ids fail validation
#[test]
fn test_validate_emptyEngineId_shouldFail() {
    let mut config = sample_config();
    config.outputs[0].engine.clear();
    assert!(config.validate().is_err());
}

/// Duplicate input paths fail validation
#[test]
fn test_validate_duplicateInputPaths_shouldFail() {
    let mut config = sample_config();
    config.inputs.push(config.inputs[0].clone());
    let error = config.validate().unwrap_err();
    assert!(error.to_string().contains("Duplicate input path"));
}

/// Two output entries claiming the same (class, scenario) slot fail
/// validation even with distinct paths
#[test]
fn test_validate_duplicateOutputSlot_shouldFail() {
    let mut config = sample_config();
    let mut second = config.outputs[0].clone();
    second.path = PathBuf::from("out/people_copy.mem");
    config.outputs.push(second);
    let error = config.validate().unwrap_err();
    assert!(error.to_string().contains("Duplicate output slot"));
}

/// from_file validates after parsing, so an invalid file never loads
#[test]
fn test_fromFile_invalidConfig_shouldFailValidation() -> Result<()> {
    let dir = create_temp_dir()?;
    let json = r#"{
        "inputs": [
            { "path": "a.mem", "class": "", "engine": "mem" }
        ],
        "outputs": []
    }"#;
    let path = create_test_file(dir.path(), "config.json", json)?;

    assert!(OrchestratorConfig::from_file(&path).is_err());
    Ok(())
}
