/*!
 * Input and output path manifests.
 *
 * The input manifest is an ordered list of (path, declared class, engine)
 * entries consumed by the orchestrator's bulk read. The output manifest
 * maps (class, scenario) slots to (path, engine). Paths are validated at
 * registration: input files must exist, output parents must exist, and
 * duplicates are rejected.
 */

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use crate::class_ref::{ClassRef, EngineId, ScenarioId};
use crate::errors::ManifestError;

/// One bulk-read entry: a file, the wire class declared for it, and the
/// engine that owns its format.
#[derive(Debug, Clone)]
pub struct InputEntry {
    pub path: PathBuf,
    pub class: ClassRef,
    pub engine: EngineId,
}

/// Ordered, duplicate-checked list of input files.
#[derive(Debug, Clone, Default)]
pub struct InputManifest {
    entries: Vec<InputEntry>,
    paths: HashSet<PathBuf>,
}

impl InputManifest {
    pub fn new() -> Self {
        Self::default()
    }

    // @checks: Path exists, is a file, and was not added before
    pub fn add(
        &mut self,
        path: PathBuf,
        class: ClassRef,
        engine: EngineId,
    ) -> Result<(), ManifestError> {
        if !path.exists() {
            return Err(ManifestError::MissingInputFile { path });
        }
        if path.is_dir() {
            return Err(ManifestError::PathIsDirectory { path });
        }
        if self.paths.contains(&path) {
            return Err(ManifestError::DuplicateInputPath { path });
        }
        self.paths.insert(path.clone());
        self.entries.push(InputEntry {
            path,
            class,
            engine,
        });
        Ok(())
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[InputEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One output slot: where objects of a class (under a scenario) get
/// written, and through which engine.
#[derive(Debug, Clone)]
pub struct OutputSlot {
    pub path: PathBuf,
    pub class: ClassRef,
    pub scenario: ScenarioId,
    pub engine: EngineId,
}

/// Map from (class, scenario) slots to output paths.
#[derive(Debug, Clone, Default)]
pub struct OutputManifest {
    slots: BTreeMap<(ClassRef, ScenarioId), OutputSlot>,
    paths: HashSet<PathBuf>,
}

impl OutputManifest {
    pub fn new() -> Self {
        Self::default()
    }

    // @checks: Parent directory exists, path and slot are unclaimed
    pub fn add(
        &mut self,
        path: PathBuf,
        class: ClassRef,
        scenario: ScenarioId,
        engine: EngineId,
    ) -> Result<(), ManifestError> {
        if !parent_dir_exists(&path) {
            return Err(ManifestError::MissingParentDirectory { path });
        }
        if self.paths.contains(&path) {
            return Err(ManifestError::DuplicateOutputPath { path });
        }
        if self.slots.contains_key(&(class, scenario)) {
            return Err(ManifestError::DuplicateOutputSlot { class, scenario });
        }
        self.paths.insert(path.clone());
        self.slots.insert(
            (class, scenario),
            OutputSlot {
                path,
                class,
                scenario,
                engine,
            },
        );
        Ok(())
    }

    /// Exact slot lookup; parent-override fallback is the orchestrator's
    /// concern.
    pub fn get(&self, class: ClassRef, scenario: ScenarioId) -> Option<&OutputSlot> {
        self.slots.get(&(class, scenario))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

// An output path with no parent component is relative to the working
// directory, which always exists.
fn parent_dir_exists(path: &Path) -> bool {
    match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => true,
        Some(parent) => parent.is_dir(),
        None => false,
    }
}
