/*!
 * Multi-engine orchestration.
 *
 * The orchestrator aggregates engines by identity, routes read/write calls
 * to the owning engine, manages the input/output path manifests, and owns
 * the consume-once object pool fed by bulk reads.
 */

use std::any::Any;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::app_config::OrchestratorConfig;
use crate::class_ref::{ClassRef, EngineId, ScenarioId};
use crate::errors::{ManifestError, Result, SpecError, TranslationError, internal_fault};
use crate::manifest::{InputManifest, OutputManifest, OutputSlot};
use crate::object_pool::ObjectPool;
use crate::translation::Engine;

/// Owner of multiple engines, the path manifests, and the object pool.
///
/// Built through [`OrchestratorBuilder`]. The engine-by-id map and the
/// engine-class-to-id map are redundant cross-references kept exactly 1:1;
/// any divergence is an internal invariant fault, never a caller error.
#[derive(Debug)]
pub struct EngineOrchestrator {
    engines: BTreeMap<EngineId, Engine>,
    engine_class_to_id: BTreeMap<ClassRef, EngineId>,
    input_manifest: InputManifest,
    output_manifest: OutputManifest,
    // Merged child -> parent entries harvested from every attached engine
    parent_map: BTreeMap<ClassRef, ClassRef>,
    pool: ObjectPool,
}

impl EngineOrchestrator {
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::new()
    }

    /// The engine registered under `id`.
    pub fn engine(&self, id: &EngineId) -> Result<&Engine> {
        self.engines
            .get(id)
            .ok_or_else(|| TranslationError::UnknownEngine { id: id.clone() })
    }

    /// The id of the engine whose backend has the given class.
    pub fn engine_id_for_class(&self, class: ClassRef) -> Option<&EngineId> {
        self.engine_class_to_id.get(&class)
    }

    pub fn engine_count(&self) -> usize {
        self.engines.len()
    }

    // ---- read/write routing ---------------------------------------------

    /// Read the wire object of the declared class from a path through the
    /// named engine. Returns the wire-format object untranslated.
    pub fn read(
        &self,
        path: &Path,
        class: ClassRef,
        engine_id: &EngineId,
    ) -> Result<Box<dyn Any + Send>> {
        if path.is_dir() {
            return Err(ManifestError::PathIsDirectory {
                path: path.to_path_buf(),
            }
            .into());
        }
        self.engine(engine_id)?.raw_read(path, class)
    }

    /// Read a wire object and translate it into its app representation.
    pub fn read_and_translate(
        &self,
        path: &Path,
        class: ClassRef,
        engine_id: &EngineId,
    ) -> Result<Box<dyn Any + Send>> {
        let wire = self.read(path, class, engine_id)?;
        self.engine(engine_id)?.translate_object(wire)
    }

    /// Write a wire object to a path through the named engine, without
    /// translation.
    pub fn write(&self, path: &Path, object: &dyn Any, engine_id: &EngineId) -> Result<()> {
        self.engine(engine_id)?.raw_write(path, object)
    }

    /// Translate an app object by its runtime class and write the result.
    pub fn translate_and_write(
        &self,
        path: &Path,
        object: Box<dyn Any + Send>,
        engine_id: &EngineId,
    ) -> Result<()> {
        self.engine(engine_id)?.translate_and_write(path, object)
    }

    /// Translate an app object under an explicit override class and write
    /// the result. The override class must be registered as an ancestor
    /// somewhere in the orchestrator's merged override map.
    pub fn translate_and_write_as(
        &self,
        path: &Path,
        object: Box<dyn Any + Send>,
        override_class: ClassRef,
        engine_id: &EngineId,
    ) -> Result<()> {
        if !self.parent_map.values().any(|p| *p == override_class) {
            return Err(TranslationError::InvalidOutputClassOverride {
                class: override_class,
            });
        }
        let engine = self.engine(engine_id)?;
        let wire = engine.translate_as_class_unsafe(object, override_class)?;
        engine.raw_write(path, wire.as_ref())
    }

    // ---- manifest-driven I/O --------------------------------------------

    /// Read and translate every file in the input manifest, in insertion
    /// order, appending each result to the object pool. A failing entry
    /// aborts the bulk read; entries already ingested stay in the pool and
    /// the orchestrator remains usable.
    pub fn read_input(&self) -> Result<()> {
        for entry in self.input_manifest.entries() {
            debug!("reading input {:?} as {}", entry.path, entry.class);
            let app = self.read_and_translate(&entry.path, entry.class, &entry.engine)?;
            self.pool.push(app);
        }
        info!(
            "bulk read complete: {} files ingested, pool holds {} objects",
            self.input_manifest.len(),
            self.pool.len()
        );
        Ok(())
    }

    /// Translate an app object and write it to its registered default
    /// output slot.
    pub fn write_output<T: Any + Send>(&self, object: T) -> Result<()> {
        self.write_output_for_scenario(object, ScenarioId::DEFAULT)
    }

    /// Translate an app object and write it to the output slot registered
    /// for its class and the given scenario. The slot is found by exact
    /// class first, then through a single parent-override hop.
    pub fn write_output_for_scenario<T: Any + Send>(
        &self,
        object: T,
        scenario: ScenarioId,
    ) -> Result<()> {
        let class = ClassRef::of::<T>();
        let slot = self.output_slot(class, scenario)?;
        let engine = self.engine(&slot.engine)?;
        let wire = engine.translate_object(Box::new(object))?;
        engine.raw_write(&slot.path, wire.as_ref())
    }

    fn output_slot(&self, class: ClassRef, scenario: ScenarioId) -> Result<&OutputSlot> {
        if let Some(slot) = self.output_manifest.get(class, scenario) {
            return Ok(slot);
        }
        if let Some(parent) = self.parent_map.get(&class) {
            if let Some(slot) = self.output_manifest.get(*parent, scenario) {
                return Ok(slot);
            }
        }
        Err(TranslationError::UnknownOutputPath { class, scenario })
    }

    // ---- object pool -----------------------------------------------------

    /// Remove and return the first pooled object assignable to `T`.
    pub fn get_first_object<T: Any>(&self) -> Result<T> {
        self.pool.take_first::<T>()
    }

    /// Remove and return all pooled objects assignable to `T`, in their
    /// original read order.
    pub fn get_objects<T: Any>(&self) -> Vec<T> {
        self.pool.take_all::<T>()
    }

    /// Remove and return the entire pool.
    pub fn get_all_objects(&self) -> Vec<Box<dyn Any + Send>> {
        self.pool.drain_all()
    }

    /// Number of objects currently pooled.
    pub fn pool_size(&self) -> usize {
        self.pool.len()
    }
}

/// Builder assembling an [`EngineOrchestrator`].
#[derive(Debug, Default)]
pub struct OrchestratorBuilder {
    engines: BTreeMap<EngineId, Engine>,
    engine_class_to_id: BTreeMap<ClassRef, EngineId>,
    input_manifest: InputManifest,
    output_manifest: OutputManifest,
    parent_map: BTreeMap<ClassRef, ClassRef>,
}

impl OrchestratorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an engine under its id. The engine's own parent/child
    /// entries are merged into the orchestrator's map; two engines may
    /// agree on an entry, but a child mapped to two different parents is
    /// rejected.
    pub fn add_engine(&mut self, engine: Engine) -> Result<&mut Self> {
        let id = engine.id().clone();
        let class = engine.backend_class();
        if self.engines.contains_key(&id) || self.engine_class_to_id.contains_key(&class) {
            return Err(TranslationError::DuplicateEngine { id });
        }
        for (child, parent) in engine.parent_child_entries() {
            match self.parent_map.get(&child) {
                Some(existing) if *existing == parent => {}
                Some(_) => return Err(SpecError::DuplicateClassRef { class: child }.into()),
                None => {
                    self.parent_map.insert(child, parent);
                }
            }
        }
        self.engine_class_to_id.insert(class, id.clone());
        self.engines.insert(id, engine);
        Ok(self)
    }

    /// Register an input file for bulk reads. The path must exist on disk
    /// and the engine must already be attached.
    pub fn add_input_path(
        &mut self,
        path: impl Into<PathBuf>,
        class: ClassRef,
        engine_id: EngineId,
    ) -> Result<&mut Self> {
        self.check_engine(&engine_id)?;
        self.input_manifest.add(path.into(), class, engine_id)?;
        Ok(self)
    }

    /// Register the default-scenario output slot for a class.
    pub fn add_output_path(
        &mut self,
        path: impl Into<PathBuf>,
        class: ClassRef,
        engine_id: EngineId,
    ) -> Result<&mut Self> {
        self.add_output_path_for_scenario(path, class, ScenarioId::DEFAULT, engine_id)
    }

    /// Register an output slot for a class under a scenario. The path's
    /// parent directory must exist and the engine must already be attached.
    pub fn add_output_path_for_scenario(
        &mut self,
        path: impl Into<PathBuf>,
        class: ClassRef,
        scenario: ScenarioId,
        engine_id: EngineId,
    ) -> Result<&mut Self> {
        self.check_engine(&engine_id)?;
        self.output_manifest
            .add(path.into(), class, scenario, engine_id)?;
        Ok(self)
    }

    /// Apply a configuration file's manifest declarations, resolving class
    /// names against the classes registered with the attached engines.
    pub fn apply_config(&mut self, config: &OrchestratorConfig) -> Result<&mut Self> {
        for input in &config.inputs {
            let class = self.resolve_class(&input.class)?;
            self.add_input_path(&input.path, class, EngineId::new(&input.engine))?;
        }
        for output in &config.outputs {
            let class = self.resolve_class(&output.class)?;
            self.add_output_path_for_scenario(
                &output.path,
                class,
                ScenarioId::new(output.scenario),
                EngineId::new(&output.engine),
            )?;
        }
        Ok(self)
    }

    /// Build the orchestrator. The engine id/class cross-reference is
    /// verified here; disagreement means a defect in this builder.
    pub fn build(self) -> EngineOrchestrator {
        if self.engines.len() != self.engine_class_to_id.len() {
            internal_fault("engine id and engine class maps disagree in size");
        }
        for (class, id) in &self.engine_class_to_id {
            match self.engines.get(id) {
                Some(engine) if engine.backend_class() == *class => {}
                _ => internal_fault("engine id and engine class maps are inconsistent"),
            }
        }
        info!(
            "orchestrator built: {} engines, {} input files, {} output slots",
            self.engines.len(),
            self.input_manifest.len(),
            self.output_manifest.len()
        );
        EngineOrchestrator {
            engines: self.engines,
            engine_class_to_id: self.engine_class_to_id,
            input_manifest: self.input_manifest,
            output_manifest: self.output_manifest,
            parent_map: self.parent_map,
            pool: ObjectPool::new(),
        }
    }

    fn check_engine(&self, engine_id: &EngineId) -> Result<()> {
        if self.engines.contains_key(engine_id) {
            Ok(())
        } else {
            Err(TranslationError::UnknownEngine {
                id: engine_id.clone(),
            })
        }
    }

    fn resolve_class(&self, name: &str) -> Result<ClassRef> {
        for engine in self.engines.values() {
            for class in engine.registry().classes() {
                if class.name() == name || class.short_name() == name {
                    return Ok(class);
                }
            }
        }
        Err(ManifestError::UnknownClass {
            name: name.to_string(),
        }
        .into())
    }
}
