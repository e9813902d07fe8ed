/*!
 * Engine and engine builder.
 *
 * An engine owns a finalized spec registry, a parent/child override map,
 * and a format backend, and dispatches translate/read/write for one wire
 * format. It is produced by running an ordered set of translators against
 * a builder, then freezing the registry.
 */

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::Arc;

use log::{debug, info};

use crate::backend::FormatBackend;
use crate::class_ref::{ClassRef, EngineId, TranslatorId};
use crate::errors::{Result, SpecError, TranslationError, TranslatorError, internal_fault};
use crate::translation::graph::DependencyGraph;
use crate::translation::registry::SpecRegistry;
use crate::translation::spec::{RawTranslationSpec, TranslationSpec, TypedSpecAdapter};
use crate::translation::translator::{Translator, TranslatorContext};

/// A finalized, queryable registry of specs plus dispatch and raw-IO
/// operations for one wire format.
///
/// Built through [`EngineBuilder`]; immutable afterwards and safe to share
/// read-only across threads.
pub struct Engine {
    id: EngineId,
    registry: SpecRegistry,
    // child class -> the single ancestor it may be treated as
    parent_map: BTreeMap<ClassRef, ClassRef>,
    backend: Box<dyn FormatBackend>,
    backend_class: ClassRef,
    initialized: bool,
}

impl Engine {
    pub fn id(&self) -> &EngineId {
        &self.id
    }

    /// Whether the build phase completed. Always true for an engine
    /// obtained from [`EngineBuilder::build`].
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// The concrete backend type this engine was built with. This is the
    /// engine's "class" in the orchestrator's cross-reference map.
    pub fn backend_class(&self) -> ClassRef {
        self.backend_class
    }

    pub fn registry(&self) -> &SpecRegistry {
        &self.registry
    }

    /// The engine's own child -> parent override entries.
    pub fn parent_child_entries(&self) -> impl Iterator<Item = (ClassRef, ClassRef)> + '_ {
        self.parent_map.iter().map(|(c, p)| (*c, *p))
    }

    // ---- dispatch -------------------------------------------------------

    /// Translate an object, dispatching by its runtime class.
    ///
    /// The typed convenience form; `B` must be the exact class the spec
    /// produces for `A`.
    pub fn translate<A: Any + Send, B: Any + Send>(&self, object: A) -> Result<B> {
        let spec = self.spec_for_class(ClassRef::of::<A>())?;
        let out = spec.translate(self, Box::new(object))?;
        match out.downcast::<B>() {
            Ok(value) => Ok(*value),
            Err(_) => Err(TranslationError::ClassMismatch {
                expected: ClassRef::of::<B>(),
            }),
        }
    }

    /// Translate a type-erased object, dispatching by its runtime class.
    pub fn translate_object(&self, object: Box<dyn Any + Send>) -> Result<Box<dyn Any + Send>> {
        let type_id = (*object).type_id();
        let spec = self
            .spec_for_type_id(type_id)
            .ok_or(SpecError::UnknownRuntimeClass)?;
        spec.translate(self, object)
    }

    /// Translate an object as a declared class rather than its runtime
    /// class: the dispatch key is the compile-time type parameter `C`.
    ///
    /// Used when an object must be converted under an ancestor class, e.g.
    /// writing a subtype under its base class's wire slot.
    pub fn translate_as_class<C: Any>(
        &self,
        object: Box<dyn Any + Send>,
    ) -> Result<Box<dyn Any + Send>> {
        let spec = self.spec_for_class(ClassRef::of::<C>())?;
        spec.translate(self, object)
    }

    /// Translate an object as an arbitrary class with no compile-time
    /// relationship to the object's type. The caller is responsible for
    /// handing the spec an object it can actually translate.
    pub fn translate_as_class_unsafe(
        &self,
        object: Box<dyn Any + Send>,
        target: ClassRef,
    ) -> Result<Box<dyn Any + Send>> {
        let spec = self.spec_for_class(target)?;
        spec.translate(self, object)
    }

    /// Look up the spec claiming a class: exact entry first, then a single
    /// parent-override hop. Never walks multi-level ancestor chains.
    pub fn spec_for_class(&self, class: ClassRef) -> Result<&Arc<dyn RawTranslationSpec>> {
        if let Some(spec) = self.registry.spec_for_class(class) {
            return Ok(spec);
        }
        if let Some(parent) = self.parent_map.get(&class) {
            if let Some(spec) = self.registry.spec_for_class(*parent) {
                return Ok(spec);
            }
        }
        Err(SpecError::UnknownTranslationSpec { class }.into())
    }

    fn spec_for_type_id(&self, type_id: TypeId) -> Option<&Arc<dyn RawTranslationSpec>> {
        if let Some(spec) = self.registry.spec_for_type_id(type_id) {
            return Some(spec);
        }
        // Single parent hop for runtime classes with an override entry
        let parent = self
            .parent_map
            .iter()
            .find(|(child, _)| ClassRef::type_id(child) == type_id)
            .map(|(_, parent)| *parent)?;
        self.registry.spec_for_class(parent)
    }

    // ---- raw I/O --------------------------------------------------------

    /// Read the wire object of the declared class from a path.
    pub fn raw_read(&self, path: &Path, class: ClassRef) -> Result<Box<dyn Any + Send>> {
        self.backend.raw_read(path, class)
    }

    /// Write a wire object to a path.
    pub fn raw_write(&self, path: &Path, object: &dyn Any) -> Result<()> {
        self.backend.raw_write(path, object)
    }

    /// Read the wire object at `path` and translate it into its app form.
    pub fn read_and_translate(&self, path: &Path, class: ClassRef) -> Result<Box<dyn Any + Send>> {
        let wire = self.raw_read(path, class)?;
        self.translate_object(wire)
    }

    /// Translate an app object into its wire form and write it to `path`.
    pub fn translate_and_write(&self, path: &Path, object: Box<dyn Any + Send>) -> Result<()> {
        let wire = self.translate_object(object)?;
        self.raw_write(path, wire.as_ref())
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("id", &self.id)
            .field("specs", &self.registry.spec_count())
            .field("classes", &self.registry.class_count())
            .field("backend", &self.backend)
            .field("initialized", &self.initialized)
            .finish()
    }
}

// Equality and hashing cover (registry contents, id, initialized); the
// backend instance carries no identity. Two engines built from equal spec
// sets under the same id are equal and hash equally.
impl PartialEq for Engine {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.initialized == other.initialized
            && self.registry == other.registry
    }
}

impl Eq for Engine {}

impl Hash for Engine {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.initialized.hash(state);
        self.registry.hash(state);
    }
}

/// Builder producing one immutable [`Engine`].
///
/// Registration failures abort the whole build: nothing partially usable
/// is ever returned.
#[derive(Debug, Default)]
pub struct EngineBuilder {
    registry: SpecRegistry,
    parent_map: BTreeMap<ClassRef, ClassRef>,
    pending: Vec<Translator>,
    // Ids of every translator ever registered, across build rounds
    known_ids: BTreeSet<TranslatorId>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a typed translation spec.
    pub fn add_translation_spec<S: TranslationSpec>(&mut self, spec: S) -> Result<&mut Self> {
        self.registry.add_spec(Arc::new(TypedSpecAdapter::new(spec)))?;
        Ok(self)
    }

    /// Register an already-erased spec (the multi-class escape hatch).
    pub fn add_raw_spec(&mut self, spec: Arc<dyn RawTranslationSpec>) -> Result<&mut Self> {
        self.registry.add_spec(spec)?;
        Ok(self)
    }

    /// Register a translator to run during build. Two translators sharing
    /// an id are rejected here, before graph resolution.
    pub fn add_translator(&mut self, translator: Translator) -> Result<&mut Self> {
        if !self.known_ids.insert(translator.id().clone()) {
            return Err(TranslatorError::DuplicateTranslator {
                id: translator.id().clone(),
            }
            .into());
        }
        self.pending.push(translator);
        Ok(self)
    }

    /// Record that `child` may be treated as `parent`. Each child maps to
    /// at most one parent.
    pub fn add_parent_child(&mut self, child: ClassRef, parent: ClassRef) -> Result<&mut Self> {
        if self.parent_map.contains_key(&child) {
            return Err(SpecError::DuplicateClassRef { class: child }.into());
        }
        self.parent_map.insert(child, parent);
        Ok(self)
    }

    /// Run all translators in dependency rank order, freeze the registry,
    /// and produce the engine.
    pub fn build<B: FormatBackend + 'static>(mut self, id: EngineId, backend: B) -> Result<Engine> {
        let mut consumed: Vec<Translator> = Vec::new();

        // Translators may register further translators from their
        // initializers; those run in later rounds. Each round re-resolves
        // the graph over every id seen so far, so dependencies on
        // already-consumed translators stay valid.
        while !self.pending.is_empty() {
            let mut graph = DependencyGraph::new();
            for translator in consumed.iter().chain(self.pending.iter()) {
                graph.add_node(translator.id().clone(), translator.dependencies().clone());
            }
            let order = graph.resolve()?;

            let mut round: BTreeMap<_, _> = std::mem::take(&mut self.pending)
                .into_iter()
                .map(|t| (t.id().clone(), t))
                .collect();
            for translator_id in order {
                let Some(mut translator) = round.remove(&translator_id) else {
                    // Already consumed in an earlier round
                    continue;
                };
                debug!("initializing translator {}", translator.id());
                let mut context = TranslatorContext::new();
                translator.run_initializer(&mut context);
                self.merge_context(context)?;
                consumed.push(translator);
            }
        }

        // Every consumed translator must report initialized; anything else
        // is a defect in the loop above
        for translator in &consumed {
            if !translator.is_initialized() {
                internal_fault("translator left uninitialized after the init phase");
            }
        }

        if self.registry.is_empty() {
            return Err(TranslationError::NoTranslationSpecs);
        }

        info!(
            "engine {} built: {} specs over {} classes, {} translators",
            id,
            self.registry.spec_count(),
            self.registry.class_count(),
            consumed.len()
        );

        Ok(Engine {
            id,
            registry: self.registry,
            parent_map: self.parent_map,
            backend: Box::new(backend),
            backend_class: ClassRef::of::<B>(),
            initialized: true,
        })
    }

    /// Merge the registrations a translator staged during initialization.
    fn merge_context(&mut self, context: TranslatorContext) -> Result<()> {
        let TranslatorContext {
            specs,
            parent_entries,
            translators,
        } = context;
        for spec in specs {
            self.registry.add_spec(spec)?;
        }
        for (child, parent) in parent_entries {
            self.add_parent_child(child, parent)?;
        }
        for translator in translators {
            self.add_translator(translator)?;
        }
        Ok(())
    }
}
