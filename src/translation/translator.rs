/*!
 * Translators: named, dependency-ordered registration units.
 *
 * A translator bundles an id, the ids it depends on, and an initializer
 * that registers specs, parent/child overrides, and possibly further
 * translators. The engine builder runs initializers in dependency rank
 * order; each runs exactly once and the translator is discarded afterwards.
 */

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::class_ref::{ClassRef, TranslatorId};
use crate::errors::internal_fault;
use crate::translation::spec::{RawTranslationSpec, TranslationSpec, TypedSpecAdapter};

type Initializer = Box<dyn FnOnce(&mut TranslatorContext) + Send>;

/// A named unit that registers specs and overrides during engine build.
pub struct Translator {
    id: TranslatorId,
    dependencies: BTreeSet<TranslatorId>,
    initializer: Option<Initializer>,
    initialized: bool,
}

impl Translator {
    /// Create a translator with its id and initializer. Dependencies are
    /// declared with [`Translator::with_dependency`].
    pub fn new<F>(id: TranslatorId, initializer: F) -> Self
    where
        F: FnOnce(&mut TranslatorContext) + Send + 'static,
    {
        Translator {
            id,
            dependencies: BTreeSet::new(),
            initializer: Some(Box::new(initializer)),
            initialized: false,
        }
    }

    /// Declare a dependency on another translator's id.
    pub fn with_dependency(mut self, dependency: TranslatorId) -> Self {
        self.dependencies.insert(dependency);
        self
    }

    pub fn id(&self) -> &TranslatorId {
        &self.id
    }

    pub fn dependencies(&self) -> &BTreeSet<TranslatorId> {
        &self.dependencies
    }

    /// Whether the initializer has already run.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Run the initializer exactly once. A second invocation is a defect in
    /// the build loop, not a caller error.
    pub(crate) fn run_initializer(&mut self, context: &mut TranslatorContext) {
        match self.initializer.take() {
            Some(init) => {
                init(context);
                self.initialized = true;
            }
            None => internal_fault("translator initializer invoked twice"),
        }
    }
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translator")
            .field("id", &self.id)
            .field("dependencies", &self.dependencies)
            .field("initialized", &self.initialized)
            .finish()
    }
}

/// Registration surface handed to a translator's initializer.
///
/// Registrations are staged here and merged into the engine builder after
/// the initializer returns, so registration failures are attributed to the
/// translator that caused them. Translators registered from inside an
/// initializer are resolved and run in a subsequent round.
#[derive(Default)]
pub struct TranslatorContext {
    pub(crate) specs: Vec<Arc<dyn RawTranslationSpec>>,
    pub(crate) parent_entries: Vec<(ClassRef, ClassRef)>,
    pub(crate) translators: Vec<Translator>,
}

impl TranslatorContext {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register a typed translation spec onto the engine being built.
    pub fn add_translation_spec<S: TranslationSpec>(&mut self, spec: S) {
        self.specs.push(Arc::new(TypedSpecAdapter::new(spec)));
    }

    /// Register an already-erased spec (the multi-class escape hatch).
    pub fn add_raw_spec(&mut self, spec: Arc<dyn RawTranslationSpec>) {
        self.specs.push(spec);
    }

    /// Record that `child` may be treated as `parent` for translation and
    /// output-slot purposes.
    pub fn add_parent_child(&mut self, child: ClassRef, parent: ClassRef) {
        self.parent_entries.push((child, parent));
    }

    /// Register a further translator to run in a later round.
    pub fn add_translator(&mut self, translator: Translator) {
        self.translators.push(translator);
    }
}
