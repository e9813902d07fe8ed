/*!
 * The translation-spec registry.
 *
 * Accumulates specs into a class-to-spec map during the build phase, then
 * is frozen inside an engine and shared read-only. Every class key maps to
 * exactly one spec; one spec instance may serve several class keys.
 */

use std::any::TypeId;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::class_ref::ClassRef;
use crate::errors::SpecError;
use crate::translation::spec::RawTranslationSpec;

/// Registry mapping claimed classes to their translation specs.
///
/// Mutated by a single builder during registration, then frozen. Duplicate
/// detection is by concrete spec type: re-adding a spec type that is already
/// present is rejected even for a distinct instance.
#[derive(Debug, Clone, Default)]
pub struct SpecRegistry {
    // Keyed by the class's TypeId so type-erased dispatch can look up by
    // runtime type id alone. BTreeMap keeps iteration deterministic for
    // equality and hashing of engines.
    class_to_spec: BTreeMap<TypeId, RegisteredClass>,
    // One entry per concrete spec type
    spec_types: BTreeMap<TypeId, &'static str>,
}

#[derive(Debug, Clone)]
struct RegisteredClass {
    class: ClassRef,
    spec: Arc<dyn RawTranslationSpec>,
}

impl SpecRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a spec's claimed classes into the registry.
    ///
    /// Rejects a spec claiming no classes, a spec whose concrete type is
    /// already registered, and any claimed class already mapped to another
    /// spec. On rejection the registry is left untouched.
    pub fn add_spec(
        &mut self,
        spec: Arc<dyn RawTranslationSpec>,
    ) -> Result<(), SpecError> {
        let claimed = spec.claimed_classes();
        if claimed.is_empty() {
            return Err(SpecError::EmptyTranslationSpec {
                spec_type: spec.spec_type_name(),
            });
        }
        if self.spec_types.contains_key(&spec.spec_type_id()) {
            return Err(SpecError::DuplicateTranslationSpec {
                spec_type: spec.spec_type_name(),
            });
        }
        // Validate every class key before inserting any of them, so a
        // rejected spec leaves no partial state behind
        for class in &claimed {
            if self.class_to_spec.contains_key(&class.type_id()) {
                return Err(SpecError::DuplicateClassRef { class: *class });
            }
        }
        self.spec_types
            .insert(spec.spec_type_id(), spec.spec_type_name());
        for class in claimed {
            self.class_to_spec.insert(
                class.type_id(),
                RegisteredClass {
                    class,
                    spec: Arc::clone(&spec),
                },
            );
        }
        Ok(())
    }

    /// Raw lookup by class token.
    pub fn spec_for_class(&self, class: ClassRef) -> Option<&Arc<dyn RawTranslationSpec>> {
        self.spec_for_type_id(class.type_id())
    }

    /// Raw lookup by runtime type id (the erased dispatch path).
    pub fn spec_for_type_id(&self, type_id: TypeId) -> Option<&Arc<dyn RawTranslationSpec>> {
        self.class_to_spec.get(&type_id).map(|entry| &entry.spec)
    }

    /// All registered class tokens, in stable order.
    pub fn classes(&self) -> impl Iterator<Item = ClassRef> + '_ {
        self.class_to_spec.values().map(|entry| entry.class)
    }

    /// Number of distinct specs held.
    pub fn spec_count(&self) -> usize {
        self.spec_types.len()
    }

    /// Number of class keys held.
    pub fn class_count(&self) -> usize {
        self.class_to_spec.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spec_types.is_empty()
    }

    /// Stable view of the registry contents as (class type id, spec type id)
    /// pairs, used for engine equality and hashing.
    pub(crate) fn contents(&self) -> impl Iterator<Item = (TypeId, TypeId)> + '_ {
        self.class_to_spec
            .iter()
            .map(|(class_id, entry)| (*class_id, entry.spec.spec_type_id()))
    }
}

// Two registries are equal when they map the same classes to the same
// concrete spec types. Spec instances themselves carry no identity beyond
// their type.
impl PartialEq for SpecRegistry {
    fn eq(&self, other: &Self) -> bool {
        self.class_to_spec.len() == other.class_to_spec.len()
            && self.contents().eq(other.contents())
    }
}

impl Eq for SpecRegistry {}

impl std::hash::Hash for SpecRegistry {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        for (class_id, spec_id) in self.contents() {
            class_id.hash(state);
            spec_id.hash(state);
        }
    }
}
