/*!
 * Identity tokens used throughout the framework.
 *
 * This module contains the small copyable tokens that name things:
 * - `ClassRef`: a registered app or input class
 * - `TranslatorId`: a translator plugin
 * - `EngineId`: an engine held by the orchestrator
 * - `ScenarioId`: an output-slot discriminator
 */

use std::any::{Any, TypeId};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Reference to a registered class (app side or input side).
///
/// Wraps the stable `TypeId` of the class together with its type name for
/// diagnostics. Identity is the type id alone; the name is carried only so
/// error messages and config files can talk about the class.
#[derive(Debug, Clone, Copy)]
pub struct ClassRef {
    type_id: TypeId,
    name: &'static str,
}

impl ClassRef {
    // @returns: The ClassRef for a concrete type
    pub fn of<T: Any>() -> Self {
        ClassRef {
            type_id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The stable type id this reference points at.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Fully qualified type name, for diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Trailing path segment of the type name, e.g. `Report` for
    /// `my_app::reports::Report`. Used when resolving class names from
    /// configuration files.
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }

    /// Whether a type-erased value is an instance of this class.
    pub fn is_instance(&self, value: &dyn Any) -> bool {
        value.type_id() == self.type_id
    }
}

// Identity is the type id only; two refs to the same type are always equal
// even if one carries a differently rendered name.
impl PartialEq for ClassRef {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ClassRef {}

impl Hash for ClassRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl PartialOrd for ClassRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ClassRef {
    fn cmp(&self, other: &Self) -> Ordering {
        self.type_id.cmp(&other.type_id)
    }
}

impl fmt::Display for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Opaque, identity-comparable token naming a translator plugin.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TranslatorId(String);

impl TranslatorId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        TranslatorId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TranslatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Token naming an engine registered with the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EngineId(String);

impl EngineId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        EngineId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Discriminator for output slots sharing the same class.
///
/// The no-scenario registration path uses `ScenarioId::DEFAULT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ScenarioId(u64);

impl ScenarioId {
    pub const DEFAULT: ScenarioId = ScenarioId(0);

    pub fn new(id: u64) -> Self {
        ScenarioId(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
