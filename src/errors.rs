/*!
 * Error types for the transwire framework.
 *
 * This module contains custom error types for different parts of the
 * framework, using the thiserror crate for ergonomic error definitions.
 *
 * Errors fall into three tiers:
 * 1. Contract errors - bad registrations or lookups, raised synchronously
 *    at registration, build, or dispatch time (`SpecError`,
 *    `TranslatorError`, `ManifestError` and the flat variants on
 *    `TranslationError`). The caller must fix configuration and rebuild.
 * 2. Environment errors - I/O failures during read/write, wrapped as
 *    `TranslationError::Io`. They abort only the single operation.
 * 3. Internal invariant faults - bookkeeping inconsistencies that are
 *    impossible given correct use of the builders. These panic through
 *    `internal_fault` and signal a defect in the library itself.
 */

use std::path::PathBuf;
use thiserror::Error;

use crate::class_ref::{ClassRef, EngineId, ScenarioId, TranslatorId};

/// Errors raised by the translation-spec registry and dispatch
#[derive(Error, Debug)]
pub enum SpecError {
    /// A spec of this concrete type was already registered. Two distinct
    /// instances of the same concrete spec type count as the same spec.
    #[error("duplicate translation spec: {spec_type}")]
    DuplicateTranslationSpec {
        /// Type name of the offending spec
        spec_type: &'static str,
    },

    /// A spec claimed no classes at all
    #[error("translation spec claims no classes: {spec_type}")]
    EmptyTranslationSpec {
        /// Type name of the offending spec
        spec_type: &'static str,
    },

    /// A class is already claimed by another spec, or already has a
    /// parent/child entry
    #[error("duplicate class reference: {class}")]
    DuplicateClassRef {
        /// The colliding class
        class: ClassRef,
    },

    /// No registered spec claims this class
    #[error("no translation spec found for class: {class}")]
    UnknownTranslationSpec {
        /// The class that was looked up
        class: ClassRef,
    },

    /// No registered spec claims the runtime class of a type-erased object
    #[error("no translation spec found for the object's runtime class")]
    UnknownRuntimeClass,

    /// An object handed to a spec was neither its input class nor its
    /// app class
    #[error("object is not translatable by spec {spec_type}: expected {input} or {app}")]
    UnexpectedObjectType {
        /// Type name of the spec that rejected the object
        spec_type: &'static str,
        /// The spec's input class
        input: ClassRef,
        /// The spec's app class
        app: ClassRef,
    },
}

/// Errors raised while resolving the translator dependency graph
#[derive(Error, Debug)]
pub enum TranslatorError {
    /// Two translators were registered under the same id
    #[error("duplicate translator: {id}")]
    DuplicateTranslator {
        /// The colliding translator id
        id: TranslatorId,
    },

    /// A declared dependency names a translator that was never registered
    #[error("missing translator dependencies: {details}")]
    MissingTranslator {
        /// Diagnostic naming each missing id and its dependents
        details: String,
    },

    /// The dependency graph contains one or more cycles
    #[error("circular translator dependencies: {details}")]
    CircularTranslatorDependencies {
        /// Diagnostic listing each cyclic group and its in-group edges
        details: String,
    },
}

/// Errors raised while building the input/output path manifests
#[derive(Error, Debug)]
pub enum ManifestError {
    /// An input path does not exist on disk
    #[error("input file does not exist: {path:?}")]
    MissingInputFile {
        /// The offending path
        path: PathBuf,
    },

    /// A path expected to be a file is a directory
    #[error("path is a directory: {path:?}")]
    PathIsDirectory {
        /// The offending path
        path: PathBuf,
    },

    /// The same input path was added twice
    #[error("duplicate input path: {path:?}")]
    DuplicateInputPath {
        /// The offending path
        path: PathBuf,
    },

    /// The same output path was added twice
    #[error("duplicate output path: {path:?}")]
    DuplicateOutputPath {
        /// The offending path
        path: PathBuf,
    },

    /// The (class, scenario) output slot is already taken
    #[error("duplicate output slot: ({class}, scenario {scenario})")]
    DuplicateOutputSlot {
        /// Class of the colliding slot
        class: ClassRef,
        /// Scenario of the colliding slot
        scenario: ScenarioId,
    },

    /// An output path's parent directory does not exist
    #[error("parent directory does not exist for output path: {path:?}")]
    MissingParentDirectory {
        /// The offending path
        path: PathBuf,
    },

    /// A class name from a configuration file matched no registered class
    #[error("unknown class name in configuration: {name}")]
    UnknownClass {
        /// The unresolvable name
        name: String,
    },
}

/// Main framework error type that wraps all other errors
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the spec registry or dispatch
    #[error("spec error: {0}")]
    Spec(#[from] SpecError),

    /// Error from translator dependency resolution
    #[error("translator error: {0}")]
    Translator(#[from] TranslatorError),

    /// Error from the path manifests
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// No engine is registered under this id
    #[error("unknown engine: {id}")]
    UnknownEngine {
        /// The unresolvable engine id
        id: EngineId,
    },

    /// An engine with this id, or with the same backend class, is already
    /// attached to the orchestrator
    #[error("duplicate engine: {id}")]
    DuplicateEngine {
        /// Id of the engine that could not be attached
        id: EngineId,
    },

    /// An engine build finished with zero registered specs
    #[error("engine built with no translation specs")]
    NoTranslationSpecs,

    /// The override class was never registered as an ancestor
    #[error("invalid output class override: {class}")]
    InvalidOutputClassOverride {
        /// The rejected override class
        class: ClassRef,
    },

    /// No output slot is registered for this (class, scenario) pair,
    /// directly or through a parent override
    #[error("no output path for class {class}, scenario {scenario}")]
    UnknownOutputPath {
        /// Class of the object being written
        class: ClassRef,
        /// Requested scenario
        scenario: ScenarioId,
    },

    /// The object pool holds no element of the requested class
    #[error("no object of class {class} in the object pool")]
    UnknownClassRef {
        /// The requested class
        class: ClassRef,
    },

    /// A translated or read object had a different class than the caller
    /// asked for
    #[error("object class mismatch: expected {expected}")]
    ClassMismatch {
        /// The class the caller requested
        expected: ClassRef,
    },

    /// An I/O failure during read or write. Environment tier: originates
    /// outside the translation domain and aborts only that operation.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TranslationError>;

/// Abort on an internal invariant violation.
///
/// These are defects in the library's own bookkeeping, not caller mistakes,
/// and are not meant to be caught by ordinary callers.
pub(crate) fn internal_fault(detail: &str) -> ! {
    panic!("internal invariant violated: {detail}");
}
