/*!
 * The translation core.
 *
 * This module contains the object-translation machinery, split into
 * several submodules:
 *
 * - `spec`: the typed and erased translation-spec traits
 * - `registry`: the class-to-spec registry
 * - `graph`: translator dependency resolution and diagnostics
 * - `translator`: translators and their registration context
 * - `engine`: the engine and its builder
 */

// Re-export main types for easier usage
pub use self::engine::{Engine, EngineBuilder};
pub use self::registry::SpecRegistry;
pub use self::spec::{RawTranslationSpec, TranslationSpec};
pub use self::translator::{Translator, TranslatorContext};

// Submodules
pub mod engine;
pub(crate) mod graph;
pub mod registry;
pub mod spec;
pub mod translator;
