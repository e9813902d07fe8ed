/*!
 * Format backends for the raw wire representation.
 *
 * A backend owns the concrete wire encoding for one format and exposes raw
 * read/write of type-erased wire objects. Concrete text or binary codecs
 * are external collaborators; this crate ships only the in-memory
 * `MemoryBackend` used for tests and examples.
 */

use std::any::Any;
use std::fmt::Debug;
use std::path::Path;

use crate::class_ref::ClassRef;
use crate::errors::Result;

/// Raw I/O surface of one wire format.
///
/// An engine is built from a generic core plus one backend; the backend's
/// concrete type doubles as the engine's "class" in the orchestrator's
/// cross-reference map. Read and write block the calling thread, and their
/// failures surface immediately as environment-tier errors.
pub trait FormatBackend: Debug + Send + Sync {
    /// Read the wire object of the declared class from a path.
    fn raw_read(&self, path: &Path, class: ClassRef) -> Result<Box<dyn Any + Send>>;

    /// Write a wire object to a path.
    fn raw_write(&self, path: &Path, object: &dyn Any) -> Result<()>;
}

pub mod mock;

pub use mock::{MemoryBackend, MemoryBehavior};
