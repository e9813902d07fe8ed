/*!
 * In-memory mock backend for testing.
 *
 * This module provides a backend that simulates different behaviors:
 * - `MemoryBackend::working()` - reads and writes against an in-memory store
 * - `MemoryBackend::failing_reads()` - every read fails with an I/O error
 * - `MemoryBackend::failing_writes()` - every write fails with an I/O error
 *
 * Wire classes are registered explicitly with a clone factory; there is no
 * runtime discovery of constructors.
 */

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::backend::FormatBackend;
use crate::class_ref::ClassRef;
use crate::errors::{Result, SpecError};

type CloneFn = Arc<dyn Fn(&dyn Any) -> Option<Box<dyn Any + Send>> + Send + Sync>;

/// Behavior mode for the mock backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryBehavior {
    /// Reads and writes succeed against the in-memory store
    Working,
    /// Every read fails with a permission error
    FailingReads,
    /// Every write fails with a permission error
    FailingWrites,
}

/// Mock backend keeping wire objects in an in-memory path-keyed store.
pub struct MemoryBackend {
    store: Mutex<HashMap<PathBuf, Box<dyn Any + Send>>>,
    // Explicit per-class clone factories, keyed by the wire class
    factories: HashMap<TypeId, (ClassRef, CloneFn)>,
    behavior: MemoryBehavior,
    read_count: AtomicUsize,
    write_count: AtomicUsize,
}

impl MemoryBackend {
    pub fn new(behavior: MemoryBehavior) -> Self {
        MemoryBackend {
            store: Mutex::new(HashMap::new()),
            factories: HashMap::new(),
            behavior,
            read_count: AtomicUsize::new(0),
            write_count: AtomicUsize::new(0),
        }
    }

    /// A backend where all operations succeed
    pub fn working() -> Self {
        Self::new(MemoryBehavior::Working)
    }

    /// A backend where every read fails
    pub fn failing_reads() -> Self {
        Self::new(MemoryBehavior::FailingReads)
    }

    /// A backend where every write fails
    pub fn failing_writes() -> Self {
        Self::new(MemoryBehavior::FailingWrites)
    }

    /// Register a wire class together with its clone factory. Classes not
    /// registered here cannot be read or written through this backend.
    pub fn register_class<T: Any + Clone + Send>(mut self) -> Self {
        let clone_fn: CloneFn = Arc::new(|value: &dyn Any| {
            value
                .downcast_ref::<T>()
                .map(|v| Box::new(v.clone()) as Box<dyn Any + Send>)
        });
        self.factories
            .insert(TypeId::of::<T>(), (ClassRef::of::<T>(), clone_fn));
        self
    }

    /// Seed the store directly, bypassing `raw_write`. Test setup helper.
    pub fn seed<T: Any + Send>(&self, path: impl Into<PathBuf>, object: T) {
        self.store.lock().insert(path.into(), Box::new(object));
    }

    /// Number of objects currently stored
    pub fn stored_count(&self) -> usize {
        self.store.lock().len()
    }

    /// Whether a path holds a stored object
    pub fn contains(&self, path: &Path) -> bool {
        self.store.lock().contains_key(path)
    }

    /// How many reads were attempted
    pub fn read_count(&self) -> usize {
        self.read_count.load(Ordering::SeqCst)
    }

    /// How many writes were attempted
    pub fn write_count(&self) -> usize {
        self.write_count.load(Ordering::SeqCst)
    }

    fn factory_for(&self, type_id: TypeId, class: ClassRef) -> Result<&CloneFn> {
        match self.factories.get(&type_id) {
            Some((_, clone_fn)) => Ok(clone_fn),
            None => Err(SpecError::UnknownTranslationSpec { class }.into()),
        }
    }
}

impl std::fmt::Debug for MemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBackend")
            .field("behavior", &self.behavior)
            .field("stored", &self.store.lock().len())
            .field("classes", &self.factories.len())
            .finish()
    }
}

impl FormatBackend for MemoryBackend {
    fn raw_read(&self, path: &Path, class: ClassRef) -> Result<Box<dyn Any + Send>> {
        self.read_count.fetch_add(1, Ordering::SeqCst);
        if self.behavior == MemoryBehavior::FailingReads {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("simulated read failure: {}", path.display()),
            )
            .into());
        }
        let clone_fn = self.factory_for(class.type_id(), class)?;
        let store = self.store.lock();
        let stored = store.get(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no stored object at {}", path.display()),
            )
        })?;
        // The stored object must be an instance of the declared class
        clone_fn(stored.as_ref()).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("stored object at {} is not a {}", path.display(), class),
            )
            .into()
        })
    }

    fn raw_write(&self, path: &Path, object: &dyn Any) -> Result<()> {
        self.write_count.fetch_add(1, Ordering::SeqCst);
        if self.behavior == MemoryBehavior::FailingWrites {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("simulated write failure: {}", path.display()),
            )
            .into());
        }
        let type_id = object.type_id();
        let Some((class, clone_fn)) = self.factories.get(&type_id) else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "object class not registered with this backend",
            )
            .into());
        };
        let copy = clone_fn(object).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("object is not a {}", class),
            )
        })?;
        self.store.lock().insert(path.to_path_buf(), copy);
        Ok(())
    }
}
