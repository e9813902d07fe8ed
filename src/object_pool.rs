/*!
 * The consume-once object pool.
 *
 * Bulk reads append translated app objects here; every getter removes what
 * it returns, so the same ingested record is never processed twice by
 * successive passes over the same orchestrator. The pool is an ordered
 * multiset behind a mutex: scan-and-remove happens under a single lock
 * acquisition, so two concurrent drains can never claim the same element.
 */

use std::any::Any;
use std::fmt;

use parking_lot::Mutex;

use crate::class_ref::ClassRef;
use crate::errors::{Result, TranslationError, internal_fault};

/// Ordered, consume-once store of type-erased app objects.
///
/// Created empty; its lifetime is the owning orchestrator's lifetime and
/// it is never persisted.
#[derive(Default)]
pub struct ObjectPool {
    objects: Mutex<Vec<Box<dyn Any + Send>>>,
}

impl ObjectPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an object. Insertion order is what the getters preserve.
    pub fn push(&self, object: Box<dyn Any + Send>) {
        self.objects.lock().push(object);
    }

    /// Remove and return the first element assignable to `T`, scanning in
    /// insertion order. Fails if no element matches; the pool shrinks by
    /// exactly one on success.
    pub fn take_first<T: Any>(&self) -> Result<T> {
        let mut objects = self.objects.lock();
        let position = objects.iter().position(|o| o.as_ref().is::<T>());
        match position {
            Some(index) => {
                let object = objects.remove(index);
                match object.downcast::<T>() {
                    Ok(value) => Ok(*value),
                    // The element matched is::<T> just above
                    Err(_) => internal_fault("pool element changed class during removal"),
                }
            }
            None => Err(TranslationError::UnknownClassRef {
                class: ClassRef::of::<T>(),
            }),
        }
    }

    /// Remove and return all elements assignable to `T`, preserving their
    /// relative order. Returns an empty vec, pool untouched, when nothing
    /// matches.
    pub fn take_all<T: Any>(&self) -> Vec<T> {
        let mut objects = self.objects.lock();
        let mut taken = Vec::new();
        let mut kept = Vec::with_capacity(objects.len());
        for object in objects.drain(..) {
            match object.downcast::<T>() {
                Ok(value) => taken.push(*value),
                Err(object) => kept.push(object),
            }
        }
        *objects = kept;
        taken
    }

    /// Remove and return the entire pool. Pool size becomes zero.
    pub fn drain_all(&self) -> Vec<Box<dyn Any + Send>> {
        let mut objects = self.objects.lock();
        std::mem::take(&mut *objects)
    }

    pub fn len(&self) -> usize {
        self.objects.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.lock().is_empty()
    }
}

impl fmt::Debug for ObjectPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectPool")
            .field("len", &self.len())
            .finish()
    }
}
