/*!
 * Translation spec traits.
 *
 * A translation spec is a single bidirectional converter between one input
 * (wire/storage) class and one app (domain) class. The typed trait is what
 * spec authors implement; the erased trait is what the registry stores and
 * what the engine dispatches through at runtime.
 */

use std::any::{Any, TypeId};
use std::fmt::Debug;

use crate::class_ref::ClassRef;
use crate::errors::{Result, SpecError};
use crate::translation::engine::Engine;

/// A bidirectional converter between one input class and one app class.
///
/// Conversions receive the owning engine so nested fields can be translated
/// recursively through the engine's own registry. Registry identity is the
/// concrete implementing type: two distinct instances of the same spec type
/// are the same spec, and registering both is rejected.
pub trait TranslationSpec: Debug + Send + Sync + 'static {
    /// The wire/storage-side class this spec claims
    type Input: Any + Send;

    /// The app/domain-side class this spec claims
    type App: Any + Send;

    /// Convert an input object into its app representation
    fn input_to_app(&self, engine: &Engine, input: Self::Input) -> Result<Self::App>;

    /// Convert an app object into its input representation
    fn app_to_input(&self, engine: &Engine, app: Self::App) -> Result<Self::Input>;
}

/// Type-erased form of a translation spec.
///
/// This is the registry's unit of storage. Most callers implement
/// [`TranslationSpec`] and never touch this trait; implementing it directly
/// is the escape hatch for specs that claim more than the usual two classes
/// (for example a container spec that accepts several member classes).
pub trait RawTranslationSpec: Debug + Send + Sync + 'static {
    /// Every class this spec claims. Two or more classes may route to the
    /// same spec instance; an empty set is rejected at registration.
    fn claimed_classes(&self) -> Vec<ClassRef>;

    /// Stable identity of the concrete spec type, used for duplicate
    /// detection. Implementations return `TypeId::of::<Self>()`.
    fn spec_type_id(&self) -> TypeId;

    /// Type name matching `spec_type_id`, for diagnostics.
    fn spec_type_name(&self) -> &'static str;

    /// Route a type-erased object to the matching conversion direction,
    /// selected by the object's runtime class.
    fn translate(
        &self,
        engine: &Engine,
        object: Box<dyn Any + Send>,
    ) -> Result<Box<dyn Any + Send>>;
}

/// Adapter lifting a typed [`TranslationSpec`] into the erased registry form.
#[derive(Debug)]
pub(crate) struct TypedSpecAdapter<S: TranslationSpec> {
    spec: S,
}

impl<S: TranslationSpec> TypedSpecAdapter<S> {
    pub(crate) fn new(spec: S) -> Self {
        TypedSpecAdapter { spec }
    }
}

impl<S: TranslationSpec> RawTranslationSpec for TypedSpecAdapter<S> {
    fn claimed_classes(&self) -> Vec<ClassRef> {
        let input = ClassRef::of::<S::Input>();
        let app = ClassRef::of::<S::App>();
        // A spec may claim the same class on both sides
        if input == app {
            vec![input]
        } else {
            vec![input, app]
        }
    }

    fn spec_type_id(&self) -> TypeId {
        // Identity is the author's spec type, not the adapter
        TypeId::of::<S>()
    }

    fn spec_type_name(&self) -> &'static str {
        std::any::type_name::<S>()
    }

    fn translate(
        &self,
        engine: &Engine,
        object: Box<dyn Any + Send>,
    ) -> Result<Box<dyn Any + Send>> {
        // Route by the object's runtime class
        let object = match object.downcast::<S::Input>() {
            Ok(input) => {
                let app = self.spec.input_to_app(engine, *input)?;
                return Ok(Box::new(app));
            }
            Err(object) => object,
        };
        match object.downcast::<S::App>() {
            Ok(app) => {
                let input = self.spec.app_to_input(engine, *app)?;
                Ok(Box::new(input))
            }
            Err(_) => Err(SpecError::UnexpectedObjectType {
                spec_type: std::any::type_name::<S>(),
                input: ClassRef::of::<S::Input>(),
                app: ClassRef::of::<S::App>(),
            }
            .into()),
        }
    }
}
