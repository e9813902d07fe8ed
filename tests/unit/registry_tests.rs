/*!
 * Tests for the translation-spec registry
 */

use std::any::{Any, TypeId};
use std::sync::Arc;

use transwire::class_ref::ClassRef;
use transwire::errors::{Result, SpecError};
use transwire::translation::{Engine, RawTranslationSpec, SpecRegistry};

use crate::common::fixtures::{Report, ReportRecord, ReportSpec};

/// A spec claiming no classes at all, for the empty-claim rejection path
#[derive(Debug)]
struct HollowSpec;

impl RawTranslationSpec for HollowSpec {
    fn claimed_classes(&self) -> Vec<ClassRef> {
        Vec::new()
    }

    fn spec_type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn spec_type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn translate(
        &self,
        _engine: &Engine,
        _object: Box<dyn Any + Send>,
    ) -> Result<Box<dyn Any + Send>> {
        unreachable!("hollow spec is never dispatched")
    }
}

/// A competing spec claiming a class `ReportSpec` already claims
#[derive(Debug)]
struct RivalReportSpec;

impl RawTranslationSpec for RivalReportSpec {
    fn claimed_classes(&self) -> Vec<ClassRef> {
        vec![ClassRef::of::<Report>()]
    }

    fn spec_type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn spec_type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn translate(
        &self,
        _engine: &Engine,
        object: Box<dyn Any + Send>,
    ) -> Result<Box<dyn Any + Send>> {
        Ok(object)
    }
}

/// Registering a spec maps every class it claims to that one instance
#[test]
fn test_addSpec_withTwoClaimedClasses_shouldMapBoth() {
    let mut registry = SpecRegistry::new();
    registry.add_spec(Arc::new(ReportSpec)).unwrap();

    assert_eq!(registry.spec_count(), 1);
    assert_eq!(registry.class_count(), 2);
    assert!(registry.spec_for_class(ClassRef::of::<Report>()).is_some());
    assert!(
        registry
            .spec_for_class(ClassRef::of::<ReportRecord>())
            .is_some()
    );
}

/// Two distinct instances of the same concrete spec type are the same spec
#[test]
fn test_addSpec_sameConcreteTypeTwice_shouldRejectAsDuplicate() {
    let mut registry = SpecRegistry::new();
    registry.add_spec(Arc::new(ReportSpec)).unwrap();

    let error = registry.add_spec(Arc::new(ReportSpec)).unwrap_err();
    assert!(matches!(error, SpecError::DuplicateTranslationSpec { .. }));
    // The failed registration left nothing behind
    assert_eq!(registry.spec_count(), 1);
    assert_eq!(registry.class_count(), 2);
}

/// A spec with an empty claimed-class set is rejected
#[test]
fn test_addSpec_withNoClaimedClasses_shouldReject() {
    let mut registry = SpecRegistry::new();
    let error = registry.add_spec(Arc::new(HollowSpec)).unwrap_err();
    assert!(matches!(error, SpecError::EmptyTranslationSpec { .. }));
    assert!(registry.is_empty());
}

/// A class may belong to at most one spec
#[test]
fn test_addSpec_claimingAlreadyMappedClass_shouldReject() {
    let mut registry = SpecRegistry::new();
    registry.add_spec(Arc::new(ReportSpec)).unwrap();

    let error = registry.add_spec(Arc::new(RivalReportSpec)).unwrap_err();
    assert!(matches!(error, SpecError::DuplicateClassRef { .. }));
    assert_eq!(registry.spec_count(), 1);
}

/// Lookup misses return none rather than panicking
#[test]
fn test_specForClass_unknownClass_shouldReturnNone() {
    let registry = SpecRegistry::new();
    assert!(registry.spec_for_class(ClassRef::of::<Report>()).is_none());
}

/// Registry equality follows contents, not instances
#[test]
fn test_registryEquality_sameContents_shouldBeEqual() {
    let mut a = SpecRegistry::new();
    a.add_spec(Arc::new(ReportSpec)).unwrap();
    let mut b = SpecRegistry::new();
    b.add_spec(Arc::new(ReportSpec)).unwrap();

    assert_eq!(a, b);
    assert_ne!(a, SpecRegistry::new());
}
