/*!
 * Tests for the consume-once object pool
 */

use transwire::errors::TranslationError;
use transwire::object_pool::ObjectPool;

use crate::common::fixtures::{AppX, Person};

fn mixed_pool() -> ObjectPool {
    let pool = ObjectPool::new();
    pool.push(Box::new(AppX { n: 1 }));
    pool.push(Box::new(Person {
        name: "Ada".to_string(),
        age: 36,
    }));
    pool.push(Box::new(AppX { n: 2 }));
    pool
}

/// A new pool is empty
#[test]
fn test_new_emptyPool_shouldReportZeroLen() {
    let pool = ObjectPool::new();
    assert_eq!(pool.len(), 0);
    assert!(pool.is_empty());
}

/// Taking the first match removes exactly that element
#[test]
fn test_takeFirst_matchingClass_shouldRemoveOneElement() {
    let pool = mixed_pool();
    let first: AppX = pool.take_first().unwrap();
    assert_eq!(first, AppX { n: 1 });
    assert_eq!(pool.len(), 2);

    // The earlier of the remaining AppX elements comes next
    let second: AppX = pool.take_first().unwrap();
    assert_eq!(second, AppX { n: 2 });
    assert_eq!(pool.len(), 1);
}

/// A miss leaves the pool untouched and names the requested class
#[test]
fn test_takeFirst_noMatch_shouldFailAndLeavePool() {
    let pool = mixed_pool();
    let error = pool.take_first::<String>().unwrap_err();
    let TranslationError::UnknownClassRef { class } = error else {
        panic!("expected an unknown-class error");
    };
    assert!(class.name().contains("String"));
    assert_eq!(pool.len(), 3);
}

/// Taking all matches preserves insertion order and leaves the rest
#[test]
fn test_takeAll_matchingClass_shouldPreserveOrderAndLeaveOthers() {
    let pool = mixed_pool();
    let xs = pool.take_all::<AppX>();
    assert_eq!(xs, vec![AppX { n: 1 }, AppX { n: 2 }]);
    assert_eq!(pool.len(), 1);

    let people = pool.take_all::<Person>();
    assert_eq!(people.len(), 1);
    assert_eq!(people[0].name, "Ada");
    assert!(pool.is_empty());
}

/// take_all with no match returns empty and removes nothing
#[test]
fn test_takeAll_noMatch_shouldReturnEmptyAndLeavePool() {
    let pool = mixed_pool();
    let none = pool.take_all::<String>();
    assert!(none.is_empty());
    assert_eq!(pool.len(), 3);
}

/// drain_all empties the pool in one call
#[test]
fn test_drainAll_mixedPool_shouldEmptyThePool() {
    let pool = mixed_pool();
    let drained = pool.drain_all();
    assert_eq!(drained.len(), 3);
    assert!(pool.is_empty());

    // Order of the erased elements matches insertion order
    assert!(drained[0].is::<AppX>());
    assert!(drained[1].is::<Person>());
    assert!(drained[2].is::<AppX>());
}

/// Elements consumed once never come back
#[test]
fn test_takeFirst_afterDrain_shouldFail() {
    let pool = mixed_pool();
    pool.drain_all();
    assert!(pool.take_first::<AppX>().is_err());
}
