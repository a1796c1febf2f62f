//! Property tests over generated trees.

use proptest::prelude::*;
use treetools::{Key, Map, Path, PutMode, TreeError, Value, branches, get, get_or, leaves, put};

fn key() -> impl Strategy<Value = Key> {
    prop_oneof![
        (0i64..5).prop_map(Key::Int),
        "[a-c]".prop_map(Key::Str),
    ]
}

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (-1.0e6..1.0e6f64).prop_map(Value::Float),
        "[a-z]{0,4}".prop_map(Value::String),
    ]
}

fn containers(inner: BoxedStrategy<Value>) -> BoxedStrategy<Value> {
    prop_oneof![
        prop::collection::vec(inner.clone(), 0..4).prop_map(Value::List),
        prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Tuple),
        prop::collection::vec((key(), inner), 0..4)
            .prop_map(|entries| Value::Map(entries.into_iter().collect::<Map>())),
    ]
    .boxed()
}

/// A tree whose root is always a container.
fn tree() -> impl Strategy<Value = Value> {
    let nested = leaf().prop_recursive(4, 48, 4, |inner| containers(inner.boxed()));
    containers(nested.boxed())
}

fn path() -> impl Strategy<Value = Path> {
    prop::collection::vec(key(), 1..5).prop_map(Path::from)
}

/// Whether `err` is one a forced write may legitimately return: a path
/// through an existing leaf, or a string key on a list or tuple.
fn unforceable_step(t: &Value, err: &TreeError) -> bool {
    match err {
        TreeError::UnsupportedShape { .. } => true,
        TreeError::KeyNotFound { path, depth } => {
            let parent = get(t, &path[..*depth]);
            let on_sequence = parent.is_ok_and(|node| node.as_slice().is_some());
            on_sequence && path[*depth].as_index().is_none()
        }
        _ => false,
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn every_branch_reaches_its_leaf(t in tree()) {
        treetools_testhelpers::setup();

        let found = leaves(&t).unwrap();
        let paths = branches(&t).unwrap();
        prop_assert_eq!(found.len(), paths.len());
        for (leaf, path) in found.iter().zip(&paths) {
            prop_assert_eq!(get(&t, path), Ok(*leaf));
        }
    }

    #[test]
    fn transform_copy_maps_leaves_without_touching_input(t in tree()) {
        treetools_testhelpers::setup();

        let before = t.clone();
        let stringify = |v: Value| Value::String(format!("<{v}>"));

        let copy = treetools::transform_copy(&t, stringify).unwrap();
        prop_assert_eq!(&t, &before);

        let expected: Vec<Value> = leaves(&t).unwrap().into_iter().cloned().map(stringify).collect();
        let got: Vec<Value> = leaves(&copy).unwrap().into_iter().cloned().collect();
        prop_assert_eq!(got, expected);
        prop_assert_eq!(branches(&copy).unwrap(), branches(&t).unwrap());
    }

    #[test]
    fn forced_put_then_get(mut t in tree(), p in path(), v in leaf()) {
        treetools_testhelpers::setup();

        match put(&mut t, &p, v.clone(), PutMode::Force) {
            Ok(()) => prop_assert_eq!(get(&t, &p), Ok(&v)),
            Err(err) => {
                let unforceable = unforceable_step(&t, &err);
                prop_assert!(unforceable, "unexpected error under Force: {}", err);
            }
        }
    }

    #[test]
    fn get_or_falls_back_exactly_on_lookup_failure(t in tree(), p in path()) {
        treetools_testhelpers::setup();

        let default = Value::from("default");
        match get(&t, &p) {
            Ok(found) => prop_assert!(core::ptr::eq(get_or(&t, &p, &default), found)),
            Err(err) => {
                prop_assert!(err.is_lookup_failure());
                prop_assert!(core::ptr::eq(get_or(&t, &p, &default), &default));
            }
        }
    }

    #[test]
    fn strict_put_is_all_or_nothing(mut t in tree(), p in path(), v in leaf()) {
        treetools_testhelpers::setup();

        let before = t.clone();
        match put(&mut t, &p, v.clone(), PutMode::Strict) {
            Ok(()) => prop_assert_eq!(get(&t, &p), Ok(&v)),
            Err(_) => prop_assert_eq!(&t, &before),
        }
    }
}
