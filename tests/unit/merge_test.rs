#[path = "../fixtures/mod.rs"]
mod fixtures;

use extendext::{extendext, merge, ArrayMode, MergeOptions, Structure};
use fixtures::structure;
use proptest::prelude::*;
use rstest::rstest;
use serde_json::{json, Value};
use std::slice;

/// Assert that no container reachable from `source` is shared with `result`
fn assert_no_shared_containers(result: &Structure, source: &Structure) {
    for (key, value) in source.entries() {
        if !value.is_container() {
            continue;
        }
        let copied = result.get(&key).expect("merged result should contain every source key");
        assert!(!copied.identical(&value), "container at \"{key}\" is shared with the source");
        assert_no_shared_containers(&copied, &value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_shallow_merge_shares_nested_containers() {
        let source = structure(json!({"nested": {"x": 1}, "list": [1, 2], "flag": true}));

        let result = merge(MergeOptions::shallow(), Structure::mapping(), slice::from_ref(&source));

        assert_eq!(result, source);
        for key in ["nested", "list"] {
            let merged = result.get(key).unwrap();
            let original = source.get(key).unwrap();
            assert!(merged.identical(&original), "\"{key}\" should be shared");
        }
    }

    #[test]
    fn test_deep_merge_copies_nested_containers() {
        let source = structure(json!({
            "nested": {"inner": {"list": [{"x": 1}]}},
            "list": [[1], [2]]
        }));

        let result = merge(MergeOptions::deep(), Structure::mapping(), slice::from_ref(&source));

        assert_eq!(result, source);
        assert_no_shared_containers(&result, &source);
    }

    #[test]
    fn test_deep_merge_result_is_independent_of_source() {
        let source = structure(json!({"nested": {"x": 1}}));
        let result = merge(MergeOptions::deep(), Structure::mapping(), slice::from_ref(&source));

        result.get("nested").unwrap().set("x", Structure::from(2));

        assert_eq!(source.to_json(), json!({"nested": {"x": 1}}));
    }

    #[rstest]
    #[case::concat("concat", json!({"a": [1, 2, 2, 3]}))]
    #[case::replace("replace", json!({"a": [2, 3]}))]
    #[case::extend("extend", json!({"a": [1, 2, 3]}))]
    #[case::default("default", json!({"a": [2, 3]}))]
    fn test_array_modes(#[case] mode: &str, #[case] expected: Value) {
        let result = extendext([
            Structure::Bool(true),
            Structure::from(mode),
            structure(json!({"a": [1, 2]})),
            structure(json!({"a": [2, 3]})),
        ]);

        assert_eq!(result.to_json(), expected);
    }

    #[test]
    fn test_extend_merges_object_elements() {
        let result = merge(
            MergeOptions::deep().with_array_mode(ArrayMode::Extend),
            structure(json!({"a": [{"x": 1}]})),
            &[structure(json!({"a": [{"y": 2}]}))],
        );

        assert_eq!(result.to_json(), json!({"a": [{"x": 1, "y": 2}]}));
    }

    #[test]
    fn test_extend_appends_new_objects_past_the_end() {
        let result = merge(
            MergeOptions::deep().with_array_mode(ArrayMode::Extend),
            structure(json!({"a": [{"x": 1}]})),
            &[structure(json!({"a": [{"x": 2}, {"z": 3}]}))],
        );

        assert_eq!(result.to_json(), json!({"a": [{"x": 2}, {"z": 3}]}));
    }

    #[test]
    fn test_extend_deduplicates_null_as_scalar() {
        let result = merge(
            MergeOptions::deep().with_array_mode(ArrayMode::Extend),
            structure(json!({"a": [null]})),
            &[structure(json!({"a": [null, null, 1]}))],
        );

        assert_eq!(result.to_json(), json!({"a": [null, 1]}));
    }

    #[test]
    fn test_extend_keeps_null_element_unconverted() {
        let result = merge(
            MergeOptions::deep().with_array_mode(ArrayMode::Extend),
            Structure::sequence(),
            &[structure(json!([null]))],
        );

        assert_eq!(result.get_index(0), Some(Structure::Null));
    }

    #[test]
    fn test_concat_deep_copies_elements() {
        let element = structure(json!({"x": 1}));
        let source = Structure::from_items([element.clone()]);

        let deep = merge(
            MergeOptions::deep().with_array_mode(ArrayMode::Concat),
            Structure::sequence(),
            slice::from_ref(&source),
        );
        let shallow = merge(
            MergeOptions::shallow().with_array_mode(ArrayMode::Concat),
            Structure::sequence(),
            slice::from_ref(&source),
        );

        assert!(!deep.get_index(0).unwrap().identical(&element));
        assert!(shallow.get_index(0).unwrap().identical(&element));
    }

    #[test]
    fn test_sources_are_not_mutated() {
        let source = structure(json!({"a": [2, 3], "b": {"c": [1]}}));
        let snapshot = source.deep_clone();

        for mode in ArrayMode::ALL {
            merge(
                MergeOptions::deep().with_array_mode(mode),
                structure(json!({"a": [1, 2], "b": {"c": [0]}})),
                slice::from_ref(&source),
            );
        }

        assert_eq!(source, snapshot);
    }

    #[test]
    fn test_self_merge_returns_same_reference() {
        let target = structure(json!({"a": 1}));

        let result = extendext([Structure::Bool(true), target.clone()]);

        assert!(result.identical(&target));
        assert_eq!(result.to_json(), json!({"a": 1}));
    }

    #[test]
    fn test_undefined_never_overwrites() {
        let result = extendext([
            Structure::Bool(false),
            structure(json!({"a": 1})),
            Structure::from_entries([("a", Structure::Undefined)]),
        ]);

        assert_eq!(result.to_json(), json!({"a": 1}));
    }

    #[test]
    fn test_undefined_is_not_added_as_new_key() {
        let result = merge(
            MergeOptions::deep(),
            Structure::mapping(),
            &[Structure::from_entries([("ghost", Structure::Undefined)])],
        );

        assert!(result.get("ghost").is_none());
    }

    #[test]
    fn test_target_as_its_own_source_is_noop() {
        let target = structure(json!({"a": {"b": [1, 2]}, "c": "d"}));

        let result = merge(MergeOptions::deep(), target.clone(), slice::from_ref(&target));

        assert!(result.identical(&target));
        assert_eq!(result.to_json(), json!({"a": {"b": [1, 2]}, "c": "d"}));
    }

    #[test]
    fn test_null_value_overwrites() {
        let result = merge(
            MergeOptions::deep(),
            structure(json!({"a": {"b": 1}})),
            &[structure(json!({"a": null}))],
        );

        assert_eq!(result.to_json(), json!({"a": null}));
    }

    #[test]
    fn test_layered_configuration() {
        let defaults = structure(json!({
            "server": {"host": "localhost", "port": 8080, "tags": ["base"]},
            "debug": false
        }));
        let environment = structure(json!({"server": {"port": 9090, "tags": ["prod"]}}));
        let local = structure(json!({"debug": true, "server": {"tags": ["local", "base"]}}));

        let result = merge(
            MergeOptions::deep().with_array_mode(ArrayMode::Extend),
            Structure::mapping(),
            &[defaults, environment, local],
        );

        assert_eq!(
            result.to_json(),
            json!({
                "server": {"host": "localhost", "port": 9090, "tags": ["base", "prod", "local"]},
                "debug": true
            })
        );
    }

    #[test]
    fn test_positional_mode_without_deep_flag() {
        let shared = structure(json!([1]));
        let result = extendext([
            Structure::from("replace"),
            Structure::mapping(),
            Structure::from_entries([("a", shared.clone())]),
        ]);

        // Shallow: the sequence is assigned as is, array mode never applies
        assert!(result.get("a").unwrap().identical(&shared));
    }

    #[test]
    fn test_positional_scalar_target_is_coerced() {
        let result = extendext([Structure::Bool(true), Structure::from(3), structure(json!({"a": 1}))]);

        assert_eq!(result.to_json(), json!({"a": 1}));
    }
}

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|n| json!(n)),
        "[a-z]{0,6}".prop_map(Value::String),
    ];

    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0..4)
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}

fn arb_object() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-z]{1,4}", arb_json(), 0..5)
        .prop_map(|entries| Value::Object(entries.into_iter().collect()))
}

proptest! {
    #[test]
    fn prop_deep_merge_into_empty_copies(source in arb_object()) {
        let source = structure(source);

        let result = merge(MergeOptions::deep(), Structure::mapping(), slice::from_ref(&source));

        prop_assert_eq!(result.to_json(), source.to_json());
        assert_no_shared_containers(&result, &source);
    }

    #[test]
    fn prop_shallow_merge_into_empty_shares(source in arb_object()) {
        let source = structure(source);

        let result = merge(MergeOptions::shallow(), Structure::mapping(), slice::from_ref(&source));

        for (key, value) in source.entries() {
            let merged = result.get(&key).unwrap();
            prop_assert!(merged.identical(&value));
        }
    }

    #[test]
    fn prop_replace_yields_source_elements(
        target in prop::collection::vec(arb_json(), 0..5),
        source in prop::collection::vec(arb_json(), 0..5),
    ) {
        let expected = Value::Array(source.clone());

        let result = merge(
            MergeOptions::deep().with_array_mode(ArrayMode::Replace),
            structure(Value::Array(target)),
            &[structure(Value::Array(source))],
        );

        prop_assert_eq!(result.to_json(), expected);
    }

    #[test]
    fn prop_concat_length_adds_up(
        target in prop::collection::vec(arb_json(), 0..5),
        source in prop::collection::vec(arb_json(), 0..5),
    ) {
        let expected_len = target.len() + source.len();

        let result = merge(
            MergeOptions::shallow().with_array_mode(ArrayMode::Concat),
            structure(Value::Array(target)),
            &[structure(Value::Array(source))],
        );

        prop_assert_eq!(result.len(), expected_len);
    }
}
