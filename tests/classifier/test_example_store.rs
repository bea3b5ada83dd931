// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Example store readiness and refit behavior

use fabstir_vision_lab::classifier::ExampleStore;

#[test]
fn test_not_ready_until_two_classes() {
    let mut store = ExampleStore::default();
    assert!(!store.is_ready());

    store.add_example(vec![1.0, 1.0], "cat").unwrap();
    store.add_example(vec![1.1, 0.9], "cat").unwrap();
    assert!(!store.is_ready());
    assert_eq!(store.labels(), vec!["cat"]);

    store.add_example(vec![9.0, 9.0], "dog").unwrap();
    assert!(store.is_ready());
    assert_eq!(store.labels(), vec!["cat", "dog"]);
}

#[test]
fn test_each_label_refits_over_everything() {
    let mut store = ExampleStore::default();
    store.add_example(vec![0.0], "low").unwrap();
    store.add_example(vec![10.0], "high").unwrap();
    let before = store.classifier().unwrap();
    assert_eq!(before.len(), 2);

    store.add_example(vec![9.0], "high").unwrap();
    let after = store.classifier().unwrap();
    assert_eq!(after.len(), 3);
    assert_eq!(after.predict(&[8.0]).unwrap(), "high");

    // Earlier snapshots are unaffected by the refit
    assert_eq!(before.len(), 2);
}

#[test]
fn test_examples_keep_insertion_order() {
    let mut store = ExampleStore::new(1);
    store.add_example(vec![3.0], "c").unwrap();
    store.add_example(vec![1.0], "a").unwrap();
    store.add_example(vec![2.0], "b").unwrap();

    let labels: Vec<&str> = store.examples().iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, vec!["c", "a", "b"]);
    assert_eq!(store.classifier().unwrap().predict(&[2.1]).unwrap(), "b");
}
