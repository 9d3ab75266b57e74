//! Property tests for the in-memory todo store.

#![allow(clippy::unwrap_used)] // Tests can unwrap
#![allow(clippy::expect_used)] // Tests can expect

use hypertodo_core::{Todo, TodoFilter, TodoStore, TodoUpdate};
use hypertodo_testing::helpers::test_store;
use hypertodo_testing::properties::{StoreOp, blank_text, store_ops, todo_filter, todo_text};
use proptest::prelude::*;

/// Apply `ops` and return every todo ever created, in creation order.
fn apply(store: &impl TodoStore, ops: Vec<StoreOp>) -> Vec<Todo> {
    let mut created: Vec<Todo> = Vec::new();
    for op in ops {
        match op {
            StoreOp::Create(text) => {
                if let Ok(todo) = store.create(&text) {
                    created.push(todo);
                }
            }
            StoreOp::SetDone(i, done) if !created.is_empty() => {
                let id = created[i % created.len()].id;
                let _ = store.update(id, TodoUpdate::done(done));
            }
            StoreOp::Delete(i) if !created.is_empty() => {
                let id = created[i % created.len()].id;
                let _ = store.delete(id);
            }
            StoreOp::DeleteMany(indices) if !created.is_empty() => {
                let ids: Vec<_> = indices
                    .iter()
                    .map(|i| created[i % created.len()].id)
                    .collect();
                let _ = store.delete_many(&ids);
            }
            _ => {}
        }
    }
    created
}

proptest! {
    #[test]
    fn find_never_returns_deleted(ops in store_ops(), filter in todo_filter()) {
        let store = test_store();
        apply(&store, ops);

        let found = store.find(&filter).unwrap();
        prop_assert!(found.iter().all(|t| !t.deleted));
        prop_assert_eq!(found.len(), store.count(&filter).unwrap());
    }

    #[test]
    fn find_done_is_exact_subset_in_order(ops in store_ops()) {
        let store = test_store();
        let created = apply(&store, ops);

        let current: Vec<Todo> = created
            .iter()
            .filter_map(|t| store.get_by_id(t.id).ok())
            .collect();
        let expected: Vec<Todo> = current.iter().filter(|t| t.done).cloned().collect();

        prop_assert_eq!(store.find(&TodoFilter::done(true)).unwrap(), expected);
    }

    #[test]
    fn ids_strictly_increase(ops in store_ops()) {
        let store = test_store();
        let created = apply(&store, ops);
        prop_assert!(created.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn done_at_set_exactly_when_done(ops in store_ops()) {
        let store = test_store();
        apply(&store, ops);

        for todo in store.find(&TodoFilter::all()).unwrap() {
            prop_assert_eq!(todo.done, todo.done_at.is_some());
            if let Some(done_at) = todo.done_at {
                prop_assert!(done_at >= todo.created_at);
            }
        }
    }

    #[test]
    fn create_trims_text(text in todo_text()) {
        let store = test_store();
        let todo = store.create(&text).unwrap();
        prop_assert_eq!(todo.text.as_str(), text.trim());
        prop_assert!(!todo.done);
    }

    #[test]
    fn blank_text_is_rejected_without_side_effects(text in blank_text()) {
        let store = test_store();
        prop_assert!(store.create(&text).is_err());
        prop_assert_eq!(store.stored_len().unwrap(), 0);
    }
}
