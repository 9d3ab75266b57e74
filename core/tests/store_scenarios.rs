//! Behavioural scenarios for the todo store.

#![allow(clippy::unwrap_used)] // Tests can unwrap
#![allow(clippy::expect_used)] // Tests can expect

use hypertodo_core::{
    InMemoryTodoStore, SequentialIdGenerator, TodoError, TodoFilter, TodoId, TodoStore, TodoUpdate,
};
use hypertodo_testing::helpers::{seeded_store, texts};
use hypertodo_testing::{StoreTest, test_clock};
use std::sync::Arc;
use std::thread;

#[test]
fn filter_follows_completion() {
    StoreTest::new()
        .given_todos(["A", "B", "C"])
        .then_texts(TodoFilter::done(false), ["A", "B", "C"])
        .run();

    StoreTest::new()
        .given_todos(["A", "B", "C"])
        .when(|store, todos| store.update(todos[1].id, TodoUpdate::done(true)).map(|_| ()))
        .then_result(|result| assert!(result.is_ok()))
        .then_texts(TodoFilter::done(false), ["A", "C"])
        .then_texts(TodoFilter::done(true), ["B"])
        .then_texts(TodoFilter::all(), ["A", "B", "C"])
        .run();
}

#[test]
fn created_todo_is_trimmed_and_stamped() {
    let clock = test_clock();
    let store = InMemoryTodoStore::with_environment(
        Arc::new(clock.clone()),
        Arc::new(SequentialIdGenerator::starting_at(10)),
    );

    let todo = store.create("  Buy milk  ").unwrap();
    assert_eq!(todo.text, "Buy milk");
    assert_eq!(todo.id, TodoId::new(10));
    assert!(!todo.done);
    assert_eq!(todo.created_at, hypertodo_testing::mocks::epoch());
}

#[test]
fn exhausted_ids_reject_creation_without_reusing_ids() {
    let store = InMemoryTodoStore::with_environment(
        Arc::new(test_clock()),
        Arc::new(SequentialIdGenerator::starting_at(u64::MAX - 1)),
    );

    let last = store.create("last one").unwrap();
    assert_eq!(last.id, TodoId::new(u64::MAX - 1));
    assert_eq!(store.create("one too many"), Err(TodoError::IdsExhausted));
    assert_eq!(texts(&store.find(&TodoFilter::all()).unwrap()), vec!["last one"]);
}

#[test]
fn completing_after_creation_orders_timestamps() {
    StoreTest::new()
        .given_todos(["task"])
        .when(|store, todos| {
            let done = store.update(todos[0].id, TodoUpdate::done(true))?;
            assert!(done.done_at.expect("stamped") > done.created_at);

            let undone = store.update(todos[0].id, TodoUpdate::done(false))?;
            assert_eq!(undone.done_at, None);
            Ok(())
        })
        .then_result(|result| assert!(result.is_ok()))
        .run();
}

#[test]
fn deleting_twice_is_not_found() {
    StoreTest::new()
        .given_todos(["A", "B"])
        .when(|store, todos| {
            store.delete(todos[0].id)?;
            store.delete(todos[0].id)
        })
        .then_result(|result| assert_eq!(result, &Err(TodoError::NotFound(TodoId::new(1)))))
        .then_texts(TodoFilter::all(), ["B"])
        .run();
}

#[test]
fn delete_many_counts_confirmed_matches() {
    StoreTest::new()
        .given_todos(["A", "B"])
        .given_done("C")
        .when(|store, todos| store.delete_many(&[todos[0].id, todos[2].id, TodoId::new(77)]))
        .then_result(|result| {
            assert_eq!(
                result,
                &Err(TodoError::PartialFailure {
                    deleted: 2,
                    requested: 3
                })
            );
        })
        .then_texts(TodoFilter::all(), ["B"])
        .run();
}

#[test]
fn concurrent_creates_get_distinct_ids() {
    let store = Arc::new(seeded_store(Vec::<&str>::new()));
    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for n in 0..50 {
                    store.create(&format!("worker {worker} item {n}")).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let todos = store.find(&TodoFilter::all()).unwrap();
    assert_eq!(todos.len(), 400);
    let mut ids: Vec<_> = todos.iter().map(|t| t.id).collect();
    ids.dedup();
    assert_eq!(ids.len(), 400);
    assert!(todos.windows(2).all(|w| w[0].id < w[1].id));
}

#[test]
fn concurrent_updates_and_deletes_stay_consistent() {
    let store = Arc::new(seeded_store((0..100).map(|n| format!("todo {n}"))));
    let ids: Vec<_> = store
        .find(&TodoFilter::all())
        .unwrap()
        .iter()
        .map(|t| t.id)
        .collect();

    let toggler = {
        let store = Arc::clone(&store);
        let ids = ids.clone();
        thread::spawn(move || {
            for id in ids {
                let _ = store.update(id, TodoUpdate::done(true));
            }
        })
    };
    let deleter = {
        let store = Arc::clone(&store);
        let ids = ids.clone();
        thread::spawn(move || {
            for id in ids.iter().step_by(2) {
                store.delete(*id).unwrap();
            }
        })
    };
    toggler.join().unwrap();
    deleter.join().unwrap();

    let remaining = store.find(&TodoFilter::all()).unwrap();
    assert_eq!(remaining.len(), 50);
    assert!(remaining.iter().all(|t| t.done && !t.deleted));
    assert_eq!(store.stored_len().unwrap(), 100);
    assert_eq!(texts(&remaining)[0], "todo 1");
}
