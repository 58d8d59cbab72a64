use std::sync::{Arc, Mutex};

use rxo::subscribe::Subscriber;
use rxo::{Observable, Observer, Subscribeable};

struct Collected {
    nexts: Vec<String>,
    errors: Vec<String>,
    completions: u32,
}

fn collecting_subscriber<T: ToString + 'static>(
    collected: &Arc<Mutex<Collected>>,
) -> Subscriber<T> {
    let nexts = Arc::clone(collected);
    let errors = Arc::clone(collected);
    let completions = Arc::clone(collected);

    Subscriber::new(
        move |v: T| nexts.lock().unwrap().nexts.push(v.to_string()),
        move |e| errors.lock().unwrap().errors.push(e.to_string()),
        move || completions.lock().unwrap().completions += 1,
    )
}

fn new_collected() -> Arc<Mutex<Collected>> {
    Arc::new(Mutex::new(Collected {
        nexts: Vec::new(),
        errors: Vec::new(),
        completions: 0,
    }))
}

#[test]
fn map_preserves_order_and_count() {
    let collected = new_collected();

    Observable::just(["x", "y", "z"])
        .map(|v| format!("mapped_{}", v))
        .subscribe(collecting_subscriber(&collected));

    let collected = collected.lock().unwrap();
    assert_eq!(collected.nexts, vec!["mapped_x", "mapped_y", "mapped_z"]);
    assert!(collected.errors.is_empty());
    assert_eq!(collected.completions, 1);
}

#[test]
fn map_panic_becomes_error_and_stops_stream() {
    let collected = new_collected();

    Observable::just([1, 2, 3])
        .map(|v| {
            assert!(v != 2, "unmappable value");
            v * 10
        })
        .subscribe(collecting_subscriber(&collected));

    let collected = collected.lock().unwrap();
    // Value 3 still flows into the operator, but the terminal-state guard
    // discards its mapped result after the error.
    assert_eq!(collected.nexts, vec!["10"]);
    assert_eq!(collected.errors.len(), 1);
    assert!(
        collected.errors[0].contains("map callback panicked"),
        "unexpected error text: {}",
        collected.errors[0]
    );
    assert_eq!(collected.completions, 0, "complete delivered after error");
}

#[test]
fn filter_forwards_matching_items_only() {
    let collected = new_collected();

    Observable::just(["cat", "elephant", "lion"])
        .filter(|item| item.len() > 4)
        .subscribe(collecting_subscriber(&collected));

    let collected = collected.lock().unwrap();
    assert_eq!(collected.nexts, vec!["elephant"]);
    assert!(collected.errors.is_empty());
    assert_eq!(collected.completions, 1);
}

#[test]
fn filter_panic_becomes_error() {
    let collected = new_collected();

    Observable::just([1, 2, 3])
        .filter(|v| {
            assert!(*v < 2, "predicate blew up");
            true
        })
        .subscribe(collecting_subscriber(&collected));

    let collected = collected.lock().unwrap();
    assert_eq!(collected.nexts, vec!["1"]);
    assert_eq!(collected.errors.len(), 1);
    assert!(collected.errors[0].contains("filter callback panicked"));
    assert_eq!(collected.completions, 0);
}

#[test]
fn operators_pass_upstream_errors_through() {
    let collected = new_collected();

    Observable::create(|emitter| {
        emitter.next(7);
        emitter.error(Arc::new(std::fmt::Error));
    })
    .filter(|_| true)
    .map(|v| v + 1)
    .subscribe(collecting_subscriber(&collected));

    let collected = collected.lock().unwrap();
    assert_eq!(collected.nexts, vec!["8"]);
    assert_eq!(collected.errors.len(), 1);
    assert_eq!(collected.completions, 0);
}

#[test]
fn chained_operators_compose() {
    let collected = new_collected();

    Observable::just(0..=10)
        .filter(|v| v % 2 != 0)
        .map(|v| v * 100)
        .subscribe(collecting_subscriber(&collected));

    let collected = collected.lock().unwrap();
    assert_eq!(collected.nexts, vec!["100", "300", "500", "700", "900"]);
    assert_eq!(collected.completions, 1);
}
