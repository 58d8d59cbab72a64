use std::{
    sync::{
        mpsc::{sync_channel, RecvTimeoutError},
        Arc, Mutex,
    },
    thread,
    time::Duration,
};

use rxo::subscribe::Subscriber;
use rxo::{Observable, Observer, PipelineError, Subscribeable};

#[test]
fn just_emits_in_order_then_completes() {
    let collected = Arc::new(Mutex::new(Vec::new()));
    let collected_c = Arc::clone(&collected);
    let events_after_complete = Arc::new(Mutex::new(0));
    let events_after_complete_c = Arc::clone(&events_after_complete);
    let completed = Arc::new(Mutex::new(false));
    let completed_n = Arc::clone(&completed);
    let completed_c = Arc::clone(&completed);

    let observer = Subscriber::new(
        move |v: &str| {
            if *completed_n.lock().unwrap() {
                *events_after_complete_c.lock().unwrap() += 1;
            }
            collected_c.lock().unwrap().push(v.to_string());
        },
        |e| panic!("unexpected error: {}", e),
        move || *completed_c.lock().unwrap() = true,
    );

    Observable::just(["hello", "world"]).subscribe(observer);

    assert_eq!(*collected.lock().unwrap(), vec!["hello", "world"]);
    assert!(*completed.lock().unwrap(), "observable did not complete");
    assert_eq!(
        *events_after_complete.lock().unwrap(),
        0,
        "next delivered after complete"
    );
}

#[test]
fn observables_are_cold() {
    let production_runs = Arc::new(Mutex::new(0));
    let production_runs_c = Arc::clone(&production_runs);

    let observable = Observable::create(move |emitter| {
        *production_runs_c.lock().unwrap() += 1;
        emitter.next(1);
        emitter.next(2);
        emitter.complete();
    });

    for _ in 0..3 {
        let collected = Arc::new(Mutex::new(Vec::new()));
        let collected_c = Arc::clone(&collected);

        observable.subscribe(Subscriber::on_next(move |v| {
            collected_c.lock().unwrap().push(v);
        }));

        assert_eq!(*collected.lock().unwrap(), vec![1, 2]);
    }

    assert_eq!(
        *production_runs.lock().unwrap(),
        3,
        "each subscription should re-run production"
    );
}

#[test]
fn error_before_complete_suppresses_complete() {
    let errors = Arc::new(Mutex::new(Vec::new()));
    let errors_c = Arc::clone(&errors);
    let completions = Arc::new(Mutex::new(0));
    let completions_c = Arc::clone(&completions);

    let observable = Observable::<i32>::create(|emitter| {
        emitter.error(Arc::new(std::fmt::Error));
        emitter.complete();
        emitter.next(5);
    });

    observable.subscribe(Subscriber::new(
        |_| panic!("no items should be emitted"),
        move |e| errors_c.lock().unwrap().push(e.to_string()),
        move || *completions_c.lock().unwrap() += 1,
    ));

    assert_eq!(errors.lock().unwrap().len(), 1);
    assert_eq!(
        *completions.lock().unwrap(),
        0,
        "complete delivered after error"
    );
}

#[test]
fn producer_panic_is_delivered_as_error() {
    let errors = Arc::new(Mutex::new(Vec::new()));
    let errors_c = Arc::clone(&errors);
    let completions = Arc::new(Mutex::new(0));
    let completions_c = Arc::clone(&completions);

    let observable = Observable::<i32>::create(|emitter| {
        emitter.next(1);
        panic!("producer failure");
    });

    let collected = Arc::new(Mutex::new(Vec::new()));
    let collected_c = Arc::clone(&collected);

    observable.subscribe(Subscriber::new(
        move |v| collected_c.lock().unwrap().push(v),
        move |e| errors_c.lock().unwrap().push(e.to_string()),
        move || *completions_c.lock().unwrap() += 1,
    ));

    assert_eq!(*collected.lock().unwrap(), vec![1]);
    assert_eq!(*completions.lock().unwrap(), 0);

    let errors = errors.lock().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(
        errors[0].contains("producer failure"),
        "panic message should be preserved, got: {}",
        errors[0]
    );
}

#[test]
fn producer_panic_error_is_pipeline_error() {
    let stage = Arc::new(Mutex::new(None));
    let stage_c = Arc::clone(&stage);

    let mut observer = Subscriber::on_next(|_: i32| {});
    observer.on_error(move |e| {
        let stage = e
            .downcast_ref::<PipelineError>()
            .map(PipelineError::stage)
            .map(str::to_string);
        *stage_c.lock().unwrap() = stage;
    });

    Observable::<i32>::create(|_| panic!("boom")).subscribe(observer);

    assert_eq!(stage.lock().unwrap().as_deref(), Some("create"));
}

#[test]
fn disposable_flag_is_idempotent() {
    let disposable = Observable::just([5]).subscribe(Subscriber::on_next(|_| {}));

    assert!(!disposable.is_disposed());
    disposable.dispose();
    assert!(disposable.is_disposed());
    disposable.dispose();
    assert!(disposable.is_disposed());
}

#[test]
fn disposal_stops_async_production() {
    let (tx, rx) = sync_channel(1024);
    // Keep one sender alive so a finished producer closes nothing early.
    let _tx_keep = tx.clone();

    let observable = Observable::new(move |mut subscriber: Subscriber<u64>| {
        let disposable = subscriber.disposable();

        thread::spawn(move || {
            let mut i = 0;
            while !disposable.is_disposed() {
                subscriber.next(i);
                i += 1;
                thread::sleep(Duration::from_millis(1));
            }
            subscriber.complete();
        });
    });

    let disposable = observable.subscribe(Subscriber::on_next(move |v| {
        let _ = tx.send(v);
    }));

    // Let the producer emit a few values before cancelling.
    for _ in 0..3 {
        rx.recv_timeout(Duration::from_secs(1))
            .expect("producer did not emit");
    }
    disposable.dispose();

    // Drain anything that was in flight; afterwards the stream must go quiet.
    while rx.recv_timeout(Duration::from_millis(100)).is_ok() {}

    assert_eq!(
        rx.recv_timeout(Duration::from_millis(200)),
        Err(RecvTimeoutError::Timeout),
        "producer kept emitting after disposal"
    );
}
