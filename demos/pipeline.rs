//! A full pipeline: production relocated onto its own thread with
//! `subscribe_on`, items filtered and mapped in between, and delivery
//! relocated onto a single worker with `observe_on`. Each step prints the
//! thread it runs on.
//!
//! To run this demo, execute `cargo run --example pipeline`.

use std::{thread, time::Duration};

use rxo::subscribe::Subscriber;
use rxo::{IoThreadScheduler, Observable, Observer, SingleThreadScheduler, Subscribeable};

fn main() {
    println!("Program started on thread: {:?}", thread::current().id());

    let observer = Subscriber::new(
        |v| println!("Received item: {} | Thread: {:?}", v, thread::current().id()),
        |e| eprintln!("Error occurred: {} | Thread: {:?}", e, thread::current().id()),
        || println!("Processing completed! | Thread: {:?}", thread::current().id()),
    );

    Observable::create(|emitter| {
        println!("Emitter started on thread: {:?}", thread::current().id());
        for fruit in ["Orange", "Strawberry", "Fig", "Watermelon"] {
            if emitter.is_disposed() {
                return;
            }
            emitter.next(fruit);
        }
        println!(
            "Emitter finished emitting on thread: {:?}",
            thread::current().id()
        );
        emitter.complete();
    })
    .subscribe_on(IoThreadScheduler::new())
    .filter(|fruit| {
        let pass = fruit.len() > 5;
        println!(
            "Filtering item: {} | Pass: {} | Thread: {:?}",
            fruit,
            pass,
            thread::current().id()
        );
        pass
    })
    .map(|fruit| {
        let mapped = fruit.to_uppercase();
        println!(
            "Mapping item: {} to {} | Thread: {:?}",
            fruit,
            mapped,
            thread::current().id()
        );
        mapped
    })
    .observe_on(SingleThreadScheduler::new())
    .subscribe(observer);

    println!("Do something while the pipeline is running.");

    // Production and delivery run on scheduler threads; give them time to
    // finish before the process exits.
    thread::sleep(Duration::from_millis(500));
    println!("`main` function done");
}
