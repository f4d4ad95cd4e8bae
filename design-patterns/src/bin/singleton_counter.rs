//! Counter singleton walkthrough.
//!
//! Run with `RUST_LOG=debug` to see the instance being constructed and torn
//! down.

use design_patterns::creational::Counter;
use log::info;

fn main() {
    env_logger::init();

    let _scope = Counter::scope();

    println!("the counter value is {}", Counter::instance().value()); // 0
    Counter::instance().increment();
    Counter::instance().increment();
    println!("the counter value is {}", Counter::instance().value()); // 2
    Counter::instance().decrement();
    println!("the counter value is {}", Counter::instance().value()); // 1

    let handles: Vec<_> = (0..4).map(|_| Counter::instance()).collect();
    info!("holding {} handle(s) to the counter", handles.len());
    for counter in &handles {
        println!("the counter value is {}", counter.value()); // 1
    }
}
