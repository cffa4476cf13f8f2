//! Cross-subsystem flow: ticks fire events, events publish messages,
//! message handlers settle promises, promise chains schedule more events.

use std::cell::RefCell;
use std::rc::Rc;

use pulse_bus::{Message, Shouter};
use pulse_loop::{EventLoop, Fault, Promise};
use pulse_promise::Chain;

struct SampleReady;
impl Message for SampleReady {
    type Payload = (u64, i32);
}

#[test]
fn tick_to_bus_to_promise_to_new_event() {
    let event_loop = EventLoop::new();
    let bus = Rc::new(Shouter::new());
    let log = Rc::new(RefCell::new(Vec::new()));

    // A promise settled by the first bus delivery.
    let first_sample = Promise::<i32>::pending();

    // Bus handler: resolve the promise with the first sample.
    {
        let first_sample = first_sample.clone();
        let log = log.clone();
        bus.listen::<SampleReady>(move |&(tick, value)| {
            log.borrow_mut().push(format!("bus saw {value} at {tick}"));
            if first_sample.is_pending() {
                first_sample.resolve(value).map_err(Fault::wrap)?;
            }
            Ok(())
        });
    }

    // Promise chain: once the first sample arrives, schedule a follow-up
    // event two ticks later.
    {
        let event_loop = event_loop.clone();
        let log = log.clone();
        let _chained = first_sample
            .then(move |value| {
                let log = log.clone();
                event_loop.schedule(20, move |_| {
                    log.borrow_mut().push(format!("follow-up for {value}"));
                    Ok(())
                });
                Chain::Value(())
            })
            .expect("then");
    }

    // Recurring sampler: publish a message on every interval.
    {
        let bus = bus.clone();
        let event_loop_for_handler = event_loop.clone();
        let counter = Rc::new(std::cell::Cell::new(0));
        event_loop.schedule_recurring(10, move |_| {
            counter.set(counter.get() + 1);
            bus.shout::<SampleReady>(&(event_loop_for_handler.now(), counter.get()))
                .map_err(Fault::wrap)
        });
    }

    event_loop.process(10).expect("first interval");
    event_loop.process(20).expect("second interval");
    event_loop.process(30).expect("third interval");

    // The follow-up was scheduled mid-tick with the pre-tick counter, so
    // its slot (0 + 20) comes up in the same tick as the sampler's second
    // run; it was inserted first and fires first.
    assert_eq!(
        log.borrow().as_slice(),
        [
            "bus saw 1 at 0",
            "follow-up for 1",
            "bus saw 2 at 10",
            "bus saw 3 at 20",
        ],
    );
}
