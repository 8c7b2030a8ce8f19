//! Integration tests for the event bus.

use std::cell::RefCell;
use std::rc::Rc;

use junction_core::{EventBus, Receive};

#[derive(Clone, Debug, PartialEq)]
struct SomeEvent {
    count: i32,
}

#[derive(Clone, Debug, PartialEq)]
struct AnotherEvent {
    word: String,
}

#[derive(Default)]
struct Collector {
    total: i32,
    final_string: String,
}

impl Receive<SomeEvent> for Collector {
    fn receive(&mut self, event: &SomeEvent) {
        self.total += event.count;
    }
}

impl Receive<AnotherEvent> for Collector {
    fn receive(&mut self, event: &AnotherEvent) {
        self.final_string.push_str(&event.word);
    }
}

#[test]
fn test_one_receiver_two_event_types() {
    let mut bus = EventBus::new();
    let collector = Rc::new(RefCell::new(Collector::default()));

    bus.subscribe_receiver::<SomeEvent, _>(Rc::clone(&collector));
    bus.subscribe_receiver::<AnotherEvent, _>(Rc::clone(&collector));

    bus.emit(SomeEvent { count: 10 });
    bus.emit(AnotherEvent {
        word: "event".into(),
    });
    bus.emit(SomeEvent { count: 20 });
    bus.emit(AnotherEvent {
        word: "Another".into(),
    });

    let collector = collector.borrow();
    assert_eq!(collector.total, 30);
    assert_eq!(collector.final_string, "eventAnother");
}

#[test]
fn test_every_subscriber_sees_the_emitted_value() {
    let mut bus = EventBus::new();
    let seen = Rc::new(RefCell::new(Vec::new()));

    for subscriber in 0..3 {
        let seen = Rc::clone(&seen);
        bus.subscribe(move |event: &SomeEvent| seen.borrow_mut().push((subscriber, event.count)));
    }

    bus.emit(SomeEvent { count: 77 });
    assert_eq!(*seen.borrow(), vec![(0, 77), (1, 77), (2, 77)]);
}

#[test]
fn test_handlers_and_mailboxes_interleave_in_subscription_order() {
    let mut bus = EventBus::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    let first = Rc::clone(&log);
    bus.subscribe(move |event: &SomeEvent| first.borrow_mut().push(event.count));
    let mailbox = bus.subscribe_queued::<SomeEvent>(8);
    let last = Rc::clone(&log);
    let late = bus.subscribe(move |event: &SomeEvent| last.borrow_mut().push(-event.count));

    bus.emit(SomeEvent { count: 1 });
    bus.emit(SomeEvent { count: 2 });
    assert_eq!(*log.borrow(), vec![1, -1, 2, -2]);
    assert_eq!(
        mailbox.drain(),
        vec![SomeEvent { count: 1 }, SomeEvent { count: 2 }]
    );

    assert!(bus.unsubscribe(late));
    bus.emit(SomeEvent { count: 3 });
    assert_eq!(*log.borrow(), vec![1, -1, 2, -2, 3]);
    assert_eq!(mailbox.try_recv(), Some(SomeEvent { count: 3 }));
    assert_eq!(bus.subscriber_count::<SomeEvent>(), 2);
}

#[test]
fn test_mailbox_can_be_drained_on_another_thread() {
    let mut bus = EventBus::new();
    let mailbox = bus.subscribe_queued::<SomeEvent>(64);

    for count in 0..10 {
        bus.emit(SomeEvent { count });
    }

    let total = std::thread::spawn(move || {
        mailbox.drain().iter().map(|event| event.count).sum::<i32>()
    })
    .join()
    .unwrap();
    assert_eq!(total, 45);
}
