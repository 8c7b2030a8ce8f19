//! # Event Bus
//!
//! Synchronous, type-erased publish/subscribe.
//!
//! Each event type gets an identity from the bus's own [`TypeRegistry`]; the
//! signal table is a vector of subscriber lists indexed by that identity.
//! Subscribers are stored behind one uniform signature,
//! `(&mut C, &dyn Any) -> bool`, and each wrapper performs exactly one
//! downcast back to its event type when it is invoked. A wrapper returning
//! `false` has outlived its subscriber (a dropped mailbox) and is removed.
//!
//! ## Re-entrancy
//!
//! `emit` holds `&mut self` for the whole dispatch, so a handler cannot
//! subscribe, unsubscribe or emit on the same bus. Handlers that need to
//! publish follow-up events collect them and emit after `emit` returns.

use std::any::{type_name, Any};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::mailbox::{self, Mailbox};
use crate::config::EventBusConfig;
use crate::registry::TypeRegistry;

/// Typed receiver object, invoked through [`EventBus::subscribe_receiver`].
pub trait Receive<E> {
    /// Handles one event.
    fn receive(&mut self, event: &E);
}

/// Identifies one subscription for [`EventBus::unsubscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[cfg(test)]
    pub(crate) const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Uniform, type-erased subscriber signature. Returns `false` to unsubscribe.
type ErasedHandler<C> = Box<dyn FnMut(&mut C, &dyn Any) -> bool>;

struct Subscriber<C> {
    id: SubscriptionId,
    handler: ErasedHandler<C>,
}

/// Synchronous event bus.
///
/// `C` is a context handed to handlers at emit time, for example the entity
/// store the publisher is working on. Plain buses use `C = ()`.
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// use junction_core::EventBus;
///
/// struct CountEvent(u32);
///
/// let total = Rc::new(Cell::new(0));
/// let mut bus = EventBus::new();
///
/// let sink = Rc::clone(&total);
/// bus.subscribe(move |event: &CountEvent| sink.set(sink.get() + event.0));
///
/// bus.emit(CountEvent(10));
/// bus.emit(CountEvent(20));
/// assert_eq!(total.get(), 30);
/// ```
pub struct EventBus<C = ()> {
    /// Event type identities.
    registry: TypeRegistry,
    /// Subscriber lists indexed by event identity.
    signals: Vec<Vec<Subscriber<C>>>,
    /// Next subscription id.
    next_id: u64,
    /// Capacity for `subscribe_queued_default`.
    default_mailbox_capacity: usize,
}

impl<C: 'static> EventBus<C> {
    /// Creates an empty bus from `config`.
    #[must_use]
    pub fn with_config(config: &EventBusConfig) -> Self {
        Self {
            registry: TypeRegistry::new(),
            signals: Vec::new(),
            next_id: 0,
            default_mailbox_capacity: config.default_mailbox_capacity,
        }
    }

    /// Subscribes a handler that only needs the event.
    pub fn subscribe<E: 'static>(
        &mut self,
        mut handler: impl FnMut(&E) + 'static,
    ) -> SubscriptionId {
        self.subscribe_with_context(move |_: &mut C, event: &E| handler(event))
    }

    /// Subscribes a handler that also receives the emit context.
    ///
    /// Handlers for the same event type run in subscription order. Repeated
    /// subscriptions are all kept.
    pub fn subscribe_with_context<E: 'static>(
        &mut self,
        mut handler: impl FnMut(&mut C, &E) + 'static,
    ) -> SubscriptionId {
        self.insert::<E>(Box::new(move |context: &mut C, payload: &dyn Any| {
            handler(context, downcast::<E>(payload));
            true
        }))
    }

    /// Subscribes a shared receiver object.
    ///
    /// The receiver is borrowed mutably for each delivery, so it must not be
    /// borrowed elsewhere while an event of type `E` is being emitted.
    pub fn subscribe_receiver<E, R>(&mut self, receiver: Rc<RefCell<R>>) -> SubscriptionId
    where
        E: 'static,
        R: Receive<E> + 'static,
    {
        self.subscribe(move |event: &E| receiver.borrow_mut().receive(event))
    }

    /// Subscribes a mailbox that receives a clone of every `E`.
    ///
    /// When the mailbox is full the event is discarded for that subscriber
    /// only and a warning is logged. Once the mailbox is dropped the
    /// subscriber is removed at the next emit of `E`; it can also be removed
    /// right away with [`Mailbox::subscription`].
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn subscribe_queued<E>(&mut self, capacity: usize) -> Mailbox<E>
    where
        E: Clone + Send + 'static,
    {
        assert!(capacity > 0, "Mailbox capacity must be greater than zero");
        let (sender, mailbox) = mailbox::channel(capacity, SubscriptionId(self.next_id));
        let id = self.insert::<E>(Box::new(move |_: &mut C, payload: &dyn Any| {
            sender.send(downcast::<E>(payload).clone())
        }));
        debug_assert_eq!(id, mailbox.subscription());
        tracing::debug!(event = type_name::<E>(), capacity, "queued subscriber added");
        mailbox
    }

    /// Subscribes a mailbox with the configured default capacity.
    pub fn subscribe_queued_default<E>(&mut self) -> Mailbox<E>
    where
        E: Clone + Send + 'static,
    {
        self.subscribe_queued(self.default_mailbox_capacity)
    }

    /// Removes a subscription. Returns `false` if it was not found.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        for list in &mut self.signals {
            if let Some(position) = list.iter().position(|subscriber| subscriber.id == id) {
                list.remove(position);
                return true;
            }
        }
        false
    }

    /// Delivers `event` to every subscriber of `E`, in subscription order,
    /// passing `context` to each.
    ///
    /// Returns after every subscriber has run. Emitting a type nobody
    /// subscribed to is a no-op. Queued subscribers whose mailbox has been
    /// dropped are removed.
    pub fn emit_with<E: 'static>(&mut self, context: &mut C, event: E) {
        let identity = self.registry.identity_of::<E>();
        let list = self.signal_list(identity.index());
        let before = list.len();
        list.retain_mut(|subscriber| (subscriber.handler)(&mut *context, &event));

        if list.len() < before {
            tracing::debug!(
                event = type_name::<E>(),
                removed = before - list.len(),
                "pruned disconnected subscribers"
            );
        }
    }

    /// Returns the number of subscribers for `E`.
    #[must_use]
    pub fn subscriber_count<E: 'static>(&self) -> usize {
        self.registry
            .get::<E>()
            .and_then(|identity| self.signals.get(identity.index()))
            .map_or(0, Vec::len)
    }

    /// Returns the number of event types seen by this bus.
    #[inline]
    #[must_use]
    pub fn event_type_count(&self) -> usize {
        self.registry.len()
    }

    fn insert<E: 'static>(&mut self, handler: ErasedHandler<C>) -> SubscriptionId {
        let identity = self.registry.identity_of::<E>();
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;

        let list = self.signal_list(identity.index());
        list.push(Subscriber { id, handler });
        tracing::trace!(
            event = type_name::<E>(),
            subscription = id.0,
            subscribers = list.len(),
            "subscribed"
        );
        id
    }

    /// Returns the subscriber list at `index`, creating empty lists up to it.
    fn signal_list(&mut self, index: usize) -> &mut Vec<Subscriber<C>> {
        if self.signals.len() <= index {
            self.signals.resize_with(index + 1, Vec::new);
        }
        &mut self.signals[index]
    }
}

/// Recovers the event from its erased form.
///
/// # Panics
///
/// Panics if the payload is not an `E`. Signal lists are indexed by event
/// identity, so a mismatch means the signal table is corrupt.
fn downcast<E: 'static>(payload: &dyn Any) -> &E {
    payload.downcast_ref::<E>().unwrap_or_else(|| {
        unreachable!("subscriber for {} received another event type", type_name::<E>())
    })
}

impl EventBus<()> {
    /// Creates an empty bus without an emit context.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&EventBusConfig::default())
    }

    /// Delivers `event` to every subscriber of `E`, in subscription order.
    pub fn emit<E: 'static>(&mut self, event: E) {
        self.emit_with(&mut (), event);
    }
}

impl<C: 'static> Default for EventBus<C> {
    fn default() -> Self {
        Self::with_config(&EventBusConfig::default())
    }
}

impl<C> fmt::Debug for EventBus<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("event_types", &self.registry.len())
            .field(
                "subscribers",
                &self.signals.iter().map(Vec::len).sum::<usize>(),
            )
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Clone, Debug, PartialEq)]
    struct CountEvent(u32);

    #[derive(Clone, Debug, PartialEq)]
    struct Renamed {
        name: String,
    }

    #[test]
    fn test_count_event_total() {
        let total = Rc::new(Cell::new(0));
        let mut bus = EventBus::new();
        let sink = Rc::clone(&total);
        bus.subscribe(move |event: &CountEvent| sink.set(sink.get() + event.0));

        bus.emit(CountEvent(10));
        bus.emit(CountEvent(20));
        assert_eq!(total.get(), 30);
    }

    #[test]
    fn test_delivery_follows_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        for name in ["first", "second", "third"] {
            let log = Rc::clone(&log);
            bus.subscribe(move |_: &CountEvent| log.borrow_mut().push(name));
        }

        bus.emit(CountEvent(1));
        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_payload_round_trip() {
        let seen = Rc::new(RefCell::new(None));
        let mut bus = EventBus::new();
        let sink = Rc::clone(&seen);
        bus.subscribe(move |event: &Renamed| *sink.borrow_mut() = Some(event.name.clone()));

        bus.emit(Renamed {
            name: "atlas".into(),
        });
        assert_eq!(seen.borrow().as_deref(), Some("atlas"));
    }

    #[test]
    fn test_event_types_are_isolated() {
        let counts = Rc::new(Cell::new(0));
        let mut bus = EventBus::new();
        let sink = Rc::clone(&counts);
        bus.subscribe(move |_: &CountEvent| sink.set(sink.get() + 1));

        bus.emit(Renamed { name: String::new() });
        assert_eq!(counts.get(), 0);
        assert_eq!(bus.event_type_count(), 2);
    }

    #[test]
    fn test_emit_without_subscribers_is_noop() {
        let mut bus = EventBus::new();
        bus.emit(CountEvent(5));
        assert_eq!(bus.subscriber_count::<CountEvent>(), 0);
    }

    #[test]
    fn test_unsubscribe() {
        let total = Rc::new(Cell::new(0));
        let mut bus = EventBus::new();
        let a = Rc::clone(&total);
        let first = bus.subscribe(move |e: &CountEvent| a.set(a.get() + e.0));
        let b = Rc::clone(&total);
        bus.subscribe(move |e: &CountEvent| b.set(b.get() + e.0 * 100));
        assert_eq!(bus.subscriber_count::<CountEvent>(), 2);

        assert!(bus.unsubscribe(first));
        assert!(!bus.unsubscribe(first));
        bus.emit(CountEvent(1));
        assert_eq!(total.get(), 100);
    }

    #[test]
    fn test_receiver_objects() {
        struct Counter {
            total: u32,
        }

        impl Receive<CountEvent> for Counter {
            fn receive(&mut self, event: &CountEvent) {
                self.total += event.0;
            }
        }

        let counter = Rc::new(RefCell::new(Counter { total: 0 }));
        let mut bus = EventBus::new();
        bus.subscribe_receiver::<CountEvent, _>(Rc::clone(&counter));
        bus.subscribe_receiver::<CountEvent, _>(Rc::clone(&counter));

        bus.emit(CountEvent(10));
        bus.emit(CountEvent(20));
        assert_eq!(counter.borrow().total, 60);
    }

    #[test]
    fn test_context_is_passed_to_handlers() {
        let mut bus: EventBus<Vec<u32>> = EventBus::default();
        bus.subscribe_with_context(|log: &mut Vec<u32>, e: &CountEvent| log.push(e.0));
        bus.subscribe_with_context(|log: &mut Vec<u32>, e: &CountEvent| log.push(e.0 + 1));

        let mut log = Vec::new();
        bus.emit_with(&mut log, CountEvent(7));
        assert_eq!(log, vec![7, 8]);
    }

    #[test]
    fn test_queued_subscribers() {
        let mut bus = EventBus::new();
        let mailbox = bus.subscribe_queued::<CountEvent>(2);
        let defaulted = bus.subscribe_queued_default::<CountEvent>();
        assert_eq!(defaulted.capacity(), 1024);

        bus.emit(CountEvent(1));
        bus.emit(CountEvent(2));
        bus.emit(CountEvent(3));

        assert_eq!(mailbox.drain(), vec![CountEvent(1), CountEvent(2)]);
        assert_eq!(defaulted.pending_count(), 3);

        drop(mailbox);
        bus.emit(CountEvent(4));
        assert_eq!(defaulted.drain().len(), 4);
        assert_eq!(bus.subscriber_count::<CountEvent>(), 1);
    }

    #[test]
    fn test_dropped_mailboxes_are_pruned() {
        let mut bus = EventBus::new();
        let total = Rc::new(Cell::new(0));
        let sink = Rc::clone(&total);
        bus.subscribe(move |e: &CountEvent| sink.set(sink.get() + e.0));

        for _ in 0..100 {
            drop(bus.subscribe_queued::<CountEvent>(4));
        }
        let kept = bus.subscribe_queued::<CountEvent>(4);
        assert_eq!(bus.subscriber_count::<CountEvent>(), 102);

        bus.emit(CountEvent(1));
        assert_eq!(bus.subscriber_count::<CountEvent>(), 2);
        assert_eq!(total.get(), 1);
        assert_eq!(kept.drain(), vec![CountEvent(1)]);
    }

    #[test]
    fn test_unsubscribe_queued() {
        let mut bus = EventBus::new();
        let mailbox = bus.subscribe_queued::<CountEvent>(4);
        assert!(bus.unsubscribe(mailbox.subscription()));
        assert_eq!(bus.subscriber_count::<CountEvent>(), 0);

        bus.emit(CountEvent(3));
        assert!(!mailbox.has_events());
    }

    #[test]
    #[should_panic(expected = "received another event type")]
    fn test_mismatched_payload_panics() {
        let payload: &dyn Any = &Renamed { name: String::new() };
        let _ = downcast::<CountEvent>(payload);
    }
}
