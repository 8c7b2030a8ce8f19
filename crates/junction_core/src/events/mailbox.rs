//! # Mailboxes
//!
//! Queued subscriptions. Instead of running a handler inside `emit`, the bus
//! pushes a clone of each event into a bounded channel and the subscriber
//! drains it whenever it chooses. Mailboxes of one event type receive events
//! in emit order, interleaved with synchronous handlers in subscription order.
//!
//! Dropping a [`Mailbox`] ends its subscription: the bus removes the
//! subscriber the next time an event of that type is emitted.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use super::bus::SubscriptionId;

/// Creates a connected sender/mailbox pair with room for `capacity` events.
pub(crate) fn channel<E>(
    capacity: usize,
    subscription: SubscriptionId,
) -> (MailboxSender<E>, Mailbox<E>) {
    let (sender, receiver) = bounded(capacity);
    (
        MailboxSender { sender },
        Mailbox {
            receiver,
            subscription,
        },
    )
}

/// Bus-side end of a mailbox.
pub(crate) struct MailboxSender<E> {
    sender: Sender<E>,
}

impl<E> MailboxSender<E> {
    /// Enqueues an event without blocking.
    ///
    /// A full mailbox discards the event. Returns `false` once the mailbox
    /// has been dropped, meaning the subscription should be removed.
    #[inline]
    pub(crate) fn send(&self, event: E) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!(
                    event = std::any::type_name::<E>(),
                    capacity = self.sender.capacity().unwrap_or_default(),
                    "mailbox full, event dropped"
                );
                true
            }
            Err(TrySendError::Disconnected(_)) => {
                tracing::debug!(
                    event = std::any::type_name::<E>(),
                    "mailbox dropped, removing subscriber"
                );
                false
            }
        }
    }
}

/// Subscriber-side end of a queued subscription.
///
/// # Example
///
/// ```rust
/// use junction_core::EventBus;
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Spawned(u32);
///
/// let mut bus = EventBus::new();
/// let mailbox = bus.subscribe_queued::<Spawned>(16);
///
/// bus.emit(Spawned(1));
/// bus.emit(Spawned(2));
///
/// assert_eq!(mailbox.drain(), vec![Spawned(1), Spawned(2)]);
/// assert!(!mailbox.has_events());
/// ```
pub struct Mailbox<E> {
    receiver: Receiver<E>,
    subscription: SubscriptionId,
}

impl<E> Mailbox<E> {
    /// Receives one event (non-blocking).
    ///
    /// Returns `None` if no events are pending.
    #[inline]
    pub fn try_recv(&self) -> Option<E> {
        self.receiver.try_recv().ok()
    }

    /// Receives all pending events (non-blocking), oldest first.
    #[inline]
    pub fn drain(&self) -> Vec<E> {
        self.receiver.try_iter().collect()
    }

    /// Returns the number of pending events.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Checks if there are pending events.
    #[inline]
    #[must_use]
    pub fn has_events(&self) -> bool {
        !self.receiver.is_empty()
    }

    /// Returns the maximum number of events the mailbox can hold.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.receiver.capacity().unwrap_or(usize::MAX)
    }

    /// Returns the subscription feeding this mailbox, for
    /// [`EventBus::unsubscribe`](super::EventBus::unsubscribe).
    #[inline]
    #[must_use]
    pub const fn subscription(&self) -> SubscriptionId {
        self.subscription
    }
}

impl<E> std::fmt::Debug for Mailbox<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mailbox")
            .field("event", &std::any::type_name::<E>())
            .field("subscription", &self.subscription)
            .field("pending", &self.receiver.len())
            .finish()
    }
}
