//! Typed signal plumbing
//!
//! Handlers only ever see `&E`, so a subscriber cannot reach back into the
//! session while it is dispatching. Follow-up signals raised by a handler are
//! queued and delivered after the current one, in FIFO order.

use std::collections::VecDeque;

/// Handle returned by [`Subscribers::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

/// FIFO of signals waiting to be dispatched
#[derive(Debug)]
pub struct SignalQueue<E> {
    pending: VecDeque<E>,
}

impl<E> Default for SignalQueue<E> {
    fn default() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }
}

impl<E> SignalQueue<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, signal: E) {
        self.pending.push_back(signal);
    }

    pub fn extend(&mut self, signals: impl IntoIterator<Item = E>) {
        self.pending.extend(signals);
    }

    pub fn pop(&mut self) -> Option<E> {
        self.pending.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Callback list, invoked in registration order
pub struct Subscribers<E> {
    handlers: Vec<(SubscriptionId, Box<dyn FnMut(&E)>)>,
    next_id: u32,
}

impl<E> Default for Subscribers<E> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
            next_id: 1,
        }
    }
}

impl<E> std::fmt::Debug for Subscribers<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.handlers.len())
            .finish()
    }
}

impl<E> Subscribers<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&E) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Returns false if the id was unknown
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(h, _)| *h != id);
        self.handlers.len() != before
    }

    pub fn emit(&mut self, signal: &E) {
        for (_, handler) in self.handlers.iter_mut() {
            handler(signal);
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_queue_is_fifo() {
        let mut queue = SignalQueue::new();
        queue.push(1);
        queue.extend([2, 3]);
        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), Some(3));
        assert!(queue.is_empty());
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_registration_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut subs = Subscribers::new();
        for tag in ["a", "b", "c"] {
            let seen = seen.clone();
            subs.subscribe(move |n: &u32| seen.borrow_mut().push(format!("{tag}{n}")));
        }
        subs.emit(&1);
        assert_eq!(*seen.borrow(), vec!["a1", "b1", "c1"]);
    }

    #[test]
    fn test_unsubscribe() {
        let hits = Rc::new(RefCell::new(0));
        let mut subs = Subscribers::new();
        let h = hits.clone();
        let id = subs.subscribe(move |_: &()| *h.borrow_mut() += 1);

        subs.emit(&());
        assert!(subs.unsubscribe(id));
        assert!(!subs.unsubscribe(id));
        subs.emit(&());
        assert_eq!(*hits.borrow(), 1);
        assert!(subs.is_empty());
    }
}
