//! Single-threaded publish/subscribe dispatcher.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

type Handler<E> = Rc<dyn Fn(&E)>;

struct Inner<E> {
    next_id: u64,
    handlers: Vec<(u64, Handler<E>)>,
    queue: VecDeque<E>,
    dispatching: bool,
}

/// Typed event bus.
///
/// Handlers run synchronously in subscription order. An event published
/// from inside a handler is queued and delivered after the current event has
/// reached every handler.
pub struct EventBus<E> {
    inner: Rc<RefCell<Inner<E>>>,
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<E: 'static> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> EventBus<E> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                next_id: 0,
                handlers: Vec::new(),
                queue: VecDeque::new(),
                dispatching: false,
            })),
        }
    }

    /// Register `handler`; it stays registered while the returned
    /// [`Subscription`] is alive.
    pub fn subscribe(&self, handler: impl Fn(&E) + 'static) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.handlers.push((id, Rc::new(handler)));
            id
        };
        let weak: Weak<RefCell<Inner<E>>> = Rc::downgrade(&self.inner);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.borrow_mut().handlers.retain(|(h, _)| *h != id);
                }
            })),
        }
    }

    pub fn publish(&self, event: E) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.queue.push_back(event);
            if inner.dispatching {
                return;
            }
            inner.dispatching = true;
        }

        loop {
            // Handlers are cloned out so they can subscribe or publish.
            let next = {
                let mut inner = self.inner.borrow_mut();
                match inner.queue.pop_front() {
                    Some(event) => {
                        let handlers: Vec<Handler<E>> =
                            inner.handlers.iter().map(|(_, h)| h.clone()).collect();
                        Some((event, handlers))
                    }
                    None => {
                        inner.dispatching = false;
                        None
                    }
                }
            };
            let Some((event, handlers)) = next else {
                break;
            };
            for handler in handlers {
                handler(&event);
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().handlers.len()
    }
}

/// Handle returned by [`EventBus::subscribe`]; dropping it unsubscribes.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
