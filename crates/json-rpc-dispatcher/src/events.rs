//! Lifecycle events for observing a dispatcher
//!
//! Every dispatcher owns one [`EventEmitter`] with four channels:
//!
//! - `request_raw`: each raw call item as received (`null` when the whole input was malformed)
//! - `request`: each call item whose method was found (`null` for malformed input)
//! - `response_raw`: the full ordered result array of one dispatch
//! - `response`: each slot of that array, in order (`None` for notifications)
//!
//! Listeners run synchronously, in subscription order, at the moment an event is emitted.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;
use tracing::trace;

use crate::response::JsonRpcMessage;

/// Event channel name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    RequestRaw,
    Request,
    ResponseRaw,
    Response,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::RequestRaw => "request_raw",
            EventKind::Request => "request",
            EventKind::ResponseRaw => "response_raw",
            EventKind::Response => "response",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a lifecycle event
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchEvent {
    RequestRaw(Value),
    Request(Value),
    ResponseRaw(Vec<Option<JsonRpcMessage>>),
    Response(Option<JsonRpcMessage>),
}

impl DispatchEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            DispatchEvent::RequestRaw(_) => EventKind::RequestRaw,
            DispatchEvent::Request(_) => EventKind::Request,
            DispatchEvent::ResponseRaw(_) => EventKind::ResponseRaw,
            DispatchEvent::Response(_) => EventKind::Response,
        }
    }
}

pub type Listener = Arc<dyn Fn(&DispatchEvent) + Send + Sync>;

/// Handle returned by [`EventEmitter::on`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Subscription {
    id: ListenerId,
    kind: EventKind,
    once: bool,
    listener: Listener,
}

/// Per-dispatcher publish/subscribe hub
pub struct EventEmitter {
    next_id: AtomicU64,
    subscriptions: RwLock<Vec<Subscription>>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            subscriptions: RwLock::new(Vec::new()),
        }
    }

    /// Subscribe to every event of `kind`
    pub fn on<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&DispatchEvent) + Send + Sync + 'static,
    {
        self.subscribe(kind, false, Arc::new(listener))
    }

    /// Subscribe to the next event of `kind` only
    pub fn once<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&DispatchEvent) + Send + Sync + 'static,
    {
        self.subscribe(kind, true, Arc::new(listener))
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn off(&self, id: ListenerId) -> bool {
        let mut subscriptions = self
            .subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = subscriptions.len();
        subscriptions.retain(|s| s.id != id);
        subscriptions.len() != before
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|s| s.kind == kind)
            .count()
    }

    pub fn emit(&self, event: &DispatchEvent) {
        let kind = event.kind();

        // Listeners run outside the lock so they may subscribe or unsubscribe
        let listeners: Vec<Listener> = {
            let mut subscriptions = self
                .subscriptions
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let listeners = subscriptions
                .iter()
                .filter(|s| s.kind == kind)
                .map(|s| s.listener.clone())
                .collect();
            subscriptions.retain(|s| !(s.once && s.kind == kind));
            listeners
        };

        trace!(event = %kind, listeners = listeners.len(), "Emitting dispatch event");
        for listener in listeners {
            listener(event);
        }
    }

    fn subscribe(&self, kind: EventKind, once: bool, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Subscription {
                id,
                kind,
                once,
                listener,
            });
        id
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self
            .subscriptions
            .read()
            .map(|s| s.len())
            .unwrap_or_default();
        f.debug_struct("EventEmitter")
            .field("listeners", &count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    fn recorder() -> (Arc<Mutex<Vec<DispatchEvent>>>, impl Fn(&DispatchEvent) + Send + Sync) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |event: &DispatchEvent| {
            sink.lock().unwrap().push(event.clone())
        })
    }

    #[test]
    fn test_listeners_filter_by_kind() {
        let emitter = EventEmitter::new();
        let (seen, listener) = recorder();
        emitter.on(EventKind::Request, listener);

        emitter.emit(&DispatchEvent::RequestRaw(json!(1)));
        emitter.emit(&DispatchEvent::Request(json!(2)));

        assert_eq!(*seen.lock().unwrap(), vec![DispatchEvent::Request(json!(2))]);
    }

    #[test]
    fn test_once_fires_a_single_time() {
        let emitter = EventEmitter::new();
        let (seen, listener) = recorder();
        emitter.once(EventKind::Response, listener);
        assert_eq!(emitter.listener_count(EventKind::Response), 1);

        emitter.emit(&DispatchEvent::Response(None));
        emitter.emit(&DispatchEvent::Response(None));

        assert_eq!(seen.lock().unwrap().len(), 1);
        assert_eq!(emitter.listener_count(EventKind::Response), 0);
    }

    #[test]
    fn test_off_unsubscribes() {
        let emitter = EventEmitter::new();
        let (seen, listener) = recorder();
        let id = emitter.on(EventKind::RequestRaw, listener);

        assert!(emitter.off(id));
        assert!(!emitter.off(id));
        emitter.emit(&DispatchEvent::RequestRaw(Value::Null));

        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_listener_may_unsubscribe_itself() {
        let emitter = Arc::new(EventEmitter::new());
        let id_slot: Arc<Mutex<Option<ListenerId>>> = Arc::new(Mutex::new(None));
        let hits = Arc::new(AtomicU64::new(0));

        let (inner, slot, counter) = (emitter.clone(), id_slot.clone(), hits.clone());
        let id = emitter.on(EventKind::Request, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            if let Some(id) = *slot.lock().unwrap() {
                inner.off(id);
            }
        });
        *id_slot.lock().unwrap() = Some(id);

        emitter.emit(&DispatchEvent::Request(Value::Null));
        emitter.emit(&DispatchEvent::Request(Value::Null));

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
