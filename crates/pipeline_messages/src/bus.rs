use std::sync::Arc;

use pipeline_logging::pipeline_trace;

use crate::{Message, Observer};

/// Handle returned by [`MessageBus::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Fans messages out to registered observers in registration order.
#[derive(Default)]
pub struct MessageBus {
    observers: Vec<(ObserverId, Arc<dyn Observer>)>,
    next_id: u64,
}

impl MessageBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, observer: Arc<dyn Observer>) -> ObserverId {
        self.next_id += 1;
        let id = ObserverId(self.next_id);
        self.observers.push((id, observer));
        pipeline_trace!("registered observer {:?}", id);
        id
    }

    /// Returns false if the id was not registered.
    pub fn unregister(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn notify(&self, message: &Message) {
        for (_, observer) in &self.observers {
            observer.receive(message);
        }
    }

    pub fn notify_all<I>(&self, messages: I)
    where
        I: IntoIterator<Item = Message>,
    {
        for message in messages {
            self.notify(&message);
        }
    }
}

impl std::fmt::Debug for MessageBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageBus")
            .field("observers", &self.observers.len())
            .finish()
    }
}
