//! Synchronous publish/subscribe for registry lifecycle notifications.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

use tracing::debug;
use uuid::Uuid;

/// The four lifecycle topics the registry emits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTopic {
    ComponentsUpdated,
    BundleExecuted,
    BundleExecutionError,
    SessionCleared,
}

impl EventTopic {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventTopic::ComponentsUpdated => "components-updated",
            EventTopic::BundleExecuted => "bundle-executed",
            EventTopic::BundleExecutionError => "bundle-execution-error",
            EventTopic::SessionCleared => "session-cleared",
        }
    }
}

impl Display for EventTopic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What subscribers receive. One variant per topic.
#[derive(Debug, Clone)]
pub enum EventPayload {
    ComponentsUpdated {
        total_components: usize,
        session_components: usize,
    },
    BundleExecuted {
        session_id: String,
        component_count: usize,
    },
    BundleExecutionError {
        session_id: String,
        message: String,
    },
    SessionCleared {
        session_id: Option<String>,
    },
}

/// Token identifying one subscription, handed back by [`EventBus::subscribe`]
/// and used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        SubscriptionId(Uuid::new_v4())
    }
}

impl Display for SubscriptionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct Subscriber {
    id: SubscriptionId,
    callback: Rc<dyn Fn(&EventPayload)>,
}

/// Synchronous event bus. Delivery happens on the emitting call, in
/// subscription order. Emission iterates a snapshot of the subscriber list,
/// so a callback may subscribe or unsubscribe and the change takes effect
/// from the next emission.
pub struct EventBus {
    subscribers: RefCell<HashMap<EventTopic, Vec<Subscriber>>>,
}

impl EventBus {
    pub fn new() -> Self {
        EventBus {
            subscribers: RefCell::new(HashMap::new()),
        }
    }

    pub fn subscribe(
        &self,
        topic: EventTopic,
        callback: impl Fn(&EventPayload) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.subscribers
            .borrow_mut()
            .entry(topic)
            .or_default()
            .push(Subscriber {
                id,
                callback: Rc::new(callback),
            });
        debug!(topic = %topic, subscription = %id, "subscribed");
        id
    }

    /// Remove one subscription. Returns whether anything was removed.
    pub fn unsubscribe(&self, topic: EventTopic, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        match subscribers.get_mut(&topic) {
            Some(list) => {
                let before = list.len();
                list.retain(|s| s.id != id);
                before != list.len()
            }
            None => false,
        }
    }

    pub fn subscriber_count(&self, topic: EventTopic) -> usize {
        self.subscribers
            .borrow()
            .get(&topic)
            .map(|list| list.len())
            .unwrap_or(0)
    }

    pub fn emit(&self, topic: EventTopic, payload: &EventPayload) {
        let snapshot: Vec<Rc<dyn Fn(&EventPayload)>> = self
            .subscribers
            .borrow()
            .get(&topic)
            .map(|list| list.iter().map(|s| Rc::clone(&s.callback)).collect())
            .unwrap_or_default();
        debug!(topic = %topic, subscribers = snapshot.len(), "emit");
        for callback in snapshot {
            callback(payload);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        EventBus::new()
    }
}
