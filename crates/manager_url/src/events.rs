//! Manager event bus seam and in-process implementation.

use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use preview_host::NavigateOptions;

use crate::model::{Args, CurrentItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Topics URL sync subscribes to.
pub enum EventTopic {
    /// A new item became current.
    CurrentItemSelected,
    /// The current item's args changed. Fires at high frequency while controls are dragged.
    ItemArgsUpdated,
    /// Global settings changed.
    GlobalsUpdated,
    /// Another module asked for a navigation.
    NavigateUrlRequested,
}

impl EventTopic {
    /// Stable topic token for tracing and cross-frame channels.
    pub const fn token(self) -> &'static str {
        match self {
            Self::CurrentItemSelected => "current-item-selected",
            Self::ItemArgsUpdated => "item-args-updated",
            Self::GlobalsUpdated => "globals-updated",
            Self::NavigateUrlRequested => "navigate-url",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Events carried by an [`EventBus`].
pub enum ManagerEvent {
    CurrentItemSelected,
    ItemArgsUpdated(CurrentItem),
    GlobalsUpdated {
        globals: Args,
        initial_globals: Args,
    },
    NavigateUrlRequested {
        url: String,
        options: NavigateOptions,
    },
}

impl ManagerEvent {
    /// Returns the topic this event is published on.
    pub const fn topic(&self) -> EventTopic {
        match self {
            Self::CurrentItemSelected => EventTopic::CurrentItemSelected,
            Self::ItemArgsUpdated(_) => EventTopic::ItemArgsUpdated,
            Self::GlobalsUpdated { .. } => EventTopic::GlobalsUpdated,
            Self::NavigateUrlRequested { .. } => EventTopic::NavigateUrlRequested,
        }
    }
}

/// Handler invoked for each event on a subscribed topic.
pub type EventHandler = Rc<dyn Fn(&ManagerEvent)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Handle returned by [`EventBus::subscribe`].
pub struct SubscriptionId(pub u64);

/// Publish/subscribe channel between manager modules.
pub trait EventBus {
    /// Registers `handler` for `topic`.
    fn subscribe(&self, topic: EventTopic, handler: EventHandler) -> SubscriptionId;

    /// Removes a subscription. Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);

    /// Delivers `event` to every handler subscribed to its topic, in subscription order.
    fn emit(&self, event: &ManagerEvent);
}

#[derive(Default)]
struct BusState {
    next_id: u64,
    handlers: BTreeMap<EventTopic, Vec<(SubscriptionId, EventHandler)>>,
}

#[derive(Clone, Default)]
/// Synchronous in-process event bus.
///
/// Handlers may emit, subscribe or unsubscribe while being delivered to; a delivery uses the
/// subscriber list as it was when the emit started.
pub struct LocalEventBus {
    inner: Rc<RefCell<BusState>>,
}

impl LocalEventBus {
    /// Returns the number of live subscriptions for `topic`.
    pub fn subscriber_count(&self, topic: EventTopic) -> usize {
        self.inner
            .borrow()
            .handlers
            .get(&topic)
            .map_or(0, Vec::len)
    }
}

impl EventBus for LocalEventBus {
    fn subscribe(&self, topic: EventTopic, handler: EventHandler) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = SubscriptionId(inner.next_id);
        inner.handlers.entry(topic).or_default().push((id, handler));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        let mut inner = self.inner.borrow_mut();
        for handlers in inner.handlers.values_mut() {
            handlers.retain(|(handler_id, _)| *handler_id != id);
        }
        inner.handlers.retain(|_, handlers| !handlers.is_empty());
    }

    fn emit(&self, event: &ManagerEvent) {
        let handlers: Vec<EventHandler> = self
            .inner
            .borrow()
            .handlers
            .get(&event.topic())
            .map(|handlers| handlers.iter().map(|(_, handler)| handler.clone()).collect())
            .unwrap_or_default();

        for handler in handlers {
            handler(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn delivers_only_to_matching_topic_until_unsubscribed() {
        let bus = LocalEventBus::default();
        let hits = Rc::new(Cell::new(0));

        let id = {
            let hits = hits.clone();
            bus.subscribe(
                EventTopic::CurrentItemSelected,
                Rc::new(move |_: &ManagerEvent| hits.set(hits.get() + 1)),
            )
        };

        bus.emit(&ManagerEvent::CurrentItemSelected);
        bus.emit(&ManagerEvent::NavigateUrlRequested {
            url: "/".to_string(),
            options: NavigateOptions::default(),
        });
        assert_eq!(hits.get(), 1);

        bus.unsubscribe(id);
        bus.emit(&ManagerEvent::CurrentItemSelected);
        assert_eq!(hits.get(), 1);
        assert_eq!(bus.subscriber_count(EventTopic::CurrentItemSelected), 0);
    }

    #[test]
    fn handlers_can_emit_reentrantly() {
        let bus = LocalEventBus::default();
        let navigations = Rc::new(Cell::new(0));

        {
            let navigations = navigations.clone();
            bus.subscribe(
                EventTopic::NavigateUrlRequested,
                Rc::new(move |_: &ManagerEvent| navigations.set(navigations.get() + 1)),
            );
        }
        {
            let inner_bus = bus.clone();
            bus.subscribe(
                EventTopic::CurrentItemSelected,
                Rc::new(move |_: &ManagerEvent| {
                    inner_bus.emit(&ManagerEvent::NavigateUrlRequested {
                        url: "?path=/story/a--b".to_string(),
                        options: NavigateOptions::replace(),
                    });
                }),
            );
        }

        bus.emit(&ManagerEvent::CurrentItemSelected);
        assert_eq!(navigations.get(), 1);
        assert_eq!(EventTopic::ItemArgsUpdated.token(), "item-args-updated");
    }
}
