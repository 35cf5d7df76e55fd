//! Typed event dispatch table

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::{DomainEvent, DomainEventKind};
use crate::error::CoreResult;

/// Handler for one or more event kinds.
#[async_trait]
pub trait DomainEventListener: Send + Sync {
    async fn handle(&self, event: &DomainEvent) -> CoreResult<()>;
}

/// A component that registers several listeners at once.
pub trait EventSubscriber {
    fn subscribe(self: Arc<Self>, builder: &mut EventDispatcherBuilder);
}

/// Collects registrations at startup; [`build`](Self::build) freezes them.
#[derive(Default)]
pub struct EventDispatcherBuilder {
    listeners: HashMap<DomainEventKind, Vec<Arc<dyn DomainEventListener>>>,
}

impl EventDispatcherBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for `kind`. Listeners run in registration order.
    pub fn listen(&mut self, kind: DomainEventKind, listener: Arc<dyn DomainEventListener>) -> &mut Self {
        self.listeners.entry(kind).or_default().push(listener);
        self
    }

    pub fn subscribe<S: EventSubscriber>(&mut self, subscriber: Arc<S>) -> &mut Self {
        subscriber.subscribe(self);
        self
    }

    #[must_use]
    pub fn build(self) -> EventDispatcher {
        EventDispatcher {
            listeners: self.listeners,
        }
    }
}

/// Immutable dispatch table owned by the composition root.
pub struct EventDispatcher {
    listeners: HashMap<DomainEventKind, Vec<Arc<dyn DomainEventListener>>>,
}

impl EventDispatcher {
    /// Number of listeners registered for `kind`.
    pub fn listener_count(&self, kind: DomainEventKind) -> usize {
        self.listeners.get(&kind).map_or(0, Vec::len)
    }

    /// Run every listener for the event's kind and return how many ran.
    ///
    /// A failing listener is logged and does not stop the others; the
    /// publisher never sees listener errors.
    pub async fn publish(&self, event: DomainEvent) -> usize {
        let kind = event.kind();
        let Some(listeners) = self.listeners.get(&kind) else {
            log::debug!("No listeners for {kind} (domain {})", event.domain_id());
            return 0;
        };

        for listener in listeners {
            if let Err(e) = listener.handle(&event).await {
                if e.is_expected() {
                    log::warn!("Listener for {kind} failed (domain {}): {e}", event.domain_id());
                } else {
                    log::error!("Listener for {kind} failed (domain {}): {e}", event.domain_id());
                }
            }
        }
        listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use tokio::sync::Mutex;

    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    #[async_trait]
    impl DomainEventListener for Recorder {
        async fn handle(&self, event: &DomainEvent) -> CoreResult<()> {
            self.log
                .lock()
                .await
                .push(format!("{}:{}", self.name, event.domain_id()));
            if self.fail {
                return Err(CoreError::DomainNotFound(event.domain_id()));
            }
            Ok(())
        }
    }

    fn recorder(name: &'static str, log: &Arc<Mutex<Vec<String>>>, fail: bool) -> Arc<Recorder> {
        Arc::new(Recorder {
            name,
            log: log.clone(),
            fail,
        })
    }

    #[tokio::test]
    async fn listeners_run_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut builder = EventDispatcherBuilder::new();
        builder
            .listen(DomainEventKind::Provisioned, recorder("first", &log, false))
            .listen(DomainEventKind::Provisioned, recorder("second", &log, false))
            .listen(DomainEventKind::ProvisionFailed, recorder("other", &log, false));
        let dispatcher = builder.build();

        let ran = dispatcher.publish(DomainEvent::provisioned(5)).await;

        assert_eq!(ran, 2);
        assert_eq!(*log.lock().await, ["first:5", "second:5"]);
    }

    #[tokio::test]
    async fn failing_listener_does_not_stop_the_rest() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut builder = EventDispatcherBuilder::new();
        builder
            .listen(DomainEventKind::ProvisionRequested, recorder("broken", &log, true))
            .listen(DomainEventKind::ProvisionRequested, recorder("after", &log, false));
        let dispatcher = builder.build();

        let ran = dispatcher.publish(DomainEvent::requested(1)).await;

        assert_eq!(ran, 2);
        assert_eq!(*log.lock().await, ["broken:1", "after:1"]);
    }

    #[tokio::test]
    async fn unregistered_kind_runs_nothing() {
        let dispatcher = EventDispatcherBuilder::new().build();
        assert_eq!(dispatcher.publish(DomainEvent::failed(1, "x")).await, 0);
        assert_eq!(dispatcher.listener_count(DomainEventKind::ProvisionFailed), 0);
    }
}
