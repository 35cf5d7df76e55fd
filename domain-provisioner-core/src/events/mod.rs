//! Domain lifecycle events and the dispatch table.
//!
//! Payloads carry identifiers only; listeners re-fetch the domain so that a
//! queued or delayed event never acts on a stale copy of the record.

mod dispatcher;
mod payloads;

pub use dispatcher::{DomainEventListener, EventDispatcher, EventDispatcherBuilder, EventSubscriber};
pub use payloads::{
    DomainEvent, DomainEventKind, ServerDomainProvisionFailed, ServerDomainProvisionRequested,
    ServerDomainProvisioned, EVENT_VERSION,
};
