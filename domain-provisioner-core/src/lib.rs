//! Domain Provisioner Core Library
//!
//! Workflow for binding hostnames to hosted servers:
//! - `DomainProvisioningService` records a request and queues a job
//! - `ProvisionServerDomain` runs the root's provider and stores the outcome
//! - `EventDispatcher` carries the three lifecycle events to listeners
//! - `DomainEventSubscriber` forwards each event to the node daemon through
//!   `DomainDaemonSync`
//!
//! Storage is abstracted behind the repository traits in [`traits`]; the
//! composition root lives in `domain-provisioner-app`.

pub mod config;
pub mod error;
pub mod events;
pub mod services;
pub mod traits;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use config::DomainSyncConfig;
pub use error::{CoreError, CoreResult};
pub use events::{DomainEvent, DomainEventKind, EventDispatcher, EventDispatcherBuilder};
pub use services::ServiceContext;
pub use traits::{
    DomainRootRepository, ProviderRegistry, ProvisionQueue, ServerDomainRepository,
};
