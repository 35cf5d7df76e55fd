//! Storage and collaborator abstractions

mod domain_root_repository;
mod provider_registry;
mod provision_queue;
mod server_domain_repository;

pub use domain_root_repository::DomainRootRepository;
pub use provider_registry::{InMemoryProviderRegistry, ProviderRegistry};
pub use provision_queue::ProvisionQueue;
pub use server_domain_repository::ServerDomainRepository;
