//! Type definition module

mod domain_root;
mod response;
mod server_domain;

pub use domain_root::{
    DomainRootFilter, DomainRootInput, DomainRootListQuery, DomainRootQuery, DomainRootSort,
    DomainRootSortField, NewDomainRoot,
};
pub use response::PaginatedResponse;
pub use server_domain::{DomainRequest, NewServerDomain, ServerRef, DEFAULT_DOMAIN_TYPE};

// Re-export provider library model types
pub use domain_provisioner_provider::{
    DomainProvisioningResponse, DomainRoot, DomainStatus, ProviderMetadata, ProviderPayload,
    ProviderType, ServerDomain,
};
