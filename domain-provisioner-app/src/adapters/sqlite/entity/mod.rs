//! `SeaORM` entities.

pub mod domain_root;
pub mod server_domain;
