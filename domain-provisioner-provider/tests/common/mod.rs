//! Shared helpers for provider integration tests

#![allow(dead_code)]

use chrono::Utc;
use domain_provisioner_provider::{DomainRoot, DomainStatus, ServerDomain};
use serde_json::{Map, Value};

/// Skip the test when an environment variable is missing.
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("Skipping test: missing environment variable {}", $var);
                return;
            }
        )+
    };
}

/// Assert a `Result` is `Ok` and unwrap it, failing the test otherwise.
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

pub fn root(provider: &str, root_domain: &str, config: Value) -> DomainRoot {
    let provider_config = match config {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    DomainRoot {
        id: 1,
        name: "Test root".to_string(),
        root_domain: root_domain.to_string(),
        provider: provider.to_string(),
        provider_config,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn server_domain(subdomain: &str, root_domain: &str) -> ServerDomain {
    ServerDomain {
        id: 1,
        server_id: 1,
        domain_root_id: Some(1),
        domain_type: "managed".to_string(),
        hostname: format!("{subdomain}.{root_domain}"),
        subdomain: Some(subdomain.to_string()),
        status: DomainStatus::Provisioning,
        verification_method: None,
        verification_token: None,
        verified_at: None,
        provider_payload: None,
        last_synced_at: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Unique test subdomain
pub fn generate_test_subdomain() -> String {
    format!("_test-{}", Utc::now().timestamp_millis())
}
