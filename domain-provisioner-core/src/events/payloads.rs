//! Versioned event payloads

use std::fmt;

use serde::{Deserialize, Serialize};

/// Current payload schema version
pub const EVENT_VERSION: u16 = 1;

/// A hostname was requested (or re-requested) and a job was queued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerDomainProvisionRequested {
    pub version: u16,
    pub domain_id: i64,
}

/// The provider accepted the hostname, or the root needs no automation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerDomainProvisioned {
    pub version: u16,
    pub domain_id: i64,
}

/// Provisioning failed; `reason` is shown to administrators as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerDomainProvisionFailed {
    pub version: u16,
    pub domain_id: i64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum DomainEvent {
    ProvisionRequested(ServerDomainProvisionRequested),
    Provisioned(ServerDomainProvisioned),
    ProvisionFailed(ServerDomainProvisionFailed),
}

impl DomainEvent {
    pub fn requested(domain_id: i64) -> Self {
        Self::ProvisionRequested(ServerDomainProvisionRequested {
            version: EVENT_VERSION,
            domain_id,
        })
    }

    pub fn provisioned(domain_id: i64) -> Self {
        Self::Provisioned(ServerDomainProvisioned {
            version: EVENT_VERSION,
            domain_id,
        })
    }

    pub fn failed(domain_id: i64, reason: impl Into<String>) -> Self {
        Self::ProvisionFailed(ServerDomainProvisionFailed {
            version: EVENT_VERSION,
            domain_id,
            reason: reason.into(),
        })
    }

    pub fn kind(&self) -> DomainEventKind {
        match self {
            Self::ProvisionRequested(_) => DomainEventKind::ProvisionRequested,
            Self::Provisioned(_) => DomainEventKind::Provisioned,
            Self::ProvisionFailed(_) => DomainEventKind::ProvisionFailed,
        }
    }

    pub fn domain_id(&self) -> i64 {
        match self {
            Self::ProvisionRequested(e) => e.domain_id,
            Self::Provisioned(e) => e.domain_id,
            Self::ProvisionFailed(e) => e.domain_id,
        }
    }
}

/// Key of the dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainEventKind {
    ProvisionRequested,
    Provisioned,
    ProvisionFailed,
}

impl DomainEventKind {
    pub const ALL: [Self; 3] = [
        Self::ProvisionRequested,
        Self::Provisioned,
        Self::ProvisionFailed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProvisionRequested => "ServerDomainProvisionRequested",
            Self::Provisioned => "ServerDomainProvisioned",
            Self::ProvisionFailed => "ServerDomainProvisionFailed",
        }
    }
}

impl fmt::Display for DomainEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_stamp_current_version() {
        let DomainEvent::ProvisionFailed(failed) = DomainEvent::failed(3, "dns lookup timeout")
        else {
            unreachable!("failed() builds a ProvisionFailed event");
        };
        assert_eq!(failed.version, EVENT_VERSION);
        assert_eq!(failed.reason, "dns lookup timeout");
    }

    #[test]
    fn serialized_payload_holds_ids_only() {
        let json = serde_json::to_value(DomainEvent::provisioned(9)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "event": "provisioned",
                "payload": { "version": 1, "domain_id": 9 }
            })
        );
    }

    #[test]
    fn kind_and_id_accessors() {
        let event = DomainEvent::requested(4);
        assert_eq!(event.kind(), DomainEventKind::ProvisionRequested);
        assert_eq!(event.domain_id(), 4);
        assert_eq!(event.kind().to_string(), "ServerDomainProvisionRequested");
    }
}
