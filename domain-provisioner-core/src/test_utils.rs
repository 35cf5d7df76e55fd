//! Test helper module
//!
//! Mock implementations and convenience factories.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

use domain_provisioner_provider::{
    DomainProvider, DomainProvisioningResponse, ProviderError, ProviderMetadata, ProviderType,
};

use crate::error::CoreResult;
use crate::events::EventDispatcherBuilder;
use crate::services::{DomainDaemonSync, DomainEventSubscriber, ProvisionServerDomain, ServiceContext};
use crate::traits::{
    DomainRootRepository, InMemoryProviderRegistry, ProvisionQueue, ServerDomainRepository,
};
use crate::types::{
    DomainRoot, DomainRootListQuery, DomainRootSortField, DomainStatus, NewDomainRoot,
    NewServerDomain, PaginatedResponse, ServerDomain,
};

// ===== Fixtures =====

pub fn make_domain(id: i64, hostname: &str, root_id: Option<i64>) -> ServerDomain {
    let now = Utc::now();
    ServerDomain {
        id,
        server_id: 42,
        domain_root_id: root_id,
        domain_type: "managed".to_string(),
        hostname: hostname.to_string(),
        subdomain: hostname.split('.').next().map(str::to_string),
        status: DomainStatus::Pending,
        verification_method: None,
        verification_token: None,
        verified_at: None,
        provider_payload: None,
        last_synced_at: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn make_root(id: i64, root_domain: &str, provider: &str) -> DomainRoot {
    let now = Utc::now();
    DomainRoot {
        id,
        name: root_domain.to_string(),
        root_domain: root_domain.to_string(),
        provider: provider.to_string(),
        provider_config: Map::new(),
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

// ===== MockServerDomainRepository =====

pub struct MockServerDomainRepository {
    domains: RwLock<BTreeMap<i64, ServerDomain>>,
}

impl MockServerDomainRepository {
    pub fn new() -> Self {
        Self {
            domains: RwLock::new(BTreeMap::new()),
        }
    }

    pub async fn insert(&self, domain: ServerDomain) {
        self.domains.write().await.insert(domain.id, domain);
    }
}

#[async_trait]
impl ServerDomainRepository for MockServerDomainRepository {
    async fn find_by_id(&self, id: i64) -> CoreResult<Option<ServerDomain>> {
        Ok(self.domains.read().await.get(&id).cloned())
    }

    async fn find_by_hostname(&self, hostname: &str) -> CoreResult<Option<ServerDomain>> {
        Ok(self
            .domains
            .read()
            .await
            .values()
            .find(|d| d.hostname == hostname)
            .cloned())
    }

    async fn find_by_server(&self, server_id: i64) -> CoreResult<Vec<ServerDomain>> {
        Ok(self
            .domains
            .read()
            .await
            .values()
            .filter(|d| d.server_id == server_id)
            .cloned()
            .collect())
    }

    async fn create(&self, domain: NewServerDomain) -> CoreResult<ServerDomain> {
        let mut store = self.domains.write().await;
        let id = store.keys().next_back().map_or(1, |id| id + 1);
        let now = Utc::now();
        let created = ServerDomain {
            id,
            server_id: domain.server_id,
            domain_root_id: domain.domain_root_id,
            domain_type: domain.domain_type,
            hostname: domain.hostname,
            subdomain: domain.subdomain,
            status: domain.status,
            verification_method: domain.verification_method,
            verification_token: domain.verification_token,
            verified_at: None,
            provider_payload: None,
            last_synced_at: None,
            created_at: now,
            updated_at: now,
        };
        store.insert(id, created.clone());
        Ok(created)
    }

    async fn save(&self, domain: &ServerDomain) -> CoreResult<()> {
        let mut saved = domain.clone();
        saved.updated_at = Utc::now();
        self.domains.write().await.insert(saved.id, saved);
        Ok(())
    }
}

// ===== MockDomainRootRepository =====

pub struct MockDomainRootRepository {
    roots: RwLock<BTreeMap<i64, DomainRoot>>,
    last_query: RwLock<Option<DomainRootListQuery>>,
}

impl MockDomainRootRepository {
    pub fn new() -> Self {
        Self {
            roots: RwLock::new(BTreeMap::new()),
            last_query: RwLock::new(None),
        }
    }

    pub async fn insert(&self, root: DomainRoot) {
        self.roots.write().await.insert(root.id, root);
    }

    pub async fn last_query(&self) -> Option<DomainRootListQuery> {
        self.last_query.read().await.clone()
    }
}

fn apply_root(root: &mut DomainRoot, values: NewDomainRoot) {
    root.name = values.name;
    root.root_domain = values.root_domain;
    root.provider = values.provider;
    root.provider_config = values.provider_config;
    root.is_active = values.is_active;
    root.updated_at = Utc::now();
}

#[async_trait]
impl DomainRootRepository for MockDomainRootRepository {
    async fn find_by_id(&self, id: i64) -> CoreResult<Option<DomainRoot>> {
        Ok(self.roots.read().await.get(&id).cloned())
    }

    async fn find_by_root_domain(&self, root_domain: &str) -> CoreResult<Option<DomainRoot>> {
        Ok(self
            .roots
            .read()
            .await
            .values()
            .find(|r| r.root_domain == root_domain)
            .cloned())
    }

    async fn list(&self, query: &DomainRootListQuery) -> CoreResult<PaginatedResponse<DomainRoot>> {
        *self.last_query.write().await = Some(query.clone());
        let f = &query.filter;
        let mut items: Vec<DomainRoot> = self
            .roots
            .read()
            .await
            .values()
            .filter(|r| f.id.is_none_or(|id| r.id == id))
            .filter(|r| f.name.as_ref().is_none_or(|n| r.name.contains(n.as_str())))
            .filter(|r| {
                f.root_domain
                    .as_ref()
                    .is_none_or(|d| r.root_domain.contains(d.as_str()))
            })
            .filter(|r| f.provider.as_ref().is_none_or(|p| &r.provider == p))
            .filter(|r| f.is_active.is_none_or(|a| r.is_active == a))
            .cloned()
            .collect();

        items.sort_by(|a, b| match query.sort.field {
            DomainRootSortField::Id => a.id.cmp(&b.id),
            DomainRootSortField::Name => a.name.cmp(&b.name),
            DomainRootSortField::RootDomain => a.root_domain.cmp(&b.root_domain),
            DomainRootSortField::Provider => a.provider.cmp(&b.provider),
            DomainRootSortField::IsActive => a.is_active.cmp(&b.is_active),
            DomainRootSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        });
        if query.sort.descending {
            items.reverse();
        }

        let total = items.len() as u64;
        let skip = usize::try_from((query.page - 1) * query.per_page).unwrap_or(usize::MAX);
        let take = usize::try_from(query.per_page).unwrap_or(usize::MAX);
        let items = items.into_iter().skip(skip).take(take).collect();
        Ok(PaginatedResponse::new(items, query.page, query.per_page, total))
    }

    async fn create(&self, root: NewDomainRoot) -> CoreResult<DomainRoot> {
        let mut store = self.roots.write().await;
        let id = store.keys().next_back().map_or(1, |id| id + 1);
        let mut created = make_root(id, &root.root_domain, &root.provider);
        apply_root(&mut created, root);
        store.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, root: NewDomainRoot) -> CoreResult<Option<DomainRoot>> {
        let mut store = self.roots.write().await;
        let Some(existing) = store.get_mut(&id) else {
            return Ok(None);
        };
        apply_root(existing, root);
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, id: i64) -> CoreResult<bool> {
        Ok(self.roots.write().await.remove(&id).is_some())
    }
}

// ===== RecordingSync =====

/// A notification seen by [`RecordingSync`], keyed by hostname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncCall {
    Requested(String),
    Provisioned(String),
    Failed(String, String),
}

pub struct RecordingSync {
    calls: Mutex<Vec<SyncCall>>,
}

impl RecordingSync {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }

    pub async fn calls(&self) -> Vec<SyncCall> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl DomainDaemonSync for RecordingSync {
    async fn requested(&self, domain: &ServerDomain) {
        self.calls
            .lock()
            .await
            .push(SyncCall::Requested(domain.hostname.clone()));
    }

    async fn provisioned(&self, domain: &ServerDomain) {
        self.calls
            .lock()
            .await
            .push(SyncCall::Provisioned(domain.hostname.clone()));
    }

    async fn failed(&self, domain: &ServerDomain, reason: &str) {
        self.calls
            .lock()
            .await
            .push(SyncCall::Failed(domain.hostname.clone(), reason.to_string()));
    }
}

// ===== RecordingQueue =====

pub struct RecordingQueue {
    dispatched: Mutex<Vec<i64>>,
}

impl RecordingQueue {
    pub fn new() -> Self {
        Self {
            dispatched: Mutex::new(Vec::new()),
        }
    }

    pub async fn dispatched(&self) -> Vec<i64> {
        self.dispatched.lock().await.clone()
    }
}

#[async_trait]
impl ProvisionQueue for RecordingQueue {
    async fn dispatch(&self, domain_id: i64) -> CoreResult<()> {
        self.dispatched.lock().await.push(domain_id);
        Ok(())
    }
}

// ===== MockProvider =====

enum Outcome {
    Succeed { verified: bool },
    Fail(ProviderError),
}

pub struct MockProvider {
    id: &'static str,
    outcome: Outcome,
    seen_statuses: Mutex<Vec<DomainStatus>>,
}

impl MockProvider {
    fn with_outcome(id: &'static str, outcome: Outcome) -> Self {
        Self {
            id,
            outcome,
            seen_statuses: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding(id: &'static str) -> Self {
        Self::with_outcome(id, Outcome::Succeed { verified: true })
    }

    pub fn unverified(id: &'static str) -> Self {
        Self::with_outcome(id, Outcome::Succeed { verified: false })
    }

    pub fn failing(id: &'static str, error: ProviderError) -> Self {
        Self::with_outcome(id, Outcome::Fail(error))
    }

    /// Status of each domain at the moment `provision` was called.
    pub async fn seen_statuses(&self) -> Vec<DomainStatus> {
        self.seen_statuses.lock().await.clone()
    }
}

#[async_trait]
impl DomainProvider for MockProvider {
    fn id(&self) -> &'static str {
        self.id
    }

    fn metadata() -> ProviderMetadata {
        ProviderMetadata {
            id: ProviderType::Manual,
            name: "Mock".to_string(),
            description: "Test provider".to_string(),
            config_fields: Vec::new(),
            features: Default::default(),
        }
    }

    async fn provision(
        &self,
        domain: &ServerDomain,
        _root: &DomainRoot,
    ) -> domain_provisioner_provider::Result<DomainProvisioningResponse> {
        self.seen_statuses.lock().await.push(domain.status);
        match &self.outcome {
            Outcome::Succeed { verified } => {
                let mut payload = Map::new();
                payload.insert(
                    "record_id".to_string(),
                    Value::String(format!("rec-{}", domain.hostname)),
                );
                Ok(DomainProvisioningResponse::new(payload, *verified, None, None))
            }
            Outcome::Fail(e) => Err(e.clone()),
        }
    }
}

// ===== Harness =====

/// Mocks wired the way the composition root wires the real services.
pub struct Harness {
    pub domains: Arc<MockServerDomainRepository>,
    pub roots: Arc<MockDomainRootRepository>,
    pub registry: Arc<InMemoryProviderRegistry>,
    pub sync: Arc<RecordingSync>,
    pub ctx: Arc<ServiceContext>,
}

impl Harness {
    pub fn new() -> Self {
        let domains = Arc::new(MockServerDomainRepository::new());
        let roots = Arc::new(MockDomainRootRepository::new());
        let registry = Arc::new(InMemoryProviderRegistry::new());
        let sync = Arc::new(RecordingSync::new());

        let mut builder = EventDispatcherBuilder::new();
        builder.subscribe(Arc::new(DomainEventSubscriber::new(
            domains.clone(),
            sync.clone(),
        )));

        let ctx = Arc::new(ServiceContext::new(
            domains.clone(),
            roots.clone(),
            registry.clone(),
            Arc::new(builder.build()),
        ));

        Self {
            domains,
            roots,
            registry,
            sync,
            ctx,
        }
    }

    pub fn job(&self) -> ProvisionServerDomain {
        ProvisionServerDomain::new(self.ctx.clone())
    }

    pub async fn domain(&self, id: i64) -> ServerDomain {
        self.domains
            .find_by_id(id)
            .await
            .unwrap()
            .expect("domain exists")
    }
}

// ===== Capture server =====

/// A request as received by [`serve_once`] / [`serve_sequence`].
#[derive(Debug)]
pub struct CapturedRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl CapturedRequest {
    /// Header value by lower-case name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

async fn read_request(socket: &mut TcpStream) -> CapturedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before headers were complete");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default().to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();
    let content_length = headers
        .iter()
        .find(|(k, _)| k == "content-length")
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    CapturedRequest {
        request_line,
        headers,
        body: String::from_utf8_lossy(&buf[header_end..]).to_string(),
    }
}

async fn write_response(socket: &mut TcpStream, status: u16, body: &str) {
    let response = format!(
        "HTTP/1.1 {status} Test\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    socket.write_all(response.as_bytes()).await.unwrap();
    let _ = socket.shutdown().await;
}

/// Answer one connection per `(status, body)` pair, in order, and return
/// every request received.
pub async fn serve_sequence(
    responses: Vec<(u16, &'static str)>,
) -> (String, JoinHandle<Vec<CapturedRequest>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut captured = Vec::with_capacity(responses.len());
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            captured.push(read_request(&mut socket).await);
            write_response(&mut socket, status, body).await;
        }
        captured
    });

    (format!("http://{addr}"), handle)
}

/// Answer a single connection and return what the client sent.
pub async fn serve_once(
    status: u16,
    body: &'static str,
) -> (String, JoinHandle<CapturedRequest>) {
    let (url, handle) = serve_sequence(vec![(status, body)]).await;
    let handle = tokio::spawn(async move {
        handle
            .await
            .unwrap()
            .pop()
            .expect("one request captured")
    });
    (url, handle)
}
