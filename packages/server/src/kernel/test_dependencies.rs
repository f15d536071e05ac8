// TestDependencies - mock implementations for testing
//
// Provides mock services and fault-injecting storage that can be wired into ServerDeps for tests.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use super::analytics::InMemoryAnalytics;
use super::deps::{Limits, ServerDeps};
use super::store::{BaseTable, Item, MemoryStore, PrimaryKey, Query, StoreError, StoreResult, TableSchema};
use super::BaseEmailService;
use tokio::sync::Notify;

// =============================================================================
// Mock Email Service
// =============================================================================

/// Arguments captured from a send call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub recipient: String,
    pub subject: String,
    pub html_content: String,
}

pub struct MockEmailService {
    failing_recipients: Arc<Mutex<HashSet<String>>>,
    held_recipients: Arc<Mutex<HashMap<String, Arc<Notify>>>>,
    calls: Arc<Mutex<Vec<SentEmail>>>,
}

impl MockEmailService {
    pub fn new() -> Self {
        Self {
            failing_recipients: Arc::new(Mutex::new(HashSet::new())),
            held_recipients: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Make every send to `recipient` fail
    pub fn failing_for(self, recipient: &str) -> Self {
        self.failing_recipients
            .lock()
            .unwrap()
            .insert(recipient.to_string());
        self
    }

    /// Keep sends to `recipient` pending until `gate` is notified
    pub fn held_until(self, recipient: &str, gate: Arc<Notify>) -> Self {
        self.held_recipients
            .lock()
            .unwrap()
            .insert(recipient.to_string(), gate);
        self
    }

    /// Get all send attempts, failed ones included
    pub fn calls(&self) -> Vec<SentEmail> {
        self.calls.lock().unwrap().clone()
    }

    pub fn was_sent_to(&self, recipient: &str) -> bool {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .any(|c| c.recipient == recipient)
    }
}

impl Default for MockEmailService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseEmailService for MockEmailService {
    async fn send_email(&self, recipient: &str, subject: &str, html_content: &str) -> Result<()> {
        self.calls.lock().unwrap().push(SentEmail {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            html_content: html_content.to_string(),
        });

        let gate = self.held_recipients.lock().unwrap().get(recipient).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.failing_recipients.lock().unwrap().contains(recipient) {
            anyhow::bail!("Mock delivery failure for {}", recipient);
        }
        Ok(())
    }
}

// =============================================================================
// Faulty Table (storage fault injection)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableOp {
    Get,
    Put,
    Update,
    Delete,
    Scan,
    Query,
}

/// Wraps a real table and fails the configured operations with a database error
pub struct FaultyTable {
    inner: Arc<dyn BaseTable>,
    failing: HashSet<TableOp>,
}

impl FaultyTable {
    pub fn new(inner: Arc<dyn BaseTable>) -> Self {
        Self {
            inner,
            failing: HashSet::new(),
        }
    }

    pub fn failing_on(mut self, op: TableOp) -> Self {
        self.failing.insert(op);
        self
    }

    fn check(&self, op: TableOp) -> StoreResult<()> {
        if self.failing.contains(&op) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl BaseTable for FaultyTable {
    fn schema(&self) -> &TableSchema {
        self.inner.schema()
    }

    async fn get(&self, key: &PrimaryKey) -> StoreResult<Option<Item>> {
        self.check(TableOp::Get)?;
        self.inner.get(key).await
    }

    async fn put(&self, item: Item) -> StoreResult<Item> {
        self.check(TableOp::Put)?;
        self.inner.put(item).await
    }

    async fn update(&self, key: &PrimaryKey, changes: Item) -> StoreResult<Option<Item>> {
        self.check(TableOp::Update)?;
        self.inner.update(key, changes).await
    }

    async fn delete(&self, key: &PrimaryKey) -> StoreResult<bool> {
        self.check(TableOp::Delete)?;
        self.inner.delete(key).await
    }

    async fn scan(&self) -> StoreResult<Vec<Item>> {
        self.check(TableOp::Scan)?;
        self.inner.scan().await
    }

    async fn query(&self, query: &Query) -> StoreResult<Vec<Item>> {
        self.check(TableOp::Query)?;
        self.inner.query(query).await
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

pub const TEST_TABLE_PREFIX: &str = "Test";

#[derive(Clone)]
pub struct TestDependencies {
    pub store: MemoryStore,
    pub email_service: Arc<MockEmailService>,
    pub analytics: Arc<InMemoryAnalytics>,
    pub limits: Limits,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            store: MemoryStore::new(),
            email_service: Arc::new(MockEmailService::new()),
            analytics: Arc::new(InMemoryAnalytics::new()),
            limits: Limits::default(),
        }
    }

    /// Set a mock email service
    pub fn mock_email(mut self, service: MockEmailService) -> Self {
        self.email_service = Arc::new(service);
        self
    }

    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Wire the mocks into ServerDeps over the in-memory store
    pub fn into_server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            Arc::new(self.store.clone()),
            TEST_TABLE_PREFIX,
            self.email_service.clone(),
            self.analytics.clone(),
            self.limits,
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
