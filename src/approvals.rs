//! Durable log of approve/reject decisions, independent of entity status.
//!
//! Decisions are kept per entity instance as an append-only sequence; the
//! current approval state is the action of the last entry, or pending when
//! nothing was recorded. The whole log is serialized as one JSON object
//! mapping `"<entityType>:<id>"` keys to entry arrays, stored as a single
//! blob under one fixed storage key and read-modify-written on every
//! append. That blob shape is the exported history format and must not
//! change.
//!
//! Storage may refuse service. Writes then degrade to no-ops and reads to
//! empty history; nothing propagates as an error, but every append reports
//! whether it reached durable storage so callers can warn.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sled::Db;
use tracing::{debug, warn};

/// Fixed key the serialized log lives under.
const STORAGE_KEY: &str = "innobi-approvals";

/// The two record kinds that carry approval decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Invoice,
    PurchaseOrder,
}

impl EntityKind {
    /// Wire name used in storage keys, part of the exported format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::PurchaseOrder => "purchase_order",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalAction {
    Approved,
    Rejected,
}

/// Approval state derived from the log: pending until a decision lands,
/// afterwards the latest action wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalState {
    Pending,
    Approved,
    Rejected,
}

impl From<ApprovalAction> for ApprovalState {
    fn from(action: ApprovalAction) -> Self {
        match action {
            ApprovalAction::Approved => Self::Approved,
            ApprovalAction::Rejected => Self::Rejected,
        }
    }
}

/// One recorded decision. Timestamps serialize as ISO-8601 strings, part
/// of the exported format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub action: ApprovalAction,
    pub timestamp: DateTime<Utc>,
}

/// Whether an append reached durable storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum WriteOutcome {
    Persisted,
    Dropped,
}

/// Storage medium holding the single serialized log blob.
///
/// A backend signals unavailability by returning `None`/`false`; the store
/// degrades instead of failing.
pub trait ApprovalBackend {
    fn load(&self) -> Option<Vec<u8>>;
    fn store(&self, blob: &[u8]) -> bool;
}

/// Production backend over a local sled database.
pub struct SledBackend {
    db: Arc<Db>,
}

impl SledBackend {
    pub fn new(db: Arc<Db>) -> Self {
        Self { db }
    }

    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        Ok(Self::new(Arc::new(sled::open(path)?)))
    }
}

impl ApprovalBackend for SledBackend {
    fn load(&self) -> Option<Vec<u8>> {
        match self.db.get(STORAGE_KEY) {
            Ok(value) => value.map(|v| v.to_vec()),
            Err(e) => {
                warn!(error = %e, "approval log read failed");
                None
            }
        }
    }

    fn store(&self, blob: &[u8]) -> bool {
        match self.db.insert(STORAGE_KEY, blob) {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "approval log write failed");
                false
            }
        }
    }
}

/// In-memory backend for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryBackend {
    blob: RwLock<Option<Vec<u8>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ApprovalBackend for MemoryBackend {
    fn load(&self) -> Option<Vec<u8>> {
        match self.blob.read() {
            Ok(guard) => guard.clone(),
            Err(_) => None,
        }
    }

    fn store(&self, blob: &[u8]) -> bool {
        match self.blob.write() {
            Ok(mut guard) => {
                *guard = Some(blob.to_vec());
                true
            }
            Err(_) => false,
        }
    }
}

type ApprovalLog = BTreeMap<String, Vec<HistoryEntry>>;

/// Append-only decision log over an injectable backend.
///
/// Appends rewrite the whole blob, so two writers racing on the same
/// entity are last-writer-wins at blob granularity. Single-operator usage
/// is assumed.
pub struct ApprovalStore<B> {
    backend: B,
}

impl<B: ApprovalBackend> ApprovalStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    fn key(kind: EntityKind, id: i64) -> String {
        format!("{}:{}", kind.as_str(), id)
    }

    // Missing and corrupt blobs both read as an empty log.
    fn load_log(&self) -> ApprovalLog {
        let Some(blob) = self.backend.load() else {
            return ApprovalLog::new();
        };
        match serde_json::from_slice(&blob) {
            Ok(log) => log,
            Err(e) => {
                warn!(error = %e, "approval log blob failed to parse, treating as empty");
                ApprovalLog::new()
            }
        }
    }

    /// Appends a decision stamped with the current time.
    pub fn record(&self, kind: EntityKind, id: i64, action: ApprovalAction) -> WriteOutcome {
        self.record_at(kind, id, action, Utc::now())
    }

    /// Appends a decision with an explicit timestamp. Never fails: when the
    /// backend refuses the write the decision is dropped and the outcome
    /// says so.
    pub fn record_at(
        &self,
        kind: EntityKind,
        id: i64,
        action: ApprovalAction,
        timestamp: DateTime<Utc>,
    ) -> WriteOutcome {
        let mut log = self.load_log();
        log.entry(Self::key(kind, id))
            .or_default()
            .push(HistoryEntry { action, timestamp });

        let blob = match serde_json::to_vec(&log) {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, "approval log failed to serialize, decision dropped");
                return WriteOutcome::Dropped;
            }
        };

        if self.backend.store(&blob) {
            debug!(entity = kind.as_str(), id, ?action, "approval decision recorded");
            WriteOutcome::Persisted
        } else {
            warn!(entity = kind.as_str(), id, "approval storage unavailable, decision dropped");
            WriteOutcome::Dropped
        }
    }

    /// Full ordered history for one entity, empty when none was recorded.
    pub fn history(&self, kind: EntityKind, id: i64) -> Vec<HistoryEntry> {
        self.load_log()
            .remove(&Self::key(kind, id))
            .unwrap_or_default()
    }

    /// Latest recorded decision, if any.
    pub fn last_decision(&self, kind: EntityKind, id: i64) -> Option<HistoryEntry> {
        self.history(kind, id).pop()
    }

    pub fn state(&self, kind: EntityKind, id: i64) -> ApprovalState {
        match self.last_decision(kind, id) {
            None => ApprovalState::Pending,
            Some(entry) => entry.action.into(),
        }
    }
}
