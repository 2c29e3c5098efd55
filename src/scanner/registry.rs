use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::models::ScanReport;

/// Entries older than this are dropped by `sweep`.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanStatus {
    Running { current: usize, total: usize },
    Complete,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct ScanEntry {
    pub status: ScanStatus,
    pub report: Option<ScanReport>,
    created_at: Instant,
}

/// Shared store of in-flight and recently finished scans, keyed by scan id.
/// The orchestrator's progress callback writes while status queries read,
/// so access goes through an async RwLock. Eviction is an explicit sweep
/// the host invokes, not a timer per entry.
#[derive(Clone, Default)]
pub struct ScanRegistry {
    inner: Arc<RwLock<HashMap<String, ScanEntry>>>,
}

impl ScanRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, scan_id: &str, total: usize) {
        let entry = ScanEntry {
            status: ScanStatus::Running { current: 0, total },
            report: None,
            created_at: Instant::now(),
        };
        self.inner.write().await.insert(scan_id.to_string(), entry);
    }

    pub async fn update_progress(&self, scan_id: &str, current: usize, total: usize) {
        if let Some(entry) = self.inner.write().await.get_mut(scan_id) {
            entry.status = ScanStatus::Running { current, total };
        }
    }

    pub async fn complete(&self, scan_id: &str, report: ScanReport) {
        if let Some(entry) = self.inner.write().await.get_mut(scan_id) {
            entry.status = ScanStatus::Complete;
            entry.report = Some(report);
        }
    }

    pub async fn fail(&self, scan_id: &str, reason: String) {
        if let Some(entry) = self.inner.write().await.get_mut(scan_id) {
            entry.status = ScanStatus::Failed(reason);
        }
    }

    pub async fn get(&self, scan_id: &str) -> Option<ScanEntry> {
        self.inner.read().await.get(scan_id).cloned()
    }

    /// Drops entries past the retention window; returns how many were
    /// evicted.
    pub async fn sweep(&self, retention: Duration) -> usize {
        let mut map = self.inner.write().await;
        let before = map.len();
        map.retain(|_, entry| entry.created_at.elapsed() < retention);
        before - map.len()
    }
}
