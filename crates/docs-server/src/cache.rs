/// Time-bounded memoization of the documentation structure.
///
/// A scan is reused until it is `ttl` old; a zero `ttl` rescans on every call.
/// Concurrent callers that find the entry stale wait on the write lock and pick
/// up the structure the first of them produced. Content reads are never cached.
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::scanner::build_structure;
use docs_common::docs_api::DocsStructure;

struct CachedStructure {
    scanned_at: Instant,
    structure: Arc<DocsStructure>,
}

impl CachedStructure {
    fn fresh(&self, ttl: Duration) -> Option<Arc<DocsStructure>> {
        (self.scanned_at.elapsed() < ttl).then(|| Arc::clone(&self.structure))
    }
}

pub struct StructureCache {
    root: PathBuf,
    ttl: Duration,
    entry: RwLock<Option<CachedStructure>>,
}

impl StructureCache {
    pub fn new(root: PathBuf, ttl: Duration) -> Self {
        Self {
            root,
            ttl,
            entry: RwLock::new(None),
        }
    }

    pub async fn get(&self) -> Arc<DocsStructure> {
        if self.ttl.is_zero() {
            return Arc::new(self.scan().await);
        }

        if let Some(structure) = self.entry.read().await.as_ref().and_then(|c| c.fresh(self.ttl)) {
            return structure;
        }

        let mut entry = self.entry.write().await;
        if let Some(structure) = entry.as_ref().and_then(|c| c.fresh(self.ttl)) {
            return structure;
        }

        let structure = Arc::new(self.scan().await);
        *entry = Some(CachedStructure {
            scanned_at: Instant::now(),
            structure: Arc::clone(&structure),
        });
        structure
    }

    async fn scan(&self) -> DocsStructure {
        let root = self.root.clone();
        let started = Instant::now();
        let structure = tokio::task::spawn_blocking(move || build_structure(&root))
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "documentation scan task failed");
                DocsStructure::default()
            });
        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            total_files = structure.total_files,
            "documentation structure scanned"
        );
        structure
    }
}
