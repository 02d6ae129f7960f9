//! Background full-roster computation.
//!
//! Computing a vector for every entity on a roster is a latency optimization
//! only: the batch task runs the exact same pure aggregation the interactive
//! path runs inline, chunked with a yield between chunks so the caller's
//! thread stays responsive. Requests carry a generation number; a newer
//! submission supersedes older in-flight work, and [`BatchRunner::accept`]
//! tells the caller to discard any late-arriving stale response.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::aggregate::{compute_stats, TeamScope};
use crate::cache::FilterSignature;
use crate::index::{CandidateSet, IndexSet};
use crate::model::{StatVector, Tables};

/// Entities processed between yields. Tunable for responsiveness; never a
/// correctness parameter.
pub const DEFAULT_CHUNK_SIZE: usize = 32;

/// One full-roster computation request.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub entities: Vec<String>,
    pub scope: TeamScope,
    pub candidates: CandidateSet,
    pub signature: FilterSignature,
}

/// The response carries the request's generation and signature so the caller
/// can discard results superseded while the task ran.
#[derive(Debug)]
pub struct BatchResponse {
    pub generation: u64,
    pub signature: FilterSignature,
    pub vectors: HashMap<String, StatVector>,
}

/// Dispatches batch requests and tracks which generation is still current.
#[derive(Debug)]
pub struct BatchRunner {
    latest: AtomicU64,
    next: AtomicU64,
    chunk_size: usize,
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchRunner {
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            latest: AtomicU64::new(0),
            next: AtomicU64::new(0),
            chunk_size: chunk_size.max(1),
        }
    }

    /// Spawn a background task for `request`. Submitting marks every earlier
    /// generation stale immediately, whether or not its task has finished.
    pub fn submit(
        &self,
        request: BatchRequest,
        tables: Arc<Tables>,
        indices: Arc<IndexSet>,
    ) -> JoinHandle<BatchResponse> {
        let generation = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        // fetch_max keeps `latest` monotonic when submissions race: a slower
        // thread carrying an older generation must not roll the marker back.
        self.latest.fetch_max(generation, Ordering::SeqCst);
        let chunk_size = self.chunk_size;

        tokio::spawn(async move {
            let mut vectors = HashMap::with_capacity(request.entities.len());
            for chunk in request.entities.chunks(chunk_size) {
                for entity in chunk {
                    let v = compute_stats(
                        entity,
                        &request.scope,
                        &request.candidates,
                        &tables,
                        Some(&indices),
                    );
                    vectors.insert(entity.clone(), v);
                }
                tokio::task::yield_now().await;
            }
            BatchResponse {
                generation,
                signature: request.signature,
                vectors,
            }
        })
    }

    /// True when the response belongs to the most recent submission; stale
    /// responses must be dropped, not applied.
    pub fn accept(&self, response: &BatchResponse) -> bool {
        let current = response.generation == self.latest.load(Ordering::SeqCst);
        if !current {
            log::debug!(
                "discarding stale batch response (generation {})",
                response.generation
            );
        }
        current
    }
}

/// Synchronous equivalent of a batch submission; the background path must
/// produce exactly this.
pub fn compute_batch_inline(
    request: &BatchRequest,
    tables: &Tables,
    indices: &IndexSet,
) -> HashMap<String, StatVector> {
    request
        .entities
        .iter()
        .map(|entity| {
            let v = compute_stats(
                entity,
                &request.scope,
                &request.candidates,
                tables,
                Some(indices),
            );
            (entity.clone(), v)
        })
        .collect()
}
