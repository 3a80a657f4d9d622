//! Background generation worker pool.
//!
//! The boundary between the consumer-side manager and chunk generation is
//! two message queues: requests in, results out. Workers share no mutable
//! state with the manager. The contract is fire-and-forget — a request is
//! eventually answered, results may arrive in any order relative to
//! requests, and a result may be stale by the time it is drained (the
//! manager re-checks desirability on receipt; see [`crate::manager`]).

use std::thread::JoinHandle;

use asphalt_common::{AsphaltError, AsphaltResult, ChunkCoord};
use asphalt_worldgen::{generate, ChunkData, GenerationParams};
use crossbeam_channel::{Receiver, Sender, TryIter};
use tracing::{debug, info};

/// Default number of generation worker threads.
pub const DEFAULT_WORKER_COUNT: usize = 2;

/// A generation request carried across the worker boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Chunk to generate
    pub coord: ChunkCoord,
    /// World seed to generate it from
    pub world_seed: u32,
}

/// Fixed pool of generation workers connected by unbounded channels.
///
/// Dropping the pool (or calling [`GeneratorPool::shutdown`]) closes the
/// request queue and joins the workers; requests still in flight finish,
/// their results are discarded with the pool.
pub struct GeneratorPool {
    request_tx: Option<Sender<GenerationRequest>>,
    // Kept so the request queue stays open even with zero workers; a
    // zero-worker pool accepts requests and simply never answers them.
    request_rx: Receiver<GenerationRequest>,
    result_rx: Receiver<ChunkData>,
    workers: Vec<JoinHandle<()>>,
}

impl GeneratorPool {
    /// Spawns `worker_count` generation threads.
    ///
    /// A pool with zero workers queues requests without answering them;
    /// useful for driving the consumer side deterministically.
    pub fn new(worker_count: usize, params: GenerationParams) -> AsphaltResult<Self> {
        let (request_tx, request_rx) = crossbeam_channel::unbounded::<GenerationRequest>();
        let (result_tx, result_rx) = crossbeam_channel::unbounded::<ChunkData>();

        let mut workers = Vec::with_capacity(worker_count);
        for i in 0..worker_count {
            let request_rx = request_rx.clone();
            let result_tx = result_tx.clone();
            let params = params.clone();
            let handle = std::thread::Builder::new()
                .name(format!("chunk-gen-{i}"))
                .spawn(move || {
                    // Ends when the request side is closed.
                    while let Ok(req) = request_rx.recv() {
                        let data = generate(req.coord, req.world_seed, &params);
                        if result_tx.send(data).is_err() {
                            break;
                        }
                    }
                })?;
            workers.push(handle);
        }

        info!("generator pool started with {} workers", worker_count);
        Ok(Self {
            request_tx: Some(request_tx),
            request_rx,
            result_rx,
            workers,
        })
    }

    /// Number of requests not yet picked up by a worker.
    #[must_use]
    pub fn pending_requests(&self) -> usize {
        self.request_rx.len()
    }

    /// Dispatches a generation request. Never blocks.
    pub fn request(&self, req: GenerationRequest) -> AsphaltResult<()> {
        let tx = self
            .request_tx
            .as_ref()
            .ok_or(AsphaltError::WorkerUnavailable)?;
        tx.send(req).map_err(|_| AsphaltError::WorkerUnavailable)?;
        debug!(chunk = %req.coord, "generation requested");
        Ok(())
    }

    /// Drains all results completed so far without blocking.
    pub fn try_results(&self) -> TryIter<'_, ChunkData> {
        self.result_rx.try_iter()
    }

    /// Closes the request queue and joins all workers.
    pub fn shutdown(&mut self) {
        if self.request_tx.take().is_none() {
            return;
        }
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
        info!("generator pool shut down");
    }
}

impl Drop for GeneratorPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for GeneratorPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorPool")
            .field("workers", &self.workers.len())
            .field("running", &self.request_tx.is_some())
            .finish()
    }
}
