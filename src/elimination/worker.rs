//! Long-lived elimination workers and the fixed pool that owns them.
//!
//! Each worker blocks on its own signal channel. A `Start` signal carries the
//! [`PhaseTask`] to decode; the worker runs its share of task indices and
//! arrives on the shared [`PhaseLatch`]. `Exit`, or a disconnected channel,
//! ends the worker loop without arriving.
//!
//! A worker whose kernel panics closes its channel, arrives poisoned, and
//! then resumes unwinding, so the scheduler sees `PhaseAborted` and any later
//! signal to that worker fails instead of blocking.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};

use crate::augmented_matrix::MatrixStore;
use crate::error::EliminationError;

use super::kernel;
use super::latch::{PhaseLatch, Release};
use super::phase::PhaseTask;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Start(PhaseTask),
    Exit,
}

struct WorkerHandle {
    id: usize,
    signals: Sender<Signal>,
    thread: JoinHandle<()>,
}

struct Worker {
    id: usize,
    pool_size: usize,
    signals: Receiver<Signal>,
    store: Arc<MatrixStore>,
    latch: Arc<PhaseLatch>,
    live: Arc<AtomicUsize>,
    #[cfg(test)]
    starts: Arc<Vec<AtomicUsize>>,
}

impl Worker {
    fn run(mut self) {
        log::trace!("worker {} parked", self.id);
        while let Ok(signal) = self.signals.recv() {
            match signal {
                Signal::Start(task) => {
                    #[cfg(test)]
                    self.starts[self.id].fetch_add(1, Ordering::SeqCst);
                    let outcome =
                        panic::catch_unwind(AssertUnwindSafe(|| self.run_share_of(&task)));
                    match outcome {
                        Ok(()) => self.latch.arrive(),
                        Err(payload) => {
                            // The channel must be closed before the scheduler wakes up.
                            drop(std::mem::replace(
                                &mut self.signals,
                                crossbeam_channel::never(),
                            ));
                            self.latch.arrive_poisoned();
                            panic::resume_unwind(payload);
                        }
                    }
                }
                Signal::Exit => break,
            }
        }
        log::trace!("worker {} exiting", self.id);
    }

    // Task indices id, id + pool_size, ... below the phase's task count.
    fn run_share_of(&self, task: &PhaseTask) {
        for task_index in (self.id..task.task_count()).step_by(self.pool_size) {
            kernel::run_task(task, task_index, &self.store);
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Fixed set of workers, reused for every phase of one elimination run.
pub struct WorkerPool {
    workers: Vec<WorkerHandle>,
    latch: Arc<PhaseLatch>,
    live: Arc<AtomicUsize>,
    #[cfg(test)]
    starts: Arc<Vec<AtomicUsize>>,
}

impl WorkerPool {
    /// Spawns `size` workers sharing `store`.
    pub fn spawn(size: usize, store: Arc<MatrixStore>) -> Result<Self, EliminationError> {
        let mut pool = Self {
            workers: Vec::with_capacity(size),
            latch: Arc::new(PhaseLatch::new()),
            live: Arc::new(AtomicUsize::new(0)),
            #[cfg(test)]
            starts: Arc::new((0..size).map(|_| AtomicUsize::new(0)).collect()),
        };
        for id in 0..size {
            let (sender, receiver) = crossbeam_channel::bounded(1);
            let worker = Worker {
                id,
                pool_size: size,
                signals: receiver,
                store: store.clone(),
                latch: pool.latch.clone(),
                live: pool.live.clone(),
                #[cfg(test)]
                starts: pool.starts.clone(),
            };
            pool.live.fetch_add(1, Ordering::SeqCst);
            // On spawn failure the closure, and with it the worker, is dropped,
            // which undoes the live count. Already spawned workers are shut
            // down when `pool` drops.
            let thread = thread::Builder::new()
                .name(format!("elimination-worker-{id}"))
                .spawn(move || worker.run())
                .map_err(|source| EliminationError::WorkerSpawn { id, source })?;
            pool.workers.push(WorkerHandle {
                id,
                signals: sender,
                thread,
            });
        }
        log::info!("spawned {size} elimination workers");
        Ok(pool)
    }

    pub fn capacity(&self) -> usize {
        self.workers.len()
    }

    /// Number of worker threads that have not yet left their loop.
    pub fn live_workers(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub(crate) fn live_counter(&self) -> Arc<AtomicUsize> {
        self.live.clone()
    }

    /// Start signals received so far, per worker id.
    #[cfg(test)]
    pub(crate) fn start_counts(&self) -> Vec<usize> {
        self.starts
            .iter()
            .map(|count| count.load(Ordering::SeqCst))
            .collect()
    }

    /// Signals workers `0..active` to run `task`, then waits for all of them.
    /// Returns how many workers were activated.
    pub fn run_phase(&self, task: PhaseTask) -> Result<usize, EliminationError> {
        let tasks = task.task_count();
        if tasks == 0 {
            return Ok(0);
        }
        if self.workers.is_empty() {
            return Err(EliminationError::PoolCapacity {
                requested: tasks,
                capacity: 0,
            });
        }
        let active = tasks.min(self.capacity());
        let generation = self.latch.arm(active);
        for (sent, worker) in self.workers[..active].iter().enumerate() {
            if worker.signals.send(Signal::Start(task)).is_err() {
                // Keep the latch consistent for the workers already signalled.
                for _ in sent..active {
                    self.latch.arrive_poisoned();
                }
                let _ = self.latch.wait(generation);
                return Err(EliminationError::WorkerDisconnected { id: worker.id });
            }
        }
        match self.latch.wait(generation) {
            Release::Completed => Ok(active),
            Release::Poisoned => Err(EliminationError::PhaseAborted {
                phase: task.phase,
                pivot: task.pivot,
            }),
        }
    }

    /// Broadcasts `Exit` to every worker and joins them all.
    /// Returns the number of joined workers.
    pub fn shutdown(mut self) -> Result<usize, EliminationError> {
        self.shutdown_workers()
    }

    fn shutdown_workers(&mut self) -> Result<usize, EliminationError> {
        let workers = std::mem::take(&mut self.workers);
        for worker in &workers {
            // A worker that already left its loop has nothing left to stop.
            let _ = worker.signals.send(Signal::Exit);
        }
        let mut joined = 0;
        let mut first_failure = None;
        for worker in workers {
            match worker.thread.join() {
                Ok(()) => joined += 1,
                Err(_) => {
                    log::error!("elimination worker {} panicked", worker.id);
                    first_failure.get_or_insert(EliminationError::WorkerPanicked { id: worker.id });
                }
            }
        }
        log::info!("joined {joined} elimination workers");
        match first_failure {
            Some(err) => Err(err),
            None => Ok(joined),
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        if !self.workers.is_empty() {
            let _ = self.shutdown_workers();
        }
    }
}
