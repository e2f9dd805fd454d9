use crate::{
    error::WorkerFailure,
    lucas_lehmer::Tester,
    message::{Candidate, Outcome, TestResult},
};
use std::{any::Any, sync::Arc, thread};
use tokio::{
    sync::{
        Mutex,
        mpsc::{self, Receiver, UnboundedReceiver, UnboundedSender},
    },
    task::JoinError,
    time::Instant,
};

const MAX_CHANNEL_CAPACITY: usize = 100;
const MIN_WORKERS: usize = 2;

type IndexedOutcome = (usize, Outcome);

/// Fixed-size pool of workers applying a [`Tester`] to submitted candidates.
///
/// Workers pull candidates from a shared channel and send back outcomes
/// tagged with the candidate's submission index, so the caller can restore
/// input order no matter which worker finishes first.
pub struct WorkerPool {
    candidate_tx: mpsc::Sender<Candidate>,
    candidate_rx: Arc<Mutex<mpsc::Receiver<Candidate>>>,
    outcome_tx: UnboundedSender<IndexedOutcome>,
    handles: Vec<HandleHolder>,
    tester: Arc<dyn Tester>,
    num_workers: usize,
}

impl WorkerPool {
    pub fn new(
        num_workers: usize,
        tester: Arc<dyn Tester>,
    ) -> (Self, UnboundedReceiver<IndexedOutcome>) {
        let num_workers = num_workers.max(1);
        let (candidate_tx, candidate_rx) =
            mpsc::channel::<Candidate>(Self::calculate_channel_capacity(num_workers));
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let pool = Self {
            candidate_tx,
            candidate_rx: Arc::new(Mutex::new(candidate_rx)),
            outcome_tx,
            handles: Vec::new(),
            tester,
            num_workers,
        };
        (pool, outcome_rx)
    }

    /// Number of workers matching the host's available concurrency, never
    /// fewer than two.
    pub fn default_size() -> usize {
        thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(MIN_WORKERS)
            .max(MIN_WORKERS)
    }

    pub fn run(&mut self) {
        for i in 0..self.num_workers {
            let worker = Worker::new(
                i,
                self.tester.clone(),
                self.candidate_rx.clone(),
                self.outcome_tx.clone(),
            );
            let name = worker.name.clone();

            let handle = tokio::spawn(async move {
                worker.run().await;
            });
            self.handles.push(HandleHolder { name, handle });
        }

        tracing::info!(
            "WorkerPool started with {} workers using {}",
            self.num_workers,
            self.tester.name()
        );
    }

    pub async fn submit(
        &self,
        candidate: Candidate,
    ) -> Result<(), mpsc::error::SendError<Candidate>> {
        self.candidate_tx.send(candidate).await
    }

    /// Closes the candidate channel and waits for every worker to drain it.
    pub async fn shutdown(self) {
        tracing::debug!("Shutting down WorkerPool with {} workers", self.num_workers);
        drop(self.candidate_tx);
        drop(self.outcome_tx);

        for holder in self.handles {
            match holder.handle.await {
                Ok(()) => tracing::debug!("{} completed successfully", holder.name),
                Err(e) => tracing::warn!("{} terminated abnormally: {}", holder.name, e),
            }
        }
        tracing::debug!("WorkerPool shutdown complete");
    }

    fn calculate_channel_capacity(worker_count: usize) -> usize {
        (worker_count * 2).clamp(1, MAX_CHANNEL_CAPACITY)
    }
}

/// Tests every exponent on a pool of `num_workers` workers.
///
/// The returned outcomes line up index for index with `exponents`. A
/// candidate whose worker failed gets an `Err` in its slot; the remaining
/// candidates are unaffected.
pub async fn test_all(
    tester: Arc<dyn Tester>,
    num_workers: usize,
    exponents: &[u64],
) -> Vec<Outcome> {
    let (mut pool, outcome_rx) = WorkerPool::new(num_workers, tester);
    pool.run();

    let mut undelivered = Vec::new();
    for (index, &exponent) in exponents.iter().enumerate() {
        if let Err(e) = pool.submit(Candidate { index, exponent }).await {
            tracing::error!("Failed to submit exponent {}: {}", exponent, e);
            undelivered.push((
                index,
                Err(WorkerFailure {
                    exponent,
                    reason: "worker pool closed before submission".to_string(),
                }),
            ));
        }
    }

    pool.shutdown().await;
    gather(outcome_rx, undelivered, exponents)
}

/// Reassembles indexed outcomes into submission order.
fn gather(
    mut outcome_rx: UnboundedReceiver<IndexedOutcome>,
    undelivered: Vec<IndexedOutcome>,
    exponents: &[u64],
) -> Vec<Outcome> {
    let mut slots: Vec<Option<Outcome>> = vec![None; exponents.len()];

    for (index, outcome) in undelivered {
        slots[index] = Some(outcome);
    }
    while let Ok((index, outcome)) = outcome_rx.try_recv() {
        match slots.get_mut(index) {
            Some(slot) => *slot = Some(outcome),
            None => tracing::warn!("Discarding outcome with unknown index {}", index),
        }
    }

    slots
        .into_iter()
        .zip(exponents)
        .map(|(slot, &exponent)| {
            slot.unwrap_or_else(|| {
                Err(WorkerFailure {
                    exponent,
                    reason: "no result received".to_string(),
                })
            })
        })
        .collect()
}

struct HandleHolder {
    name: String,
    handle: tokio::task::JoinHandle<()>,
}

struct Worker {
    name: String,
    tester: Arc<dyn Tester>,
    rx: Arc<Mutex<Receiver<Candidate>>>,
    tx: UnboundedSender<IndexedOutcome>,
}

impl Worker {
    fn new(
        id: usize,
        tester: Arc<dyn Tester>,
        rx: Arc<Mutex<Receiver<Candidate>>>,
        tx: UnboundedSender<IndexedOutcome>,
    ) -> Self {
        Self {
            name: format!("Worker-{}", id),
            tester,
            rx,
            tx,
        }
    }

    async fn run(&self) {
        tracing::debug!("{} started", self.name);

        while let Some(candidate) = self.receive().await {
            self.process_candidate(candidate).await;
        }

        tracing::debug!("{} stopped", self.name);
    }

    async fn receive(&self) -> Option<Candidate> {
        let mut rx = self.rx.lock().await;
        rx.recv().await
    }

    /// Runs the tester for one candidate on the blocking thread pool.
    ///
    /// A panic inside the tester is turned into a failed outcome for this
    /// candidate instead of taking the worker down.
    async fn process_candidate(&self, candidate: Candidate) {
        let tester = self.tester.clone();
        let exponent = candidate.exponent;
        let start_time = Instant::now();

        let blocking = tokio::task::spawn_blocking(move || tester.is_mersenne_prime(exponent));
        let outcome = match blocking.await {
            Ok(is_prime) => Ok(TestResult {
                exponent,
                verdict: is_prime.into(),
            }),
            Err(e) => {
                let reason = describe_join_error(e);
                tracing::error!("{}: testing exponent {} failed: {}", self.name, exponent, reason);
                Err(WorkerFailure { exponent, reason })
            }
        };

        tracing::debug!(
            "{}: exponent {} done in {}ms",
            self.name,
            exponent,
            start_time.elapsed().as_millis()
        );

        if let Err(e) = self.tx.send((candidate.index, outcome)) {
            tracing::warn!("{}: failed to send outcome: {}", self.name, e);
        }
    }
}

fn describe_join_error(e: JoinError) -> String {
    if e.is_panic() {
        panic_message(e.into_panic())
    } else {
        e.to_string()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}
