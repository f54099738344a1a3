//! Bounded-parallel detail fetching
//!
//! A [`WorkerPool`] is sized once and reused for every batch. Each batch
//! starts at most `max_workers` workers that pull identifiers from a shared
//! queue, so a slow item only occupies one worker. Every call to `fetch_one`
//! holds a permit from the pool's semaphore, which keeps the bound even when
//! several batches share the pool.
//!
//! One failed identifier never cancels the rest: every input identifier gets
//! exactly one [`FetchOutcome`].

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;

use futures::future::join_all;
use parking_lot::Mutex;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};
use vendorlink_domain::{Record, Result, VendorLinkError};

/// Result of fetching one identifier.
#[derive(Debug)]
pub struct FetchOutcome {
    pub identifier: String,
    pub result: Result<Record>,
}

/// All outcomes of one batch, in completion order.
#[derive(Debug, Default)]
pub struct FetchReport {
    pub outcomes: Vec<FetchOutcome>,
}

impl FetchReport {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn successes(&self) -> impl Iterator<Item = (&str, &Record)> {
        self.outcomes.iter().filter_map(|outcome| match &outcome.result {
            Ok(record) => Some((outcome.identifier.as_str(), record)),
            Err(_) => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &VendorLinkError)> {
        self.outcomes.iter().filter_map(|outcome| match &outcome.result {
            Ok(_) => None,
            Err(err) => Some((outcome.identifier.as_str(), err)),
        })
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// Successful records, dropping failures.
    pub fn into_records(self) -> Vec<Record> {
        self.outcomes.into_iter().filter_map(|outcome| outcome.result.ok()).collect()
    }

    /// All records, or the first failure for callers that treat any error as
    /// fatal to the batch.
    ///
    /// # Errors
    /// Returns the error of the first failed outcome.
    pub fn into_result(self) -> Result<Vec<Record>> {
        self.outcomes.into_iter().map(|outcome| outcome.result).collect()
    }
}

/// Fixed-size pool of fetch workers.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    max_workers: usize,
}

impl WorkerPool {
    /// Create a pool; a size of 0 is treated as 1.
    pub fn new(max_workers: usize) -> Self {
        let max_workers = max_workers.max(1);
        Self { permits: Arc::new(Semaphore::new(max_workers)), max_workers }
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Run `fetch_one` for every identifier with bounded concurrency.
    ///
    /// The report holds exactly one outcome per input identifier (duplicates in
    /// the input are fetched once per occurrence). Completion order is not
    /// input order.
    pub async fn fetch_all<I, F, Fut>(&self, identifiers: I, fetch_one: F) -> FetchReport
    where
        I: IntoIterator<Item = String>,
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<Record>>,
    {
        let queue: Mutex<VecDeque<String>> = Mutex::new(identifiers.into_iter().collect());
        let total = queue.lock().len();
        if total == 0 {
            return FetchReport::default();
        }

        let collector: Mutex<Vec<FetchOutcome>> = Mutex::new(Vec::with_capacity(total));
        let workers = self.max_workers.min(total);
        debug!(total, workers, "starting fetch batch");

        let run_worker = |worker: usize| {
            let queue = &queue;
            let collector = &collector;
            let fetch_one = &fetch_one;
            async move {
                loop {
                    let Some(identifier) = queue.lock().pop_front() else {
                        break;
                    };

                    let result = match self.permits.acquire().await {
                        Ok(_permit) => fetch_one(identifier.clone()).await,
                        Err(_) => Err(VendorLinkError::Config("worker pool is closed".into())),
                    };

                    if let Err(err) = &result {
                        warn!(worker, identifier = %identifier, error = %err, "fetch failed");
                    }
                    collector.lock().push(FetchOutcome { identifier, result });
                }
            }
        };

        join_all((0..workers).map(run_worker)).await;

        let report = FetchReport { outcomes: collector.into_inner() };
        info!(total, failed = report.failure_count(), "fetch batch complete");
        report
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use serde_json::{json, Value};

    use super::*;

    fn record(id: &str) -> Record {
        match json!({"identifier": id}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[derive(Default)]
    struct InFlight {
        current: AtomicUsize,
        peak: AtomicUsize,
    }

    impl InFlight {
        fn enter(&self) {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
        }

        fn exit(&self) {
            self.current.fetch_sub(1, Ordering::SeqCst);
        }
    }

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("v-{i}")).collect()
    }

    #[tokio::test]
    async fn never_exceeds_max_workers() {
        for (workers, items) in [(1, 5), (3, 20), (5, 5), (5, 2), (4, 37)] {
            let pool = WorkerPool::new(workers);
            let in_flight = InFlight::default();

            let report = pool
                .fetch_all(ids(items), |id| {
                    let in_flight = &in_flight;
                    async move {
                        in_flight.enter();
                        tokio::time::sleep(Duration::from_millis(3)).await;
                        in_flight.exit();
                        Ok(record(&id))
                    }
                })
                .await;

            assert_eq!(report.len(), items);
            let peak = in_flight.peak.load(Ordering::SeqCst);
            assert!(peak <= workers, "peak {peak} exceeded {workers}");
            assert_eq!(peak, workers.min(items));
        }
    }

    #[tokio::test]
    async fn bound_holds_across_concurrent_batches() {
        let pool = WorkerPool::new(3);
        let in_flight = InFlight::default();
        let fetch = |id: String| {
            let in_flight = &in_flight;
            async move {
                in_flight.enter();
                tokio::time::sleep(Duration::from_millis(2)).await;
                in_flight.exit();
                Ok(record(&id))
            }
        };

        let (a, b) = tokio::join!(pool.fetch_all(ids(10), fetch), pool.fetch_all(ids(10), fetch));
        assert_eq!(a.len() + b.len(), 20);
        assert!(in_flight.peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn failures_are_reported_per_identifier() {
        let pool = WorkerPool::new(4);
        let report = pool
            .fetch_all(ids(10), |id| async move {
                let n: usize = id.trim_start_matches("v-").parse().unwrap();
                if n % 3 == 0 {
                    Err(VendorLinkError::Api { status: 404, body: id })
                } else {
                    Ok(record(&id))
                }
            })
            .await;

        assert_eq!(report.len(), 10);
        assert_eq!(report.failure_count(), 4);
        assert_eq!(report.successes().count(), 6);

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for outcome in &report.outcomes {
            *counts.entry(outcome.identifier.as_str()).or_default() += 1;
        }
        assert_eq!(counts.len(), 10);
        assert!(counts.values().all(|count| *count == 1));
    }

    #[tokio::test]
    async fn duplicate_inputs_get_one_outcome_each() {
        let pool = WorkerPool::new(2);
        let input = vec!["a".to_string(), "a".to_string(), "b".to_string()];
        let report = pool.fetch_all(input, |id| async move { Ok(record(&id)) }).await;
        assert_eq!(report.len(), 3);
    }

    #[tokio::test]
    async fn idle_workers_take_pending_items() {
        let pool = WorkerPool::new(2);
        let finished = Mutex::new(Vec::new());
        let mut input = vec!["slow".to_string()];
        input.extend(ids(8));

        pool.fetch_all(input, |id| {
            let finished = &finished;
            async move {
                let delay = if id == "slow" { 150 } else { 2 };
                tokio::time::sleep(Duration::from_millis(delay)).await;
                finished.lock().push(id.clone());
                Ok(record(&id))
            }
        })
        .await;

        let finished = finished.into_inner();
        assert_eq!(finished.len(), 9);
        assert_eq!(finished.last().map(String::as_str), Some("slow"));
    }

    #[tokio::test]
    async fn empty_input_yields_empty_report() {
        let pool = WorkerPool::new(5);
        let report = pool.fetch_all(Vec::new(), |id: String| async move { Ok(record(&id)) }).await;
        assert!(report.is_empty());
    }

    #[test]
    fn zero_sized_pool_is_clamped() {
        assert_eq!(WorkerPool::new(0).max_workers(), 1);
    }

    #[test]
    fn into_result_surfaces_first_failure() {
        let report = FetchReport {
            outcomes: vec![
                FetchOutcome { identifier: "a".into(), result: Ok(record("a")) },
                FetchOutcome {
                    identifier: "b".into(),
                    result: Err(VendorLinkError::Network("reset".into())),
                },
            ],
        };
        assert!(matches!(report.into_result(), Err(VendorLinkError::Network(_))));
    }
}
