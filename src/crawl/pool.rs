// src/crawl/pool.rs
// =============================================================================
// A bounded pool for independent async jobs (link validations).
//
// How it works:
// - Each item becomes one future
// - .buffer_unordered(workers) keeps at most `workers` of them in flight
// - Results come back in completion order, NOT submission order
// - run_batch() only returns once every job has finished (a barrier), so the
//   caller never sees a half-finished batch
//
// Jobs share nothing but what the task closure hands them (in practice a
// borrowed, read-only HTTP client).
// =============================================================================

use std::future::Future;

use futures::stream::{self, StreamExt};

#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    // Runs `task` once per item, at most `workers` at a time
    //
    // Parameters:
    //   items:       the batch
    //   task:        turns one item into a future
    //   on_complete: called with each result as soon as it finishes
    //
    // Returns: every result, in completion order
    pub async fn run_batch<I, F, Fut, C>(&self, items: I, task: F, mut on_complete: C) -> Vec<Fut::Output>
    where
        I: IntoIterator,
        F: FnMut(I::Item) -> Fut,
        Fut: Future,
        C: FnMut(&Fut::Output),
    {
        let in_flight = stream::iter(items).map(task).buffer_unordered(self.workers);
        futures::pin_mut!(in_flight);

        let mut completed = Vec::new();
        while let Some(output) = in_flight.next().await {
            on_complete(&output);
            completed.push(output);
        }
        completed
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_every_item_reported_once() {
        let pool = WorkerPool::new(4);
        let mut seen = 0;
        let mut results = pool
            .run_batch(0..20u64, |n| async move { n * 2 }, |_| seen += 1)
            .await;

        results.sort_unstable();
        assert_eq!(seen, 20);
        assert_eq!(results, (0..20u64).map(|n| n * 2).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let pool = WorkerPool::new(3);
        let running = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);

        pool.run_batch(
            0..12,
            |_| {
                let running = &running;
                let peak = &peak;
                async move {
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    running.fetch_sub(1, Ordering::SeqCst);
                }
            },
            |_| {},
        )
        .await;

        let peak = peak.load(Ordering::SeqCst);
        assert!(peak <= 3, "peak concurrency was {peak}");
        assert!(peak >= 2, "jobs never overlapped");
    }

    #[tokio::test]
    async fn test_results_arrive_in_completion_order() {
        let pool = WorkerPool::new(2);
        let order = pool
            .run_batch(
                [40u64, 5],
                |ms| async move {
                    tokio::time::sleep(Duration::from_millis(ms)).await;
                    ms
                },
                |_| {},
            )
            .await;
        assert_eq!(order, vec![5, 40]);
    }

    #[tokio::test]
    async fn test_zero_workers_means_one() {
        assert_eq!(WorkerPool::new(0).workers(), 1);
        let results = WorkerPool::new(0)
            .run_batch(vec!["a", "b"], |s| async move { s.len() }, |_| {})
            .await;
        assert_eq!(results.len(), 2);
    }
}
