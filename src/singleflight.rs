//! Single-Flight Module
//!
//! Collapses concurrent loads of the same key into one execution.
//!
//! # Behavior
//! - The first caller for a key runs the computation
//! - Concurrent callers for that key wait and receive a clone of its result
//! - Once the result is published the key is forgotten, so the next caller
//!   computes again
//! - If the running caller is cancelled, one of the waiters takes over

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard};

use tokio::sync::watch;
use tracing::debug;

use crate::cache::ByteView;
use crate::error::Result;

type Outcome<T> = Option<Result<T>>;

// == Single Flight ==
/// Per-node duplicate suppression keyed by cache key.
pub struct SingleFlight<T = ByteView> {
    calls: Mutex<HashMap<String, watch::Receiver<Outcome<T>>>>,
}

enum Role<T> {
    Leader(watch::Sender<Outcome<T>>),
    Follower(watch::Receiver<Outcome<T>>),
}

impl<T: Clone> SingleFlight<T> {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(HashMap::new()),
        }
    }

    // == Run ==
    /// Runs `compute` unless a call for `key` is already in flight, in which
    /// case waits for that call and returns its result.
    pub async fn run<F, Fut>(&self, key: &str, compute: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        loop {
            match self.join(key) {
                Role::Leader(tx) => {
                    let _guard = CallGuard { flight: self, key };
                    let result = compute().await;
                    tx.send_replace(Some(result.clone()));
                    return result;
                }
                Role::Follower(mut rx) => {
                    debug!("waiting on in-flight load for key {}", key);
                    let outcome = match rx.wait_for(Option::is_some).await {
                        Ok(value) => value.clone(),
                        Err(_) => None,
                    };
                    if let Some(result) = outcome {
                        return result;
                    }
                    // leader was dropped before publishing
                }
            }
        }
    }

    /// Number of keys currently being computed.
    pub fn in_flight(&self) -> usize {
        self.lock().len()
    }

    fn join(&self, key: &str) -> Role<T> {
        let mut calls = self.lock();
        if let Some(rx) = calls.get(key) {
            return Role::Follower(rx.clone());
        }
        let (tx, rx) = watch::channel(None);
        calls.insert(key.to_string(), rx);
        Role::Leader(tx)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, watch::Receiver<Outcome<T>>>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T: Clone> Default for SingleFlight<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Clears the in-flight record when the leading call ends or is dropped.
struct CallGuard<'a, T: Clone> {
    flight: &'a SingleFlight<T>,
    key: &'a str,
}

impl<T: Clone> Drop for CallGuard<'_, T> {
    fn drop(&mut self) {
        self.flight.lock().remove(self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_single_call() {
        let flight = SingleFlight::new();

        let value = flight
            .run("key", || async { Ok(ByteView::from("bar")) })
            .await
            .unwrap();

        assert_eq!(value.to_string(), "bar");
        assert_eq!(flight.in_flight(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_callers_share_one_computation() {
        let flight: Arc<SingleFlight> = Arc::new(SingleFlight::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..64 {
            let flight = flight.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                flight
                    .run("Tom", || async {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(100)).await;
                        Ok(ByteView::from("630"))
                    })
                    .await
            }));
        }

        for handle in handles {
            let value = handle.await.unwrap().unwrap();
            assert_eq!(value.to_string(), "630");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(flight.in_flight(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_callers_share_error() {
        let flight: Arc<SingleFlight> = Arc::new(SingleFlight::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let flight = flight.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                flight
                    .run("missing", || async {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Err(CacheError::Load("missing not exist".into()))
                    })
                    .await
            }));
        }

        for handle in handles {
            let err = handle.await.unwrap().unwrap_err();
            assert_eq!(err, CacheError::Load("missing not exist".into()));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_sequential_calls_recompute() {
        let flight = SingleFlight::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            flight
                .run("key", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(ByteView::from("v"))
                })
                .await
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_distinct_keys_do_not_block_each_other() {
        let flight = SingleFlight::new();

        let (a, b) = tokio::join!(
            flight.run("a", || async { Ok(ByteView::from("1")) }),
            flight.run("b", || async { Ok(ByteView::from("2")) }),
        );

        assert_eq!(a.unwrap().to_string(), "1");
        assert_eq!(b.unwrap().to_string(), "2");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_waiter_takes_over_when_leader_is_cancelled() {
        let flight: Arc<SingleFlight> = Arc::new(SingleFlight::new());

        let leader = {
            let flight = flight.clone();
            tokio::spawn(async move {
                flight
                    .run("slow", || async {
                        tokio::time::sleep(Duration::from_secs(60)).await;
                        Ok(ByteView::from("never"))
                    })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(flight.in_flight(), 1);

        let follower = {
            let flight = flight.clone();
            tokio::spawn(async move {
                flight
                    .run("slow", || async { Ok(ByteView::from("recovered")) })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        leader.abort();

        let value = tokio::time::timeout(Duration::from_secs(5), follower)
            .await
            .expect("follower should not hang")
            .unwrap()
            .unwrap();
        assert_eq!(value.to_string(), "recovered");
        assert_eq!(flight.in_flight(), 0);
    }
}
