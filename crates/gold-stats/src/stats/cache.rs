//! Single-flight TTL cache for one computed value
//!
//! The cache holds a current generation. The first caller to reach an empty
//! generation runs the computation; everyone arriving meanwhile awaits the
//! same cell. A generation is replaced once its value is older than the TTL
//! or once it holds a failure, so failures reach the callers that were
//! waiting for them and nobody after.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, OnceCell};

use crate::core::{Clock, StatsResult};

struct Computed<T> {
    outcome: StatsResult<Arc<T>>,
    completed_at: Instant,
}

struct Generation<T> {
    cell: OnceCell<Computed<T>>,
}

impl<T> Generation<T> {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            cell: OnceCell::new(),
        })
    }
}

pub struct SingleFlight<T> {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    current: Mutex<Arc<Generation<T>>>,
}

impl<T: Send + Sync> SingleFlight<T> {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            current: Mutex::new(Generation::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached value, or the result of `compute` shared with concurrent callers
    ///
    /// If the running computation is cancelled or panics, its generation
    /// stays empty and the next waiter computes instead.
    pub async fn get_or_compute<F, Fut>(&self, compute: F) -> StatsResult<Arc<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = StatsResult<T>>,
    {
        let generation = self.current_generation().await;
        let clock = &self.clock;

        let computed = generation
            .cell
            .get_or_init(move || async move {
                let outcome = compute().await.map(Arc::new);
                Computed {
                    outcome,
                    completed_at: clock.now(),
                }
            })
            .await;

        computed.outcome.clone()
    }

    /// Drop whatever is cached; an in-flight computation still completes for its waiters
    pub async fn invalidate(&self) {
        *self.current.lock().await = Generation::new();
    }

    /// Generation to join, starting a fresh one when the current is stale
    async fn current_generation(&self) -> Arc<Generation<T>> {
        let mut current = self.current.lock().await;

        let stale = match current.cell.get() {
            Some(computed) => {
                computed.outcome.is_err()
                    || self.clock.now().saturating_duration_since(computed.completed_at) >= self.ttl
            }
            // Empty is either untouched or in flight; both are joined
            None => false,
        };
        if stale {
            *current = Generation::new();
        }

        Arc::clone(&current)
    }
}
