use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Runs a callback only once calls have stopped arriving for `wait`
///
/// Each call cancels the one still pending. Must be used from inside a
/// tokio runtime.
pub struct Debouncer {
    wait: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            pending: Mutex::new(None),
        }
    }

    pub fn call<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let wait = self.wait;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            f();
        });

        let mut pending = match self.pending.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(previous) = pending.replace(handle) {
            previous.abort();
        }
    }

    /// Drop whatever is pending without running it
    pub fn cancel(&self) {
        let mut pending = match self.pending.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(previous) = pending.take() {
            previous.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use tokio::time::{advance, sleep};

    #[tokio::test(start_paused = true)]
    async fn test_burst_runs_once() {
        let debouncer = Debouncer::new(Duration::from_millis(30));
        let count = Arc::new(AtomicU32::new(0));

        for _ in 0..5 {
            let count = count.clone();
            debouncer.call(move || {
                count.fetch_add(1, Ordering::SeqCst);
            });
            sleep(Duration::from_millis(5)).await;
        }

        // last call went out at 20ms, so nothing fires before 50ms
        sleep(Duration::from_millis(20)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_call_wins() {
        let debouncer = Debouncer::new(Duration::from_millis(20));
        let seen = Arc::new(AtomicU32::new(0));

        for n in 1..=3 {
            let seen = seen.clone();
            debouncer.call(move || seen.store(n, Ordering::SeqCst));
        }

        sleep(Duration::from_millis(21)).await;
        assert_eq!(seen.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending() {
        let debouncer = Debouncer::new(Duration::from_millis(20));
        let count = Arc::new(AtomicU32::new(0));

        let c = count.clone();
        debouncer.call(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        tokio::task::yield_now().await;
        debouncer.cancel();

        advance(Duration::from_secs(1)).await;
        tokio::task::yield_now().await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
