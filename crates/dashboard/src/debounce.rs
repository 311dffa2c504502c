use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Trailing-edge debounce: `action` runs once, `delay` after the last `trigger`.
///
/// Timers are spawned with `tokio::task::spawn_local`, so the debouncer must be
/// used from inside a `LocalSet`.
pub struct Debouncer {
    delay: Duration,
    action: Rc<dyn Fn()>,
    pending: RefCell<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration, action: impl Fn() + 'static) -> Self {
        Self {
            delay,
            action: Rc::new(action),
            pending: RefCell::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Restarts the timer.
    pub fn trigger(&self) {
        self.cancel();

        let action = Rc::clone(&self.action);
        let delay = self.delay;
        let handle = tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            action();
        });
        *self.pending.borrow_mut() = Some(handle);
    }

    pub fn cancel(&self) {
        if let Some(handle) = self.pending.borrow_mut().take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .borrow()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
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
    use std::cell::Cell;
    use tokio::task::LocalSet;

    fn counting(delay_ms: u64) -> (Debouncer, Rc<Cell<u32>>) {
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);
        let debouncer = Debouncer::new(Duration::from_millis(delay_ms), move || {
            counter.set(counter.get() + 1)
        });
        (debouncer, fired)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_to_one_call() {
        LocalSet::new()
            .run_until(async {
                let (debouncer, fired) = counting(250);

                for _ in 0..5 {
                    debouncer.trigger();
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
                assert_eq!(fired.get(), 0);
                assert!(debouncer.is_pending());

                tokio::time::sleep(Duration::from_millis(200)).await;
                assert_eq!(fired.get(), 1);
                assert!(!debouncer.is_pending());
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_call() {
        LocalSet::new()
            .run_until(async {
                let (debouncer, fired) = counting(50);

                debouncer.trigger();
                debouncer.cancel();
                tokio::time::sleep(Duration::from_millis(100)).await;

                assert_eq!(fired.get(), 0);
                assert!(!debouncer.is_pending());
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_fire_separately() {
        LocalSet::new()
            .run_until(async {
                let (debouncer, fired) = counting(50);

                debouncer.trigger();
                tokio::time::sleep(Duration::from_millis(60)).await;
                debouncer.trigger();
                tokio::time::sleep(Duration::from_millis(60)).await;

                assert_eq!(fired.get(), 2);
            })
            .await;
    }
}
