//! Turn one-shot requests into a live, stoppable stream of results.
//!
//! A [`Poller`] wraps a factory that maps call-site parameters to a [`PollTask`]
//! (a request plus a result sink). Every [`Poller::start`] spawns its own loop on the
//! tokio runtime and hands back a [`PollController`] scoped to that loop only.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

type RequestFn<R, E> = Box<dyn FnMut() -> BoxFuture<Result<R, E>> + Send>;
type ResultFn<R> = Box<dyn FnMut(R) + Send>;

/// The pair a poll factory produces for one invocation.
pub struct PollTask<R, E> {
    request: RequestFn<R, E>,
    on_result: ResultFn<R>,
}

impl<R, E> PollTask<R, E> {
    pub fn new<Req, Fut, OnResult>(mut request: Req, on_result: OnResult) -> Self
    where
        Req: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
        OnResult: FnMut(R) + Send + 'static,
    {
        Self {
            request: Box::new(move || -> BoxFuture<Result<R, E>> { Box::pin(request()) }),
            on_result: Box::new(on_result),
        }
    }
}

pub struct Poller<P, R, E> {
    factory: Arc<dyn Fn(P) -> PollTask<R, E> + Send + Sync>,
    delay: Duration,
}

impl<P, R, E> Clone for Poller<P, R, E> {
    fn clone(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
            delay: self.delay,
        }
    }
}

impl<P, R, E> Poller<P, R, E>
where
    R: Send + 'static,
    E: fmt::Display + Send + 'static,
{
    pub fn new<F>(factory: F, delay: Duration) -> Self
    where
        F: Fn(P) -> PollTask<R, E> + Send + Sync + 'static,
    {
        Self {
            factory: Arc::new(factory),
            delay,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Starts a fresh loop for `params`. Must be called from within a tokio runtime.
    pub fn start(&self, params: P) -> PollController<E> {
        let PollTask {
            request,
            on_result,
        } = (self.factory)(params);
        let stop = Arc::new(StopSignal::default());
        let handle = tokio::spawn(poll_loop(request, on_result, self.delay, Arc::clone(&stop)));
        tracing::debug!(delay_ms = self.delay.as_millis() as u64, "poller started");
        PollController { stop, handle }
    }
}

#[derive(Default)]
struct StopSignal {
    stopped: AtomicBool,
    wake: Notify,
    /// Held for the whole check-and-deliver step.
    delivery: Mutex<()>,
    /// Thread currently running the result sink, so a `stop()` issued from inside the
    /// sink does not wait on itself.
    deliverer: Mutex<Option<ThreadId>>,
}

impl StopSignal {
    fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Sets the flag and waits out any delivery already past its flag check.
    /// Returns whether the flag was already set.
    fn stop(&self) -> bool {
        let was_stopped = self.stopped.swap(true, Ordering::SeqCst);
        self.wake.notify_one();
        let current = thread::current().id();
        if *lock(&self.deliverer) != Some(current) {
            drop(lock(&self.delivery));
        }
        was_stopped
    }

    /// Delivers `outcome` unless stopped. `Ok(false)` means the loop must end quietly.
    fn deliver<R, E: fmt::Display>(
        &self,
        outcome: Result<R, E>,
        on_result: &mut ResultFn<R>,
    ) -> Result<bool, E> {
        let _delivery = lock(&self.delivery);
        // A request that was already in flight when stop() ran still resolves here;
        // its result must not be delivered.
        if self.is_stopped() {
            tracing::trace!("poller stopped; dropping in-flight result");
            return Ok(false);
        }
        match outcome {
            Ok(result) => {
                *lock(&self.deliverer) = Some(thread::current().id());
                on_result(result);
                *lock(&self.deliverer) = None;
                Ok(true)
            }
            Err(err) => {
                tracing::warn!(error = %err, "poll request failed; poller halted");
                Err(err)
            }
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn poll_loop<R, E: fmt::Display>(
    mut request: RequestFn<R, E>,
    mut on_result: ResultFn<R>,
    delay: Duration,
    stop: Arc<StopSignal>,
) -> Result<(), E> {
    loop {
        let outcome = request().await;
        if !stop.deliver(outcome, &mut on_result)? {
            return Ok(());
        }
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = stop.wake.notified() => {}
        }
        if stop.is_stopped() {
            return Ok(());
        }
    }
}

/// Handle to a single running poll loop.
pub struct PollController<E> {
    stop: Arc<StopSignal>,
    handle: JoinHandle<Result<(), E>>,
}

impl<E> PollController<E> {
    /// Cancels the pending re-arm and suppresses delivery of any request still in
    /// flight. A delivery already under way on another thread finishes before this
    /// returns; none starts afterwards. Idempotent.
    pub fn stop(&self) {
        if !self.stop.stop() {
            tracing::debug!("poller stopped");
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_stopped()
    }

    /// Whether the loop has ended, either stopped or halted by a failed request.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the loop to end. Yields the request error that halted it, if any.
    pub async fn finished(self) -> Result<(), E> {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(_) => Ok(()),
        }
    }
}
