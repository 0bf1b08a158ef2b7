//! Fire-and-forget background operations.
//!
//! Each submission gets its own named thread. The outcome is posted to the
//! UI queue and handed to a single completion callback, so success and
//! failure can never both fire.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::thread;

use tracing::Dispatch;

use crate::error::OperationError;
use crate::queue::UiHandle;
use crate::{OPERATION_THREAD_PREFIX, panic_message};

type Work<T, E> = Box<dyn FnOnce() -> Result<T, E> + Send + 'static>;

/// A unit of background work awaiting submission.
pub struct AsyncOperation<T, E> {
    name: String,
    work: Work<T, E>,
}

impl<T, E> AsyncOperation<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Wraps `work` under a short name used for the thread and for logs.
    pub fn new<W>(name: impl Into<String>, work: W) -> Self
    where
        W: FnOnce() -> Result<T, E> + Send + 'static,
    {
        Self {
            name: name.into(),
            work: Box::new(work),
        }
    }

    /// Operation name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Starts the work on a new thread and returns immediately.
    ///
    /// `on_complete` runs exactly once, on the UI thread behind `ui`.
    pub fn submit<C>(self, ui: &UiHandle, on_complete: C)
    where
        C: FnOnce(Result<T, OperationError<E>>) + Send + 'static,
    {
        let job = Job {
            name: self.name,
            work: self.work,
            on_complete,
            ui: ui.clone(),
        };

        // The job travels over a channel so it is still ours if the spawn fails.
        let (job_tx, job_rx) = mpsc::sync_channel::<Job<T, E, C>>(1);
        // Worker logs go to the submitter's subscriber.
        let dispatch = tracing::dispatcher::get_default(Dispatch::clone);
        let spawned = thread::Builder::new()
            .name(format!("{OPERATION_THREAD_PREFIX}{}", job.name))
            .spawn(move || {
                tracing::dispatcher::with_default(&dispatch, || {
                    if let Ok(job) = job_rx.recv() {
                        job.run();
                    }
                });
            });

        match spawned {
            Ok(_) => {
                if let Err(mpsc::SendError(job)) = job_tx.send(job) {
                    let err = std::io::Error::other("background thread exited before receiving work");
                    job.fail(OperationError::Spawn(err));
                }
            }
            Err(e) => {
                tracing::error!(operation = %job.name, error = %e, "failed to spawn operation thread");
                job.fail(OperationError::Spawn(e));
            }
        }
    }
}

impl<T, E> fmt::Debug for AsyncOperation<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncOperation")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Runs `work` off the UI thread and delivers its outcome to `on_complete`
/// on the UI thread.
///
/// Non-blocking. There is no cancellation: submitted work always runs to
/// completion.
pub fn submit<T, E, W, C>(ui: &UiHandle, name: &str, work: W, on_complete: C)
where
    T: Send + 'static,
    E: Send + 'static,
    W: FnOnce() -> Result<T, E> + Send + 'static,
    C: FnOnce(Result<T, OperationError<E>>) + Send + 'static,
{
    AsyncOperation::new(name, work).submit(ui, on_complete);
}

struct Job<T, E, C> {
    name: String,
    work: Work<T, E>,
    on_complete: C,
    ui: UiHandle,
}

impl<T, E, C> Job<T, E, C>
where
    T: Send + 'static,
    E: Send + 'static,
    C: FnOnce(Result<T, OperationError<E>>) + Send + 'static,
{
    fn run(self) {
        let Self {
            name,
            work,
            on_complete,
            ui,
        } = self;

        tracing::debug!(operation = %name, "operation started");
        let outcome = match panic::catch_unwind(AssertUnwindSafe(work)) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(OperationError::Failed(e)),
            Err(payload) => {
                let message = panic_message(&*payload);
                tracing::error!(operation = %name, %message, "operation panicked");
                Err(OperationError::Panicked(message))
            }
        };
        tracing::debug!(operation = %name, ok = outcome.is_ok(), "operation finished");

        deliver(&ui, &name, outcome, on_complete);
    }

    fn fail(self, err: OperationError<E>) {
        deliver(&self.ui, &self.name, Err(err), self.on_complete);
    }
}

fn deliver<T, E, C>(ui: &UiHandle, name: &str, outcome: Result<T, OperationError<E>>, on_complete: C)
where
    T: Send + 'static,
    E: Send + 'static,
    C: FnOnce(Result<T, OperationError<E>>) + Send + 'static,
{
    if ui.post(move || on_complete(outcome)).is_err() {
        tracing::warn!(operation = %name, "UI queue closed, operation outcome dropped");
    }
}
