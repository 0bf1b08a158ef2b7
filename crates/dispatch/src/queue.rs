//! UI-thread task queue.
//!
//! The queue is bound to the thread that creates it. Handles are cheap to
//! clone and may be moved to any thread; posting never blocks.
//!
//! A task accepted by [`UiHandle::post`] always runs on the UI thread:
//! either before the quit marker, or when the queue is dropped. Once quit
//! has been requested the queue is closed and further posts are refused.

use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock, mpsc};
use std::thread::{self, ThreadId};
use std::time::Duration;

use crate::error::DispatchError;
use crate::panic_message;

/// A unit of work to run on the UI thread.
pub type UiTask = Box<dyn FnOnce() + Send + 'static>;

enum Message {
    Task(UiTask),
    Quit,
}

/// Receiving end of the UI queue, owned by the UI thread.
///
/// Not `Send`: the thread that calls [`UiQueue::new`] is the UI thread for
/// the lifetime of the queue.
pub struct UiQueue {
    tx: mpsc::Sender<Message>,
    rx: mpsc::Receiver<Message>,
    owner: ThreadId,
    closed: Arc<RwLock<bool>>,
    quit_requested: Cell<bool>,
    _not_send: PhantomData<*const ()>,
}

impl UiQueue {
    /// Creates a queue owned by the calling thread.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            owner: thread::current().id(),
            closed: Arc::new(RwLock::new(false)),
            quit_requested: Cell::new(false),
            _not_send: PhantomData,
        }
    }

    /// Returns a posting handle for this queue.
    pub fn handle(&self) -> UiHandle {
        UiHandle {
            tx: self.tx.clone(),
            closed: Arc::clone(&self.closed),
            ui_thread: self.owner,
        }
    }

    /// Identity of the UI thread.
    pub fn ui_thread(&self) -> ThreadId {
        self.owner
    }

    /// Whether a quit marker has been consumed.
    pub fn is_quit_requested(&self) -> bool {
        self.quit_requested.get()
    }

    /// Runs tasks in posting order until [`UiHandle::quit`] is observed.
    pub fn run(&self) {
        tracing::debug!("UI loop started");
        while !self.quit_requested.get() {
            match self.rx.recv() {
                Ok(msg) => {
                    self.dispatch(msg);
                }
                // Unreachable while `self.tx` is alive.
                Err(_) => break,
            }
        }
        tracing::debug!("UI loop stopped");
    }

    /// Runs every task already queued without blocking.
    ///
    /// Stops early at a quit marker. Returns the number of tasks executed.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        while !self.quit_requested.get() {
            match self.rx.try_recv() {
                Ok(msg) => {
                    if self.dispatch(msg) {
                        ran += 1;
                    }
                }
                Err(_) => break,
            }
        }
        ran
    }

    /// Waits up to `timeout` for the first task, then drains the queue.
    ///
    /// Returns the number of tasks executed.
    pub fn run_for(&self, timeout: Duration) -> usize {
        if self.quit_requested.get() {
            return 0;
        }
        match self.rx.recv_timeout(timeout) {
            Ok(msg) => {
                let first = usize::from(self.dispatch(msg));
                first + self.run_pending()
            }
            Err(_) => 0,
        }
    }

    /// Returns `true` if a task (rather than a quit marker) was executed.
    fn dispatch(&self, msg: Message) -> bool {
        match msg {
            Message::Task(task) => {
                run_task(task);
                true
            }
            Message::Quit => {
                self.quit_requested.set(true);
                false
            }
        }
    }
}

fn run_task(task: UiTask) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(task)) {
        tracing::error!(
            message = %panic_message(&*payload),
            "UI task panicked"
        );
    }
}

impl Drop for UiQueue {
    fn drop(&mut self) {
        *self.closed.write().unwrap_or_else(PoisonError::into_inner) = true;

        // Still on the UI thread: run whatever was accepted but never drained.
        let mut ran = 0usize;
        while let Ok(msg) = self.rx.try_recv() {
            if let Message::Task(task) = msg {
                run_task(task);
                ran += 1;
            }
        }
        if ran > 0 {
            tracing::debug!(ran, "ran tasks left in the UI queue");
        }
    }
}

impl Default for UiQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for UiQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiQueue")
            .field("owner", &self.owner)
            .field("quit_requested", &self.quit_requested.get())
            .finish()
    }
}

/// Posting side of the UI queue. `Send + Sync + Clone`.
#[derive(Clone)]
pub struct UiHandle {
    tx: mpsc::Sender<Message>,
    closed: Arc<RwLock<bool>>,
    ui_thread: ThreadId,
}

impl UiHandle {
    /// Enqueues `task` to run later on the UI thread.
    ///
    /// Always enqueues, even when called from the UI thread itself. Fails
    /// once quit has been requested or the queue is gone; an accepted task
    /// is guaranteed to run.
    pub fn post<F>(&self, task: F) -> Result<(), DispatchError>
    where
        F: FnOnce() + Send + 'static,
    {
        // Held across the send so no task can land behind the quit marker.
        let closed = self.closed.read().unwrap_or_else(PoisonError::into_inner);
        if *closed {
            return Err(DispatchError::Closed);
        }
        self.tx
            .send(Message::Task(Box::new(task)))
            .map_err(|_| DispatchError::Closed)
    }

    /// Asks [`UiQueue::run`] to return after the tasks queued before this
    /// call, and closes the queue to new posts.
    pub fn quit(&self) -> Result<(), DispatchError> {
        let mut closed = self.closed.write().unwrap_or_else(PoisonError::into_inner);
        if *closed {
            return Err(DispatchError::Closed);
        }
        *closed = true;
        self.tx.send(Message::Quit).map_err(|_| DispatchError::Closed)
    }

    /// Whether the queue still accepts tasks.
    pub fn is_closed(&self) -> bool {
        *self.closed.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether the caller is running on the UI thread.
    pub fn is_ui_thread(&self) -> bool {
        thread::current().id() == self.ui_thread
    }

    /// Identity of the UI thread this handle posts to.
    pub fn ui_thread(&self) -> ThreadId {
        self.ui_thread
    }
}

impl fmt::Debug for UiHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiHandle")
            .field("ui_thread", &self.ui_thread)
            .finish()
    }
}
