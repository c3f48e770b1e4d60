//! The worker context: runs one command handler at a time.
//!
//! Jobs arrive through a single-slot handoff. Submitting never blocks: if the
//! slot is already occupied the submission is refused. While a handler runs
//! the busy flag is raised so the line editor can refuse new input early.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};

use picoshell_terminal::{CommandJob, Dispatcher, MessageSink};
use picoshell_types::error::{Result, ShellError};

use crate::messages::MessageQueue;

/// Thread name of the worker context.
pub const WORKER_THREAD: &str = "picoshell-worker";

#[derive(Default)]
struct WorkerState {
    busy: AtomicBool,
    /// Jobs accepted but not yet finished, including the running one.
    in_flight: AtomicUsize,
}

/// Lowers the busy flag when the handler returns or unwinds.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Submission side of the worker. Cheap to clone; the worker stops once
/// every handle is gone.
#[derive(Clone)]
pub struct WorkerHandle {
    jobs: SyncSender<CommandJob>,
    state: Arc<WorkerState>,
}

impl Dispatcher for WorkerHandle {
    fn is_busy(&self) -> bool {
        self.state.busy.load(Ordering::Acquire)
    }

    fn submit(&self, job: CommandJob) -> Result<()> {
        self.state.in_flight.fetch_add(1, Ordering::AcqRel);
        match self.jobs.try_send(job) {
            Ok(()) => Ok(()),
            Err(e) => {
                self.state.in_flight.fetch_sub(1, Ordering::AcqRel);
                match e {
                    TrySendError::Full(job) => {
                        log::warn!("command queue full, rejected '{}'", job.path);
                        Err(ShellError::JobQueueFull)
                    },
                    TrySendError::Disconnected(_) => Err(ShellError::WorkerGone),
                }
            },
        }
    }

    fn is_idle(&self) -> bool {
        self.state.in_flight.load(Ordering::Acquire) == 0
    }
}

/// The running worker thread.
pub struct Worker {
    handle: WorkerHandle,
    thread: JoinHandle<()>,
}

impl Worker {
    /// Spawn the worker context. Handler output and announcements go to
    /// `messages`.
    pub fn spawn(messages: Arc<MessageQueue>, announce: bool) -> Result<Self> {
        let (tx, rx) = mpsc::sync_channel(1);
        let state = Arc::new(WorkerState::default());
        let thread_state = Arc::clone(&state);
        let thread = thread::Builder::new()
            .name(WORKER_THREAD.into())
            .spawn(move || run(rx, thread_state, messages, announce))?;
        Ok(Self {
            handle: WorkerHandle { jobs: tx, state },
            thread,
        })
    }

    pub fn handle(&self) -> WorkerHandle {
        self.handle.clone()
    }

    /// Wait for the worker to exit. Blocks until every other
    /// [`WorkerHandle`] has been dropped and the last job has finished.
    pub fn join(self) -> Result<()> {
        drop(self.handle);
        self.thread.join().map_err(|_| {
            log::error!("command worker panicked");
            ShellError::WorkerGone
        })
    }
}

fn run(
    jobs: Receiver<CommandJob>,
    state: Arc<WorkerState>,
    messages: Arc<MessageQueue>,
    announce: bool,
) {
    log::info!("command worker started");
    while let Ok(job) = jobs.recv() {
        let _in_flight = InFlightGuard(&state.in_flight);
        if announce {
            messages.info("entering command handler\n");
        }
        {
            let _busy = BusyGuard::raise(&state.busy);
            let argv: Vec<&str> = job.args.iter().map(String::as_str).collect();
            log::debug!("running '{}' with {} args", job.path, argv.len());
            if let Err(e) = job.handler.execute(&argv, &*messages) {
                log::warn!("'{}' failed: {e}", job.path);
                messages.error(&format!("{e}\n"));
            }
        }
        if announce {
            messages.info("leaving command handler\n");
        }
    }
    log::info!("command worker stopped");
}
