//! Single-worker event loop.
//!
//! All commands and provider events are funnelled through one mpsc
//! channel into one worker thread, so engine state is only ever touched
//! sequentially. Timed work (debounced persistence, auto-save, the idle
//! sweep) is driven by `recv_timeout` deadlines instead of dedicated
//! timer threads.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tabweave_provider::{ProviderEvent, TabProvider};
use tabweave_store::KeyValueStore;
use tracing::{debug, warn};

use crate::command::{Command, CommandResponse};
use crate::dispatcher::Dispatcher;
use crate::{Error, Result};

/// How long after the last structural change the layout is persisted.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(2);

/// Cadence of the idle-suspension sweep.
pub const DEFAULT_IDLE_CHECK: Duration = Duration::from_secs(60);

enum WorkerEvent {
    Command {
        command: Command,
        reply: Sender<CommandResponse>,
    },
    Provider(ProviderEvent),
    Shutdown,
}

pub struct RuntimeConfig {
    pub provider: Arc<dyn TabProvider>,
    pub store: Arc<dyn KeyValueStore>,
    /// Provider-originated events, forwarded into the worker loop.
    pub events: Option<Receiver<ProviderEvent>>,
    pub debounce: Duration,
    pub idle_check: Duration,
}

impl RuntimeConfig {
    pub fn new(provider: Arc<dyn TabProvider>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            provider,
            store,
            events: None,
            debounce: DEFAULT_DEBOUNCE,
            idle_check: DEFAULT_IDLE_CHECK,
        }
    }
}

/// Cloneable sender half used to issue commands to the worker and wait
/// for the response.
#[derive(Clone)]
pub struct CommandHandle {
    tx: Sender<WorkerEvent>,
}

impl CommandHandle {
    pub fn send(&self, command: Command) -> Result<CommandResponse> {
        let (reply_tx, reply_rx) = channel();
        self.tx
            .send(WorkerEvent::Command {
                command,
                reply: reply_tx,
            })
            .map_err(|_| Error::WorkerUnavailable("worker channel closed".to_string()))?;
        reply_rx
            .recv()
            .map_err(|_| Error::WorkerUnavailable("worker dropped the reply".to_string()))
    }
}

pub struct Runtime {
    tx: Sender<WorkerEvent>,
    worker: Option<JoinHandle<()>>,
    forwarder: Option<JoinHandle<()>>,
}

impl Runtime {
    pub fn start(config: RuntimeConfig) -> Result<Self> {
        let dispatcher = Dispatcher::new(config.provider, config.store)?;

        let (tx, rx) = channel();

        // Provider events arrive on their own receiver; a forwarder
        // thread merges them into the single worker channel.
        let forwarder = match config.events {
            Some(events) => {
                let tx_events = tx.clone();
                let handle = std::thread::Builder::new()
                    .name("tabweave-events".to_string())
                    .spawn(move || {
                        while let Ok(event) = events.recv() {
                            if tx_events.send(WorkerEvent::Provider(event)).is_err() {
                                break;
                            }
                        }
                    })?;
                Some(handle)
            }
            None => None,
        };

        let debounce = config.debounce;
        let idle_check = config.idle_check;
        let worker = std::thread::Builder::new()
            .name("tabweave-runtime".to_string())
            .spawn(move || worker_loop(dispatcher, rx, debounce, idle_check))?;

        Ok(Self {
            tx,
            worker: Some(worker),
            forwarder,
        })
    }

    pub fn handle(&self) -> CommandHandle {
        CommandHandle {
            tx: self.tx.clone(),
        }
    }

    /// Stops the worker, flushing any pending debounced save first.
    pub fn shutdown(mut self) {
        let _ = self.tx.send(WorkerEvent::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
        // The forwarder ends once the provider side hangs up; do not
        // block shutdown on it.
        if let Some(forwarder) = self.forwarder.take()
            && forwarder.is_finished()
        {
            let _ = forwarder.join();
        }
    }
}

fn worker_loop(
    mut dispatcher: Dispatcher,
    rx: Receiver<WorkerEvent>,
    debounce: Duration,
    idle_check: Duration,
) {
    let mut debounce_deadline: Option<Instant> = None;
    let mut last_auto_save = Instant::now();
    let mut last_idle_check = Instant::now();

    loop {
        let now = Instant::now();

        // Fire whichever alarms are due before blocking again.
        if let Some(deadline) = debounce_deadline
            && now >= deadline
        {
            debounce_deadline = None;
            if let Err(err) = dispatcher.persist_layout() {
                warn!(%err, "debounced save failed");
            }
        }

        let auto_save_interval =
            Duration::from_secs(dispatcher.settings().auto_save_interval_seconds);
        if dispatcher.settings().auto_save_enabled
            && now.duration_since(last_auto_save) >= auto_save_interval
        {
            last_auto_save = now;
            dispatcher.run_auto_save();
        }

        if now.duration_since(last_idle_check) >= idle_check {
            last_idle_check = now;
            dispatcher.run_idle_sweep();
        }

        let mut next: Option<Instant> = Some(last_idle_check + idle_check);
        if dispatcher.settings().auto_save_enabled {
            next = min_deadline(next, Some(last_auto_save + auto_save_interval));
        }
        next = min_deadline(next, debounce_deadline);

        let wait = next
            .map(|deadline| deadline.saturating_duration_since(now))
            .unwrap_or(idle_check);

        match rx.recv_timeout(wait) {
            Ok(WorkerEvent::Command { command, reply }) => {
                let response = dispatcher.handle(command);
                let _ = reply.send(response);
            }
            Ok(WorkerEvent::Provider(event)) => {
                if dispatcher.on_provider_event(event) {
                    debounce_deadline = Some(Instant::now() + debounce);
                }
            }
            Ok(WorkerEvent::Shutdown) => break,
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    if debounce_deadline.is_some() {
        if let Err(err) = dispatcher.persist_layout() {
            warn!(%err, "final save failed");
        }
    }
    debug!("worker stopped");
}

fn min_deadline(a: Option<Instant>, b: Option<Instant>) -> Option<Instant> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}
