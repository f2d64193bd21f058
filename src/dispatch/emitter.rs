use super::*;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread::{self, JoinHandle, ThreadId};

#[derive(Debug, Clone, PartialEq)]
pub struct EmitterConfig {
    /// Time from the start of one tick to the start of the next
    pub tick: Duration,
    /// Minimum wait between ticks, even when a tick overruns
    pub min_sleep: Duration,
    /// If a tick with a failed callback stops the emitter. Otherwise failures are logged and
    /// ticking continues.
    pub stop_on_callback_error: bool,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
            min_sleep: Duration::ZERO,
            stop_on_callback_error: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EmitterError {
    /// The emitter was stopped, and can't be started again
    Stopped,
    /// The tick thread could not be spawned
    Spawn(String),
}

impl std::fmt::Display for EmitterError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Stopped => write!(f, "emitter has been stopped and can not be restarted"),
            Self::Spawn(e) => write!(f, "failed to spawn tick thread: {}", e),
        }
    }
}

impl Error for EmitterError {}

/// State shared between the emitter and its tick thread
struct Shared {
    name: String,
    callbacks: Arc<CallbackList>,
    /// Set before the tick thread is told to stop. Checked before every pass.
    stopped: AtomicBool,
    /// Held for the whole of every pass, so manual and scheduled passes never overlap
    pass: Mutex<()>,
    /// The thread running the current pass, if any
    pass_thread: Mutex<Option<ThreadId>>,
    ticks: AtomicU64,
    failed_ticks: AtomicU64,
}

impl Shared {
    fn set_pass_thread(&self, thread: Option<ThreadId>) {
        *self.pass_thread.lock().expect("failed to lock pass thread") = thread;
    }

    fn is_in_pass_on_this_thread(&self) -> bool {
        let pass_thread = *self.pass_thread.lock().expect("failed to lock pass thread");
        pass_thread == Some(thread::current().id())
    }

    /// Runs a pass unless the emitter is stopped, waiting for any pass already in progress on
    /// another thread. Returns None if no pass ran.
    fn run_serialized_pass(&self) -> Option<Result<(), InvokeError>> {
        if self.is_in_pass_on_this_thread() {
            debug!("{} ignoring tick from inside a callback", self.name);
            return None;
        }
        let _pass = self.pass.lock().expect("failed to lock emitter pass");
        if self.stopped.load(SeqCst) {
            return None;
        }
        self.set_pass_thread(Some(thread::current().id()));
        let result = self.run_pass();
        self.set_pass_thread(None);
        Some(result)
    }

    fn run_pass(&self) -> Result<(), InvokeError> {
        let result = self.callbacks.invoke_all();
        let tick = self.ticks.fetch_add(1, SeqCst) + 1;
        if let Err(e) = &result {
            self.failed_ticks.fetch_add(1, SeqCst);
            warn!(
                "{} tick {}: {} callback(s) failed",
                self.name,
                tick,
                e.len()
            );
            for failure in e.iter() {
                warn!("  {}", failure);
            }
        }
        result
    }
}

enum Lifecycle {
    Created,
    Running {
        stop_tx: Sender<()>,
        thread: JoinHandle<()>,
    },
    Stopped,
}

/// Fires its callbacks once per tick on a background thread. Created stopped; call start() to
/// begin ticking and stop() (or drop it) to end. Passes never overlap: if callbacks take longer
/// than a tick the next pass starts late and the schedule drifts (see Metronome).
pub struct Emitter {
    config: EmitterConfig,
    shared: Arc<Shared>,
    lifecycle: Mutex<Lifecycle>,
}

fn tick_loop(shared: Arc<Shared>, config: EmitterConfig, stop_rx: Receiver<()>) {
    let mut metronome = Metronome::new(config.tick, config.min_sleep);
    loop {
        match stop_rx.recv_timeout(metronome.next_sleep()) {
            Err(RecvTimeoutError::Timeout) => (),
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
        match shared.run_serialized_pass() {
            None => break,
            Some(Err(_)) if config.stop_on_callback_error => {
                error!("{} stopping because a callback failed", shared.name);
                shared.stopped.store(true, SeqCst);
                break;
            }
            Some(_) => (),
        }
    }
    debug!("{} tick thread exiting", shared.name);
}

impl Emitter {
    pub fn new(name: &str, config: EmitterConfig) -> Self {
        Self {
            config,
            shared: Arc::new(Shared {
                name: name.to_string(),
                callbacks: Arc::new(CallbackList::new()),
                stopped: AtomicBool::new(false),
                pass: Mutex::new(()),
                pass_thread: Mutex::new(None),
                ticks: AtomicU64::new(0),
                failed_ticks: AtomicU64::new(0),
            }),
            lifecycle: Mutex::new(Lifecycle::Created),
        }
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Starts ticking on a new thread. The first tick happens one tick period from now. Does
    /// nothing if already running.
    pub fn start(&self) -> Result<(), EmitterError> {
        let mut lifecycle = self.lifecycle.lock().expect("failed to lock emitter lifecycle");
        if self.shared.stopped.load(SeqCst) {
            return Err(EmitterError::Stopped);
        }
        match *lifecycle {
            Lifecycle::Running { .. } => Ok(()),
            Lifecycle::Stopped => Err(EmitterError::Stopped),
            Lifecycle::Created => {
                let (stop_tx, stop_rx) = channel();
                let shared = self.shared.clone();
                let config = self.config.clone();
                let thread = thread::Builder::new()
                    .name(self.shared.name.clone())
                    .spawn(move || {
                        let result = catch_unwind(AssertUnwindSafe(|| {
                            tick_loop(shared.clone(), config, stop_rx)
                        }));
                        shared.stopped.store(true, SeqCst);
                        if let Err(payload) = result {
                            error!(
                                "{} tick thread panicked: {}",
                                shared.name,
                                panic_message(&*payload)
                            );
                        }
                    })
                    .map_err(|e| EmitterError::Spawn(e.to_string()))?;
                *lifecycle = Lifecycle::Running { stop_tx, thread };
                info!(
                    "{} started, ticking every {:?}",
                    self.shared.name, self.config.tick
                );
                Ok(())
            }
        }
    }

    /// Stops ticking. Once this returns no new pass will begin. A pass that is already running is
    /// allowed to finish, and is waited for unless this is called from a callback on the tick
    /// thread. Calling it again does nothing.
    pub fn stop(&self) {
        self.shared.stopped.store(true, SeqCst);
        let previous = std::mem::replace(
            &mut *self.lifecycle.lock().expect("failed to lock emitter lifecycle"),
            Lifecycle::Stopped,
        );
        match previous {
            Lifecycle::Running { stop_tx, thread } => {
                if stop_tx.send(()).is_err() {
                    debug!("{} tick thread had already exited", self.shared.name);
                }
                if thread.thread().id() == thread::current().id() {
                    debug!("{} stopped from its own tick thread", self.shared.name);
                } else if self.shared.is_in_pass_on_this_thread() {
                    debug!("{} stopped from inside a manual tick", self.shared.name);
                } else if thread.join().is_err() {
                    error!("{} tick thread panicked", self.shared.name);
                }
                info!(
                    "{} stopped after {} ticks",
                    self.shared.name,
                    self.tick_count()
                );
            }
            Lifecycle::Created => debug!("{} stopped before it started", self.shared.name),
            Lifecycle::Stopped => (),
        }
    }

    /// True between start() and stop(), unless the emitter stopped itself after a callback failed or
    /// its tick thread exited
    pub fn is_running(&self) -> bool {
        let lifecycle = self.lifecycle.lock().expect("failed to lock emitter lifecycle");
        matches!(*lifecycle, Lifecycle::Running { .. }) && !self.shared.stopped.load(SeqCst)
    }

    /// Runs one pass on the calling thread, as if a tick had happened. If a scheduled pass is in
    /// progress this waits for it to finish first. Does nothing once the emitter is stopped, or
    /// when called from a callback of this emitter.
    #[allow(dead_code)]
    pub fn tick(&self) -> Result<(), InvokeError> {
        self.shared.run_serialized_pass().unwrap_or(Ok(()))
    }

    /// Number of passes run so far, including ones with failed callbacks
    pub fn tick_count(&self) -> u64 {
        self.shared.ticks.load(SeqCst)
    }

    pub fn failed_tick_count(&self) -> u64 {
        self.shared.failed_ticks.load(SeqCst)
    }

    pub fn subscribe(&self, callback: &Arc<dyn Callback>) -> CallbackKey {
        let report = self.shared.callbacks.add(callback);
        if report.was_empty {
            debug!("{} has its first callback", self.shared.name);
        }
        report.key
    }

    pub fn subscribe_fn<F>(&self, f: F) -> CallbackKey
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.subscribe(&callback_fn(f))
    }

    /// Returns false if the key was not registered, which is not an error
    #[allow(dead_code)]
    pub fn unsubscribe(&self, key: CallbackKey) -> bool {
        self.shared.callbacks.remove_key(key).removed
    }

    /// A handle other code can subscribe through without being able to fire ticks
    pub fn events(&self) -> TickEvent {
        TickEvent::new(&self.shared.callbacks)
    }
}

impl Drop for Emitter {
    fn drop(&mut self) {
        self.stop();
    }
}
