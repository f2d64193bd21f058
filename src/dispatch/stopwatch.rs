use super::*;

/// Counts the ticks of every emitter it is attached to. The count is atomic, so attaching one
/// stopwatch to several emitters (each with its own tick thread) is safe.
pub struct Stopwatch {
    name: String,
    count: Arc<AtomicU64>,
    /// Does not keep the emitters alive
    registrations: Mutex<Vec<(TickEvent, CallbackKey)>>,
}

impl Stopwatch {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            count: Arc::new(AtomicU64::new(0)),
            registrations: Mutex::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Subscribes to the emitter, after which every tick adds 1 to the count
    pub fn attach(&self, emitter: &Emitter) -> CallbackKey {
        let count = self.count.clone();
        let key = emitter.subscribe_fn(move || {
            count.fetch_add(1, SeqCst);
        });
        self.registrations
            .lock()
            .expect("failed to lock stopwatch registrations")
            .push((emitter.events(), key));
        debug!("{} attached to {}", self.name, emitter.name());
        key
    }

    /// Unsubscribes from every emitter this was attached to. Returns how many registrations were
    /// still live. The count is kept.
    pub fn detach_all(&self) -> usize {
        let registrations = std::mem::take(
            &mut *self
                .registrations
                .lock()
                .expect("failed to lock stopwatch registrations"),
        );
        registrations
            .iter()
            .filter(|(events, key)| {
                if events.is_alive() {
                    events.unsubscribe(*key)
                } else {
                    trace!("{} outlived an emitter", self.name);
                    false
                }
            })
            .count()
    }

    /// Never decreases
    pub fn count(&self) -> u64 {
        self.count.load(SeqCst)
    }
}

impl Drop for Stopwatch {
    fn drop(&mut self) {
        self.detach_all();
    }
}
