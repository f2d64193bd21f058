use super::*;

/// A subscribe-only handle to an emitter's ticks. It can be cloned and handed out freely, but can't
/// fire the ticks itself. It does not keep the emitter alive; once the emitter is dropped
/// subscribing does nothing.
#[derive(Clone)]
pub struct TickEvent(Weak<CallbackList>);

impl TickEvent {
    pub fn new(callbacks: &Arc<CallbackList>) -> Self {
        Self(Arc::downgrade(callbacks))
    }

    /// Returns None if the emitter is gone
    pub fn subscribe(&self, callback: &Arc<dyn Callback>) -> Option<CallbackKey> {
        self.0.upgrade().map(|list| list.add(callback).key)
    }

    #[allow(dead_code)]
    pub fn subscribe_fn<F>(&self, f: F) -> Option<CallbackKey>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.subscribe(&callback_fn(f))
    }

    /// Returns true if the registration was removed. Unknown keys and dead emitters are ignored.
    pub fn unsubscribe(&self, key: CallbackKey) -> bool {
        match self.0.upgrade() {
            Some(list) => list.remove_key(key).removed,
            None => false,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}
