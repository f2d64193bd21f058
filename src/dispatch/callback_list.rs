use super::*;
use slotmap::SlotMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

new_key_type! {
    /// Identifies one registration on a CallbackList. Returned when subscribing, and used to
    /// unsubscribe.
    pub struct CallbackKey;
}

/// Returned by CallbackList::add(), used instead of a raw key for code readability
#[derive(Debug, Clone, Copy)]
pub struct AddReport {
    pub key: CallbackKey,
    pub was_empty: bool,
}

/// Returned by CallbackList::remove(), used instead of a raw bool for code readability
#[derive(Debug, Clone, Copy)]
pub struct RemoveReport {
    /// False if nothing matched, which is not an error
    pub removed: bool,
    pub is_now_empty: bool,
}

#[derive(Derivative)]
#[derivative(Clone(bound = ""), Debug(bound = ""))]
struct Entry<A> {
    key: CallbackKey,
    /// From thin_ptr(), so entries can be compared without touching the callback
    ptr: usize,
    #[derivative(Debug = "ignore")]
    callback: Arc<dyn Callback<A>>,
}

#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
struct Entries<A> {
    /// Only used to hand out unique keys, the values are in order
    keys: SlotMap<CallbackKey, ()>,
    /// In registration order, which is invocation order
    order: Vec<Entry<A>>,
}

impl<A> Entries<A> {
    fn remove_at(&mut self, i: usize) -> RemoveReport {
        let entry = self.order.remove(i);
        self.keys.remove(entry.key);
        RemoveReport {
            removed: true,
            is_now_empty: self.order.is_empty(),
        }
    }

    fn not_removed(&self) -> RemoveReport {
        RemoveReport {
            removed: false,
            is_now_empty: self.order.is_empty(),
        }
    }
}

/// An ordered list of callbacks that can all be invoked together. Callbacks can be added, removed
/// and invoked from any thread, including from inside a callback on the same list.
///
/// Invoking iterates over a snapshot taken when the pass starts and does not hold the lock while
/// callbacks run. Callbacks added or removed during a pass take effect on the next pass. The same
/// callback can be added multiple times, and is then invoked once per registration.
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct CallbackList<A = ()> {
    entries: Mutex<Entries<A>>,
    /// True exactly when the list has callbacks, only written while entries is locked. Lets passes
    /// over an empty list skip the lock.
    has_callbacks: AtomicBool,
}

impl<A> CallbackList<A> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Entries {
                keys: SlotMap::with_key(),
                order: Vec::new(),
            }),
            has_callbacks: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<Entries<A>> {
        self.entries.lock().expect("failed to lock callbacks")
    }

    /// Appends a callback, it will be invoked after all callbacks already in the list
    pub fn add(&self, callback: &Arc<dyn Callback<A>>) -> AddReport {
        let mut entries = self.lock();
        let was_empty = entries.order.is_empty();
        let key = entries.keys.insert(());
        entries.order.push(Entry {
            key,
            ptr: callback.thin_ptr(),
            callback: callback.clone(),
        });
        // Set while locked, so it can't race with a remove that empties the list
        self.has_callbacks.store(true, SeqCst);
        AddReport { key, was_empty }
    }

    pub fn add_fn<F>(&self, f: F) -> AddReport
    where
        F: Fn(&A) -> CallbackResult + Send + Sync + 'static,
    {
        self.add(&(Arc::new(f) as Arc<dyn Callback<A>>))
    }

    /// Removes the earliest registration of this callback, if there is one
    #[allow(dead_code)]
    pub fn remove(&self, callback: &Arc<dyn Callback<A>>) -> RemoveReport {
        let ptr = callback.thin_ptr();
        let mut entries = self.lock();
        let report = match entries.order.iter().position(|entry| entry.ptr == ptr) {
            Some(i) => entries.remove_at(i),
            None => entries.not_removed(),
        };
        self.update_has_callbacks(&report);
        report
    }

    /// Removes the registration with the given key, if it is still registered
    pub fn remove_key(&self, key: CallbackKey) -> RemoveReport {
        let mut entries = self.lock();
        let report = if entries.keys.contains_key(key) {
            match entries.order.iter().position(|entry| entry.key == key) {
                Some(i) => entries.remove_at(i),
                None => {
                    error!("{:?} has a key but is not in the callback order", key);
                    entries.keys.remove(key);
                    entries.not_removed()
                }
            }
        } else {
            entries.not_removed()
        };
        self.update_has_callbacks(&report);
        report
    }

    fn update_has_callbacks(&self, report: &RemoveReport) {
        if report.is_now_empty {
            self.has_callbacks.store(false, SeqCst);
        }
    }

    #[allow(dead_code)]
    pub fn contains_key(&self, key: CallbackKey) -> bool {
        self.lock().keys.contains_key(key)
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.lock().order.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invokes every callback registered when the pass starts, in registration order, passing arg
    /// to each. A callback that fails or panics does not stop the rest. If any failed, the error
    /// holds all of them after the whole pass has run.
    pub fn invoke_all_with(&self, arg: &A) -> Result<(), InvokeError> {
        if !self.has_callbacks.load(SeqCst) {
            return Ok(());
        }
        let snapshot = self.lock().order.clone();
        let mut failures = Vec::new();
        for entry in snapshot {
            let cause = match catch_unwind(AssertUnwindSafe(|| entry.callback.invoke(arg))) {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => CallbackFailure::Returned(e),
                Err(payload) => CallbackFailure::Panicked(panic_message(&*payload)),
            };
            failures.push(CallbackError {
                key: entry.key,
                cause,
            });
        }
        match InvokeError::from_failures(failures) {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl CallbackList<()> {
    pub fn invoke_all(&self) -> Result<(), InvokeError> {
        self.invoke_all_with(&())
    }
}

impl<A> Default for CallbackList<A> {
    fn default() -> Self {
        Self::new()
    }
}
