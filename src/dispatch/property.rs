use super::*;

/// Identifies a property, unique for the life of the program even if names are reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyId(u64);

static NEXT_PROPERTY_ID: AtomicU64 = AtomicU64::new(0);

/// Passed to change listeners, says which property changed and what it changed to
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyChanged<T> {
    pub sender: PropertyId,
    pub name: String,
    pub value: T,
}

/// A named value that notifies its listeners every time it is set to something different.
/// Listeners run on the thread that calls set(), after the new value is stored. Concurrent sets
/// notify one at a time in the order the values were stored, so the last notification always
/// carries the current value. A listener must not set the property it is listening to.
pub struct Property<T> {
    id: PropertyId,
    name: String,
    value: Mutex<T>,
    /// Held from storing a value until its listeners have all run
    notifying: Mutex<()>,
    listeners: CallbackList<PropertyChanged<T>>,
}

impl<T: PartialEq + Clone + Send + Sync + 'static> Property<T> {
    pub fn new(name: &str, value: T) -> Self {
        Self {
            id: PropertyId(NEXT_PROPERTY_ID.fetch_add(1, SeqCst)),
            name: name.to_string(),
            value: Mutex::new(value),
            notifying: Mutex::new(()),
            listeners: CallbackList::new(),
        }
    }

    pub fn id(&self) -> PropertyId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self) -> T {
        self.value.lock().expect("failed to lock property").clone()
    }

    /// Returns Ok(false) without notifying if the value is unchanged. If a listener fails the
    /// value is still set, and the error is returned after every listener has run.
    pub fn set(&self, value: T) -> Result<bool, InvokeError> {
        let _notifying = self.notifying.lock().expect("failed to lock property notification");
        let change = {
            let mut current = self.value.lock().expect("failed to lock property");
            if *current == value {
                return Ok(false);
            }
            *current = value.clone();
            PropertyChanged {
                sender: self.id,
                name: self.name.clone(),
                value,
            }
        };
        self.listeners.invoke_all_with(&change)?;
        Ok(true)
    }

    pub fn on_change<F>(&self, f: F) -> CallbackKey
    where
        F: Fn(&PropertyChanged<T>) -> CallbackResult + Send + Sync + 'static,
    {
        self.listeners.add_fn(f).key
    }

    pub fn remove_listener(&self, key: CallbackKey) -> bool {
        self.listeners.remove_key(key).removed
    }
}
