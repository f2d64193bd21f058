use super::*;

struct MockCallbackInner {
    count: Mutex<u32>,
    f: Box<dyn Fn() -> CallbackResult + Send + Sync>,
}

/// A callback that counts how many times it was invoked, and optionally does something else
pub struct MockCallback(Arc<MockCallbackInner>);

impl MockCallback {
    pub fn new() -> Self {
        Self::new_with_fn(|| Ok(()))
    }

    pub fn new_terrified() -> Self {
        Self::new_with_fn(|| panic!("mock callback should not have been invoked"))
    }

    pub fn new_failing(message: &'static str) -> Self {
        Self::new_with_fn(move || Err(message.into()))
    }

    pub fn new_panicking(message: &'static str) -> Self {
        Self::new_with_fn(move || panic!("{}", message))
    }

    pub fn new_with_fn<F>(f: F) -> Self
    where
        F: Fn() -> CallbackResult + Send + Sync + 'static,
    {
        Self(Arc::new(MockCallbackInner {
            count: Mutex::new(0),
            f: Box::new(f),
        }))
    }

    pub fn get(&self) -> Arc<dyn Callback> {
        self.0.clone()
    }

    pub fn invoke_count(&self) -> u32 {
        *self.0.count.lock().unwrap()
    }
}

impl Callback for MockCallbackInner {
    fn invoke(&self, _: &()) -> CallbackResult {
        *self.count.lock().unwrap() += 1;
        (self.f)()
    }
}

/// Hands out callbacks that record their ID into a shared list when invoked, for checking order
#[derive(Clone)]
pub struct InvocationRecorder(Arc<Mutex<Vec<u32>>>);

impl InvocationRecorder {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(Vec::new())))
    }

    pub fn callback(&self, id: u32) -> Arc<dyn Callback> {
        let log = self.0.clone();
        callback_fn(move || log.lock().unwrap().push(id))
    }

    /// Returns the IDs recorded since the last call, in invocation order
    pub fn take(&self) -> Vec<u32> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}
