use super::*;

pub type CallbackResult = Result<(), Box<dyn Error + Send + Sync>>;

/// Something that can be registered on a CallbackList and invoked every time the list fires. A is
/// the argument each invocation receives, which is () for plain ticks.
///
/// Callbacks are shared as `Arc<dyn Callback<A>>`, and two callbacks are the same callback only if
/// they are the same allocation (see ThinPtr). Closures implement this directly.
pub trait Callback<A = ()>: Send + Sync {
    fn invoke(&self, arg: &A) -> CallbackResult;
}

impl<A, F> Callback<A> for F
where
    F: Fn(&A) -> CallbackResult + Send + Sync,
{
    fn invoke(&self, arg: &A) -> CallbackResult {
        self(arg)
    }
}

/// Wraps a closure that takes no arguments and can't fail
pub fn callback_fn<F>(f: F) -> Arc<dyn Callback>
where
    F: Fn() + Send + Sync + 'static,
{
    Arc::new(move |_: &()| -> CallbackResult {
        f();
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_callbacks() {
        let callback: Arc<dyn Callback<i32>> = Arc::new(|arg: &i32| -> CallbackResult {
            if *arg > 0 {
                Ok(())
            } else {
                Err("not positive".into())
            }
        });
        assert!(callback.invoke(&3).is_ok());
        assert!(callback.invoke(&-3).is_err());
    }

    #[test]
    fn callback_fn_runs_closure() {
        let count = Arc::new(AtomicU64::new(0));
        let count_clone = count.clone();
        let callback = callback_fn(move || {
            count_clone.fetch_add(1, SeqCst);
        });
        callback.invoke(&()).unwrap();
        callback.invoke(&()).unwrap();
        assert_eq!(count.load(SeqCst), 2);
    }
}
