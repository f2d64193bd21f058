use super::*;

/// How a single callback failed
#[derive(Debug)]
pub enum CallbackFailure {
    /// The callback returned an error
    Returned(Box<dyn Error + Send + Sync>),
    /// The callback panicked. The string is the panic message.
    Panicked(String),
}

/// A callback that failed during an invocation pass. key is the registration that failed.
#[derive(Debug)]
pub struct CallbackError {
    pub key: CallbackKey,
    pub cause: CallbackFailure,
}

impl std::fmt::Display for CallbackError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &self.cause {
            CallbackFailure::Returned(e) => write!(f, "callback {:?} failed: {}", self.key, e),
            CallbackFailure::Panicked(msg) => {
                write!(f, "callback {:?} panicked: {}", self.key, msg)
            }
        }
    }
}

impl Error for CallbackError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            CallbackFailure::Returned(e) => Some(&**e),
            CallbackFailure::Panicked(_) => None,
        }
    }
}

/// Returned by an invocation pass in which at least one callback failed. Every callback in the pass
/// was still attempted. first is the earliest failure in registration order, the rest are in
/// suppressed.
#[derive(Debug)]
pub struct InvokeError {
    pub first: CallbackError,
    pub suppressed: Vec<CallbackError>,
}

impl InvokeError {
    /// None if there were no failures
    pub fn from_failures(failures: Vec<CallbackError>) -> Option<Self> {
        let mut failures = failures.into_iter();
        let first = failures.next()?;
        Some(Self {
            first,
            suppressed: failures.collect(),
        })
    }

    /// Number of callbacks that failed, always at least 1
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        1 + self.suppressed.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CallbackError> {
        std::iter::once(&self.first).chain(self.suppressed.iter())
    }
}

impl std::fmt::Display for InvokeError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.suppressed.len() {
            0 => write!(f, "{}", self.first),
            1 => write!(f, "{} (and 1 other callback failed)", self.first),
            n => write!(f, "{} (and {} other callbacks failed)", self.first, n),
        }
    }
}

impl Error for InvokeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(message: &str) -> CallbackError {
        CallbackError {
            key: CallbackKey::default(),
            cause: CallbackFailure::Returned(message.into()),
        }
    }

    #[test]
    fn no_failures_is_none() {
        assert!(InvokeError::from_failures(Vec::new()).is_none());
    }

    #[test]
    fn first_failure_is_first() {
        let e = InvokeError::from_failures(vec![failure("a"), failure("b"), failure("c")])
            .expect("should be an error");
        assert_eq!(e.len(), 3);
        assert!(e.first.to_string().ends_with("failed: a"));
        let messages: Vec<String> = e.iter().map(|f| f.to_string()).collect();
        assert!(messages[1].ends_with("b"));
        assert!(messages[2].ends_with("c"));
    }

    #[test]
    fn display_counts_suppressed() {
        let e = InvokeError::from_failures(vec![failure("a"), failure("b")]).unwrap();
        assert!(e.to_string().ends_with("(and 1 other callback failed)"));
    }

    #[test]
    fn panic_has_no_source() {
        let e = CallbackError {
            key: CallbackKey::default(),
            cause: CallbackFailure::Panicked("boom".to_string()),
        };
        assert!(e.source().is_none());
        assert!(e.to_string().ends_with("panicked: boom"));
    }
}
