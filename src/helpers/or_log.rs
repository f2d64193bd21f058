/// Used to log and otherwise ignore an error. Returns the success value, if there was one.
pub trait OrLog<T> {
    fn or_log_warn(self, context: &str) -> Option<T>;
    fn or_log_error(self, context: &str) -> Option<T>;
}

impl<T, U> OrLog<T> for Result<T, U>
where
    U: std::fmt::Display,
{
    fn or_log_warn(self, context: &str) -> Option<T> {
        self.map_err(|e| warn!("{}: {}", context, e)).ok()
    }

    fn or_log_error(self, context: &str) -> Option<T> {
        self.map_err(|e| error!("{}: {}", context, e)).ok()
    }
}
