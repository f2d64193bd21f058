use std::any::Any;

/// Gets a readable message out of a panic payload. Panics raised with a message carry a &str or a
/// String, anything else only gets a placeholder.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(b) = payload.downcast_ref::<Box<dyn Any + Send>>() {
        panic_message(&**b)
    } else {
        format!("non-string panic payload ({:?})", payload.type_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::catch_unwind;

    #[test]
    fn works_on_str() {
        let payload = catch_unwind(|| panic!("foo")).unwrap_err();
        assert_eq!(panic_message(&*payload), "foo");
    }

    #[test]
    fn works_on_formatted_string() {
        let payload = catch_unwind(|| panic!("foo {}", 7)).unwrap_err();
        assert_eq!(panic_message(&*payload), "foo 7");
    }

    #[test]
    fn works_on_boxed_payload() {
        let inner: Box<dyn Any + Send> = Box::new("foo");
        assert_eq!(panic_message(&inner), "foo");
    }

    #[test]
    fn describes_non_string_payload() {
        let payload = catch_unwind(|| std::panic::panic_any(7_u32)).unwrap_err();
        assert!(panic_message(&*payload).starts_with("non-string panic payload"));
    }
}
