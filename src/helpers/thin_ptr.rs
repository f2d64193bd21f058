use std::sync::Arc;

/// The address of the value an Arc points to, without trait object metadata. Two clones of the same
/// Arc always give the same address, two separate allocations never do.
pub trait ThinPtr {
    fn thin_ptr(&self) -> usize;
}

/// Arc::ptr_eq() also compares vtables, which are not guaranteed to be unique for a type (see
/// https://github.com/rust-lang/rust/issues/46139). Use this instead.
impl<T: ?Sized> ThinPtr for Arc<T> {
    fn thin_ptr(&self) -> usize {
        Arc::as_ptr(self) as *const () as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_same_for_arc_clones() {
        let a = Arc::new(7);
        let b = a.clone();
        assert_eq!(a.thin_ptr(), b.thin_ptr());
    }

    #[test]
    fn returns_same_for_trait_object_clones() {
        let a: Arc<dyn Fn() + Send + Sync> = Arc::new(|| ());
        let b = a.clone();
        assert_eq!(a.thin_ptr(), b.thin_ptr());
    }

    #[test]
    fn returns_different_for_identical_closures() {
        let make = || -> Arc<dyn Fn() -> i32 + Send + Sync> { Arc::new(|| 7) };
        let a = make();
        let b = make();
        assert_ne!(a.thin_ptr(), b.thin_ptr());
    }

    #[test]
    fn returns_different_for_different_objects() {
        let a = Arc::new(7);
        let b = Arc::new(7);
        assert_ne!(a.thin_ptr(), b.thin_ptr());
    }
}
