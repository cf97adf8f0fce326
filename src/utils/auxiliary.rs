use std::sync::{Arc, Mutex, MutexGuard};

pub type SharableRef<T> = Arc<Mutex<T>>;

pub trait SharableRefExt<T>{
    fn new_sharable(inner: T) -> SharableRef<T>;

    /// Locks the inner value. A poisoned lock is recovered, the holder panicking
    /// does not leave the inner value half updated.
    fn lock_inner(&self) -> MutexGuard<T>;
}

impl<T> SharableRefExt<T> for SharableRef<T>{
    fn new_sharable(inner: T) -> SharableRef<T>{
        Arc::new(Mutex::new(inner))
    }

    fn lock_inner(&self) -> MutexGuard<T> {
        self.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
