//! Platform abstraction for synchronization primitives.
//!
//! On bare metal the receive and transmit handlers never preempt each
//! other, so the shared buffer needs no lock. A hosted build
//! shares the driver between threads and must hold a real mutex instead.
//! With the default `std` feature the lock is `parking_lot::Mutex`; the
//! `lock-free` feature substitutes `spin::Mutex`.

pub use std::sync::Arc;

#[cfg(feature = "std")]
pub type MutexGuard<'a, T> = parking_lot::MutexGuard<'a, T>;
#[cfg(all(not(feature = "std"), feature = "lock-free"))]
pub type MutexGuard<'a, T> = spin::MutexGuard<'a, T>;

#[cfg(not(any(feature = "std", feature = "lock-free")))]
compile_error!("either the `std` or the `lock-free` feature must be enabled");

/// Platform-agnostic mutex wrapper.
pub struct Mutex<T> {
    #[cfg(feature = "std")]
    inner: parking_lot::Mutex<T>,
    #[cfg(all(not(feature = "std"), feature = "lock-free"))]
    inner: spin::Mutex<T>,
}

impl<T> Mutex<T> {
    /// Creates a new mutex protecting the given value.
    pub fn new(value: T) -> Self {
        Self {
            #[cfg(feature = "std")]
            inner: parking_lot::Mutex::new(value),
            #[cfg(all(not(feature = "std"), feature = "lock-free"))]
            inner: spin::Mutex::new(value),
        }
    }

    /// Acquires the mutex, blocking until it becomes available.
    pub fn lock(&self) -> MutexGuard<'_, T> {
        self.inner.lock()
    }
}
