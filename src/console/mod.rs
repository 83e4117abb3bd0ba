//! Per-screen view state. Each screen owns its lists and form state and is the
//! boundary where remote failures are caught and recorded instead of returned.

pub mod bookings;
pub mod catalog;
pub mod editor;
pub mod list;
pub mod waitlist;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use bookings::BookingsScreen;
pub use catalog::CatalogScreen;
pub use waitlist::WaitlistScreen;

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
