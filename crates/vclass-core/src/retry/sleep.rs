use std::time::Duration;

/// Blocks the current thread between attempts.
///
/// The retry loop and the scrapers' courtesy pause go through this so tests
/// can record the waits instead of performing them.
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

/// Default sleeper backed by `std::thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

impl<S: Sleeper + ?Sized> Sleeper for &mut S {
    fn sleep(&mut self, duration: Duration) {
        (**self).sleep(duration)
    }
}
