pub mod portal_server;

use std::time::Duration;
use vclass_core::retry::Sleeper;

/// Records waits instead of sleeping so retry tests run instantly.
#[derive(Debug, Default)]
pub struct NoSleep(pub Vec<Duration>);

impl Sleeper for NoSleep {
    fn sleep(&mut self, duration: Duration) {
        self.0.push(duration);
    }
}
