//! Time source for shot charging
//!
//! The simulation never reads the wall clock itself. Handlers that care about
//! elapsed time take a `&dyn Clock` so tests can step time by hand.

use std::cell::Cell;

/// Millisecond time source
pub trait Clock {
    /// Current time in milliseconds (arbitrary epoch, monotonic enough for charging)
    fn now_ms(&self) -> f64;
}

/// Browser wall clock backed by `Date.now()`
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserClock;

#[cfg(target_arch = "wasm32")]
impl Clock for BrowserClock {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }
}

/// Hand-driven clock for tests and scripted play
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::new(1000.0);
        assert_eq!(clock.now_ms(), 1000.0);
        clock.advance(250.0);
        assert_eq!(clock.now_ms(), 1250.0);
        clock.set(0.0);
        assert_eq!(clock.now_ms(), 0.0);
    }
}
