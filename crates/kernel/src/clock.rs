use std::cell::Cell;
use std::time::Instant;

/// Monotonic source of elapsed seconds since startup.
pub trait Clock {
    fn elapsed_seconds(&self) -> f32;
}

/// Wall clock started when constructed.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::start()
    }
}

impl Clock for SystemClock {
    fn elapsed_seconds(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

/// Clock advanced by hand, for headless runs and tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f32>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, seconds: f32) {
        self.now.set(seconds);
    }

    pub fn advance(&self, seconds: f32) {
        self.now.set(self.now.get() + seconds);
    }
}

impl Clock for ManualClock {
    fn elapsed_seconds(&self) -> f32 {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn elapsed_seconds(&self) -> f32 {
        (**self).elapsed_seconds()
    }
}
