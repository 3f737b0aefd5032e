//! Microsecond timing abstractions
//!
//! Ranging needs two things from the platform: a free-running microsecond
//! counter to timestamp edges, and a busy-wait to shape the trigger pulse.
//! Both are behind [`Clock`] so tests can run on a simulated timeline.

use embedded_hal::delay::DelayNs;

/// Monotonic microsecond clock with busy-wait delays
///
/// The counter is 32 bits wide and wraps roughly every 71 minutes.
/// Callers must compute elapsed time with [`elapsed_since`] (or
/// `wrapping_sub`) so that intervals spanning the wrap stay correct.
pub trait Clock {
    /// Current counter value in microseconds
    fn now_micros(&mut self) -> u32;

    /// Spin for at least `us` microseconds
    fn busy_wait_micros(&mut self, us: u32);

    /// Spin for at least `ms` milliseconds
    fn delay_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            self.busy_wait_micros(1_000);
        }
    }
}

impl<T: Clock + ?Sized> Clock for &mut T {
    fn now_micros(&mut self) -> u32 {
        (**self).now_micros()
    }

    fn busy_wait_micros(&mut self, us: u32) {
        (**self).busy_wait_micros(us)
    }

    fn delay_ms(&mut self, ms: u32) {
        (**self).delay_ms(ms)
    }
}

/// Microseconds elapsed between `start` and `now`, tolerating counter wrap
#[inline]
pub const fn elapsed_since(start: u32, now: u32) -> u32 {
    now.wrapping_sub(start)
}

/// Free-running microsecond counter (e.g. a hardware timer's low word)
pub trait MicrosCounter {
    /// Current counter value in microseconds
    fn micros(&mut self) -> u32;
}

/// [`Clock`] built from a counter and any `embedded-hal` delay provider
///
/// Board crates usually have both pieces already: a timer peripheral for
/// timestamps and a `DelayNs` implementation for short spins.
pub struct DelayClock<M, D> {
    counter: M,
    delay: D,
}

impl<M, D> DelayClock<M, D> {
    /// Combine a counter and a delay provider
    pub const fn new(counter: M, delay: D) -> Self {
        Self { counter, delay }
    }

    /// Give back the counter and delay provider
    pub fn release(self) -> (M, D) {
        (self.counter, self.delay)
    }
}

impl<M: MicrosCounter, D: DelayNs> Clock for DelayClock<M, D> {
    fn now_micros(&mut self) -> u32 {
        self.counter.micros()
    }

    fn busy_wait_micros(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
