//! HC-SR04 ultrasonic rangefinder
//!
//! The sensor is driven by two lines:
//! - trigger (output): a 10 µs high pulse starts a measurement
//! - echo (input): goes high for the round-trip time of the sound burst
//!
//! Each measurement is a blocking busy-poll with two bounds:
//!
//! ```text
//!  trigger ─┐10µs┌──────────────────────────────────────────────
//!  ─────────┘    └─10µs─ t1
//!  echo    ───────────────┐ <= 500 µs ┌──── width ────┐
//!                         └───────────┘  <= 58 µs/cm  └────────
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let mut sonar = HcSr04::new(pins, clock, TRIGGER_PIN, ECHO_PIN);
//! sonar.begin();
//!
//! match sonar.ping(200) {
//!     Ok(distance) => steer_around(distance.as_cm_f32()),
//!     Err(_) => keep_going(),
//! }
//! ```
//!
//! The sensor needs about 60 ms between measurements for residual echoes
//! to fade. With the default [`CyclePolicy::CallerSpaced`] the driver does
//! not wait; use [`CyclePolicy::Enforced`] to pad every cycle instead.

use robobase_core::config::{CyclePolicy, RangefinderHwConfig, DEFAULT_MAX_DISTANCE_CM};
use robobase_core::traits::ranging::{
    echo_window_us, ECHO_START_TIMEOUT_US, SETTLE_MS, TRIGGER_HOLD_US, TRIGGER_PULSE_US,
};
use robobase_core::traits::{Distance, RangeError, RangeSensor, RangingState};
use robobase_hal::time::elapsed_since;
use robobase_hal::{Clock, Level, PinBank, PinId, PinMode};

/// HC-SR04 driver
///
/// Owns its two pins exclusively for its whole lifetime.
pub struct HcSr04<P, C> {
    pins: P,
    clock: C,
    trigger: PinId,
    echo: PinId,
    max_distance_cm: u16,
    cycle: CyclePolicy,
    state: RangingState,
}

impl<P, C> HcSr04<P, C> {
    /// Create a driver with caller-spaced cycles
    pub fn new(pins: P, clock: C, trigger: PinId, echo: PinId) -> Self {
        Self {
            pins,
            clock,
            trigger,
            echo,
            max_distance_cm: DEFAULT_MAX_DISTANCE_CM,
            cycle: CyclePolicy::CallerSpaced,
            state: RangingState::Idle,
        }
    }

    /// Create a driver from a hardware configuration
    pub fn with_config(pins: P, clock: C, config: &RangefinderHwConfig) -> Self {
        Self {
            max_distance_cm: config.max_distance_cm,
            cycle: config.cycle,
            ..Self::new(pins, clock, config.trigger, config.echo)
        }
    }

    /// Worst-case duration of one caller-spaced measurement
    ///
    /// Trigger shaping, the echo-start bound and the echo window, each
    /// wait phase overshooting its bound by at most one poll.
    pub const fn max_latency_us(max_cm: u16) -> u32 {
        TRIGGER_PULSE_US
            + TRIGGER_HOLD_US
            + (ECHO_START_TIMEOUT_US + 1)
            + (echo_window_us(max_cm) + 1)
    }

    /// Current phase (always `Idle` between calls)
    pub fn state(&self) -> RangingState {
        self.state
    }

    /// Get the cycle policy
    pub fn cycle_policy(&self) -> CyclePolicy {
        self.cycle
    }

    /// Change the cycle policy
    pub fn set_cycle_policy(&mut self, cycle: CyclePolicy) {
        self.cycle = cycle;
    }

    /// Range used by [`ping_default`](Self::ping_default)
    pub fn default_range_cm(&self) -> u16 {
        self.max_distance_cm
    }

    /// Trigger pin
    pub fn trigger_pin(&self) -> PinId {
        self.trigger
    }

    /// Echo pin
    pub fn echo_pin(&self) -> PinId {
        self.echo
    }

    /// Give back the pin bank and clock
    pub fn release(self) -> (P, C) {
        (self.pins, self.clock)
    }
}

impl<P: PinBank, C: Clock> HcSr04<P, C> {
    /// Measure using the configured default range
    pub fn ping_default(&mut self) -> Result<Distance, RangeError> {
        self.ping(self.max_distance_cm)
    }

    fn pulse_trigger(&mut self) {
        self.pins.write_digital(self.trigger, Level::High);
        self.clock.busy_wait_micros(TRIGGER_PULSE_US);
        self.pins.write_digital(self.trigger, Level::Low);
        self.clock.busy_wait_micros(TRIGGER_HOLD_US);
    }

    /// Pad the cycle that started at `t0` up to the minimum cycle length
    fn pad_cycle(&mut self, t0: u32) {
        let min_cycle_us = self.cycle.min_cycle_us();
        let spent = elapsed_since(t0, self.clock.now_micros());
        if spent < min_cycle_us {
            self.clock.busy_wait_micros(min_cycle_us - spent);
        }
    }

    fn run_cycle(&mut self, max_cm: u16) -> Result<Distance, RangeError> {
        let window_us = echo_window_us(max_cm);
        let mut t0 = 0;
        let mut since = 0;
        let mut outcome = Err(RangeError::NoEchoDetected);

        let mut state = RangingState::Idle;
        while !state.is_terminal() {
            state = match state {
                RangingState::Idle => {
                    t0 = self.clock.now_micros();
                    RangingState::Triggering
                }
                RangingState::Triggering => {
                    self.pulse_trigger();
                    since = self.clock.now_micros();
                    RangingState::WaitEchoStart
                }
                RangingState::WaitEchoStart => {
                    let rose = self.pins.is_high(self.echo);
                    let now = self.clock.now_micros();
                    if rose {
                        since = now;
                        RangingState::WaitEchoEnd
                    } else if elapsed_since(since, now) > ECHO_START_TIMEOUT_US {
                        #[cfg(feature = "defmt")]
                        defmt::debug!("hcsr04: no echo within {} us", ECHO_START_TIMEOUT_US);
                        outcome = Err(RangeError::NoEchoDetected);
                        RangingState::TimedOut
                    } else {
                        RangingState::WaitEchoStart
                    }
                }
                RangingState::WaitEchoEnd => {
                    let fell = self.pins.is_low(self.echo);
                    let now = self.clock.now_micros();
                    let width_us = elapsed_since(since, now);
                    if fell {
                        #[cfg(feature = "defmt")]
                        defmt::trace!("hcsr04: echo {} us", width_us);
                        outcome = Ok(Distance::from_echo_micros(width_us));
                        RangingState::Computed
                    } else if width_us > window_us {
                        #[cfg(feature = "defmt")]
                        defmt::debug!("hcsr04: echo longer than {} us ({} cm)", window_us, max_cm);
                        outcome = Err(RangeError::EchoTimeout);
                        RangingState::TimedOut
                    } else {
                        RangingState::WaitEchoEnd
                    }
                }
                terminal => terminal,
            };
            self.state = state;
        }

        self.pad_cycle(t0);
        self.state = RangingState::Idle;
        outcome
    }
}

impl<P: PinBank, C: Clock> RangeSensor for HcSr04<P, C> {
    fn begin(&mut self) {
        self.pins.set_pin_mode(self.trigger, PinMode::Output);
        self.pins.set_pin_mode(self.echo, PinMode::Input);
        self.pins.write_digital(self.trigger, Level::Low);
        self.clock.delay_ms(SETTLE_MS);
    }

    fn ping(&mut self, max_cm: u16) -> Result<Distance, RangeError> {
        self.run_cycle(max_cm)
    }
}
