//! Ultrasonic ranging traits and types
//!
//! A ranging sensor emits a short trigger pulse and reports the width of
//! the echo pulse. Distance follows from the speed of sound:
//!
//! ```text
//! round trip per cm = 2 * 0.01 m / 343 m/s ≈ 58.3 µs
//! distance (cm)     = echo width (µs) / 58
//! ```

/// Echo time per centimetre of distance (round trip), in microseconds
pub const ECHO_US_PER_CM: u32 = 58;

/// How long to wait for the echo line to rise after the trigger
pub const ECHO_START_TIMEOUT_US: u32 = 500;

/// Trigger pulse width required by the HC-SR04 datasheet
pub const TRIGGER_PULSE_US: u32 = 10;

/// Low time after the trigger pulse before listening for the echo
pub const TRIGGER_HOLD_US: u32 = 10;

/// Settle time after configuring the sensor pins
pub const SETTLE_MS: u32 = 20;

/// Recommended minimum spacing between measurements
///
/// Residual echoes from the previous pulse die out within this time.
pub const RECOMMENDED_CYCLE_MS: u16 = 60;

/// Maximum time the echo line may stay high for a target at `max_cm`
pub const fn echo_window_us(max_cm: u16) -> u32 {
    ECHO_US_PER_CM * max_cm as u32
}

/// Distance in centimetres with two implied decimal digits
///
/// `Distance::from_raw(1234)` is 12.34 cm. A raw value of 0 is what the
/// sentinel API reports for a failed measurement, so it must never be
/// read as a literal distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Distance(u32);

impl Distance {
    /// Sentinel for "no valid reading"
    pub const NONE: Self = Self(0);

    /// Wrap a raw centimetre ×100 value
    pub const fn from_raw(cm_x100: u32) -> Self {
        Self(cm_x100)
    }

    /// Convert an echo pulse width to a distance
    ///
    /// Truncates: a 59 µs echo is 101 (1.01 cm), not 101.7.
    pub const fn from_echo_micros(echo_us: u32) -> Self {
        Self((echo_us as u64 * 100 / ECHO_US_PER_CM as u64) as u32)
    }

    /// Raw value in centimetres ×100
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Whole centimetres (fraction truncated)
    pub const fn whole_cm(self) -> u32 {
        self.0 / 100
    }

    /// Centimetres as a float
    pub fn as_cm_f32(self) -> f32 {
        self.0 as f32 / 100.0
    }
}

/// Phase of a single ranging cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RangingState {
    /// No measurement in progress
    #[default]
    Idle,
    /// Emitting the trigger pulse
    Triggering,
    /// Waiting for the echo line to rise
    WaitEchoStart,
    /// Timing the echo pulse, waiting for it to fall
    WaitEchoEnd,
    /// Echo timed successfully
    Computed,
    /// One of the two timeouts expired
    TimedOut,
}

impl RangingState {
    /// Check if this state ends a cycle
    pub const fn is_terminal(self) -> bool {
        matches!(self, RangingState::Computed | RangingState::TimedOut)
    }
}

/// Reasons a measurement produced no distance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RangeError {
    /// Echo line never rose after the trigger (sensor missing, pulse lost)
    NoEchoDetected,
    /// Echo rose but did not fall within the window for the maximum range
    EchoTimeout,
}

/// Trait for distance sensors that perform one blocking measurement per call
pub trait RangeSensor {
    /// Configure the sensor pins and wait for the sensor to settle
    ///
    /// Safe to call more than once.
    fn begin(&mut self);

    /// Measure the distance to the nearest obstacle within `max_cm`
    ///
    /// Blocks for a bounded time; never waits for an echo longer than
    /// the round trip to `max_cm`.
    fn ping(&mut self, max_cm: u16) -> Result<Distance, RangeError>;

    /// Measure and report centimetres ×100, or 0 if no valid reading
    ///
    /// Both failure causes collapse to 0. Use [`ping`](Self::ping) to
    /// tell them apart.
    fn measure(&mut self, max_cm: u16) -> u32 {
        self.ping(max_cm).unwrap_or(Distance::NONE).raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_echo_window() {
        assert_eq!(echo_window_us(200), 11_600);
        assert_eq!(echo_window_us(0), 0);
        assert_eq!(echo_window_us(u16::MAX), 58 * 65_535);
    }

    #[test]
    fn test_distance_from_echo() {
        let d = Distance::from_echo_micros(580);
        assert_eq!(d.raw(), 1000);
        assert_eq!(d.whole_cm(), 10);
        assert!((d.as_cm_f32() - 10.0).abs() < f32::EPSILON);

        assert_eq!(Distance::from_echo_micros(59).raw(), 101);
        assert_eq!(Distance::from_echo_micros(0), Distance::NONE);
    }

    #[test]
    fn test_terminal_states() {
        assert!(RangingState::Computed.is_terminal());
        assert!(RangingState::TimedOut.is_terminal());
        assert!(!RangingState::Idle.is_terminal());
        assert!(!RangingState::WaitEchoEnd.is_terminal());
    }

    struct Fixed(Result<Distance, RangeError>);

    impl RangeSensor for Fixed {
        fn begin(&mut self) {}

        fn ping(&mut self, _max_cm: u16) -> Result<Distance, RangeError> {
            self.0
        }
    }

    #[test]
    fn test_measure_collapses_errors_to_zero() {
        assert_eq!(Fixed(Ok(Distance::from_raw(1234))).measure(100), 1234);
        assert_eq!(Fixed(Err(RangeError::NoEchoDetected)).measure(100), 0);
        assert_eq!(Fixed(Err(RangeError::EchoTimeout)).measure(100), 0);
    }

    proptest! {
        #[test]
        fn prop_distance_is_floor_of_scaled_echo(echo_us in 0u32..=4_000_000) {
            let d = Distance::from_echo_micros(echo_us);
            prop_assert_eq!(d.raw() as u64, echo_us as u64 * 100 / 58);
        }

        #[test]
        fn prop_window_covers_max_distance(max_cm in 1u16..=u16::MAX) {
            // An echo lasting the full window maps back to max_cm
            let d = Distance::from_echo_micros(echo_window_us(max_cm));
            prop_assert_eq!(d.whole_cm(), max_cm as u32);
        }
    }
}
