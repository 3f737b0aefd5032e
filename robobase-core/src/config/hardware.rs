//! Hardware configuration types
//!
//! These types define the pin assignments of the rangefinder and the
//! motor driver, plus the few behavioural options each driver has.

use robobase_hal::PinId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::traits::ranging::RECOMMENDED_CYCLE_MS;

/// Default maximum range for the HC-SR04 in centimetres
pub const DEFAULT_MAX_DISTANCE_CM: u16 = 200;

/// Errors from configuration validation and persistence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The same pin is assigned to more than one function
    DuplicatePin(PinId),
    /// Maximum ranging distance of zero
    ZeroMaxDistance,
    /// Serialized form does not fit the buffer
    Encode,
    /// Stored bytes are not a valid configuration
    Decode,
    /// Stored bytes do not start with the configuration magic
    BadMagic,
    /// Stored configuration has an unknown version
    UnsupportedVersion(u8),
}

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinConfig {
    /// Board pin number
    pub pin: PinId,
    /// Swap the meaning of the two levels (direction pins only)
    pub inverted: bool,
}

impl PinConfig {
    /// Create a new pin config
    pub const fn new(pin: PinId) -> Self {
        Self {
            pin,
            inverted: false,
        }
    }

    /// Create an inverted pin
    pub const fn inverted(pin: PinId) -> Self {
        Self {
            pin,
            inverted: true,
        }
    }
}

/// What happens between consecutive measurements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CyclePolicy {
    /// No wait; spacing measurements is the caller's job
    #[default]
    CallerSpaced,
    /// Pad every measurement so it lasts at least `min_cycle_ms`
    /// from the start of the trigger pulse
    Enforced {
        /// Minimum cycle length in milliseconds
        min_cycle_ms: u16,
    },
}

impl CyclePolicy {
    /// Enforced spacing at the sensor's recommended cycle
    pub const fn recommended() -> Self {
        CyclePolicy::Enforced {
            min_cycle_ms: RECOMMENDED_CYCLE_MS,
        }
    }

    /// Minimum cycle length in microseconds (0 when caller-spaced)
    pub const fn min_cycle_us(self) -> u32 {
        match self {
            CyclePolicy::CallerSpaced => 0,
            CyclePolicy::Enforced { min_cycle_ms } => min_cycle_ms as u32 * 1_000,
        }
    }
}

/// Ultrasonic rangefinder hardware configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RangefinderHwConfig {
    /// Trigger output pin
    pub trigger: PinId,
    /// Echo input pin
    pub echo: PinId,
    /// Default maximum distance for callers that don't pick one
    pub max_distance_cm: u16,
    /// Inter-measurement spacing
    pub cycle: CyclePolicy,
}

impl RangefinderHwConfig {
    /// Create a config with default range and caller-spaced cycles
    pub const fn new(trigger: PinId, echo: PinId) -> Self {
        Self {
            trigger,
            echo,
            max_distance_cm: DEFAULT_MAX_DISTANCE_CM,
            cycle: CyclePolicy::CallerSpaced,
        }
    }
}

impl Default for RangefinderHwConfig {
    fn default() -> Self {
        Self::new(12, 11)
    }
}

/// Dual-channel motor driver hardware configuration
///
/// Field names follow the L298N board: `pwm` is the ENA/ENB enable line,
/// `dir` the IN line used for direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MotorHwConfig {
    /// Motor 1 PWM (enable) pin
    pub motor1_pwm: PinId,
    /// Motor 1 direction pin
    pub motor1_dir: PinConfig,
    /// Motor 2 PWM (enable) pin
    pub motor2_pwm: PinId,
    /// Motor 2 direction pin
    pub motor2_dir: PinConfig,
}

impl MotorHwConfig {
    /// Create a config with non-inverted direction pins
    pub const fn new(
        motor1_pwm: PinId,
        motor1_dir: PinId,
        motor2_pwm: PinId,
        motor2_dir: PinId,
    ) -> Self {
        Self {
            motor1_pwm,
            motor1_dir: PinConfig::new(motor1_dir),
            motor2_pwm,
            motor2_dir: PinConfig::new(motor2_dir),
        }
    }
}

impl Default for MotorHwConfig {
    fn default() -> Self {
        // L298 Arduino shield layout: E1=5, M1=4, E2=6, M2=7
        Self::new(5, 4, 6, 7)
    }
}

/// Complete peripheral configuration of a robot base
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoboBaseConfig {
    /// Ultrasonic rangefinder
    pub rangefinder: RangefinderHwConfig,
    /// Motor driver
    pub motors: MotorHwConfig,
}

impl RoboBaseConfig {
    /// Every pin used by the configuration
    pub const fn pins(&self) -> [PinId; 6] {
        [
            self.rangefinder.trigger,
            self.rangefinder.echo,
            self.motors.motor1_pwm,
            self.motors.motor1_dir.pin,
            self.motors.motor2_pwm,
            self.motors.motor2_dir.pin,
        ]
    }

    /// Check that every pin has exactly one owner and the range is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pins = self.pins();
        for (i, pin) in pins.iter().enumerate() {
            if pins[i + 1..].contains(pin) {
                return Err(ConfigError::DuplicatePin(*pin));
            }
        }

        if self.rangefinder.max_distance_cm == 0 {
            return Err(ConfigError::ZeroMaxDistance);
        }

        Ok(())
    }
}
