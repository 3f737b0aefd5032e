//! Dual DC motor driver traits
//!
//! A differential-drive base has two independently powered channels.
//! Each channel has a direction line and a PWM enable line; steering
//! comes from the relative speed and direction of the two.

use robobase_hal::Level;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Motor rotation direction
///
/// Which level means "forward" is a wiring convention, not a property
/// of the motor: swapping a motor's leads inverts it. See
/// [`Direction::level`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Direction pin low (on a non-inverted channel)
    #[default]
    Forward,
    /// Direction pin high (on a non-inverted channel)
    Backward,
}

impl Direction {
    /// Level to drive on the direction pin
    ///
    /// `inverted` flips the mapping for a channel whose motor is wired
    /// the other way round.
    pub const fn level(self, inverted: bool) -> Level {
        match (self, inverted) {
            (Direction::Forward, false) | (Direction::Backward, true) => Level::Low,
            (Direction::Backward, false) | (Direction::Forward, true) => Level::High,
        }
    }

    /// Opposite direction
    pub const fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// Errors that can occur with motor commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorError {
    /// Channel number other than 1 or 2
    InvalidChannel(u8),
}

/// One of the two motor channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MotorChannel {
    /// Channel 1 (left motor on the reference base)
    One,
    /// Channel 2 (right motor on the reference base)
    Two,
}

impl MotorChannel {
    /// Channel number as used on the wire and in `set_motor`
    pub const fn number(self) -> u8 {
        match self {
            MotorChannel::One => 1,
            MotorChannel::Two => 2,
        }
    }
}

impl TryFrom<u8> for MotorChannel {
    type Error = MotorError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(MotorChannel::One),
            2 => Ok(MotorChannel::Two),
            other => Err(MotorError::InvalidChannel(other)),
        }
    }
}

/// A single motor command
///
/// The channel stays a raw number so that invalid channels can flow
/// through to the driver and be ignored there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MotorCommand {
    /// Motor channel (1 or 2)
    pub channel: u8,
    /// Rotation direction
    pub direction: Direction,
    /// PWM duty (0-255)
    pub power: u8,
}

impl MotorCommand {
    /// Create a command
    pub const fn new(channel: u8, direction: Direction, power: u8) -> Self {
        Self {
            channel,
            direction,
            power,
        }
    }

    /// Create a command from a signed power (-255..=255)
    ///
    /// Negative power runs backward, zero or positive runs forward.
    /// Magnitudes beyond 255 saturate.
    pub fn from_signed(channel: u8, power: i16) -> Self {
        let direction = if power < 0 {
            Direction::Backward
        } else {
            Direction::Forward
        };
        let magnitude = power.unsigned_abs().min(u8::MAX as u16) as u8;
        Self::new(channel, direction, magnitude)
    }

    /// Stop command for a channel
    pub const fn stop(channel: u8) -> Self {
        Self::new(channel, Direction::Forward, 0)
    }
}

/// Trait for two-channel DC motor drivers
///
/// Drivers are stateless translators: each call writes the pins and
/// nothing else. There is no ramping and no interlock between direction
/// and power, so callers that reverse a spinning motor should send zero
/// power first.
pub trait DualMotorDriver {
    /// Configure all pins as outputs, both channels forward at zero duty
    fn begin(&mut self);

    /// Set one channel's direction and power
    ///
    /// Channels other than 1 and 2 are ignored without any signal.
    fn set_motor(&mut self, channel: u8, direction: Direction, power: u8) {
        let _ = self.try_set_motor(channel, direction, power);
    }

    /// Set one channel's direction and power, rejecting invalid channels
    ///
    /// On error no pin is touched.
    fn try_set_motor(&mut self, channel: u8, direction: Direction, power: u8)
        -> Result<(), MotorError>;

    /// Apply a command (invalid channels ignored)
    fn apply(&mut self, command: MotorCommand) {
        self.set_motor(command.channel, command.direction, command.power);
    }

    /// Apply a signed power to a channel (invalid channels ignored)
    fn apply_signed(&mut self, channel: u8, power: i16) {
        self.apply(MotorCommand::from_signed(channel, power));
    }
}
