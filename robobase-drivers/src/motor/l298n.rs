//! L298N dual H-bridge motor driver
//!
//! Each channel uses one PWM pin on the enable input (speed) and one
//! digital pin on an IN input (direction). The driver keeps no state of
//! its own: every command goes straight to the pins.
//!
//! # Usage
//!
//! ```ignore
//! let mut motors = L298n::new(pins, MotorHwConfig::default());
//! motors.begin();
//!
//! motors.set_motor(1, Direction::Forward, 200);
//! motors.set_motor(2, Direction::Backward, 200); // spin in place
//! ```

use robobase_core::config::{MotorHwConfig, PinConfig};
use robobase_core::traits::{Direction, DualMotorDriver, MotorChannel, MotorError};
use robobase_hal::{PinBank, PinId, PinMode};

/// L298N driver
pub struct L298n<P> {
    pins: P,
    config: MotorHwConfig,
}

impl<P> L298n<P> {
    /// Create a driver from a hardware configuration
    pub fn new(pins: P, config: MotorHwConfig) -> Self {
        Self { pins, config }
    }

    /// Create a driver with non-inverted direction pins
    pub fn from_pins(pins: P, e1: PinId, m1: PinId, e2: PinId, m2: PinId) -> Self {
        Self::new(pins, MotorHwConfig::new(e1, m1, e2, m2))
    }

    /// Get the configuration
    pub fn config(&self) -> &MotorHwConfig {
        &self.config
    }

    /// Give back the pin bank
    pub fn release(self) -> P {
        self.pins
    }

    fn channel_pins(&self, channel: MotorChannel) -> (PinId, PinConfig) {
        match channel {
            MotorChannel::One => (self.config.motor1_pwm, self.config.motor1_dir),
            MotorChannel::Two => (self.config.motor2_pwm, self.config.motor2_dir),
        }
    }
}

impl<P: PinBank> L298n<P> {
    /// Set one channel's direction and power
    pub fn set_channel(&mut self, channel: MotorChannel, direction: Direction, power: u8) {
        let (pwm, dir) = self.channel_pins(channel);
        self.pins.write_digital(dir.pin, direction.level(dir.inverted));
        self.pins.write_pwm(pwm, power);
    }

    /// Stop both channels (zero duty, directions untouched)
    pub fn stop_all(&mut self) {
        self.pins.write_pwm(self.config.motor1_pwm, 0);
        self.pins.write_pwm(self.config.motor2_pwm, 0);
    }
}

impl<P: PinBank> DualMotorDriver for L298n<P> {
    fn begin(&mut self) {
        for channel in [MotorChannel::One, MotorChannel::Two] {
            let (pwm, dir) = self.channel_pins(channel);
            self.pins.set_pin_mode(pwm, PinMode::Output);
            self.pins.set_pin_mode(dir.pin, PinMode::Output);
        }

        for channel in [MotorChannel::One, MotorChannel::Two] {
            let (pwm, dir) = self.channel_pins(channel);
            self.pins.write_pwm(pwm, 0);
            self.pins
                .write_digital(dir.pin, Direction::Forward.level(dir.inverted));
        }
    }

    fn try_set_motor(
        &mut self,
        channel: u8,
        direction: Direction,
        power: u8,
    ) -> Result<(), MotorError> {
        let channel = MotorChannel::try_from(channel)?;
        self.set_channel(channel, direction, power);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use robobase_hal::sim::SimBoard;
    use robobase_hal::Level;

    const E1: PinId = 5;
    const M1: PinId = 4;
    const E2: PinId = 6;
    const M2: PinId = 7;

    fn motors(board: &SimBoard) -> L298n<&SimBoard> {
        let mut motors = L298n::from_pins(board, E1, M1, E2, M2);
        motors.begin();
        motors
    }

    #[test]
    fn test_begin_stops_both_channels_forward() {
        let board = SimBoard::new();
        let _motors = motors(&board);

        for pin in [E1, M1, E2, M2] {
            assert_eq!(board.pin(pin).mode, Some(PinMode::Output));
        }
        assert_eq!(board.pin(E1).duty, Some(0));
        assert_eq!(board.pin(E2).duty, Some(0));
        assert_eq!(board.pin(M1).level, Level::Low);
        assert_eq!(board.pin(M2).level, Level::Low);
    }

    #[test]
    fn test_set_motor_one_leaves_motor_two_alone() {
        let board = SimBoard::new();
        let mut motors = motors(&board);
        motors.set_motor(2, Direction::Backward, 90);

        motors.set_motor(1, Direction::Forward, 200);

        assert_eq!(board.pin(M1).level, Level::Low);
        assert_eq!(board.pin(E1).duty, Some(200));
        assert_eq!(board.pin(M2).level, Level::High);
        assert_eq!(board.pin(E2).duty, Some(90));
    }

    #[test]
    fn test_invalid_channel_is_silent_noop() {
        let board = SimBoard::new();
        let mut motors = motors(&board);
        motors.set_motor(1, Direction::Backward, 33);
        let before = board.snapshot();
        board.clear_events();

        motors.set_motor(3, Direction::Forward, 100);
        motors.set_motor(0, Direction::Backward, 255);

        assert_eq!(board.snapshot(), before);
        assert!(board.events().is_empty());
    }

    #[test]
    fn test_try_set_motor_reports_invalid_channel() {
        let board = SimBoard::new();
        let mut motors = motors(&board);
        board.clear_events();

        assert_eq!(
            motors.try_set_motor(3, Direction::Forward, 100),
            Err(MotorError::InvalidChannel(3))
        );
        assert!(board.events().is_empty());
        assert_eq!(motors.try_set_motor(2, Direction::Forward, 100), Ok(()));
        assert_eq!(board.pin(E2).duty, Some(100));
    }

    #[test]
    fn test_direction_flip_passes_straight_through() {
        let board = SimBoard::new();
        let mut motors = motors(&board);
        motors.set_motor(1, Direction::Forward, 255);

        motors.set_motor(1, Direction::Backward, 255);

        assert_eq!(board.pin(M1).level, Level::High);
        assert_eq!(board.pin(E1).duty, Some(255));
    }

    #[test]
    fn test_inverted_direction_pin() {
        let board = SimBoard::new();
        let mut config = MotorHwConfig::new(E1, M1, E2, M2);
        config.motor2_dir = PinConfig::inverted(M2);
        let mut motors = L298n::new(&board, config);
        motors.begin();

        // Forward on an inverted channel drives the pin high
        assert_eq!(board.pin(M2).level, Level::High);

        motors.set_motor(1, Direction::Forward, 150);
        motors.set_motor(2, Direction::Forward, 150);
        assert_eq!(board.pin(M1).level, Level::Low);
        assert_eq!(board.pin(M2).level, Level::High);
    }

    #[test]
    fn test_signed_commands_and_stop_all() {
        let board = SimBoard::new();
        let mut motors = motors(&board);

        motors.apply_signed(1, -255);
        motors.apply_signed(2, 255);
        assert_eq!(board.pin(M1).level, Level::High);
        assert_eq!(board.pin(E1).duty, Some(255));
        assert_eq!(board.pin(M2).level, Level::Low);
        assert_eq!(board.pin(E2).duty, Some(255));

        motors.stop_all();
        assert_eq!(board.pin(E1).duty, Some(0));
        assert_eq!(board.pin(E2).duty, Some(0));
        assert_eq!(board.pin(M1).level, Level::High);
    }

    #[test]
    fn test_release_returns_pins() {
        let board = SimBoard::new();
        let motors = motors(&board);
        assert_eq!(motors.config().motor1_pwm, E1);

        let pins = motors.release();
        assert!(core::ptr::eq(pins, &board));
    }
}
