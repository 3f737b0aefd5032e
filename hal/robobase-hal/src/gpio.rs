//! Pin bank abstraction
//!
//! The drivers address pins by number, the way the board wiring is
//! described. An implementation maps each number to the chip's GPIO and
//! PWM peripherals.

/// Pin identifier (board GPIO number)
pub type PinId = u8;

/// Digital logic level
///
/// Reuses the `embedded-hal` pin state so board crates can pass levels
/// straight through to their `OutputPin` implementations.
pub use embedded_hal::digital::PinState as Level;

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// High-impedance input
    Input,
    /// Push-pull output
    Output,
}

/// Bank of pins addressed by number
///
/// All operations are infallible: an implementation that can fail
/// (for example an I/O expander) must handle the fault itself.
pub trait PinBank {
    /// Configure a pin as input or output
    fn set_pin_mode(&mut self, pin: PinId, mode: PinMode);

    /// Drive an output pin to the given level
    fn write_digital(&mut self, pin: PinId, level: Level);

    /// Sample the current level of a pin
    ///
    /// Takes `&mut self` because sampling may touch peripheral state.
    fn read_digital(&mut self, pin: PinId) -> Level;

    /// Set the PWM duty cycle of a pin (0 = off, 255 = fully on)
    fn write_pwm(&mut self, pin: PinId, duty: u8);

    /// Check if a pin reads high
    fn is_high(&mut self, pin: PinId) -> bool {
        self.read_digital(pin) == Level::High
    }

    /// Check if a pin reads low
    fn is_low(&mut self, pin: PinId) -> bool {
        !self.is_high(pin)
    }
}

impl<T: PinBank + ?Sized> PinBank for &mut T {
    fn set_pin_mode(&mut self, pin: PinId, mode: PinMode) {
        (**self).set_pin_mode(pin, mode)
    }

    fn write_digital(&mut self, pin: PinId, level: Level) {
        (**self).write_digital(pin, level)
    }

    fn read_digital(&mut self, pin: PinId) -> Level {
        (**self).read_digital(pin)
    }

    fn write_pwm(&mut self, pin: PinId, duty: u8) {
        (**self).write_pwm(pin, duty)
    }
}
