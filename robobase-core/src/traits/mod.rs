//! Peripheral driver traits
//!
//! These traits define the interface between the robot controller
//! and the peripheral drivers.

pub mod motor;
pub mod ranging;

pub use motor::{Direction, DualMotorDriver, MotorChannel, MotorCommand, MotorError};
pub use ranging::{Distance, RangeError, RangeSensor, RangingState};
