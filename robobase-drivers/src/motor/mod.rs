//! Motor driver implementations
//!
//! - L298N: dual H-bridge, one direction line and one PWM enable per channel

pub mod l298n;

pub use l298n::L298n;
