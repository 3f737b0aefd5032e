//! Peripheral driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in robobase-core, written against the robobase-hal primitives:
//!
//! - Ultrasonic rangefinder (HC-SR04)
//! - Dual DC motor driver (L298N)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod motor;
pub mod sensor;

pub use motor::L298n;
pub use sensor::HcSr04;
