//! Board-agnostic core for the RoboBase peripheral layer
//!
//! This crate holds everything the drivers share that does not depend on
//! a particular pin bank or clock:
//!
//! - Driver traits and value types (distance, direction, motor commands)
//! - Ranging state machine states and error taxonomy
//! - Hardware configuration types with validation and persistence

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod traits;
