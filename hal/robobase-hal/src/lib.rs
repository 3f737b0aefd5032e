//! RoboBase Hardware Abstraction Layer
//!
//! This crate defines the primitives the RoboBase peripheral drivers are
//! written against. A board support crate implements them once for its
//! chip; the drivers never touch registers directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Robot controller (out of tree)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  robobase-drivers (HC-SR04, L298N)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  robobase-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  board crate  │       │   sim board   │
//! │  (real pins)  │       │   (tests)     │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::PinBank`] - Pin modes, digital I/O and PWM duty by pin number
//! - [`time::Clock`] - Monotonic microsecond clock and busy-wait delays

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
#[cfg(any(test, feature = "sim"))]
pub mod sim;
pub mod time;

// Re-export key traits at crate root for convenience
pub use gpio::{Level, PinBank, PinId, PinMode};
pub use time::{Clock, DelayClock, MicrosCounter};
