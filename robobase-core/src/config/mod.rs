//! Configuration types
//!
//! Board-agnostic pin assignments and driver options. With the `serde`
//! feature the whole configuration can be stored as postcard binary data.

pub mod hardware;
#[cfg(feature = "serde")]
pub mod storage;

pub use hardware::*;
#[cfg(feature = "serde")]
pub use storage::{CONFIG_MAGIC, CONFIG_VERSION};
