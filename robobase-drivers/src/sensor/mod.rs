//! Distance sensor drivers

pub mod hcsr04;

pub use hcsr04::HcSr04;
