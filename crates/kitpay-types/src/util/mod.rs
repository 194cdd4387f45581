//! Utility types.
//!
//! - [`money_amount`] - Human-readable decimal amount parsing

pub mod money_amount;
