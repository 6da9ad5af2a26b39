//! Tolerance defaults (internal).
//!
//! Policy
//! - Fixed constants, not runtime config. Every "same point" decision in
//!   the crate reads `SAME_POINT_EPS`.

/// Absolute per-coordinate tolerance for `Point::is_same`.
pub const SAME_POINT_EPS: f64 = 1e-6;
