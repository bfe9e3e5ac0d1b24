//! Support for linear algebra.

pub mod lstsq;
pub mod matrix;
