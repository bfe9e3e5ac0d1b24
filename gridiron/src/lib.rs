//! Sport-agnostic foundations for team rating models: dense matrices, a least-squares solver
//! that tolerates rank-deficient designs, and light-weight CSV and JSON file plumbing.

pub mod csv;
pub mod file;
pub mod linear;

