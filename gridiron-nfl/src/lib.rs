//! A Simple Rating System for NFL teams, decomposed into offensive, defensive and special-teams
//! components, along with the point attribution, margin-of-victory and home-field-advantage
//! statistics it is fitted to.

pub mod breakdown;
pub mod data;
pub mod datastore;
pub mod domain;
pub mod hfa;
pub mod model;
pub mod mov;
pub mod print;
pub mod source;
pub mod week;

#[doc = include_str!("../../README.md")]
#[cfg(doc)]
fn readme() {}
