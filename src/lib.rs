//! Simulation of a PCB etcher built from a linear stepper axis and a servo
//! swung arm, rendered as a sequence of frame images.

#[cfg(test)]
#[macro_use]
extern crate approx;

pub mod config;
pub mod coords;
pub mod error;
pub mod etcher;
pub mod motor;
pub mod render;
pub mod script;
pub mod servo;
pub mod stepper;

pub use crate::error::{Error, Result};

#[cfg(test)]
mod tests;
