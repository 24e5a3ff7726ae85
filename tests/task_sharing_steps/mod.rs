//! Step definitions for task sharing scenarios.

pub mod world;

mod given;
mod then;
mod when;
