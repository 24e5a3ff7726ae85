//! Adapter implementations for attachment ports.

pub mod memory;
pub mod postgres;
