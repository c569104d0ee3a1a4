//! Application layer: classification, placement, and action routing.

pub mod actions;
pub mod classify;
pub mod factory;
pub mod grid;
pub mod surface;
