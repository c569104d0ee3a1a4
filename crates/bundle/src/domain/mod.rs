//! Domain types shared by the classifier, the grid, and the drop surface.

pub mod errors;
pub mod model;
