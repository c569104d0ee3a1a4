//! Classify dropped text and lay the results out on a gap-filling grid.
//!
//! ```
//! use bundle::app::surface::BundleSurface;
//! use bundle::{TextKind, classify};
//!
//! assert_eq!(classify("|group1|pSphere1"), TextKind::MayaDagPath);
//!
//! let mut surface = BundleSurface::default();
//! let placement = surface.drop_text("/srv/assets/tree.usd")?.expect("recognised");
//! assert_eq!((placement.slot.row, placement.slot.col), (0, 0));
//! # Ok::<(), bundle::domain::errors::PlacementError>(())
//! ```

pub mod app;
pub mod cli;
pub mod domain;
pub mod infra;

pub use app::classify::classify;
pub use app::grid::PlacementGrid;
pub use domain::model::TextKind;

use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber. Verbosity follows `RUST_LOG`, defaulting to warnings.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
