//! The drop surface: classified buttons laid out row by row.
//!
//! A [`BundleSurface`] is owned by whoever hosts it; there is no process-wide instance.
//! When several threads feed drops into one surface, share it through [`SharedSurface`] so
//! each compute-and-append runs under a single lock.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::info;

use crate::app::actions::{ActionDispatcher, ActionHost};
use crate::app::factory::ButtonFactory;
use crate::app::grid::{Occupant, PlacementGrid};
use crate::domain::errors::{ActionError, PlacementError};
use crate::domain::model::{BundleAction, BundleButton, Renderable, Slot, Span, TextKind};
use crate::infra::config::{Config, Icons};

/// Where an accepted drop landed and what it shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub slot: Slot,
    pub kind: TextKind,
    pub icon: String,
    pub action: BundleAction,
    pub entries: Vec<String>,
}

/// Buttons created from dropped text, wrapped after a fixed number of columns.
#[derive(Debug, Clone)]
pub struct BundleSurface {
    grid: PlacementGrid<Renderable>,
    factory: ButtonFactory,
    icons: Icons,
    max_columns: usize,
}

impl Default for BundleSurface {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl BundleSurface {
    /// Create an empty surface; `max_columns` is clamped to at least one.
    pub fn new(max_columns: usize, icons: Icons) -> Self {
        Self {
            grid: PlacementGrid::new(),
            factory: ButtonFactory::new(),
            icons,
            max_columns: max_columns.max(1),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.surface.max_columns(), config.icons.clone())
    }

    pub fn max_columns(&self) -> usize {
        self.max_columns
    }

    pub fn grid(&self) -> &PlacementGrid<Renderable> {
        &self.grid
    }

    pub fn len(&self) -> usize {
        self.grid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    /// Whether a drag carrying `text` should be accepted at all.
    pub fn accepts(&self, text: &str) -> bool {
        !text.is_empty()
    }

    /// Classify `text` and place a button for it.
    ///
    /// Returns `Ok(None)` when the text is not recognised; nothing is placed in that case.
    pub fn drop_text(&mut self, text: &str) -> Result<Option<Placement>, PlacementError> {
        if !self.accepts(text) {
            return Ok(None);
        }
        let Some(button) = self.factory.build(text) else {
            return Ok(None);
        };

        let kind = button.kind;
        let action = button.action;
        let icon = self.icons.asset(button.icon).to_owned();
        let entries = button.entries.clone();
        let slot = self.insert(Renderable::Primitive(button))?;

        info!(%slot, %kind, entries = entries.len(), "placed drop");
        Ok(Some(Placement {
            slot,
            kind,
            icon,
            action,
            entries,
        }))
    }

    /// Place any renderable, starting a new row once the current one has no room for it.
    ///
    /// The current row has no room when the item would run past `max_columns` or when its
    /// first free cell is a gap narrower than the item.
    pub fn insert(&mut self, item: Renderable) -> Result<Slot, PlacementError> {
        if self.fits_in_last_row(item.span()) {
            self.grid.add_to_next_column(item)
        } else {
            self.grid.add_to_next_row(item)
        }
    }

    fn fits_in_last_row(&self, span: Span) -> bool {
        let Some(row) = self.grid.last_filled_row() else {
            return true;
        };
        let col = self.grid.next_free_column(row);
        col.saturating_add(span.cols()) <= self.max_columns
            && self.grid.fits(Slot::new(row, col), span)
    }

    /// Every placed button with the slot of the grid item holding it.
    pub fn buttons(&self) -> impl Iterator<Item = (Slot, &BundleButton)> {
        self.grid.iter().flat_map(|entry| {
            entry
                .item
                .buttons()
                .into_iter()
                .map(move |button| (entry.placement.slot, button))
        })
    }

    /// The primitive button covering `slot`, if any.
    pub fn button_at(&self, slot: Slot) -> Option<&BundleButton> {
        self.grid.get(slot).and_then(|entry| entry.item.as_button())
    }

    /// Run the action of the button at `slot`. Returns `false` when the cell is empty.
    pub fn press<H: ActionHost + ?Sized>(
        &self,
        slot: Slot,
        dispatcher: &ActionDispatcher,
        host: &mut H,
    ) -> Result<bool, ActionError> {
        match self.button_at(slot) {
            Some(button) => dispatcher.dispatch(button, host).map(|()| true),
            None => Ok(false),
        }
    }
}

/// A [`BundleSurface`] behind one lock, safe to feed from several threads.
#[derive(Debug, Clone, Default)]
pub struct SharedSurface {
    inner: Arc<Mutex<BundleSurface>>,
}

impl SharedSurface {
    pub fn new(surface: BundleSurface) -> Self {
        Self {
            inner: Arc::new(Mutex::new(surface)),
        }
    }

    /// Same as [`BundleSurface::drop_text`], with the slot computed and claimed atomically.
    pub fn drop_text(&self, text: &str) -> Result<Option<Placement>, PlacementError> {
        self.inner.lock().drop_text(text)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Read the surface while holding the lock.
    pub fn with<R>(&self, f: impl FnOnce(&BundleSurface) -> R) -> R {
        let guard = self.inner.lock();
        f(&guard)
    }
}
