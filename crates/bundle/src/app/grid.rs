//! Gap-filling placement grid.
//!
//! The grid only tracks which cells are taken and answers "where does the next item go".
//! It has no column limit of its own; callers decide when to start a new row by choosing
//! between [`PlacementGrid::add_to_next_row`] and [`PlacementGrid::add_to_next_column`].

use std::collections::BTreeSet;

use tracing::trace;

use crate::domain::errors::PlacementError;
use crate::domain::model::{BundleButton, PlacedItem, Renderable, Slot, Span};

/// Something that occupies a rectangle of grid cells.
pub trait Occupant {
    fn span(&self) -> Span {
        Span::UNIT
    }
}

impl Occupant for BundleButton {}

impl Occupant for Renderable {
    fn span(&self) -> Span {
        match self {
            Renderable::Primitive(_) => Span::UNIT,
            Renderable::Container { span, .. } => *span,
        }
    }
}

/// An occupant together with the rectangle it was assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridEntry<T> {
    pub placement: PlacedItem,
    pub item: T,
}

/// Append-only set of placed items with non-overlapping cells.
#[derive(Debug, Clone)]
pub struct PlacementGrid<T> {
    entries: Vec<GridEntry<T>>,
}

impl<T> Default for PlacementGrid<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: Occupant> PlacementGrid<T> {
    /// Create an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &GridEntry<T>> {
        self.entries.iter()
    }

    /// The entry whose rectangle covers `slot`, if any.
    pub fn get(&self, slot: Slot) -> Option<&GridEntry<T>> {
        self.entries
            .iter()
            .find(|entry| entry.placement.covers(slot))
    }

    /// Bottom-most row covered by any item, or `None` for an empty grid.
    pub fn last_filled_row(&self) -> Option<usize> {
        self.entries
            .iter()
            .map(|entry| entry.placement.last_row())
            .max()
    }

    /// Lowest column in `row` not covered by any item.
    ///
    /// Gaps left between items are reused before anything past the right-most item.
    pub fn next_free_column(&self, row: usize) -> usize {
        let occupied: BTreeSet<usize> = self
            .entries
            .iter()
            .filter(|entry| entry.placement.covers_row(row))
            .flat_map(|entry| entry.placement.cols())
            .collect();

        (0..=occupied.len())
            .find(|col| !occupied.contains(col))
            .unwrap_or(occupied.len())
    }

    /// Place `item` in the first column of the row below everything placed so far.
    pub fn add_to_next_row(&mut self, item: T) -> Result<Slot, PlacementError> {
        let row = self.last_filled_row().map_or(0, |last| last + 1);
        self.place(item, Slot::new(row, 0))
    }

    /// Place `item` in the first free column of the last filled row (row 0 when empty).
    pub fn add_to_next_column(&mut self, item: T) -> Result<Slot, PlacementError> {
        let row = self.last_filled_row().unwrap_or(0);
        let col = self.next_free_column(row);
        self.place(item, Slot::new(row, col))
    }

    /// Whether a `span`-sized item anchored at `slot` could be placed right now.
    pub fn fits(&self, slot: Slot, span: Span) -> bool {
        self.check(slot, span).is_ok()
    }

    /// Place `item` anchored at an explicit slot.
    ///
    /// Fails without modifying the grid when the item's rectangle intersects an existing one
    /// or extends past the largest addressable row or column.
    pub fn place(&mut self, item: T, slot: Slot) -> Result<Slot, PlacementError> {
        let span = item.span();
        let placement = self.check(slot, span)?;

        trace!(%slot, %span, "placing grid item");
        self.entries.push(GridEntry { placement, item });
        Ok(slot)
    }

    fn check(&self, slot: Slot, span: Span) -> Result<PlacedItem, PlacementError> {
        let placement = PlacedItem::checked(slot, span)?;
        match self
            .entries
            .iter()
            .find(|entry| entry.placement.overlaps(&placement))
        {
            Some(existing) => Err(PlacementError::Overlap {
                slot,
                span,
                existing: existing.placement.slot,
            }),
            None => Ok(placement),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Tile(Span);

    impl Occupant for Tile {
        fn span(&self) -> Span {
            self.0
        }
    }

    fn cell() -> Tile {
        Tile(Span::UNIT)
    }

    fn tile(rows: usize, cols: usize) -> Tile {
        Tile(Span::new(rows, cols).unwrap())
    }

    #[test]
    fn empty_grid_has_no_rows_and_starts_at_column_zero() {
        let grid: PlacementGrid<Tile> = PlacementGrid::new();
        assert_eq!(grid.last_filled_row(), None);
        assert_eq!(grid.next_free_column(0), 0);
        assert!(grid.is_empty());
    }

    #[test]
    fn next_column_fills_the_first_row_left_to_right() {
        let mut grid = PlacementGrid::new();
        let slots: Vec<Slot> = (0..3)
            .map(|_| grid.add_to_next_column(cell()).unwrap())
            .collect();
        assert_eq!(slots, vec![Slot::new(0, 0), Slot::new(0, 1), Slot::new(0, 2)]);
        assert_eq!(grid.last_filled_row(), Some(0));
    }

    #[test]
    fn next_row_increments_by_one_from_zero() {
        let mut grid = PlacementGrid::new();
        for expected in 0..5 {
            let slot = grid.add_to_next_row(cell()).unwrap();
            assert_eq!(slot, Slot::new(expected, 0));
        }
    }

    #[test]
    fn gaps_are_reused_before_appending() {
        let mut grid = PlacementGrid::new();
        grid.place(cell(), Slot::new(0, 0)).unwrap();
        grid.place(cell(), Slot::new(0, 2)).unwrap();

        assert_eq!(grid.next_free_column(0), 1);
        assert_eq!(grid.add_to_next_column(cell()).unwrap(), Slot::new(0, 1));
        assert_eq!(grid.next_free_column(0), 3);
    }

    #[test]
    fn spans_count_toward_rows_and_columns() {
        let mut grid = PlacementGrid::new();
        grid.place(tile(3, 2), Slot::new(0, 0)).unwrap();

        assert_eq!(grid.last_filled_row(), Some(2));
        assert_eq!(grid.next_free_column(1), 2);
        assert_eq!(grid.next_free_column(2), 2);
        assert_eq!(grid.next_free_column(3), 0);

        assert_eq!(grid.add_to_next_column(cell()).unwrap(), Slot::new(2, 2));
        assert_eq!(grid.add_to_next_row(cell()).unwrap(), Slot::new(3, 0));
    }

    #[test]
    fn overlapping_placement_is_rejected_and_grid_is_unchanged() {
        let mut grid = PlacementGrid::new();
        grid.place(tile(1, 2), Slot::new(0, 1)).unwrap();

        let err = grid.place(cell(), Slot::new(0, 2)).unwrap_err();
        assert_eq!(
            err,
            PlacementError::Overlap {
                slot: Slot::new(0, 2),
                span: Span::UNIT,
                existing: Slot::new(0, 1),
            }
        );
        assert_eq!(grid.len(), 1);

        // Column 0 is free but a two-wide item would run into the existing one.
        assert!(grid.add_to_next_column(tile(1, 2)).is_err());
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.add_to_next_column(cell()).unwrap(), Slot::new(0, 0));
    }

    #[test]
    fn anchors_at_the_edge_of_usize_are_rejected() {
        let mut grid = PlacementGrid::new();
        let edge = Slot::new(usize::MAX, 0);

        assert!(!grid.fits(edge, Span::UNIT));
        assert_eq!(
            grid.place(cell(), edge),
            Err(PlacementError::OutOfBounds {
                slot: edge,
                span: Span::UNIT,
            })
        );
        assert!(grid.is_empty());
        assert_eq!(grid.last_filled_row(), None);

        grid.place(tile(1, 2), Slot::new(usize::MAX - 1, 0)).unwrap();
        assert_eq!(grid.last_filled_row(), Some(usize::MAX - 1));
        assert!(grid.place(tile(1, 2), Slot::new(0, usize::MAX)).is_err());
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn lookup_finds_items_by_covered_cell() {
        let mut grid = PlacementGrid::new();
        grid.place(tile(2, 2), Slot::new(1, 1)).unwrap();

        let entry = grid.get(Slot::new(2, 2)).expect("covered cell");
        assert_eq!(entry.placement.slot, Slot::new(1, 1));
        assert!(grid.get(Slot::new(0, 0)).is_none());
    }

    #[test]
    fn renderables_report_their_span() {
        let container = Renderable::Container {
            children: Vec::new(),
            span: Span::new(2, 3).unwrap(),
        };
        assert_eq!(Occupant::span(&container), Span::new(2, 3).unwrap());
    }
}
