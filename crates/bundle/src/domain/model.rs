//! Domain models for classified drops, grid slots, and bundle buttons.

use std::fmt;
use std::num::NonZeroUsize;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::errors::{PlacementError, ScriptPolicyParseError};

/// The kind of content a block of dropped text represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextKind {
    /// One filesystem path per line.
    FilePaths,
    /// A block of Python source.
    PythonScript,
    /// One Maya DAG path per line.
    #[serde(rename = "maya_dag_paths")]
    MayaDagPath,
    /// Nothing the classifier recognises.
    Unknown,
}

impl TextKind {
    /// Stable identifier, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            TextKind::FilePaths => "file_paths",
            TextKind::PythonScript => "python_script",
            TextKind::MayaDagPath => "maya_dag_paths",
            TextKind::Unknown => "unknown",
        }
    }

    /// Whether each non-empty line is a separate entry.
    ///
    /// A script can span many lines but is still a single entry.
    pub fn is_multi_line(&self) -> bool {
        matches!(self, TextKind::FilePaths | TextKind::MayaDagPath)
    }
}

impl fmt::Display for TextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `(row, column)` coordinate in the placement grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slot {
    pub row: usize,
    pub col: usize,
}

impl Slot {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Number of rows and columns an item occupies from its anchor cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    rows: NonZeroUsize,
    cols: NonZeroUsize,
}

impl Span {
    /// A single cell.
    pub const UNIT: Span = Span {
        rows: NonZeroUsize::MIN,
        cols: NonZeroUsize::MIN,
    };

    pub fn new(rows: usize, cols: usize) -> Result<Self, PlacementError> {
        match (NonZeroUsize::new(rows), NonZeroUsize::new(cols)) {
            (Some(rows), Some(cols)) => Ok(Self { rows, cols }),
            _ => Err(PlacementError::ZeroSpan { rows, cols }),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows.get()
    }

    pub fn cols(&self) -> usize {
        self.cols.get()
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::UNIT
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// The rectangle a grid occupant covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacedItem {
    pub slot: Slot,
    pub span: Span,
}

impl PlacedItem {
    pub fn new(slot: Slot, span: Span) -> Self {
        Self { slot, span }
    }

    /// Like [`PlacedItem::new`], but rejects rectangles whose far edge is not addressable.
    pub fn checked(slot: Slot, span: Span) -> Result<Self, PlacementError> {
        let rows_end = slot.row.checked_add(span.rows());
        let cols_end = slot.col.checked_add(span.cols());
        match (rows_end, cols_end) {
            (Some(_), Some(_)) => Ok(Self::new(slot, span)),
            _ => Err(PlacementError::OutOfBounds { slot, span }),
        }
    }

    /// Bottom-most row covered by the item.
    pub fn last_row(&self) -> usize {
        self.slot.row + self.span.rows() - 1
    }

    pub fn rows(&self) -> Range<usize> {
        self.slot.row..self.slot.row + self.span.rows()
    }

    pub fn cols(&self) -> Range<usize> {
        self.slot.col..self.slot.col + self.span.cols()
    }

    pub fn covers_row(&self, row: usize) -> bool {
        self.rows().contains(&row)
    }

    pub fn covers(&self, slot: Slot) -> bool {
        self.covers_row(slot.row) && self.cols().contains(&slot.col)
    }

    pub fn overlaps(&self, other: &PlacedItem) -> bool {
        ranges_intersect(self.rows(), other.rows()) && ranges_intersect(self.cols(), other.cols())
    }
}

fn ranges_intersect(a: Range<usize>, b: Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

/// Icon asset families a button can show. Resolved to file names through config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconKey {
    Python,
    Folder,
    Object,
}

/// The closed set of things a button can do when pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BundleAction {
    /// Reveal the entries in the platform file browser.
    File,
    /// Hand the single entry to the host as source to execute.
    Script,
    /// Replace the host selection with the entries.
    ObjectSelect,
}

/// A button built from one accepted drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleButton {
    pub kind: TextKind,
    pub entries: Vec<String>,
    pub icon: IconKey,
    pub action: BundleAction,
}

impl BundleButton {
    pub fn tooltip(&self) -> String {
        self.entries.join("\n")
    }
}

/// Anything the drop surface can lay out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Renderable {
    /// A single button occupying one cell.
    Primitive(BundleButton),
    /// A nested group of renderables that spans one or more cells.
    Container {
        children: Vec<Renderable>,
        span: Span,
    },
}

impl Renderable {
    pub fn as_button(&self) -> Option<&BundleButton> {
        match self {
            Renderable::Primitive(button) => Some(button),
            Renderable::Container { .. } => None,
        }
    }

    /// Every button in this renderable, depth first.
    pub fn buttons(&self) -> Vec<&BundleButton> {
        match self {
            Renderable::Primitive(button) => vec![button],
            Renderable::Container { children, .. } => {
                children.iter().flat_map(Renderable::buttons).collect()
            }
        }
    }
}

/// Whether script buttons may hand their source to the host for execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptPolicy {
    /// Never run scripts.
    Deny,
    /// Ask the host to confirm each run.
    #[default]
    Confirm,
    /// Run without asking.
    Allow,
}

impl ScriptPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptPolicy::Deny => "deny",
            ScriptPolicy::Confirm => "confirm",
            ScriptPolicy::Allow => "allow",
        }
    }
}

impl fmt::Display for ScriptPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScriptPolicy {
    type Err = ScriptPolicyParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "deny" | "never" | "off" => Ok(ScriptPolicy::Deny),
            "confirm" | "ask" => Ok(ScriptPolicy::Confirm),
            "allow" | "always" => Ok(ScriptPolicy::Allow),
            other => Err(ScriptPolicyParseError::UnknownPolicy(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_span_is_rejected() {
        assert_eq!(
            Span::new(0, 2),
            Err(PlacementError::ZeroSpan { rows: 0, cols: 2 })
        );
        assert!(Span::new(1, 0).is_err());
        assert_eq!(Span::new(1, 1).unwrap(), Span::UNIT);
    }

    #[test]
    fn placed_items_overlap_only_when_both_axes_intersect() {
        let wide = PlacedItem::new(Slot::new(0, 0), Span::new(1, 3).unwrap());
        let below = PlacedItem::new(Slot::new(1, 1), Span::UNIT);
        let inside = PlacedItem::new(Slot::new(0, 2), Span::UNIT);
        let beside = PlacedItem::new(Slot::new(0, 3), Span::UNIT);

        assert!(!wide.overlaps(&below));
        assert!(wide.overlaps(&inside));
        assert!(!wide.overlaps(&beside));
        assert_eq!(wide.last_row(), 0);
        assert!(wide.covers(Slot::new(0, 2)));
    }

    #[test]
    fn rectangles_past_the_last_cell_are_rejected() {
        let edge = Slot::new(usize::MAX, 0);
        assert_eq!(
            PlacedItem::checked(edge, Span::UNIT),
            Err(PlacementError::OutOfBounds {
                slot: edge,
                span: Span::UNIT,
            })
        );
        assert!(
            PlacedItem::checked(Slot::new(0, usize::MAX - 1), Span::new(1, 2).unwrap()).is_err()
        );
        assert!(PlacedItem::checked(Slot::new(usize::MAX - 1, 0), Span::UNIT).is_ok());
    }

    #[test]
    fn text_kind_serializes_with_stable_names() {
        let json = serde_json::to_string(&TextKind::MayaDagPath).unwrap();
        assert_eq!(json, "\"maya_dag_paths\"");
        assert_eq!(TextKind::FilePaths.to_string(), "file_paths");
        assert!(TextKind::FilePaths.is_multi_line());
        assert!(!TextKind::PythonScript.is_multi_line());
    }

    #[test]
    fn container_lists_nested_buttons() {
        let button = BundleButton {
            kind: TextKind::FilePaths,
            entries: vec!["/tmp/a".into(), "/tmp/b".into()],
            icon: IconKey::Folder,
            action: BundleAction::File,
        };
        let container = Renderable::Container {
            children: vec![
                Renderable::Primitive(button.clone()),
                Renderable::Container {
                    children: vec![Renderable::Primitive(button.clone())],
                    span: Span::UNIT,
                },
            ],
            span: Span::new(1, 2).unwrap(),
        };

        assert_eq!(container.buttons().len(), 2);
        assert!(container.as_button().is_none());
        assert_eq!(button.tooltip(), "/tmp/a\n/tmp/b");
    }

    #[test]
    fn policies_parse_from_config_strings() {
        assert_eq!("Allow".parse::<ScriptPolicy>().unwrap(), ScriptPolicy::Allow);
        assert_eq!("ask".parse::<ScriptPolicy>().unwrap(), ScriptPolicy::Confirm);
        assert!("maybe".parse::<ScriptPolicy>().is_err());
        assert_eq!(ScriptPolicy::default(), ScriptPolicy::Confirm);
    }
}
