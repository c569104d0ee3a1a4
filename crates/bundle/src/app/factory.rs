//! Turning dropped text into bundle buttons.

use tracing::warn;

use crate::app::classify::{classify, split_nonempty_lines};
use crate::domain::model::{BundleAction, BundleButton, IconKey, TextKind};

/// Builds a [`BundleButton`] for each drop the classifier recognises.
#[derive(Debug, Default, Clone, Copy)]
pub struct ButtonFactory;

impl ButtonFactory {
    pub fn new() -> Self {
        Self
    }

    /// Classify `text` and build its button, or `None` when the kind is unknown.
    pub fn build(&self, text: &str) -> Option<BundleButton> {
        let kind = classify(text);
        let Some((icon, action)) = Self::presentation(kind) else {
            warn!("dropped text was not recognised; ignoring drop");
            return None;
        };

        Some(BundleButton {
            kind,
            entries: Self::entries(kind, text),
            icon,
            action,
        })
    }

    /// Icon and action attached to a kind.
    pub fn presentation(kind: TextKind) -> Option<(IconKey, BundleAction)> {
        match kind {
            TextKind::FilePaths => Some((IconKey::Folder, BundleAction::File)),
            TextKind::PythonScript => Some((IconKey::Python, BundleAction::Script)),
            TextKind::MayaDagPath => Some((IconKey::Object, BundleAction::ObjectSelect)),
            TextKind::Unknown => None,
        }
    }

    /// Entries a button of `kind` stores for `text`.
    ///
    /// Line-oriented kinds keep one stripped entry per non-empty line; everything else keeps
    /// the text whole.
    pub fn entries(kind: TextKind, text: &str) -> Vec<String> {
        if kind.is_multi_line() {
            split_nonempty_lines(text)
                .into_iter()
                .map(str::to_owned)
                .collect()
        } else {
            vec![text.to_owned()]
        }
    }
}
