//! Dispatching button actions to the host application.
//!
//! This crate never performs the side effects itself. A host (a DCC plugin, a file manager
//! bridge, a test double) implements [`ActionHost`], and [`ActionDispatcher`] decides which
//! host call a button maps to. Script buttons carry arbitrary dropped text, so they pass
//! through a [`ScriptPolicy`] first.

use std::collections::HashSet;

use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::errors::ActionError;
use crate::domain::model::{BundleAction, BundleButton, ScriptPolicy};

/// Side effects a host application provides for bundle buttons.
pub trait ActionHost {
    /// Reveal each path in the platform file browser.
    fn reveal_files(&mut self, paths: &[String]) -> Result<()>;

    /// Clear the host selection, then select `objects`.
    fn select_objects(&mut self, objects: &[String]) -> Result<()>;

    /// Execute `source` in the host interpreter.
    fn run_script(&mut self, source: &str) -> Result<()>;

    /// Ask the user whether `source` may run. Declines unless overridden.
    fn confirm_script(&mut self, _source: &str) -> bool {
        false
    }
}

/// Routes a pressed button to the matching [`ActionHost`] call.
#[derive(Debug, Default, Clone, Copy)]
pub struct ActionDispatcher {
    policy: ScriptPolicy,
}

impl ActionDispatcher {
    pub fn new(policy: ScriptPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ScriptPolicy {
        self.policy
    }

    pub fn dispatch<H: ActionHost + ?Sized>(
        &self,
        button: &BundleButton,
        host: &mut H,
    ) -> Result<(), ActionError> {
        match button.action {
            BundleAction::File => {
                let paths = dedup_preserving_order(&button.entries);
                if paths.is_empty() {
                    return Err(ActionError::NoEntries);
                }
                info!(count = paths.len(), "revealing files");
                host.reveal_files(&paths)?;
            }
            BundleAction::ObjectSelect => {
                info!(count = button.entries.len(), "selecting objects");
                host.select_objects(&button.entries)?;
            }
            BundleAction::Script => {
                let source = button.entries.first().ok_or(ActionError::NoEntries)?;
                self.run_script(source, host)?;
            }
        }
        Ok(())
    }

    fn run_script<H: ActionHost + ?Sized>(
        &self,
        source: &str,
        host: &mut H,
    ) -> Result<(), ActionError> {
        match self.policy {
            ScriptPolicy::Deny => {
                warn!("script execution refused by policy");
                return Err(ActionError::ScriptDenied);
            }
            ScriptPolicy::Confirm => {
                if !host.confirm_script(source) {
                    warn!("script execution declined");
                    return Err(ActionError::ScriptDeclined);
                }
            }
            ScriptPolicy::Allow => {}
        }

        info!(bytes = source.len(), "running script");
        host.run_script(source)?;
        Ok(())
    }
}

fn dedup_preserving_order(entries: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .filter(|entry| seen.insert(entry.as_str()))
        .cloned()
        .collect()
}

/// A host call recorded by [`LogHost`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "call", content = "args", rename_all = "snake_case")]
pub enum HostRequest {
    RevealFiles(Vec<String>),
    SelectObjects(Vec<String>),
    RunScript(String),
}

/// Dry-run host: logs and records every request instead of acting on it.
#[derive(Debug, Default, Clone)]
pub struct LogHost {
    requests: Vec<HostRequest>,
    confirm: bool,
}

impl LogHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every confirmation prompt with `confirm`.
    pub fn confirming(mut self, confirm: bool) -> Self {
        self.confirm = confirm;
        self
    }

    pub fn requests(&self) -> &[HostRequest] {
        &self.requests
    }
}

impl ActionHost for LogHost {
    fn reveal_files(&mut self, paths: &[String]) -> Result<()> {
        info!(?paths, "dry run: reveal files");
        self.requests.push(HostRequest::RevealFiles(paths.to_vec()));
        Ok(())
    }

    fn select_objects(&mut self, objects: &[String]) -> Result<()> {
        info!(?objects, "dry run: select objects");
        self.requests
            .push(HostRequest::SelectObjects(objects.to_vec()));
        Ok(())
    }

    fn run_script(&mut self, source: &str) -> Result<()> {
        info!(bytes = source.len(), "dry run: run script");
        self.requests.push(HostRequest::RunScript(source.to_owned()));
        Ok(())
    }

    fn confirm_script(&mut self, _source: &str) -> bool {
        self.confirm
    }
}
