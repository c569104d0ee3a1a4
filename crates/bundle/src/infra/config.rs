//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::model::{IconKey, ScriptPolicy};

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".bundle/config.toml";
const DEFAULT_MAX_COLUMNS: usize = 10;

/// Layered configuration loaded from defaults, user, workspace, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub surface: Surface,
    #[serde(default)]
    pub actions: Actions,
    #[serde(default)]
    pub icons: Icons,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Surface {
    #[serde(default)]
    max_columns: Option<usize>,
}

impl Surface {
    pub fn with_max_columns(max_columns: usize) -> Self {
        Self {
            max_columns: Some(max_columns),
        }
    }

    /// Column limit per row, never less than one.
    pub fn max_columns(&self) -> usize {
        self.max_columns.unwrap_or(DEFAULT_MAX_COLUMNS).max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Actions {
    #[serde(default)]
    script_policy: Option<ScriptPolicy>,
}

impl Actions {
    pub fn script_policy(&self) -> ScriptPolicy {
        self.script_policy.unwrap_or_default()
    }
}

/// Icon asset names. Unset entries fall back to the bundled assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Icons {
    #[serde(default)]
    pub python: Option<String>,
    #[serde(default)]
    pub folder: Option<String>,
    #[serde(default)]
    pub object: Option<String>,
}

impl Icons {
    /// Asset name for an icon key.
    pub fn asset(&self, key: IconKey) -> &str {
        let (configured, fallback) = match key {
            IconKey::Python => (&self.python, "icon_python.png"),
            IconKey::Folder => (&self.folder, "icon_folder.png"),
            IconKey::Object => (&self.object, "icon_object.png"),
        };
        configured.as_deref().unwrap_or(fallback)
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    max_columns: Option<String>,
    script_policy: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            max_columns: env::var("BUNDLE_MAX_COLUMNS").ok(),
            script_policy: env::var("BUNDLE_SCRIPT_POLICY").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(max_columns: &str, script_policy: &str) -> Self {
        Self {
            max_columns: Some(max_columns.to_owned()),
            script_policy: Some(script_policy.to_owned()),
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace config, and env overrides.
    pub fn load() -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_config_path()?;
        Self::load_with_layers(global, workspace, env)
    }

    /// Load defaults plus a single explicit file, still honouring env overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::load_with_layers(None, Some(path.to_path_buf()), EnvOverrides::from_env())
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::parse_toml(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            layers.push(Self::from_file(&workspace_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        Ok(apply_env_overrides(merged, env_overrides))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::parse_toml(&data)
    }

    fn parse_toml(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            surface: merge_surface(self.surface, other.surface),
            actions: merge_actions(self.actions, other.actions),
            icons: merge_icons(self.icons, other.icons),
        }
    }
}

fn merge_surface(base: Surface, overlay: Surface) -> Surface {
    Surface {
        max_columns: overlay.max_columns.or(base.max_columns),
    }
}

fn merge_actions(mut base: Actions, overlay: Actions) -> Actions {
    if let Some(policy) = overlay.script_policy {
        base.script_policy = Some(policy);
    }
    base
}

fn merge_icons(base: Icons, overlay: Icons) -> Icons {
    Icons {
        python: overlay.python.or(base.python),
        folder: overlay.folder.or(base.folder),
        object: overlay.object.or(base.object),
    }
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("bundle/config.toml"))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir()?;
    let root = find_repo_root(&cwd).unwrap_or(cwd);
    Ok(Some(root.join(DEFAULT_WORKSPACE_CONFIG_PATH)))
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(raw) = env.max_columns {
        match raw.trim().parse::<usize>() {
            Ok(columns) => config.surface.max_columns = Some(columns),
            Err(_) => warn!(value = %raw, "ignoring invalid BUNDLE_MAX_COLUMNS"),
        }
    }
    if let Some(raw) = env.script_policy {
        match raw.parse::<ScriptPolicy>() {
            Ok(policy) => config.actions.script_policy = Some(policy),
            Err(err) => warn!(%err, "ignoring invalid BUNDLE_SCRIPT_POLICY"),
        }
    }
    config
}
