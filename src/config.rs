//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/cursortree/cursortree.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `CURSORTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, Map};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{RenderOptions, RenderStyle};

/// Unified configuration for cursortree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Indentation unit, repeated once per depth level (default: one tab)
    pub indent: String,
    /// Shown when there is no current node (default: "NULL")
    pub null_marker: String,
    /// First word of the render header (default: "Tree")
    pub header: String,
    pub style: RenderStyle,
    /// Node limit for new trees, unbounded when unset
    pub max_nodes: Option<usize>,
    /// Abort scripts on the first rejected edit
    pub strict: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let render = RenderOptions::default();
        Self {
            indent: render.indent,
            null_marker: render.null_marker,
            header: render.header,
            style: render.style,
            max_nodes: None,
            strict: false,
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub indent: Option<String>,
    pub null_marker: Option<String>,
    pub header: Option<String>,
    pub style: Option<RenderStyle>,
    pub max_nodes: Option<usize>,
    pub strict: Option<bool>,
}

/// Get the XDG config directory for cursortree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "cursortree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("cursortree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            indent: overlay.indent.clone().unwrap_or_else(|| self.indent.clone()),
            null_marker: overlay
                .null_marker
                .clone()
                .unwrap_or_else(|| self.null_marker.clone()),
            header: overlay.header.clone().unwrap_or_else(|| self.header.clone()),
            style: overlay.style.unwrap_or(self.style),
            max_nodes: overlay.max_nodes.or(self.max_nodes),
            strict: overlay.strict.unwrap_or(self.strict),
        }
    }

    /// Load settings with layered precedence, using the XDG global config.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_with_global(global_config_path().as_deref(), explicit)
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `global` - Global config file, skipped if it does not exist
    /// * `explicit` - Config file given on the command line, must exist
    pub fn load_with_global(
        global: Option<&Path>,
        explicit: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config, optional
        if let Some(global_path) = global {
            if global_path.exists() {
                debug!("loading global config {}", global_path.display());
                let raw = load_raw_settings(global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Explicit config, a missing file is an error
        if let Some(path) = explicit {
            debug!("loading config {}", path.display());
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        // 4. Environment variables
        Self::apply_env_overrides(current)
    }

    /// Apply CURSORTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(settings: Self) -> Result<Self, ApplicationError> {
        Self::apply_env_source(settings, None)
    }

    /// Apply overrides from `vars`, or from the process environment when `None`.
    ///
    /// Keys use the `CURSORTREE_` prefix; nested keys would use `__`.
    fn apply_env_source(
        mut settings: Self,
        vars: Option<Map<String, String>>,
    ) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("CURSORTREE")
                    .prefix_separator("_")
                    .separator("__")
                    .source(vars),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("indent") {
            settings.indent = val;
        }
        if let Ok(val) = config.get_string("null_marker") {
            settings.null_marker = val;
        }
        if let Ok(val) = config.get_string("header") {
            settings.header = val;
        }
        if let Ok(val) = config.get_string("style") {
            settings.style = val
                .parse()
                .map_err(|message| ApplicationError::Config { message })?;
        }
        if let Ok(val) = config.get_string("max_nodes") {
            let max_nodes = val.trim().parse::<usize>().map_err(|e| ApplicationError::Config {
                message: format!("CURSORTREE_MAX_NODES={}: {}", val, e),
            })?;
            settings.max_nodes = Some(max_nodes);
        }
        if let Ok(val) = config.get_string("strict") {
            settings.strict = config.get_bool("strict").map_err(|e| ApplicationError::Config {
                message: format!("CURSORTREE_STRICT={}: {}", val, e),
            })?;
        }

        Ok(settings)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            indent: self.indent.clone(),
            null_marker: self.null_marker.clone(),
            header: self.header.clone(),
            style: self.style,
        }
    }

    /// Serialize the effective settings.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_render_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.render_options(), RenderOptions::default());
        assert_eq!(settings.max_nodes, None);
        assert!(!settings.strict);
    }

    #[test]
    fn test_merge_keeps_unspecified_fields() {
        let base = Settings::default();
        let overlay = RawSettings {
            header: Some("Baum".into()),
            max_nodes: Some(10),
            ..RawSettings::default()
        };
        let merged = base.merge_with(&overlay);
        assert_eq!(merged.header, "Baum");
        assert_eq!(merged.max_nodes, Some(10));
        assert_eq!(merged.indent, "\t");
        assert_eq!(merged.style, RenderStyle::Plain);
    }

    fn vars(pairs: &[(&str, &str)]) -> Option<Map<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_env_source_overrides_prefixed_keys() {
        let settings = Settings::apply_env_source(
            Settings::default(),
            vars(&[
                ("CURSORTREE_NULL_MARKER", "<empty>"),
                ("CURSORTREE_HEADER", "Baum"),
                ("CURSORTREE_STYLE", "outline"),
                ("CURSORTREE_MAX_NODES", "16"),
                ("CURSORTREE_STRICT", "yes"),
                ("OTHER_HEADER", "ignored"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.null_marker, "<empty>");
        assert_eq!(settings.header, "Baum");
        assert_eq!(settings.style, RenderStyle::Outline);
        assert_eq!(settings.max_nodes, Some(16));
        assert!(settings.strict);
        assert_eq!(settings.indent, "\t");
    }

    #[test]
    fn test_env_source_rejects_unparsable_strict() {
        let err = Settings::apply_env_source(
            Settings::default(),
            vars(&[("CURSORTREE_STRICT", "maybe")]),
        )
        .unwrap_err();

        match err {
            ApplicationError::Config { message } => {
                assert!(message.starts_with("CURSORTREE_STRICT=maybe"), "{}", message)
            }
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_env_source_rejects_unparsable_max_nodes() {
        let err = Settings::apply_env_source(
            Settings::default(),
            vars(&[("CURSORTREE_MAX_NODES", "many")]),
        )
        .unwrap_err();
        assert!(matches!(err, ApplicationError::Config { .. }));
    }
}
