//! Playground settings, resolved from layers.
//!
//! Lowest to highest precedence:
//!
//! 1. `defaults/fql.default.toml`, compiled in
//! 2. the user file at [`user_config_path`], when it exists
//! 3. a file named with `--config`, which must exist
//! 4. single keys set from command-line flags
//!
//! [`ConfigLayers`] stacks them and deserializes into [`PlaygroundConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use directories::ProjectDirs;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../defaults/fql.default.toml");

/// Top-level configuration consumed by the playground.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaygroundConfig {
    pub view: ViewConfig,
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
}

/// Toggles for the live parse view.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewConfig {
    pub enable_range_selection: bool,
    pub placeholder_text: String,
}

impl ViewConfig {
    /// The placeholder, or `None` when it is configured as an empty string
    pub fn placeholder(&self) -> Option<&str> {
        Some(self.placeholder_text.as_str()).filter(|text| !text.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    pub loading_strategy: LoadingStrategy,
}

/// How the UI waits for the parse engine to become ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadingStrategy {
    /// Poll for the engine on every tick while the loading screen is shown
    Immediate,
    /// Show the loading fallback once, then wait for the engine
    Suspense,
}

impl LoadingStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            LoadingStrategy::Immediate => "immediate",
            LoadingStrategy::Suspense => "suspense",
        }
    }
}

impl fmt::Display for LoadingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// A tracing filter directive
    pub level: String,
}

/// `config.toml` in the platform config directory for `fqlp`
///
/// `$XDG_CONFIG_HOME/fqlp/config.toml` on Linux. `None` when no home
/// directory can be found.
pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "fqlp").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Settings layers, stacked in the order they are added
#[derive(Debug, Clone)]
pub struct ConfigLayers {
    builder: ConfigBuilder<DefaultState>,
}

impl ConfigLayers {
    /// Just the compiled-in defaults
    pub fn defaults() -> Self {
        let builder =
            Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Stack the user's file; skipped when it does not exist.
    pub fn user_file(self, path: impl AsRef<Path>) -> Self {
        self.toml_file(path.as_ref(), false)
    }

    /// Stack a file the user named explicitly. Resolving fails if it is missing.
    pub fn explicit_file(self, path: impl AsRef<Path>) -> Self {
        self.toml_file(path.as_ref(), true)
    }

    fn toml_file(mut self, path: &Path, required: bool) -> Self {
        let source = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Pin one dotted key, e.g. `engine.loading_strategy`.
    pub fn flag<V>(mut self, key: &str, value: V) -> Result<Self, ConfigError>
    where
        V: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn resolve(self) -> Result<PlaygroundConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

pub fn load_defaults() -> Result<PlaygroundConfig, ConfigError> {
    ConfigLayers::defaults().resolve()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert!(config.view.enable_range_selection);
        assert_eq!(
            config.view.placeholder(),
            Some("host.online:true+platform:'windows'")
        );
        assert_eq!(config.engine.loading_strategy, LoadingStrategy::Immediate);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn supports_overrides() {
        let config = ConfigLayers::defaults()
            .flag("engine.loading_strategy", "suspense")
            .expect("override to apply")
            .flag("view.enable_range_selection", false)
            .expect("override to apply")
            .resolve()
            .expect("config to build");
        assert_eq!(config.engine.loading_strategy, LoadingStrategy::Suspense);
        assert!(!config.view.enable_range_selection);
    }

    #[test]
    fn empty_placeholder_means_none() {
        let config = ConfigLayers::defaults()
            .flag("view.placeholder_text", "")
            .expect("override to apply")
            .resolve()
            .expect("config to build");
        assert_eq!(config.view.placeholder(), None);
    }

    #[test]
    fn user_file_layers_over_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "[logging]\nlevel = \"debug\"").expect("write config");

        let config = ConfigLayers::defaults()
            .explicit_file(file.path())
            .resolve()
            .expect("config to build");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.engine.loading_strategy, LoadingStrategy::Immediate);
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result = ConfigLayers::defaults().explicit_file(dir.path().join("absent.toml")).resolve();
        assert!(result.is_err());
    }

    #[test]
    fn explicit_file_beats_user_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let user = dir.path().join("user.toml");
        let explicit = dir.path().join("explicit.toml");
        std::fs::write(&user, "[engine]\nloading_strategy = \"suspense\"\n[logging]\nlevel = \"warn\"\n")
            .expect("write user config");
        std::fs::write(&explicit, "[logging]\nlevel = \"trace\"\n").expect("write explicit config");

        let config = ConfigLayers::defaults()
            .user_file(&user)
            .explicit_file(&explicit)
            .resolve()
            .expect("config to resolve");
        assert_eq!(config.engine.loading_strategy, LoadingStrategy::Suspense);
        assert_eq!(config.logging.level, "trace");
    }

    #[test]
    fn user_config_lives_under_fqlp() {
        if let Some(path) = user_config_path() {
            assert!(path.ends_with("config.toml"));
            assert!(path.parent().is_some_and(|dir| dir.ends_with("fqlp")));
        }
    }

    #[test]
    fn missing_user_file_is_ignored() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = ConfigLayers::defaults()
            .user_file(dir.path().join("absent.toml"))
            .resolve()
            .expect("config to build");
        assert!(config.view.enable_range_selection);
    }

    #[test]
    fn unknown_strategy_is_rejected() {
        let result = ConfigLayers::defaults()
            .flag("engine.loading_strategy", "eager")
            .expect("override to apply")
            .resolve();
        assert!(result.is_err());
    }
}
