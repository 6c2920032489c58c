//! Configuration module.
//!
//! Responsibilities:
//! - Read startup appearance from a single YAML file (`config.yaml`)
//! - File lives inside the platform standard configuration directory (`dirs::config_dir()`) under an app subdirectory (`tailored`)
//! - Every field is optional. Missing file => defaults (surfaced as `LoadStatus::Defaults`)
//! - Corrupt / invalid YAML => fatal error (`LoadError::Corrupt`)
//! - A malformed accent color is not fatal: it is logged and the default accent kept
//! - Provide cheap cloning via Arc
//!
//! The file is only ever read. Preferences changed at runtime are not written back.
//!
//! UI integration policy:
//! - `main` calls `Config::load()`:
//!     * `Ok(LoadStatus::Ready(config))` -> seed the theme engine from `config.theme_state()`
//!     * `Ok(LoadStatus::Defaults(reason))` -> start from `ThemeState::default()`
//!     * `Err(LoadError::Corrupt(..))` -> print the error and exit
//!
//! YAML backend: `serde_norway`.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Deserialize;

use crate::theme::ThemeState;
use crate::theme::color::Rgb;
use crate::theme::customization::{
    CardStyle, Customization, DEFAULT_ACCENT, FontFamily, FontSize, Palette, Spacing,
};

/// Public handle to configuration (cheap clone).
#[derive(Clone, Debug)]
pub struct Config {
    inner: Arc<ConfigInner>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigInner {
    appearance: Appearance,
}

/// The `appearance:` table. Absent keys take their defaults.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Appearance {
    pub palette: Palette,
    pub dark_mode: bool,
    pub font_size: FontSize,
    pub font_family: FontFamily,
    pub card_style: CardStyle,
    pub spacing: Spacing,
    pub accent_color: String,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            dark_mode: false,
            font_size: FontSize::default(),
            font_family: FontFamily::default(),
            card_style: CardStyle::default(),
            spacing: Spacing::default(),
            accent_color: DEFAULT_ACCENT.to_string(),
        }
    }
}

/// Status returned when attempting to load config from disk.
pub enum LoadStatus {
    /// File parsed; values ready to seed the app.
    Ready(Config),
    /// Nothing usable on disk; start from built-in defaults.
    Defaults(DefaultsReason),
}

/// Reason built-in defaults are used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultsReason {
    MissingFile,
    EmptyFile,
}

#[derive(Debug)]
pub enum LoadError {
    /// YAML exists but is syntactically invalid or has unexpected keys/values.
    Corrupt(String),

    Io(io::Error),
}

impl Config {
    /// Load configuration from the standard location.
    pub fn load() -> Result<LoadStatus, LoadError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from an explicit path.
    ///
    /// Returns:
    /// - `Ok(LoadStatus::Ready)` if the file exists and parses
    /// - `Ok(LoadStatus::Defaults)` if the file is missing or blank
    /// - `Err(LoadError::Corrupt)` if YAML is malformed
    /// - `Err(LoadError::Io)` for unexpected I/O problems
    pub fn load_from(path: &Path) -> Result<LoadStatus, LoadError> {
        if !path.exists() {
            log::info!("No config at {}; using defaults", path.display());
            return Ok(LoadStatus::Defaults(DefaultsReason::MissingFile));
        }

        let raw = fs::read_to_string(path)?;
        if raw.trim().is_empty() {
            return Ok(LoadStatus::Defaults(DefaultsReason::EmptyFile));
        }

        let mut inner = serde_norway::from_str::<ConfigInner>(&raw)
            .map_err(|e| LoadError::Corrupt(e.to_string()))?;

        // Same acceptance rule as the runtime setter.
        if let Err(e) = Rgb::parse_strict(&inner.appearance.accent_color) {
            log::warn!("Ignoring accent_color from config: {e}");
            inner.appearance.accent_color = DEFAULT_ACCENT.to_string();
        }

        log::info!("Loaded config from {}", path.display());
        Ok(LoadStatus::Ready(Self {
            inner: Arc::new(inner),
        }))
    }

    pub fn appearance(&self) -> &Appearance {
        &self.inner.appearance
    }

    /// Initial theme state described by this config.
    pub fn theme_state(&self) -> ThemeState {
        let a = self.appearance();
        ThemeState {
            palette: a.palette,
            dark_mode: a.dark_mode,
            customization: Customization {
                font_size: a.font_size,
                font_family: a.font_family,
                card_style: a.card_style,
                spacing: a.spacing,
                accent_color: a.accent_color.clone(),
            },
        }
    }

    /// Path to the on-disk configuration file.
    pub fn file_path() -> PathBuf {
        config_file_path()
    }
}

/// Build canonical path to config.yaml
fn config_file_path() -> PathBuf {
    app_config_dir().join("config.yaml")
}

/// Determine application config directory: `<platform_config_dir>/tailored`
fn app_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| fallback_home_join(".config"))
        .join("tailored")
}

/// Fallback: if `config_dir` unavailable, attempt to use HOME; else current directory.
fn fallback_home_join(child: &str) -> PathBuf {
    dirs::home_dir().map_or_else(|| PathBuf::from(".").join(child), |h| h.join(child))
}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Corrupt(s) => write!(f, "Corrupt config YAML: {s}"),
            Self::Io(e) => write!(f, "I/O error loading config: {e}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Corrupt(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static SEQ: AtomicUsize = AtomicUsize::new(0);

    fn temp_dir() -> PathBuf {
        let mut d = std::env::temp_dir();
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let seq = SEQ.fetch_add(1, Ordering::Relaxed);
        d.push(format!("tailored_test_{nonce}_{seq}"));
        fs::create_dir_all(&d).unwrap();
        d
    }

    fn load_yaml(yaml: &str) -> Result<LoadStatus, LoadError> {
        let path = temp_dir().join("config.yaml");
        fs::write(&path, yaml).unwrap();
        Config::load_from(&path)
    }

    fn ready(status: LoadStatus) -> Config {
        match status {
            LoadStatus::Ready(c) => c,
            LoadStatus::Defaults(reason) => panic!("expected Ready, got defaults ({reason:?})"),
        }
    }

    #[test]
    fn missing_file_uses_defaults() {
        let path = temp_dir().join("nope.yaml");
        let status = Config::load_from(&path).unwrap();
        assert!(matches!(
            status,
            LoadStatus::Defaults(DefaultsReason::MissingFile)
        ));
    }

    #[test]
    fn blank_file_uses_defaults() {
        let status = load_yaml("  \n").unwrap();
        assert!(matches!(status, LoadStatus::Defaults(DefaultsReason::EmptyFile)));
    }

    #[test]
    fn full_appearance_is_read() {
        let cfg = ready(
            load_yaml(
                "appearance:\n  palette: blue\n  dark_mode: true\n  font_size: large\n  font_family: mono\n  card_style: bordered\n  spacing: compact\n  accent_color: \"#0077b6\"\n",
            )
            .unwrap(),
        );
        let state = cfg.theme_state();
        assert_eq!(state.palette, Palette::Blue);
        assert!(state.dark_mode);
        assert_eq!(state.customization.font_size, FontSize::Large);
        assert_eq!(state.customization.font_family, FontFamily::Mono);
        assert_eq!(state.customization.card_style, CardStyle::Bordered);
        assert_eq!(state.customization.spacing, Spacing::Compact);
        assert_eq!(state.customization.accent_color, "#0077b6");
    }

    #[test]
    fn partial_appearance_keeps_other_defaults() {
        let cfg = ready(load_yaml("appearance:\n  dark_mode: true\n").unwrap());
        let state = cfg.theme_state();
        assert!(state.dark_mode);
        assert_eq!(state.palette, Palette::Default);
        assert_eq!(state.customization, Customization::default());
    }

    #[test]
    fn malformed_accent_falls_back() {
        let cfg = ready(load_yaml("appearance:\n  accent_color: teal\n").unwrap());
        assert_eq!(cfg.appearance().accent_color, DEFAULT_ACCENT);
    }

    #[test]
    fn corrupt_yaml_is_an_error() {
        let err = load_yaml("appearance: [unclosed").err().unwrap();
        assert!(matches!(err, LoadError::Corrupt(_)));

        let err = load_yaml("appearance:\n  palette: magenta\n").err().unwrap();
        assert!(matches!(err, LoadError::Corrupt(_)));
    }
}
