use crate::error::AppError;
use crate::model::Scope;
use crate::storage::kv::app_dir;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "FALCON_CONFIG_PATH";

/// Colour scheme for plain output. Unknown names fall back to `Plain`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Plain,
    Noir,
    Solarized,
}

impl Theme {
    pub fn from_name(raw: &str) -> Self {
        match canonical_key(raw).as_str() {
            "noir" | "dark" | "dark_mode" | "darkmode" => Self::Noir,
            "solarized" => Self::Solarized,
            _ => Self::Plain,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "default",
            Self::Noir => "noir",
            Self::Solarized => "solarized",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Self::Plain => Palette::default(),
            Self::Noir => Palette {
                accent: "\x1b[38;5;208m",
                muted: "\x1b[38;5;244m",
            },
            Self::Solarized => Palette {
                accent: "\x1b[38;5;37m",
                muted: "\x1b[38;5;246m",
            },
        }
    }
}

/// ANSI prefixes for highlighted titles and for done or removed rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct Palette {
    pub accent: &'static str,
    pub muted: &'static str,
}

impl Palette {
    pub fn accentize(&self, text: &str) -> String {
        paint(self.accent, text)
    }

    pub fn mutedize(&self, text: &str) -> String {
        paint(self.muted, text)
    }
}

fn paint(code: &str, text: &str) -> String {
    if code.is_empty() {
        text.to_string()
    } else {
        format!("{code}{text}\x1b[0m")
    }
}

pub fn palette_for_theme(theme: Option<&str>) -> Palette {
    theme.map(Theme::from_name).unwrap_or_default().palette()
}

/// Lowercases and collapses every run of non-alphanumerics into a single
/// underscore, trimming underscores at either end.
pub fn canonical_key(raw: &str) -> String {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    cleaned.trim_matches('_').to_string()
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: Option<String>,
    /// Scope used by `summary` when none is given.
    #[serde(default)]
    pub default_scope: Option<String>,
    #[serde(default)]
    pub fallback_path: Option<PathBuf>,
    #[serde(default)]
    pub export_path: Option<PathBuf>,
}

impl Config {
    pub fn scope(&self) -> Result<Scope, AppError> {
        match self.default_scope.as_deref() {
            Some(raw) => raw.parse(),
            None => Ok(Scope::default()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub theme: Option<String>,
    pub default_scope: Option<String>,
    pub export_path: Option<PathBuf>,
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    Ok(app_dir()?.join(CONFIG_FILE_NAME))
}

pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let mut config: Config = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;

    config.theme = config
        .theme
        .map(|name| Theme::from_name(&name).as_str().to_string());
    if let Err(err) = config.scope() {
        return Err(AppError::invalid_data(format!(
            "{}: default_scope: {}",
            path.display(),
            err.message()
        )));
    }
    Ok(config)
}

pub fn merge_overrides(base: &Config, overrides: &ConfigOverrides) -> Config {
    let mut merged = base.clone();
    if let Some(theme) = overrides.theme.as_ref() {
        merged.theme = Some(Theme::from_name(theme).as_str().to_string());
    }
    if let Some(scope) = overrides.default_scope.as_ref() {
        merged.default_scope = Some(scope.clone());
    }
    if let Some(path) = overrides.export_path.as_ref() {
        merged.export_path = Some(path.clone());
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::{
        Config, ConfigOverrides, Theme, canonical_key, load_config_from_path,
        load_config_with_fallback_from_path, merge_overrides, palette_for_theme,
    };
    use crate::model::Scope;
    use std::fs;
    use std::path::PathBuf;

    #[test]
    fn load_config_missing_returns_defaults_without_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config_with_fallback_from_path(&dir.path().join("missing.json"));

        assert_eq!(result.config, Config::default());
        assert!(result.error.is_none());
    }

    #[test]
    fn load_config_invalid_returns_defaults_and_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invalid.json");
        fs::write(&path, "{ invalid json ").unwrap();

        let result = load_config_with_fallback_from_path(&path);

        assert_eq!(result.config, Config::default());
        assert_eq!(result.error.unwrap().code(), "invalid_data");
    }

    #[test]
    fn load_config_reads_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let content = serde_json::json!({
            "theme": "Dark Mode",
            "default_scope": "Weekly",
            "export_path": "/tmp/falcon-export.json"
        });
        fs::write(&path, serde_json::to_string(&content).unwrap()).unwrap();

        let loaded = load_config_from_path(&path).unwrap();

        assert_eq!(loaded.theme.as_deref(), Some("noir"));
        assert_eq!(loaded.scope().unwrap(), Scope::Weekly);
        assert_eq!(
            loaded.export_path,
            Some(PathBuf::from("/tmp/falcon-export.json"))
        );
    }

    #[test]
    fn load_config_rejects_unknown_scope() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "default_scope": "hourly" }"#).unwrap();

        let err = load_config_from_path(&path).unwrap_err();
        assert_eq!(err.code(), "invalid_data");
        assert!(err.message().contains("default_scope"));
    }

    #[test]
    fn merge_overrides_replaces_only_given_fields() {
        let base = Config {
            theme: Some("default".into()),
            default_scope: Some("daily".into()),
            fallback_path: Some(PathBuf::from("/srv/seed.json")),
            export_path: None,
        };
        let overrides = ConfigOverrides {
            theme: Some("Solarized".into()),
            default_scope: None,
            export_path: Some(PathBuf::from("out.json")),
        };

        let merged = merge_overrides(&base, &overrides);

        assert_eq!(merged.theme.as_deref(), Some("solarized"));
        assert_eq!(merged.default_scope.as_deref(), Some("daily"));
        assert_eq!(merged.fallback_path, base.fallback_path);
        assert_eq!(merged.export_path, Some(PathBuf::from("out.json")));
        assert_eq!(base.theme.as_deref(), Some("default"));
    }

    #[test]
    fn merge_overrides_with_empty_overrides_returns_clone() {
        let base = Config {
            theme: Some("noir".into()),
            ..Config::default()
        };
        assert_eq!(merge_overrides(&base, &ConfigOverrides::default()), base);
    }

    #[test]
    fn theme_names_are_canonicalized() {
        assert_eq!(canonical_key("  Default--Scope "), "default_scope");
        assert_eq!(Theme::from_name("Dark-Mode"), Theme::Noir);
        assert_eq!(Theme::from_name("SOLARIZED"), Theme::Solarized);
        assert_eq!(Theme::from_name("vanilla"), Theme::Plain);
        assert_eq!(Theme::from_name("oceanic").as_str(), "default");
    }

    #[test]
    fn palette_for_theme_colours_only_named_themes() {
        assert!(palette_for_theme(None).accent.is_empty());
        assert_eq!(palette_for_theme(Some("light")).mutedize("x"), "x");
        assert_eq!(palette_for_theme(Some("noir")).accent, "\x1b[38;5;208m");
        assert_eq!(
            palette_for_theme(Some("dark")).mutedize("x"),
            "\x1b[38;5;244mx\x1b[0m"
        );
    }
}
