use super::types::{
    AssessmentConfig, DisplayConfig, LecternConfig, LoggingConfig, RawAssessmentConfig,
    RawDisplayConfig, RawLecternConfig, RawLoggingConfig,
};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user + project)
    pub fn load() -> Result<LecternConfig> {
        let mut raw = RawLecternConfig::default();

        // Layer 1: User config
        if let Some(user_path) = Self::user_config_path()
            && user_path.exists()
        {
            raw = Self::merge_raw(raw, Self::read_raw(&user_path)?);
        }

        // Layer 2: Project config
        let project_path = Self::project_config_path();
        if project_path.exists() {
            raw = Self::merge_raw(raw, Self::read_raw(&project_path)?);
        }

        Ok(Self::finalize(raw))
    }

    fn read_raw(path: &Path) -> Result<RawLecternConfig> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Invalid config in {}", path.display()))
    }

    /// User config path, e.g. ~/.config/lectern/config.toml
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("lectern").join("config.toml"))
    }

    /// Project config path
    /// Can be overridden with LECTERN_PROJECT_CONFIG_DIR
    pub fn project_config_path() -> PathBuf {
        if let Ok(dir) = std::env::var("LECTERN_PROJECT_CONFIG_DIR") {
            PathBuf::from(dir).join("config.toml")
        } else {
            PathBuf::from(".lectern/config.toml")
        }
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawLecternConfig, overlay: RawLecternConfig) -> RawLecternConfig {
        RawLecternConfig {
            logging: RawLoggingConfig {
                level: overlay.logging.level.or(base.logging.level),
                json: overlay.logging.json.or(base.logging.json),
            },
            display: RawDisplayConfig {
                date_format: overlay.display.date_format.or(base.display.date_format),
                missing_date: overlay.display.missing_date.or(base.display.missing_date),
            },
            assessment: RawAssessmentConfig {
                pairing: overlay.assessment.pairing.or(base.assessment.pairing),
            },
        }
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawLecternConfig) -> LecternConfig {
        let logging = LoggingConfig::default();
        let display = DisplayConfig::default();
        LecternConfig {
            logging: LoggingConfig {
                level: raw.logging.level.unwrap_or(logging.level),
                json: raw.logging.json.unwrap_or(logging.json),
            },
            display: DisplayConfig {
                date_format: raw.display.date_format.unwrap_or(display.date_format),
                missing_date: raw.display.missing_date.unwrap_or(display.missing_date),
            },
            assessment: AssessmentConfig {
                pairing: raw.assessment.pairing.unwrap_or_default(),
            },
        }
    }
}
