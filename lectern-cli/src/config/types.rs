use lectern_assessment::PairingStrategy;
use lectern_core::DateDisplay;
use serde::{Deserialize, Serialize};

/// Default log filter when neither `--verbose` nor `[logging] level` is set
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawLecternConfig {
    #[serde(default)]
    pub logging: RawLoggingConfig,

    #[serde(default)]
    pub display: RawDisplayConfig,

    #[serde(default)]
    pub assessment: RawAssessmentConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawLoggingConfig {
    /// `EnvFilter` directive, e.g. "info" or "lectern_core=debug"
    pub level: Option<String>,

    /// Emit JSON lines instead of human-readable output
    pub json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawDisplayConfig {
    /// `strftime` pattern for content dates
    pub date_format: Option<String>,

    /// Placeholder for missing dates
    pub missing_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawAssessmentConfig {
    pub pairing: Option<PairingStrategy>,
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LecternConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub assessment: AssessmentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub date_format: String,
    pub missing_date: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        let dates = DateDisplay::default();
        Self {
            date_format: dates.format,
            missing_date: dates.missing,
        }
    }
}

impl DisplayConfig {
    pub fn date_display(&self) -> DateDisplay {
        DateDisplay {
            format: self.date_format.clone(),
            missing: self.missing_date.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AssessmentConfig {
    /// How completed attempts are matched to starts in history
    pub pairing: PairingStrategy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = LecternConfig::default();
        assert_eq!(config.logging.level, DEFAULT_LOG_LEVEL);
        assert!(!config.logging.json);
        assert_eq!(config.display.date_format, "%d %B %Y");
        assert_eq!(config.display.missing_date, "N/A");
        assert_eq!(config.assessment.pairing, PairingStrategy::Legacy);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = LecternConfig {
            logging: LoggingConfig {
                level: "debug".to_string(),
                json: true,
            },
            display: DisplayConfig {
                date_format: "%Y-%m-%d".to_string(),
                missing_date: "-".to_string(),
            },
            assessment: AssessmentConfig {
                pairing: PairingStrategy::Ordinal,
            },
        };

        let toml_str = toml::to_string(&config).unwrap();
        let parsed: LecternConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.logging.level, "debug");
        assert!(parsed.logging.json);
        assert_eq!(parsed.display.date_format, "%Y-%m-%d");
        assert_eq!(parsed.assessment.pairing, PairingStrategy::Ordinal);
    }

    #[test]
    fn test_raw_config_partial_parsing() {
        let toml_str = r#"
[assessment]
pairing = "ordinal"
"#;
        let raw: RawLecternConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(raw.assessment.pairing, Some(PairingStrategy::Ordinal));
        assert!(raw.logging.level.is_none());
        assert!(raw.display.date_format.is_none());
    }

    #[test]
    fn test_raw_config_rejects_unknown_pairing() {
        let result = toml::from_str::<RawLecternConfig>("[assessment]\npairing = \"latest\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_display_config_builds_date_display() {
        let display = DisplayConfig {
            date_format: "%Y".to_string(),
            missing_date: "never".to_string(),
        };
        let dates = display.date_display();
        assert_eq!(dates.format, "%Y");
        assert_eq!(dates.render(None), "never");
    }
}
