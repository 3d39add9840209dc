use config::{ConfigError, Environment, File, FileFormat};
use fraud_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    pub log: LogSettings,
    #[serde(default)]
    pub engine: EngineConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogSettings {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl Settings {
    /// Defaults, then the optional TOML file, then `FRAUD_ENGINE__*` variables
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("log.level", "info")?
            .set_default("log.format", "text")?;

        if let Some(path) = file {
            let name = path.to_str().ok_or_else(|| {
                ConfigError::Message(format!("config path {} is not UTF-8", path.display()))
            })?;
            builder = builder.add_source(File::new(name, FileFormat::Toml).required(true));
        }

        builder = builder.add_source(Environment::with_prefix("FRAUD_ENGINE").separator("__"));

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.log.format, LogFormat::Text);
        assert_eq!(settings.engine, EngineConfig::default());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[log]\nlevel = \"debug\"\nformat = \"json\"\n\n[engine]\nlocal_offset_minutes = 330"
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.log.level, "debug");
        assert_eq!(settings.log.format, LogFormat::Json);
        assert_eq!(settings.engine.local_offset_minutes, Some(330));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Settings::load(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
