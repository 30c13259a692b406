use crate::error::ConfigError;
use crate::mixing::mired::kelvin_to_mired;
use serde_derive::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_WARM_TEMPERATURE: u32 = 3000;
pub const DEFAULT_COLD_TEMPERATURE: u32 = 6000;

/// A fixture of the pair, with its fixed color temperature
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureConfig {
    pub entity_id: String,
    pub temperature_kelvin: u32,
}

// On file the temperatures are optional
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FixtureConfigFile {
    entity_id: String,
    #[serde(default)]
    temperature_kelvin: Option<u32>,
}

impl FixtureConfigFile {
    fn into_config(self, default_kelvin: u32) -> FixtureConfig {
        FixtureConfig {
            entity_id: self.entity_id,
            temperature_kelvin: self.temperature_kelvin.unwrap_or(default_kelvin),
        }
    }
}

impl From<&FixtureConfig> for FixtureConfigFile {
    fn from(c: &FixtureConfig) -> Self {
        FixtureConfigFile {
            entity_id: c.entity_id.clone(),
            temperature_kelvin: Some(c.temperature_kelvin),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MixerConfigFile {
    name: String,
    warm_light: FixtureConfigFile,
    cold_light: FixtureConfigFile,
}

/// Configuration of one virtual light made from a warm and a cold fixture.
#[derive(Debug, Clone, PartialEq)]
pub struct MixerConfig {
    pub name: String,
    pub warm_light: FixtureConfig,
    pub cold_light: FixtureConfig,
}

impl MixerConfig {
    pub fn new(name: &str, warm_light: FixtureConfig, cold_light: FixtureConfig) -> MixerConfig {
        MixerConfig {
            name: name.to_string(),
            warm_light,
            cold_light,
        }
    }

    /// Checks everything the calculators take for granted
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.name.chars().next() {
            None => return Err(ConfigError::EmptyName),
            Some(c) if !c.is_uppercase() => {
                return Err(ConfigError::NotCapitalized(self.name.clone()))
            }
            _ => {}
        }
        for light in [&self.warm_light, &self.cold_light] {
            if light.temperature_kelvin == 0 {
                return Err(ConfigError::ZeroTemperature {
                    entity_id: light.entity_id.clone(),
                });
            }
        }
        if self.warm_light.temperature_kelvin >= self.cold_light.temperature_kelvin {
            return Err(ConfigError::TemperatureOrder {
                warm_kelvin: self.warm_light.temperature_kelvin,
                cold_kelvin: self.cold_light.temperature_kelvin,
            });
        }
        // Mixing is done in whole mireds, close temperatures may share one
        let warm_mired = kelvin_to_mired(self.warm_light.temperature_kelvin);
        let cold_mired = kelvin_to_mired(self.cold_light.temperature_kelvin);
        if warm_mired <= cold_mired {
            return Err(ConfigError::SameMired {
                warm_kelvin: self.warm_light.temperature_kelvin,
                cold_kelvin: self.cold_light.temperature_kelvin,
                mired: warm_mired,
            });
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<MixerConfig, ConfigError> {
        let file: MixerConfigFile = serde_json::from_str(json)?;
        let config = MixerConfig {
            name: file.name,
            warm_light: file.warm_light.into_config(DEFAULT_WARM_TEMPERATURE),
            cold_light: file.cold_light.into_config(DEFAULT_COLD_TEMPERATURE),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        let file = MixerConfigFile {
            name: self.name.clone(),
            warm_light: (&self.warm_light).into(),
            cold_light: (&self.cold_light).into(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    pub async fn load<P: AsRef<Path>>(path: P) -> Result<MixerConfig, ConfigError> {
        let json = tokio::fs::read_to_string(path).await?;
        MixerConfig::from_json(&json)
    }

    pub fn min_color_temp_kelvin(&self) -> u32 {
        self.warm_light.temperature_kelvin
    }

    pub fn max_color_temp_kelvin(&self) -> u32 {
        self.cold_light.temperature_kelvin
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn fixture(entity_id: &str, kelvin: u32) -> FixtureConfig {
        FixtureConfig {
            entity_id: entity_id.to_string(),
            temperature_kelvin: kelvin,
        }
    }

    #[test]
    fn parse_config() {
        let config = MixerConfig::from_json(
            r#"{"name": "Kitchen",
                "warm_light": {"entity_id": "light.warm", "temperature_kelvin": 2700},
                "cold_light": {"entity_id": "light.cold", "temperature_kelvin": 6500}}"#,
        )
        .unwrap();
        assert_eq!(config.name, "Kitchen");
        assert_eq!(config.warm_light, fixture("light.warm", 2700));
        assert_eq!(config.cold_light, fixture("light.cold", 6500));
        assert_eq!(config.min_color_temp_kelvin(), 2700);
        assert_eq!(config.max_color_temp_kelvin(), 6500);
    }

    #[test]
    fn default_temperatures() {
        let config = MixerConfig::from_json(
            r#"{"name": "Kitchen",
                "warm_light": {"entity_id": "light.warm"},
                "cold_light": {"entity_id": "light.cold"}}"#,
        )
        .unwrap();
        assert_eq!(config.min_color_temp_kelvin(), DEFAULT_WARM_TEMPERATURE);
        assert_eq!(config.max_color_temp_kelvin(), DEFAULT_COLD_TEMPERATURE);
    }

    #[test]
    fn json_round_trip() {
        let config = MixerConfig::new(
            "Hall",
            fixture("light.a", 2200),
            fixture("light.b", 4000),
        );
        let parsed = MixerConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn invalid_name() {
        let config = MixerConfig::new("", fixture("a", 3000), fixture("b", 6000));
        assert!(matches!(config.validate(), Err(ConfigError::EmptyName)));
        let config = MixerConfig::new("kitchen", fixture("a", 3000), fixture("b", 6000));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotCapitalized(_))
        ));
    }

    #[test]
    fn invalid_temperatures() {
        let config = MixerConfig::new("Kitchen", fixture("a", 0), fixture("b", 6000));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroTemperature { .. })
        ));
        let config = MixerConfig::new("Kitchen", fixture("a", 6000), fixture("b", 6000));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TemperatureOrder { .. })
        ));
        let config = MixerConfig::new("Kitchen", fixture("a", 6000), fixture("b", 3000));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TemperatureOrder {
                warm_kelvin: 6000,
                cold_kelvin: 3000
            })
        ));
    }

    #[test]
    fn temperatures_with_same_mired() {
        // Both are 166 mired
        let config = MixerConfig::new("Kitchen", fixture("a", 6000), fixture("b", 6001));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SameMired {
                warm_kelvin: 6000,
                cold_kelvin: 6001,
                mired: 166
            })
        ));
        let config = MixerConfig::new("Kitchen", fixture("a", 5988), fixture("b", 6001));
        assert!(config.validate().is_ok());
        // 0 mired is still below any warm fixture
        let config = MixerConfig::new("Kitchen", fixture("a", 3000), fixture("b", 2_000_000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            MixerConfig::from_json("{\"name\": \"Kitchen\"}"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            MixerConfig::from_json(
                r#"{"name": "Kitchen",
                    "warm_light": {"entity_id": "a", "temperature_kelvin": 7000},
                    "cold_light": {"entity_id": "b"}}"#
            ),
            Err(ConfigError::TemperatureOrder { .. })
        ));
    }

    #[tokio::test]
    async fn load_missing_file() {
        let res = MixerConfig::load("/nonexistent/mixer.json").await;
        assert!(matches!(res, Err(ConfigError::Io(_))));
    }
}
