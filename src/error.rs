use std::error::Error;
use std::fmt;

pub type DynResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Debug)]
pub enum ConfigError {
    EmptyName,
    NotCapitalized(String),
    ZeroTemperature { entity_id: String },
    // Warm fixture must be strictly colder than the cold fixture
    TemperatureOrder { warm_kelvin: u32, cold_kelvin: u32 },
    // Too close to tell apart once converted to whole mireds
    SameMired { warm_kelvin: u32, cold_kelvin: u32, mired: u32 },
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyName => write!(f, "Name is empty"),
            ConfigError::NotCapitalized(name) => {
                write!(f, "Name must start with a capital letter: \"{}\"", name)
            }
            ConfigError::ZeroTemperature { entity_id } => {
                write!(f, "Temperature of {} must be positive", entity_id)
            }
            ConfigError::TemperatureOrder {
                warm_kelvin,
                cold_kelvin,
            } => write!(
                f,
                "Warm light temperature ({} K) must be lower than cold light temperature ({} K)",
                warm_kelvin, cold_kelvin
            ),
            ConfigError::SameMired {
                warm_kelvin,
                cold_kelvin,
                mired,
            } => write!(
                f,
                "Warm light temperature ({} K) and cold light temperature ({} K) are both {} mired",
                warm_kelvin, cold_kelvin, mired
            ),
            ConfigError::Io(e) => write!(f, "Failed to read configuration: {}", e),
            ConfigError::Parse(e) => write!(f, "Invalid configuration: {}", e),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}
