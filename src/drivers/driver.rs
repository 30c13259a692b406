use std::error::Error;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

pub type DynFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Power {
    On,
    Off,
    Unknown,
    Unavailable,
}

/// State of a physical fixture as reported by its driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixtureState {
    pub power: Power,
    pub brightness: Option<u8>,
}

impl FixtureState {
    pub const UNKNOWN: FixtureState = FixtureState {
        power: Power::Unknown,
        brightness: None,
    };

    pub fn on(brightness: u8) -> FixtureState {
        FixtureState {
            power: Power::On,
            brightness: Some(brightness),
        }
    }

    pub fn off() -> FixtureState {
        FixtureState {
            power: Power::Off,
            brightness: None,
        }
    }

    pub fn is_on(&self) -> bool {
        self.power == Power::On
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FixtureCommand {
    /// Without brightness the fixture uses whatever level it prefers
    TurnOn {
        brightness: Option<u8>,
        transition: Option<f32>, // Seconds
    },
    TurnOff {
        transition: Option<f32>,
    },
}

impl fmt::Display for FixtureCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixtureCommand::TurnOn { brightness, .. } => match brightness {
                Some(b) => write!(f, "turn_on brightness: {}", b)?,
                None => write!(f, "turn_on")?,
            },
            FixtureCommand::TurnOff { .. } => write!(f, "turn_off")?,
        }
        match self {
            FixtureCommand::TurnOn {
                transition: Some(t),
                ..
            }
            | FixtureCommand::TurnOff {
                transition: Some(t),
            } => write!(f, " transition: {}s", t),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DriverError {
    Unavailable,
    Rejected(String),
}

impl Error for DriverError {}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::Unavailable => write!(f, "Fixture unavailable"),
            DriverError::Rejected(reason) => write!(f, "Command rejected: {}", reason),
        }
    }
}

pub trait FixtureDriver: Send {
    fn entity_id(&self) -> &str;

    /// Last known state of the fixture
    fn state(&self) -> FixtureState;

    fn send(&mut self, cmd: FixtureCommand) -> DynFuture<'_, Result<(), DriverError>>;
}

#[derive(Debug)]
pub enum OpenError {
    NotFound,
    DriverError(String),
}

impl Error for OpenError {}

impl fmt::Display for OpenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpenError::NotFound => write!(f, "Driver not found"),
            OpenError::DriverError(e) => write!(f, "Driver failed to open: {}", e),
        }
    }
}

#[derive(Clone)]
pub struct DriverInfo {
    pub name: String,
    pub description: String,
    pub open: fn(entity_id: &str) -> Result<Box<dyn FixtureDriver>, OpenError>,
}

static DRIVERS: Mutex<Vec<DriverInfo>> = Mutex::new(Vec::new());

/// Register a driver. A driver with the same name is replaced.
pub fn add_driver(info: DriverInfo) {
    if let Ok(mut drivers) = DRIVERS.lock() {
        drivers.retain(|d| d.name != info.name);
        drivers.push(info);
    }
}

pub fn driver_names() -> Vec<String> {
    match DRIVERS.lock() {
        Ok(drivers) => drivers.iter().map(|d| d.name.clone()).collect(),
        Err(_) => Vec::new(),
    }
}

/// Open a fixture using the driver named `name`. Driver names are case
/// insensitive.
pub fn open(name: &str, entity_id: &str) -> Result<Box<dyn FixtureDriver>, OpenError> {
    let open = {
        let drivers = DRIVERS
            .lock()
            .map_err(|e| OpenError::DriverError(e.to_string()))?;
        match drivers.iter().find(|d| d.name.eq_ignore_ascii_case(name)) {
            Some(info) => info.open,
            None => return Err(OpenError::NotFound),
        }
    };
    open(entity_id)
}
