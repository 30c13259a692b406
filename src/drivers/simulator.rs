use crate::drivers::driver::{
    DriverError, DriverInfo, DynFuture, FixtureCommand, FixtureDriver, FixtureState, OpenError,
    Power,
};
use log::debug;
use std::future;
use std::sync::{Arc, Mutex};

const DEFAULT_LEVEL: u8 = 255;

struct SimFixtureCtxt {
    power: Power,
    level: u8,
    // Used when turned on without a brightness
    last_level: u8,
    commands: Vec<FixtureCommand>,
}

/// In-memory fixture. Starts off at full level.
pub struct SimFixture {
    entity_id: String,
    ctxt: Arc<Mutex<SimFixtureCtxt>>,
}

/// Shares the state of a `SimFixture` after the fixture has been handed
/// over to a controller.
#[derive(Clone)]
pub struct SimHandle {
    ctxt: Arc<Mutex<SimFixtureCtxt>>,
}

impl SimFixture {
    pub fn new(entity_id: &str) -> SimFixture {
        SimFixture {
            entity_id: entity_id.to_string(),
            ctxt: Arc::new(Mutex::new(SimFixtureCtxt {
                power: Power::Off,
                level: 0,
                last_level: DEFAULT_LEVEL,
                commands: Vec::new(),
            })),
        }
    }

    pub fn handle(&self) -> SimHandle {
        SimHandle {
            ctxt: self.ctxt.clone(),
        }
    }
}

impl SimHandle {
    pub fn state(&self) -> FixtureState {
        match self.ctxt.lock() {
            Ok(ctxt) => state_of(&ctxt),
            Err(_) => FixtureState::UNKNOWN,
        }
    }

    pub fn set_power(&self, power: Power) {
        if let Ok(mut ctxt) = self.ctxt.lock() {
            ctxt.power = power;
        }
    }

    pub fn set_level(&self, level: u8) {
        if let Ok(mut ctxt) = self.ctxt.lock() {
            apply_level(&mut ctxt, level);
        }
    }

    /// Every command received so far, oldest first. The log is kept until
    /// `take_commands` is called.
    pub fn commands(&self) -> Vec<FixtureCommand> {
        match self.ctxt.lock() {
            Ok(ctxt) => ctxt.commands.clone(),
            Err(_) => Vec::new(),
        }
    }

    /// Like `commands`, but also empties the log
    pub fn take_commands(&self) -> Vec<FixtureCommand> {
        match self.ctxt.lock() {
            Ok(mut ctxt) => std::mem::take(&mut ctxt.commands),
            Err(_) => Vec::new(),
        }
    }
}

fn state_of(ctxt: &SimFixtureCtxt) -> FixtureState {
    match ctxt.power {
        Power::On => FixtureState::on(ctxt.level),
        power => FixtureState {
            power,
            brightness: None,
        },
    }
}

fn apply_level(ctxt: &mut SimFixtureCtxt, level: u8) {
    if level == 0 {
        ctxt.power = Power::Off;
        ctxt.level = 0;
    } else {
        ctxt.power = Power::On;
        ctxt.level = level;
        ctxt.last_level = level;
    }
}

impl FixtureDriver for SimFixture {
    fn entity_id(&self) -> &str {
        &self.entity_id
    }

    fn state(&self) -> FixtureState {
        match self.ctxt.lock() {
            Ok(ctxt) => state_of(&ctxt),
            Err(_) => FixtureState::UNKNOWN,
        }
    }

    fn send(&mut self, cmd: FixtureCommand) -> DynFuture<'_, Result<(), DriverError>> {
        let res = match self.ctxt.lock() {
            Ok(mut ctxt) => {
                if ctxt.power == Power::Unavailable {
                    Err(DriverError::Unavailable)
                } else {
                    ctxt.commands.push(cmd);
                    match cmd {
                        FixtureCommand::TurnOn {
                            brightness: Some(level),
                            ..
                        } => apply_level(&mut ctxt, level),
                        FixtureCommand::TurnOn {
                            brightness: None, ..
                        } => {
                            let level = ctxt.last_level;
                            apply_level(&mut ctxt, level)
                        }
                        FixtureCommand::TurnOff { .. } => {
                            ctxt.power = Power::Off;
                            ctxt.level = 0;
                        }
                    }
                    debug!("{}: {} -> {:?}", self.entity_id, cmd, state_of(&ctxt));
                    Ok(())
                }
            }
            Err(e) => Err(DriverError::Rejected(e.to_string())),
        };
        Box::pin(future::ready(res))
    }
}

fn driver_open(entity_id: &str) -> Result<Box<dyn FixtureDriver>, OpenError> {
    Ok(Box::new(SimFixture::new(entity_id)))
}

pub fn driver_info() -> DriverInfo {
    DriverInfo {
        name: "SIMULATOR".to_string(),
        description: "Simulated fixture. Keeps its state in memory.".to_string(),
        open: driver_open,
    }
}
