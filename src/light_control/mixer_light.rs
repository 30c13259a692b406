use crate::config::MixerConfig;
use crate::drivers::driver::{DriverError, FixtureCommand, FixtureDriver};
use crate::error::ConfigError;
use crate::light_control::group_state::GroupState;
use crate::light_control::restore::RestoreState;
use crate::mixing::brightness::{BrightnessCalculator, Priority};
use log::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TurnOnRequest {
    pub brightness: Option<u8>,
    pub color_temp_kelvin: Option<u32>,
    pub transition: Option<f32>, // Seconds, forwarded to both fixtures
}

/// Commands for the warm and the cold fixture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixtureCommands {
    pub warm: FixtureCommand,
    pub cold: FixtureCommand,
}

/// A virtual light with adjustable color temperature, made from a warm and
/// a cold fixture.
pub struct MixerLight {
    config: MixerConfig,
    warm: Box<dyn FixtureDriver>,
    cold: Box<dyn FixtureDriver>,
    state: GroupState,
    previous_turn_on_state: RestoreState,
}

impl MixerLight {
    pub fn new(
        config: MixerConfig,
        warm: Box<dyn FixtureDriver>,
        cold: Box<dyn FixtureDriver>,
    ) -> Result<MixerLight, ConfigError> {
        config.validate()?;
        let mut light = MixerLight {
            config,
            warm,
            cold,
            state: GroupState::default(),
            previous_turn_on_state: RestoreState::default(),
        };
        light.refresh();
        Ok(light)
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &MixerConfig {
        &self.config
    }

    /// Use a state saved by an earlier instance
    pub fn restore(&mut self, state: RestoreState) {
        debug!("{}: restoring previous_turn_on_state: {:?}", self.name(), state);
        self.previous_turn_on_state = state;
    }

    /// The state to persist. Updated every time the light is turned off.
    pub fn restore_state(&self) -> RestoreState {
        self.previous_turn_on_state
    }

    pub fn state(&self) -> GroupState {
        self.state
    }

    /// Recalculate the group state from the fixtures
    pub fn refresh(&mut self) -> GroupState {
        self.state = GroupState::from_fixtures(
            &self.warm.state(),
            &self.cold.state(),
            self.config.min_color_temp_kelvin(),
            self.config.max_color_temp_kelvin(),
        );
        self.state
    }

    /// Work out what each fixture needs to do for a turn on request.
    ///
    /// Values missing from the request are taken from the current state,
    /// then from the restore state. The value given in the request is the
    /// one that is kept if both can't be reached.
    pub fn plan_turn_on(&self, req: &TurnOnRequest) -> FixtureCommands {
        let (mut target_brightness, mut target_kelvin, priority) =
            match (req.brightness, req.color_temp_kelvin) {
                (None, None) => (
                    self.state.brightness,
                    self.state.color_temp_kelvin,
                    Priority::Mixed,
                ),
                (None, Some(kelvin)) => (
                    self.state.brightness,
                    Some(kelvin),
                    Priority::Temperature,
                ),
                (Some(brightness), None) => (
                    Some(brightness),
                    self.state.color_temp_kelvin,
                    Priority::Brightness,
                ),
                (Some(brightness), Some(kelvin)) => {
                    (Some(brightness), Some(kelvin), Priority::Mixed)
                }
            };

        if target_brightness.is_none() {
            target_brightness = self.previous_turn_on_state.brightness;
            debug!(
                "{}: using previous brightness: {:?}",
                self.name(),
                target_brightness
            );
        }
        if target_kelvin.is_none() {
            target_kelvin = self.previous_turn_on_state.color_temp_kelvin;
            debug!(
                "{}: using previous temperature: {:?}",
                self.name(),
                target_kelvin
            );
        }

        let (target_brightness, target_kelvin) = match (target_brightness, target_kelvin) {
            (Some(b), Some(k)) => (b, k),
            _ => {
                debug!(
                    "{}: no restored state available, turning on each light to its default state",
                    self.name()
                );
                let cmd = FixtureCommand::TurnOn {
                    brightness: None,
                    transition: req.transition,
                };
                return FixtureCommands {
                    warm: cmd,
                    cold: cmd,
                };
            }
        };

        let warm_kelvin = self.config.min_color_temp_kelvin();
        let cold_kelvin = self.config.max_color_temp_kelvin();
        let target_kelvin = target_kelvin.clamp(warm_kelvin, cold_kelvin);
        let (warm_brightness, cold_brightness) = BrightnessCalculator::new(
            warm_kelvin,
            cold_kelvin,
            target_kelvin,
            target_brightness,
            priority,
        )
        .compute_brightnesses();

        FixtureCommands {
            warm: FixtureCommand::TurnOn {
                brightness: Some(warm_brightness),
                transition: req.transition,
            },
            cold: FixtureCommand::TurnOn {
                brightness: Some(cold_brightness),
                transition: req.transition,
            },
        }
    }

    pub async fn turn_on(&mut self, req: TurnOnRequest) -> Result<(), DriverError> {
        debug!("{}: turn on with params: {:?}", self.name(), req);
        let cmds = self.plan_turn_on(&req);
        self.send(cmds).await
    }

    pub async fn turn_off(&mut self, transition: Option<f32>) -> Result<(), DriverError> {
        self.refresh();
        self.save_turn_on_state();
        debug!("{}: invoking turn_off for the light group", self.name());
        let cmd = FixtureCommand::TurnOff { transition };
        self.send(FixtureCommands {
            warm: cmd,
            cold: cmd,
        })
        .await
    }

    fn save_turn_on_state(&mut self) {
        // Only a complete state is worth keeping
        if let (Some(brightness), Some(kelvin)) =
            (self.state.brightness, self.state.color_temp_kelvin)
        {
            debug!("{}: saving turn on state", self.name());
            self.previous_turn_on_state = RestoreState::new(brightness, kelvin);
        }
    }

    // Both fixtures get their command even if the other one fails
    async fn send(&mut self, cmds: FixtureCommands) -> Result<(), DriverError> {
        debug!(
            "{}: forward {} to {}, {} to {}",
            self.config.name,
            cmds.warm,
            self.warm.entity_id(),
            cmds.cold,
            self.cold.entity_id()
        );
        let (warm_res, cold_res) =
            futures::join!(self.warm.send(cmds.warm), self.cold.send(cmds.cold));
        let results = [
            (&warm_res, &self.config.warm_light),
            (&cold_res, &self.config.cold_light),
        ];
        for (res, light) in results {
            if let Err(e) = res {
                warn!("{}: {} failed: {}", self.config.name, light.entity_id, e);
            }
        }
        self.refresh();
        warm_res.and(cold_res)
    }
}
