use cct::config::MixerConfig;
use cct::drivers::driver::{FixtureDriver, OpenError};
use cct::error::DynResult;
use cct::light_control::mixer_light::{MixerLight, TurnOnRequest};
use cct::light_control::restore::RestoreState;
use cct_mixer as cct;
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

extern crate clap;
use clap::{value_parser, Arg, Command};

async fn read_restore_state(path: &Path) -> RestoreState {
    match tokio::fs::read_to_string(path).await {
        Ok(json) => match RestoreState::from_json(&json) {
            Ok(state) => state,
            Err(e) => {
                warn!("Ignoring invalid restore state in {}: {}", path.display(), e);
                RestoreState::default()
            }
        },
        Err(e) => {
            debug!("No restore state read from {}: {}", path.display(), e);
            RestoreState::default()
        }
    }
}

fn open_fixture(driver: &str, entity_id: &str) -> DynResult<Box<dyn FixtureDriver>> {
    match cct::drivers::open(driver, entity_id) {
        Ok(d) => Ok(d),
        Err(e) => {
            if let OpenError::NotFound = e {
                info!("Available drivers:");
                for name in cct::drivers::driver_names() {
                    info!("  {}", name);
                }
            }
            Err(e.into())
        }
    }
}

fn print_light(light: &MixerLight) {
    let state = light.state();
    let on = match state.is_on {
        Some(true) => "on",
        Some(false) => "off",
        None => "unknown",
    };
    println!("{}: {}", light.name(), on);
    if let Some(brightness) = state.brightness {
        println!("  brightness: {}", brightness);
    }
    if let Some(kelvin) = state.color_temp_kelvin {
        println!("  color_temp_kelvin: {}", kelvin);
    }
}

async fn run(
    config_path: PathBuf,
    state_path: Option<PathBuf>,
    driver: &str,
    cmd: Option<(String, clap::ArgMatches)>,
) -> DynResult<()> {
    let config = MixerConfig::load(&config_path).await?;
    let warm = open_fixture(driver, &config.warm_light.entity_id)?;
    let cold = open_fixture(driver, &config.cold_light.entity_id)?;
    let mut light = MixerLight::new(config, warm, cold)?;

    if let Some(path) = &state_path {
        light.restore(read_restore_state(path).await);
    }

    match cmd {
        Some((name, sub)) if name == "on" => {
            let req = TurnOnRequest {
                brightness: sub.get_one::<u8>("brightness").copied(),
                color_temp_kelvin: sub.get_one::<u32>("kelvin").copied(),
                transition: sub.get_one::<f32>("transition").copied(),
            };
            light.turn_on(req).await?;
        }
        Some((name, sub)) if name == "off" => {
            light.turn_off(sub.get_one::<f32>("transition").copied()).await?;
        }
        _ => {}
    }
    print_light(&light);

    if let Some(path) = &state_path {
        let state = light.restore_state();
        if !state.is_empty() {
            tokio::fs::write(path, state.to_json()?).await?;
            debug!("Saved {:?} to {}", state, path.display());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    if let Err(e) = cct::drivers::init() {
        error!("Failed to initialize fixture drivers: {}", e);
    }
    let transition = Arg::new("transition")
        .short('t')
        .long("transition")
        .value_parser(value_parser!(f32))
        .help("Transition time in seconds");
    let matches = Command::new("mixer_sim")
        .about("Control a warm and a cold light as one light with adjustable temperature.")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("JSON file describing the light pair"),
        )
        .arg(
            Arg::new("state")
                .short('s')
                .long("state")
                .value_parser(value_parser!(PathBuf))
                .help("File keeping the state between runs"),
        )
        .arg(
            Arg::new("driver")
                .short('d')
                .long("driver")
                .default_value("simulator")
                .help("Fixture driver"),
        )
        .subcommand(
            Command::new("on")
                .about("Turn the light on")
                .arg(
                    Arg::new("brightness")
                        .short('b')
                        .long("brightness")
                        .value_parser(value_parser!(u8))
                        .help("Brightness, 0-255"),
                )
                .arg(
                    Arg::new("kelvin")
                        .short('k')
                        .long("kelvin")
                        .value_parser(value_parser!(u32).range(1..))
                        .help("Color temperature in kelvin"),
                )
                .arg(transition.clone()),
        )
        .subcommand(
            Command::new("off")
                .about("Turn the light off")
                .arg(transition),
        )
        .get_matches();

    let config_path = matches.get_one::<PathBuf>("config").unwrap().clone();
    let state_path = matches.get_one::<PathBuf>("state").cloned();
    let driver = matches.get_one::<String>("driver").unwrap();
    let cmd = matches
        .subcommand()
        .map(|(name, sub)| (name.to_string(), sub.clone()));

    match run(config_path, state_path, driver, cmd).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
