use cct_mixer as cct;
use cct::mixing::{BrightnessCalculator, Priority, TemperatureCalculator};
use log::error;
use std::process::ExitCode;

extern crate clap;
use clap::{value_parser, Arg, ArgMatches, Command};

fn fixture_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("warm")
            .short('w')
            .long("warm")
            .value_parser(value_parser!(u32).range(1..))
            .default_value("3000")
            .help("Temperature of the warm light in kelvin"),
    )
    .arg(
        Arg::new("cold")
            .short('c')
            .long("cold")
            .value_parser(value_parser!(u32).range(1..))
            .default_value("6000")
            .help("Temperature of the cold light in kelvin"),
    )
}

fn fixture_temperatures(matches: &ArgMatches) -> Option<(u32, u32)> {
    let warm = *matches.get_one::<u32>("warm").unwrap();
    let cold = *matches.get_one::<u32>("cold").unwrap();
    if warm >= cold {
        error!(
            "Warm light temperature ({} K) must be lower than cold light temperature ({} K)",
            warm, cold
        );
        return None;
    }
    Some((warm, cold))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let matches = Command::new("cct_calc")
        .about("Convert between a combined color temperature and the brightness of a warm and a cold light.")
        .subcommand_required(true)
        .subcommand(fixture_args(
            Command::new("brightness")
                .about("Brightness of each light needed for a temperature and brightness")
                .arg(
                    Arg::new("kelvin")
                        .short('k')
                        .long("kelvin")
                        .required(true)
                        .value_parser(value_parser!(u32).range(1..))
                        .help("Target temperature in kelvin"),
                )
                .arg(
                    Arg::new("brightness")
                        .short('b')
                        .long("brightness")
                        .required(true)
                        .value_parser(value_parser!(u8))
                        .help("Target brightness, 0-255"),
                )
                .arg(
                    Arg::new("priority")
                        .short('p')
                        .long("priority")
                        .value_parser(value_parser!(Priority))
                        .default_value("mixed")
                        .help("What to keep when out of range: brightness, temperature or mixed"),
                ),
        ))
        .subcommand(fixture_args(
            Command::new("temperature")
                .about("Combined temperature and brightness of the two lights")
                .arg(
                    Arg::new("warm_brightness")
                        .long("warm-brightness")
                        .required(true)
                        .value_parser(value_parser!(u8))
                        .help("Brightness of the warm light, 0-255"),
                )
                .arg(
                    Arg::new("cold_brightness")
                        .long("cold-brightness")
                        .required(true)
                        .value_parser(value_parser!(u8))
                        .help("Brightness of the cold light, 0-255"),
                ),
        ))
        .get_matches();

    match matches.subcommand() {
        Some(("brightness", sub)) => {
            let Some((warm, cold)) = fixture_temperatures(sub) else {
                return ExitCode::FAILURE;
            };
            let kelvin = *sub.get_one::<u32>("kelvin").unwrap();
            let brightness = *sub.get_one::<u8>("brightness").unwrap();
            let priority = *sub.get_one::<Priority>("priority").unwrap();
            let (w, c) =
                BrightnessCalculator::new(warm, cold, kelvin, brightness, priority)
                    .compute_brightnesses();
            println!("warm={} cold={}", w, c);
        }
        Some(("temperature", sub)) => {
            let Some((warm, cold)) = fixture_temperatures(sub) else {
                return ExitCode::FAILURE;
            };
            let wb = *sub.get_one::<u8>("warm_brightness").unwrap();
            let cb = *sub.get_one::<u8>("cold_brightness").unwrap();
            let calc = TemperatureCalculator::new(wb, warm, cb, cold);
            println!(
                "kelvin={} brightness={}",
                calc.current_temperature(),
                calc.combined_brightness()
            );
        }
        _ => unreachable!("subcommand required"),
    }
    ExitCode::SUCCESS
}
