use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use skycheck::config::SkycheckConfig;
use skycheck::geolocation;
use skycheck::lookup::{LookupService, LookupSession, LookupState};
use skycheck::models::{Observation, TemperatureUnit, WeatherCode, format_temperature};
use skycheck::WeatherApiClient;

/// Look up current weather for a city name or your location
#[derive(Debug, Parser)]
#[command(name = "skycheck", version, about)]
struct Cli {
    /// City to look up; falls back to the configured default city
    city: Option<String>,

    /// Use the system's position instead of a city name
    #[arg(long, conflicts_with = "city")]
    here: bool,

    /// Show the temperature in Fahrenheit
    #[arg(short, long)]
    fahrenheit: bool,

    /// Path to an alternate configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = SkycheckConfig::load_from_path(cli.config.clone())?;
    init_tracing(&config, cli.verbose);

    let unit = if cli.fahrenheit {
        TemperatureUnit::Fahrenheit
    } else {
        config.defaults.unit
    };

    let api = WeatherApiClient::new(config.weather.clone())?;
    let source = geolocation::from_config(&config.location)?;
    let service = LookupService::new(api, source);

    let mut session = LookupSession::new();
    let token = session.begin();

    let outcome = if cli.here {
        service.lookup_device().await
    } else {
        let city = cli.city.as_deref().unwrap_or(&config.defaults.city);
        service.lookup_city(city).await
    };
    session.finish(token, outcome);

    match session.state() {
        LookupState::Success(observation) => {
            render(observation, unit);
            Ok(ExitCode::SUCCESS)
        }
        LookupState::Error(message) => {
            eprintln!("{message}");
            Ok(ExitCode::FAILURE)
        }
        // A finished session is never idle or loading
        LookupState::Idle | LookupState::Loading => Ok(ExitCode::FAILURE),
    }
}

fn render(observation: &Observation, unit: TemperatureUnit) {
    let code = WeatherCode::from_code(observation.conditions.weather_code);

    println!("{}", observation.place.display_name());
    println!("{} {}", code.emoji(), code.label());
    println!(
        "{}",
        format_temperature(observation.conditions.temperature, unit)
    );
    if let Some(observed) = observation.conditions.observed_at() {
        println!("As of {}", observed.format("%Y-%m-%d %H:%M"));
    }
}

fn init_tracing(config: &SkycheckConfig, verbose: bool) {
    let default_level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
