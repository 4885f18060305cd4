/// floodinfo: prints a flood information view model as JSON
///
/// Usage:
///   floodinfo [--config PATH] [national]
///   floodinfo [--config PATH] station <rloi_id> [downstream]
///   floodinfo [--config PATH] location <place name>

use chrono::Utc;
use std::error::Error;
use std::process;

use floodinfo_service::config::AppConfig;
use floodinfo_service::floods::Floods;
use floodinfo_service::ingest::flood_service::FloodServiceClient;
use floodinfo_service::ingest::geocode;
use floodinfo_service::logging::{self, Component};
use floodinfo_service::model::{FloodFeed, Qualifier, RiverNeighbours};
use floodinfo_service::views::location::{LocationInput, LocationViewModel};
use floodinfo_service::views::national::NationalViewModel;
use floodinfo_service::views::station::{StationInput, StationViewModel};

const DEFAULT_CONFIG_PATH: &str = "floodinfo.toml";

#[derive(Debug, Clone, PartialEq)]
enum Command {
    National,
    Station { rloi_id: i64, qualifier: Qualifier },
    Location(String),
}

#[derive(Debug, Clone, PartialEq)]
struct Args {
    config_path: String,
    command: Command,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut config_path = DEFAULT_CONFIG_PATH.to_string();
    let mut rest: Vec<&str> = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            config_path = iter.next().ok_or("--config needs a path")?.clone();
        } else {
            rest.push(arg.as_str());
        }
    }

    let command = match rest.as_slice() {
        [] | ["national"] => Command::National,
        ["station", id] | ["station", id, "upstream"] => Command::Station {
            rloi_id: parse_rloi_id(id)?,
            qualifier: Qualifier::Upstream,
        },
        ["station", id, "downstream"] => Command::Station {
            rloi_id: parse_rloi_id(id)?,
            qualifier: Qualifier::Downstream,
        },
        ["location", words @ ..] if !words.is_empty() => Command::Location(words.join(" ")),
        _ => return Err(format!("unrecognised arguments: {}", rest.join(" "))),
    };

    Ok(Args { config_path, command })
}

fn parse_rloi_id(id: &str) -> Result<i64, String> {
    id.parse().map_err(|_| format!("station id must be a number, got '{}'", id))
}

fn main() {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&argv) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("✗ {}", e);
            eprintln!("usage: floodinfo [--config PATH] [national | station <id> [downstream] | location <place>]");
            process::exit(2);
        }
    };

    let config = match AppConfig::load(&args.config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ {}", e);
            process::exit(2);
        }
    };

    // validate() has already checked the level parses
    let level = config.log_level().unwrap_or(logging::LogLevel::Info);
    logging::init_logger(level, config.log_file.as_deref(), config.log_file.is_some());

    match run(&config, &args.command) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            logging::error(Component::System, None, &e.to_string());
            process::exit(1);
        }
    }
}

fn run(config: &AppConfig, command: &Command) -> Result<String, Box<dyn Error>> {
    let client = FloodServiceClient::new(&config.flood_service_url, config.http_timeout_secs)?;
    let now = Utc::now();

    match command {
        Command::National => {
            logging::info(
                Component::System,
                None,
                &format!("Fetching national summary from {}", config.flood_service_url),
            );
            let feed = client.fetch_floods()?;
            // The outlook is optional on the page, so a failure only drops it.
            let outlook = client.fetch_outlook().ok();
            let failed = usize::from(outlook.is_none());
            logging::log_fetch_summary(Component::FloodService, 2, 2 - failed, failed);

            let floods = Floods::new(feed)?;
            let view = NationalViewModel::new(&floods, outlook.as_ref(), config.is_production(), now);
            Ok(serde_json::to_string_pretty(&view)?)
        }
        Command::Station { rloi_id, qualifier } => {
            let station = client.fetch_station(*rloi_id, *qualifier)?;
            let telemetry = client.fetch_telemetry(*rloi_id, *qualifier)?;
            let imtd_thresholds = client.fetch_imtd_thresholds(*rloi_id)?;
            let impacts = client.fetch_impacts(*rloi_id)?;
            let nearby = Floods::new(FloodFeed {
                floods: client.fetch_floods_near_station(*rloi_id)?,
                timestamp: None,
            })?;
            let neighbours = RiverNeighbours::default();

            let input = StationInput {
                station: &station,
                telemetry: &telemetry,
                forecast: &[],
                imtd_thresholds: &imtd_thresholds,
                impacts: &impacts,
                nearby_floods: &nearby,
                neighbours: &neighbours,
                tid: None,
            };
            let view = StationViewModel::new(&input, config.stale_after_minutes, now);
            Ok(serde_json::to_string_pretty(&view)?)
        }
        Command::Location(query) => {
            let http = geocode::client(config.http_timeout_secs)?;
            let place = geocode::find_place(&http, &config.geocode_url, query)?
                .ok_or_else(|| format!("No place found for '{}'", query))?;

            let floods = Floods::new(client.fetch_floods_within(place.bbox)?)?;
            let stations = client.fetch_stations_within(place.bbox)?;
            let outlook = client.fetch_outlook().ok();

            let view = LocationViewModel::new(&LocationInput {
                place: &place,
                floods: &floods,
                stations: &stations,
                outlook: outlook.as_ref(),
                is_production: config.is_production(),
            });
            Ok(serde_json::to_string_pretty(&view)?)
        }
    }
}
