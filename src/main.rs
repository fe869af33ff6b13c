#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_errors_doc)]

mod epgsieve_error;
mod model;
mod processing;
mod repository;
mod utils;

use crate::model::Config;
use crate::processing::processor::playlist;
use crate::utils::request::{create_client, sanitize_sensitive_info};
use crate::utils::{init_logger, read_config_file};
use chrono::{DateTime, Utc};
use clap::Parser;
use log::{error, info};

#[derive(Parser)]
#[command(name = "epgsieve")]
#[command(version)]
#[command(about = "Playlist driven XMLTV guide filter", long_about = None)]
struct Args {
    /// The config file
    #[arg(short = 'c', long = "config")]
    config_file: Option<String>,

    /// The playlist url
    #[arg(short = 'm', long = "m3u")]
    m3u_url: Option<String>,

    /// The guide region
    #[arg(short = 'r', long = "region")]
    region: Option<String>,

    /// The output file
    #[arg(short = 'o', long = "output")]
    output: Option<String>,

    /// log level
    #[arg(short = 'l', long = "log-level", default_missing_value = "info")]
    log_level: Option<String>,
}

const VERSION: &str = env!("CARGO_PKG_VERSION");
const BUILD_TIMESTAMP: &str = env!("VERGEN_BUILD_TIMESTAMP");

fn main() {
    let args = Args::parse();

    init_logger(args.log_level.as_ref(), args.config_file.as_ref());

    info!("Version: {VERSION}");
    if let Some(bts) = BUILD_TIMESTAMP.to_string().parse::<DateTime<Utc>>().ok().map(|datetime| datetime.format("%Y-%m-%d %H:%M:%S %Z").to_string()) {
        info!("Build time: {bts}");
    }

    let file_config = args.config_file.as_ref().map(|config_file| {
        read_config_file(config_file).unwrap_or_else(|err| exit!("{}", err))
    });
    let config = Config::resolve(args.m3u_url, args.region, args.output, file_config)
        .unwrap_or_else(|err| exit!("{}", err));
    print_info(&config);

    let client = create_client(&config).build().unwrap_or_else(|err| {
        error!("Failed to build client {err}");
        reqwest::blocking::Client::new()
    });

    if let Err(err) = playlist::exec_processing(&client, &config) {
        exit!("{}", err);
    }
}

fn print_info(config: &Config) {
    info!("Current time: {}", chrono::offset::Local::now().format("%Y-%m-%d %H:%M:%S"));
    info!("Playlist url: {}", sanitize_sensitive_info(&config.m3u_url));
    info!("Guide region: {}", config.region);
    info!("Guide url: {}", &config.guide_url);
    info!("Output file: {}", &config.output_path);
}
