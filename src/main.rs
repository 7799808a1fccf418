//! CLI entry point. One interaction per invocation, mirroring the
//! page-load model: load config, run the requested pipeline, print the
//! serialized result.
//!
//! Usage:
//!   facilityos [--state S] [--city C] [--facility F]   dashboard view
//!   facilityos request <project> [facility]            request an update
//!   facilityos tickets [status]                        work-order overlay

use facilityos::services::{dashboard, requests, tickets};
use facilityos::state::{load_config, FilterState};

#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let output = match args.first().map(String::as_str) {
        Some("request") => {
            let Some(project) = args.get(1) else {
                eprintln!("Usage: facilityos request <project> [facility]");
                std::process::exit(2);
            };
            let facility = args.get(2).map(String::as_str);
            let outcome = requests::submit_update_request(&config, project, facility).await;
            serde_json::to_string_pretty(&outcome)
        }
        Some("tickets") => {
            let status = args.get(1).map(String::as_str).unwrap_or("OPEN");
            let result = tickets::fetch_open_tickets(&config, status).await;
            serde_json::to_string_pretty(&result)
        }
        _ => {
            let filters = parse_filters(&args);
            let result = dashboard::build_dashboard(&config, &filters).await;
            serde_json::to_string_pretty(&result)
        }
    };

    match output {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Serialization error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Dashboard filter flags. Unknown flags are ignored rather than fatal.
fn parse_filters(args: &[String]) -> FilterState {
    let mut filters = FilterState::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--state" => {
                if let Some(v) = iter.next() {
                    filters.state = v.clone();
                }
            }
            "--city" => {
                if let Some(v) = iter.next() {
                    filters.city = v.clone();
                }
            }
            "--facility" => {
                if let Some(v) = iter.next() {
                    filters.facility = v.clone();
                }
            }
            _ => {}
        }
    }
    filters
}
