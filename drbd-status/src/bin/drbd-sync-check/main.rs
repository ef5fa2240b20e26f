use crate::opts::{CliArgs, Output};
use anyhow::Context;
use drbd_status::{PeerFilter, PeerStatus, StatusReport};
use std::{fs, io::Read, path::Path};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod opts;

/// Exit code for when every selected resource has finished synchronising.
const EXIT_SYNCED: i32 = 0;
/// Exit code for when the report can't be read or parsed.
const EXIT_FAILURE: i32 = 1;
/// Exit code for when at least one selected resource is still synchronising.
const EXIT_NOT_SYNCED: i32 = 2;
/// Exit code for when the selected resource isn't in the report.
const EXIT_RESOURCE_NOT_FOUND: i32 = 3;

fn main() {
    let args = CliArgs::args();
    init_logging();

    let code = run(&args).unwrap_or_else(|error| {
        error!(?error, "Failed to check DRBD status");
        eprintln!("{error:#}");
        EXIT_FAILURE
    });
    std::process::exit(code);
}

/// Initialize logging components -- tracing. Logs go to stderr, stdout carries the results.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &CliArgs) -> anyhow::Result<i32> {
    let input = read_input(args.input())
        .with_context(|| format!("failed to read status report from {}", args.input_name()))?;
    let mut report = StatusReport::parse(&input, args.format().representation())
        .with_context(|| format!("failed to parse status report from {}", args.input_name()))?;
    info!(
        representation = %report.representation(),
        resources = report.resources().len(),
        "Parsed status report"
    );

    if let Some(name) = args.resource() {
        if report.resource(name).is_none() {
            console_logger::warn(
                "Resource not found in the status report:",
                name,
                args.ansi_colours(),
            );
            return Ok(EXIT_RESOURCE_NOT_FOUND);
        }
        report.retain_resource(name);
    }

    match args.output() {
        Output::Verdict => Ok(print_verdicts(
            &report,
            &args.peer_filter(),
            args.ansi_colours(),
        )),
        Output::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(EXIT_SYNCED)
        }
        Output::Table => {
            print_table(&report);
            Ok(EXIT_SYNCED)
        }
    }
}

fn read_input(path: Option<&Path>) -> std::io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

/// Print the verdict of every resource, and return the exit code they add up to.
fn print_verdicts(report: &StatusReport, filter: &PeerFilter, colours: bool) -> i32 {
    if report.resources().is_empty() {
        console_logger::info("No resources in the status report", colours);
        return EXIT_NOT_SYNCED;
    }

    let mut code = EXIT_SYNCED;
    for resource in report.resources() {
        let verdict = report.verdict(resource, filter);
        if verdict.is_synced() {
            console_logger::synced(&resource.name, &verdict.to_string(), colours);
        } else {
            console_logger::not_synced(&resource.name, &verdict.to_string(), colours);
            code = EXIT_NOT_SYNCED;
        }
    }
    code
}

fn print_table(report: &StatusReport) {
    let row = |resource: &str, node: &str, status: &str, volume: &Option<String>, state: &str| {
        println!(
            "{resource:<20} {node:<20} {status:<24} {:<7} {state}",
            volume.as_deref().unwrap_or("-")
        );
    };

    row("RESOURCE", "NODE", "ROLE/CONNECTION", &Some("VOLUME".to_string()), "STATE");
    for resource in report.resources() {
        let role = resource.role.to_string();
        for volume in &resource.volumes {
            row(&resource.name, "(local)", &role, &volume.index, &volume.disk_state);
        }
        for peer in &resource.peers {
            let status = match &peer.status {
                PeerStatus::Role(role) => role.clone(),
                PeerStatus::Connection(state) => state.clone(),
            };
            if peer.volumes.is_empty() {
                row(&resource.name, &peer.name, &status, &None, "-");
            }
            for volume in &peer.volumes {
                row(&resource.name, &peer.name, &status, &volume.index, &volume.peer_disk_state);
            }
        }
    }
}
