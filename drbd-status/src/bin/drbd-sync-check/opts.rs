use clap::{ArgAction, Parser};
use drbd_status::{PeerFilter, Representation};
use std::path::{Path, PathBuf};
use strum_macros::{AsRefStr, EnumString};

/// The representation of the report to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum Format {
    /// Tell from the first character of the report.
    Auto,
    Text,
    Json,
}

impl Format {
    /// The representation to parse with, None if it should be detected.
    pub(crate) fn representation(self) -> Option<Representation> {
        match self {
            Self::Auto => None,
            Self::Text => Some(Representation::Text),
            Self::Json => Some(Representation::Json),
        }
    }
}

/// What to print for the parsed report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum Output {
    /// Whether each resource has finished synchronising.
    Verdict,
    /// The parsed resources, as JSON.
    Json,
    /// One row per local and peer volume.
    Table,
}

/// These are the supported cli configuration options for the DRBD status check.
#[derive(Parser)]
#[command(name = env!("CARGO_BIN_NAME"), version)]
#[command(
    about = "Checks whether DRBD resources have finished synchronising, from the report of 'drbdsetup status'",
    long_about = None
)]
pub(crate) struct CliArgs {
    /// The file holding the report. Reads from stdin if not set, or if set to '-'.
    #[arg(short, long, env = "DRBD_STATUS_INPUT", value_name = "PATH")]
    input: Option<PathBuf>,

    /// The representation of the report: auto, text or json.
    #[arg(short, long, env = "DRBD_STATUS_FORMAT", default_value = Format::Auto.as_ref())]
    format: Format,

    /// Only look at the resource with this name.
    #[arg(short, long, env = "DRBD_RESOURCE")]
    resource: Option<String>,

    /// Only the volumes of this peer need to be in sync, instead of those of every peer.
    #[arg(short, long, env = "DRBD_PEER")]
    peer: Option<String>,

    /// What to print: verdict, json or table.
    #[arg(short, long, env = "DRBD_STATUS_OUTPUT", default_value = Output::Verdict.as_ref())]
    output: Output,

    /// Use ANSI colours for console messages.
    #[arg(long, action = ArgAction::Set, default_value_t = true)]
    ansi_colours: bool,
}

impl CliArgs {
    /// Parse the command line and the environment.
    pub(crate) fn args() -> Self {
        CliArgs::parse()
    }

    /// This returns the report file, None for stdin.
    pub(crate) fn input(&self) -> Option<&Path> {
        self.input
            .as_deref()
            .filter(|path| path.as_os_str() != "-")
    }

    /// This returns a printable name for where the report is read from.
    pub(crate) fn input_name(&self) -> String {
        match self.input() {
            Some(path) => path.display().to_string(),
            None => "stdin".to_string(),
        }
    }

    /// This returns the representation of the report.
    pub(crate) fn format(&self) -> Format {
        self.format
    }

    /// This returns the name of the resource to look at, if any.
    pub(crate) fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    /// This returns the peers whose volumes must be in sync.
    pub(crate) fn peer_filter(&self) -> PeerFilter {
        PeerFilter::from(self.peer.clone())
    }

    /// This returns what should be printed.
    pub(crate) fn output(&self) -> Output {
        self.output
    }

    /// This returns true if console messages should be coloured.
    pub(crate) fn ansi_colours(&self) -> bool {
        self.ansi_colours
    }
}
