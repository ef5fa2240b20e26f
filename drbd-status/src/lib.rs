//! Parses the report of `drbdsetup status`, in its text or JSON form, into resources with their
//! local volumes, peer nodes and peer volumes, and decides whether a resource has finished
//! synchronising.

/// Contains constants and errors.
pub mod common;
/// Field names of each representation of the report.
pub mod fields;
/// Builds resources from the JSON report.
pub mod json;
/// Resources, volumes and peers.
pub mod model;
/// A parsed report.
pub mod report;
/// Synchronisation checks.
pub mod sync;
/// Builds resources from the text report.
pub mod text;

pub use common::error::{DocumentError, Error, Result};
pub use fields::{FieldMap, Representation};
pub use model::{PeerNode, PeerStatus, PeerVolume, Resource, Role, Volume};
pub use report::StatusReport;
pub use sync::{evaluate, is_synced, PeerFilter, SyncVerdict};
