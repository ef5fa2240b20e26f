use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The form in which `drbdsetup status` reported the state of its resources.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Representation {
    /// The indentation-scoped text report.
    Text,
    /// The report of `drbdsetup status --json`.
    Json,
}

impl Representation {
    /// Guess the representation of a report from its first non-blank character.
    pub fn detect(input: &str) -> Self {
        match input.trim_start().chars().next() {
            Some('[') | Some('{') => Self::Json,
            _ => Self::Text,
        }
    }

    /// The field names for this representation.
    pub fn fields(self) -> &'static FieldMap {
        match self {
            Self::Text => &TEXT_FIELDS,
            Self::Json => &JSON_FIELDS,
        }
    }
}

/// Names of the fields which hold each piece of resource state, for one representation. The
/// text report has no nesting keys for its lists, for it those entries are descriptive labels.
#[derive(Debug, PartialEq, Eq)]
pub struct FieldMap {
    pub representation: Representation,
    pub resource_name: &'static str,
    pub resource_role: &'static str,
    pub volumes: &'static str,
    pub volume_index: &'static str,
    pub disk_state: &'static str,
    pub connections: &'static str,
    pub peer_name: &'static str,
    pub peer_role: &'static str,
    pub connection_state: &'static str,
    pub peer_volumes: &'static str,
    pub peer_disk_state: &'static str,
    /// Writes not yet completed by the backing device. Only the JSON report carries this.
    pub pending_writes: Option<&'static str>,
}

/// Field names of the text report.
pub const TEXT_FIELDS: FieldMap = FieldMap {
    representation: Representation::Text,
    resource_name: "name",
    resource_role: "role",
    volumes: "local volumes",
    volume_index: "volume",
    disk_state: "disk",
    connections: "peers",
    peer_name: "name",
    peer_role: "role",
    connection_state: "connection",
    peer_volumes: "peer volumes",
    peer_disk_state: "peer-disk",
    pending_writes: None,
};

/// Field names of the JSON report.
pub const JSON_FIELDS: FieldMap = FieldMap {
    representation: Representation::Json,
    resource_name: "name",
    resource_role: "role",
    volumes: "devices",
    volume_index: "volume",
    disk_state: "disk-state",
    connections: "connections",
    peer_name: "name",
    peer_role: "peer-role",
    connection_state: "connection-state",
    peer_volumes: "peer_devices",
    peer_disk_state: "peer-disk-state",
    pending_writes: Some("lower-pending"),
};
