use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum_macros::{AsRefStr, Display};

/// Extra `key:value` pairs of a report entry which the checks don't look at. These are passed
/// through as they were reported.
pub type Details = BTreeMap<String, String>;

/// Role of the local node for a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display)]
pub enum Role {
    Primary,
    Secondary,
    Unknown,
}

impl From<&str> for Role {
    fn from(role: &str) -> Self {
        match role {
            "Primary" => Self::Primary,
            "Secondary" => Self::Secondary,
            _ => Self::Unknown,
        }
    }
}

/// A replicated resource, as reported by the local node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub role: Role,
    pub volumes: Vec<Volume>,
    pub peers: Vec<PeerNode>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: Details,
}

impl Resource {
    /// A resource without volumes or peers.
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
            volumes: Vec::new(),
            peers: Vec::new(),
            details: Details::new(),
        }
    }

    /// The peer node with the given name.
    pub fn peer(&self, name: &str) -> Option<&PeerNode> {
        self.peers.iter().find(|peer| peer.name == name)
    }
}

/// A local volume of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    /// Absent for the single volume form of the text report.
    pub index: Option<String>,
    pub disk_state: String,
    /// Writes issued to the backing device which haven't completed yet. JSON reports only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_writes: Option<u64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: Details,
}

/// What the header of a peer node says about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum PeerStatus {
    /// The peer is connected and has this role.
    Role(String),
    /// The peer is not connected, and this is the state of the connection.
    Connection(String),
}

/// A remote node which replicates a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerNode {
    pub name: String,
    pub status: PeerStatus,
    pub volumes: Vec<PeerVolume>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: Details,
}

impl PeerNode {
    /// A peer node without volumes.
    pub fn new(name: impl Into<String>, status: PeerStatus) -> Self {
        Self {
            name: name.into(),
            status,
            volumes: Vec::new(),
            details: Details::new(),
        }
    }
}

/// A volume of a resource, as the local node sees it on a peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerVolume {
    pub index: Option<String>,
    pub peer_disk_state: String,
    /// Replication state, resync progress and the like.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: Details,
}

/// Splits `key:value` tokens of a report line on the first separator. Tokens without one are
/// skipped.
pub(crate) fn key_values(fields: &str) -> impl Iterator<Item = (&str, &str)> {
    fields
        .split_whitespace()
        .filter_map(|token| token.split_once(crate::common::constants::KEY_VALUE_SEPARATOR))
}
