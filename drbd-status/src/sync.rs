use crate::{
    common::constants::UP_TO_DATE,
    fields::FieldMap,
    model::{PeerNode, Resource},
};
use serde::Serialize;
use std::fmt::{Display, Formatter};
use tracing::debug;

/// Selects the peer nodes whose volumes must be in sync.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PeerFilter {
    /// Every peer of the resource.
    #[default]
    All,
    /// Only the peer with this name.
    Named(String),
}

impl PeerFilter {
    fn matches(&self, peer: &PeerNode) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => peer.name == *name,
        }
    }
}

impl From<Option<String>> for PeerFilter {
    fn from(peer: Option<String>) -> Self {
        peer.map(Self::Named).unwrap_or_default()
    }
}

impl Display for PeerFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all peers"),
            Self::Named(name) => write!(f, "peer {name}"),
        }
    }
}

/// The outcome of checking whether a resource has finished synchronising. Anything but
/// `Synced` names the first check which failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "kebab-case")]
pub enum SyncVerdict {
    Synced,
    LocalVolumeNotUpToDate {
        volume: Option<String>,
        disk_state: String,
    },
    /// No peer matched the filter, so nothing corroborates the local state.
    NoMatchingPeer { filter: String },
    /// A matching peer reports no volumes at all.
    PeerWithoutVolumes { peer: String },
    PeerVolumeNotUpToDate {
        peer: String,
        volume: Option<String>,
        peer_disk_state: String,
    },
    /// The volume is up to date, but the backing device hasn't completed all writes.
    PendingWrites { volume: Option<String>, pending: u64 },
}

impl SyncVerdict {
    /// True if the resource is fully synchronised.
    pub fn is_synced(&self) -> bool {
        matches!(self, Self::Synced)
    }
}

impl Display for SyncVerdict {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Synced => write!(f, "all volumes are {UP_TO_DATE}"),
            Self::LocalVolumeNotUpToDate { volume, disk_state } => {
                write!(f, "local {} is {disk_state}", VolumeName(volume))
            }
            Self::NoMatchingPeer { filter } => write!(f, "no peer matches {filter}"),
            Self::PeerWithoutVolumes { peer } => write!(f, "peer {peer} reports no volumes"),
            Self::PeerVolumeNotUpToDate {
                peer,
                volume,
                peer_disk_state,
            } => write!(
                f,
                "{} on peer {peer} is {peer_disk_state}",
                VolumeName(volume)
            ),
            Self::PendingWrites { volume, pending } => write!(
                f,
                "local {} has {pending} write(s) pending on the backing device",
                VolumeName(volume)
            ),
        }
    }
}

struct VolumeName<'a>(&'a Option<String>);

impl Display for VolumeName<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(index) => write!(f, "volume {index}"),
            None => write!(f, "volume"),
        }
    }
}

/// Decide whether a resource has finished synchronising. The checks run in order, and the first
/// one to fail decides the verdict:
/// 1. every local volume is up to date,
/// 2. every volume of every peer matching `filter` is up to date, and at least one peer with
///    volumes matches,
/// 3. no local volume has writes pending on its backing device, where the report carries that.
pub fn evaluate(resource: &Resource, fields: &FieldMap, filter: &PeerFilter) -> SyncVerdict {
    let verdict = local_volumes(resource)
        .or_else(|| peer_volumes(resource, filter))
        .or_else(|| pending_writes(resource, fields))
        .unwrap_or(SyncVerdict::Synced);

    if !verdict.is_synced() {
        debug!(
            resource = %resource.name,
            representation = %fields.representation,
            %verdict,
            "Resource is not in sync"
        );
    }
    verdict
}

/// Shorthand for `evaluate(..).is_synced()`.
pub fn is_synced(resource: &Resource, fields: &FieldMap, filter: &PeerFilter) -> bool {
    evaluate(resource, fields, filter).is_synced()
}

fn local_volumes(resource: &Resource) -> Option<SyncVerdict> {
    resource
        .volumes
        .iter()
        .find(|volume| volume.disk_state != UP_TO_DATE)
        .map(|volume| SyncVerdict::LocalVolumeNotUpToDate {
            volume: volume.index.clone(),
            disk_state: volume.disk_state.clone(),
        })
}

fn peer_volumes(resource: &Resource, filter: &PeerFilter) -> Option<SyncVerdict> {
    let mut matched = false;
    for peer in resource.peers.iter().filter(|peer| filter.matches(peer)) {
        matched = true;
        if peer.volumes.is_empty() {
            return Some(SyncVerdict::PeerWithoutVolumes {
                peer: peer.name.clone(),
            });
        }
        if let Some(volume) = peer
            .volumes
            .iter()
            .find(|volume| volume.peer_disk_state != UP_TO_DATE)
        {
            return Some(SyncVerdict::PeerVolumeNotUpToDate {
                peer: peer.name.clone(),
                volume: volume.index.clone(),
                peer_disk_state: volume.peer_disk_state.clone(),
            });
        }
    }

    (!matched).then(|| SyncVerdict::NoMatchingPeer {
        filter: filter.to_string(),
    })
}

fn pending_writes(resource: &Resource, fields: &FieldMap) -> Option<SyncVerdict> {
    // The text report doesn't carry the counter.
    fields.pending_writes?;
    resource.volumes.iter().find_map(|volume| match volume.pending_writes {
        Some(pending) if pending > 0 => Some(SyncVerdict::PendingWrites {
            volume: volume.index.clone(),
            pending,
        }),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        fields::{JSON_FIELDS, TEXT_FIELDS},
        model::{Details, PeerStatus, PeerVolume, Role, Volume},
    };

    fn volume(index: &str, disk_state: &str, pending_writes: Option<u64>) -> Volume {
        Volume {
            index: Some(index.to_string()),
            disk_state: disk_state.to_string(),
            pending_writes,
            details: Details::new(),
        }
    }

    fn peer(name: &str, states: &[&str]) -> PeerNode {
        let mut peer = PeerNode::new(name, PeerStatus::Role("Secondary".to_string()));
        for (index, state) in states.iter().enumerate() {
            peer.volumes.push(PeerVolume {
                index: Some(index.to_string()),
                peer_disk_state: state.to_string(),
                details: Details::new(),
            });
        }
        peer
    }

    /// One resource, two volumes, two peers, everything up to date.
    fn synced(pending_writes: Option<u64>) -> Resource {
        let mut resource = Resource::new("r0", Role::Primary);
        resource.volumes = vec![
            volume("0", UP_TO_DATE, pending_writes),
            volume("1", UP_TO_DATE, pending_writes),
        ];
        resource.peers = vec![
            peer("node2", &[UP_TO_DATE, UP_TO_DATE]),
            peer("node3", &[UP_TO_DATE, UP_TO_DATE]),
        ];
        resource
    }

    #[test]
    fn test_all_up_to_date() {
        assert!(is_synced(&synced(None), &TEXT_FIELDS, &PeerFilter::All));
        assert!(is_synced(&synced(Some(0)), &JSON_FIELDS, &PeerFilter::All));
        assert_eq!(
            evaluate(&synced(Some(0)), &JSON_FIELDS, &PeerFilter::All),
            SyncVerdict::Synced
        );
    }

    #[test]
    fn test_local_volume_fails_first() {
        let mut resource = synced(None);
        resource.volumes[1].disk_state = "Inconsistent".to_string();
        resource.peers[0].volumes[0].peer_disk_state = "Inconsistent".to_string();
        assert_eq!(
            evaluate(&resource, &TEXT_FIELDS, &PeerFilter::All),
            SyncVerdict::LocalVolumeNotUpToDate {
                volume: Some("1".to_string()),
                disk_state: "Inconsistent".to_string(),
            }
        );
    }

    #[test]
    fn test_peer_volume_not_up_to_date() {
        let mut resource = synced(None);
        resource.peers[1].volumes[1].peer_disk_state = "Inconsistent".to_string();
        assert_eq!(
            evaluate(&resource, &TEXT_FIELDS, &PeerFilter::All),
            SyncVerdict::PeerVolumeNotUpToDate {
                peer: "node3".to_string(),
                volume: Some("1".to_string()),
                peer_disk_state: "Inconsistent".to_string(),
            }
        );
        // Only node2 is asked about.
        let node2 = PeerFilter::Named("node2".to_string());
        assert!(is_synced(&resource, &TEXT_FIELDS, &node2));
    }

    #[test]
    fn test_any_single_change_flips_the_verdict() {
        let base = synced(Some(0));
        for index in 0..base.volumes.len() {
            let mut resource = base.clone();
            resource.volumes[index].disk_state = "Outdated".to_string();
            assert!(!is_synced(&resource, &JSON_FIELDS, &PeerFilter::All));
        }
        for peer in 0..base.peers.len() {
            for index in 0..base.peers[peer].volumes.len() {
                let mut resource = base.clone();
                resource.peers[peer].volumes[index].peer_disk_state = "SyncTarget".to_string();
                assert!(!is_synced(&resource, &JSON_FIELDS, &PeerFilter::All));
            }
        }
    }

    #[test]
    fn test_no_local_volumes_is_vacuously_synced() {
        let mut resource = synced(None);
        resource.volumes.clear();
        assert!(is_synced(&resource, &TEXT_FIELDS, &PeerFilter::All));
    }

    #[test]
    fn test_no_peer_evidence_is_not_synced() {
        let mut resource = synced(None);
        let missing = PeerFilter::Named("node9".to_string());
        assert_eq!(
            evaluate(&resource, &TEXT_FIELDS, &missing),
            SyncVerdict::NoMatchingPeer {
                filter: "peer node9".to_string()
            }
        );

        resource.peers[0].volumes.clear();
        assert_eq!(
            evaluate(&resource, &TEXT_FIELDS, &PeerFilter::All),
            SyncVerdict::PeerWithoutVolumes {
                peer: "node2".to_string()
            }
        );

        resource.peers.clear();
        assert!(!is_synced(&resource, &TEXT_FIELDS, &PeerFilter::All));
    }

    #[test]
    fn test_pending_writes_only_count_for_json() {
        let mut resource = synced(Some(0));
        resource.volumes[0].pending_writes = Some(3);
        assert_eq!(
            evaluate(&resource, &JSON_FIELDS, &PeerFilter::All),
            SyncVerdict::PendingWrites {
                volume: Some("0".to_string()),
                pending: 3
            }
        );
        assert!(is_synced(&resource, &TEXT_FIELDS, &PeerFilter::All));
    }

    #[test]
    fn test_peer_filter_from_option() {
        assert_eq!(PeerFilter::from(None::<String>), PeerFilter::All);
        assert_eq!(
            PeerFilter::from(Some("node2".to_string())),
            PeerFilter::Named("node2".to_string())
        );
    }

    #[test]
    fn test_verdict_display() {
        let verdict = SyncVerdict::PeerVolumeNotUpToDate {
            peer: "node2".to_string(),
            volume: None,
            peer_disk_state: "Inconsistent".to_string(),
        };
        assert_eq!(verdict.to_string(), "volume on peer node2 is Inconsistent");
        assert_eq!(
            SyncVerdict::PendingWrites {
                volume: Some("1".to_string()),
                pending: 2
            }
            .to_string(),
            "local volume 1 has 2 write(s) pending on the backing device"
        );
    }
}
