use crate::{
    common::{
        constants::CONNECTED,
        error::{Error, MalformedReportLine, Result},
    },
    fields::TEXT_FIELDS,
    model::{key_values, Details, PeerNode, PeerStatus, PeerVolume, Resource, Role, Volume},
    text::classifier::{classify, LineKind},
};
use tracing::{debug, trace};

/// Assembles resources from the lines of one text report, in report order. Every report gets
/// its own builder.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    /// Sealed resources.
    resources: Vec<Resource>,
    /// The resource whose volumes and peers are being read.
    current: Option<Resource>,
    /// Set while the last peer of the current resource may still receive peer volumes.
    peer_open: bool,
    /// Lines consumed so far.
    seen: Vec<String>,
}

impl TreeBuilder {
    /// Create a builder with no resources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the next line of the report.
    pub fn push_line(&mut self, line: &str) -> Result<()> {
        let classified = classify(line);
        trace!(
            line_number = self.seen.len() + 1,
            kind = ?classified.kind,
            line,
            "Classified report line"
        );

        match classified.kind {
            LineKind::Empty | LineKind::Detail => {}
            LineKind::ResourceHeader => {
                let resource = self.resource_header(classified.content, line)?;
                self.seal();
                self.current = Some(resource);
            }
            LineKind::LocalVolume => {
                let Some(resource) = self.current.as_mut() else {
                    return Err(malformed(&self.seen, line));
                };
                resource.volumes.push(local_volume(classified.content));
                self.peer_open = false;
            }
            LineKind::PeerNodeHeader => {
                let peer = peer_node(classified.content)
                    .ok_or_else(|| malformed(&self.seen, line))?;
                let Some(resource) = self.current.as_mut() else {
                    return Err(malformed(&self.seen, line));
                };
                resource.peers.push(peer);
                self.peer_open = true;
            }
            LineKind::PeerVolume => {
                let peer = match self.current.as_mut() {
                    Some(resource) if self.peer_open => resource.peers.last_mut(),
                    _ => None,
                };
                let Some(peer) = peer else {
                    return Err(malformed(&self.seen, line));
                };
                peer.volumes.push(peer_volume(classified.content));
            }
            LineKind::Unrecognized => return Err(malformed(&self.seen, line)),
        }

        self.seen.push(line.to_string());
        Ok(())
    }

    /// Seal the last resource and hand back everything that was built.
    pub fn finish(mut self) -> Vec<Resource> {
        self.seal();
        self.resources
    }

    fn seal(&mut self) {
        if let Some(resource) = self.current.take() {
            debug!(
                resource = %resource.name,
                volumes = resource.volumes.len(),
                peers = resource.peers.len(),
                "Parsed resource"
            );
            self.resources.push(resource);
        }
        self.peer_open = false;
    }

    fn resource_header(&self, content: &str, line: &str) -> Result<Resource> {
        let (name, fields) = split_name(content).ok_or_else(|| malformed(&self.seen, line))?;
        let mut resource = Resource::new(name, Role::Unknown);
        for (key, value) in key_values(fields) {
            if key == TEXT_FIELDS.resource_role {
                resource.role = Role::from(value);
            } else {
                resource.details.insert(key.to_string(), value.to_string());
            }
        }
        Ok(resource)
    }
}

/// Parse a whole text report.
pub fn parse(report: &str) -> Result<Vec<Resource>> {
    let mut builder = TreeBuilder::new();
    for line in report.lines() {
        builder.push_line(line)?;
    }
    Ok(builder.finish())
}

fn malformed(seen: &[String], line: &str) -> Error {
    MalformedReportLine {
        line_number: seen.len() + 1,
        line,
        seen: seen.to_vec(),
    }
    .build()
}

/// Split the leading name token from the `key:value` tokens which follow it.
fn split_name(content: &str) -> Option<(&str, &str)> {
    let (name, fields) = content
        .split_once(char::is_whitespace)
        .unwrap_or((content, ""));
    if name.contains(crate::common::constants::KEY_VALUE_SEPARATOR) {
        return None;
    }
    Some((name, fields))
}

fn local_volume(content: &str) -> Volume {
    let mut volume = Volume {
        index: None,
        disk_state: String::new(),
        pending_writes: None,
        details: Details::new(),
    };
    for (key, value) in key_values(content) {
        if key == TEXT_FIELDS.volume_index {
            volume.index = Some(value.to_string());
        } else if key == TEXT_FIELDS.disk_state {
            volume.disk_state = value.to_string();
        } else {
            volume.details.insert(key.to_string(), value.to_string());
        }
    }
    volume
}

fn peer_node(content: &str) -> Option<PeerNode> {
    let (name, fields) = split_name(content)?;
    let mut role = None;
    let mut connection = None;
    let mut details = Details::new();
    for (key, value) in key_values(fields) {
        if key == TEXT_FIELDS.peer_role {
            role = role.or(Some(value));
        } else if key == TEXT_FIELDS.connection_state {
            connection = connection.or(Some(value));
        } else {
            details.insert(key.to_string(), value.to_string());
        }
    }

    // A connected peer is known by its role, as in the JSON report.
    let status = match (connection, role) {
        (Some(CONNECTED), Some(role)) | (None, Some(role)) => PeerStatus::Role(role.to_string()),
        (Some(connection), _) => PeerStatus::Connection(connection.to_string()),
        (None, None) => return None,
    };
    let mut peer = PeerNode::new(name, status);
    peer.details = details;
    Some(peer)
}

fn peer_volume(content: &str) -> PeerVolume {
    let mut volume = PeerVolume {
        index: None,
        peer_disk_state: String::new(),
        details: Details::new(),
    };
    for (key, value) in key_values(content) {
        if key == TEXT_FIELDS.volume_index {
            volume.index = Some(value.to_string());
        } else if key == TEXT_FIELDS.peer_disk_state {
            volume.peer_disk_state = value.to_string();
        } else {
            volume.details.insert(key.to_string(), value.to_string());
        }
    }
    volume
}
