use crate::{
    common::constants::{
        COMMENT_MARKER, DETAIL_DEPTH, NODE_DEPTH, PEER_VOLUME_DEPTH, RESOURCE_DEPTH,
    },
    fields::TEXT_FIELDS,
    model::key_values,
};

/// The structural role of one line of the text report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Blank, whitespace or comment only.
    Empty,
    /// `<name> role:<Role> ...` at depth 0.
    ResourceHeader,
    /// `volume:<idx> disk:<State> ...` or `disk:<State>` at depth 2.
    LocalVolume,
    /// `<peer> role:<Role> ...` or `<peer> connection:<State> ...` at depth 2.
    PeerNodeHeader,
    /// `volume:<idx> peer-disk:<State> ...` at depth 4.
    PeerVolume,
    /// Verbose statistics, indented deeper than peer volumes.
    Detail,
    /// Anything else.
    Unrecognized,
}

/// A report line with its role, and its content stripped of indentation and comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedLine<'a> {
    pub kind: LineKind,
    pub content: &'a str,
}

/// Classify one line of the text report from its indentation depth and the keys it carries.
pub fn classify(line: &str) -> ClassifiedLine<'_> {
    let uncommented = match line.find(COMMENT_MARKER) {
        Some(at) => &line[..at],
        None => line,
    };
    let content = uncommented.trim();
    if content.is_empty() {
        return ClassifiedLine {
            kind: LineKind::Empty,
            content,
        };
    }

    let depth = uncommented
        .chars()
        .take_while(|c| c.is_whitespace())
        .count();
    let kind = match depth {
        RESOURCE_DEPTH => LineKind::ResourceHeader,
        NODE_DEPTH => node_kind(content),
        PEER_VOLUME_DEPTH if has_key(content, TEXT_FIELDS.peer_disk_state) => {
            LineKind::PeerVolume
        }
        depth if depth >= DETAIL_DEPTH => LineKind::Detail,
        _ => LineKind::Unrecognized,
    };

    ClassifiedLine { kind, content }
}

/// Depth 2 is shared by peer node headers and local volumes, the keys tell them apart.
fn node_kind(content: &str) -> LineKind {
    if has_key(content, TEXT_FIELDS.peer_role) || has_key(content, TEXT_FIELDS.connection_state)
    {
        LineKind::PeerNodeHeader
    } else if has_key(content, TEXT_FIELDS.disk_state) {
        LineKind::LocalVolume
    } else {
        LineKind::Unrecognized
    }
}

fn has_key(content: &str, key: &str) -> bool {
    key_values(content).any(|(k, _)| k == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(line: &str) -> LineKind {
        classify(line).kind
    }

    #[test]
    fn test_empty_lines() {
        assert_eq!(kind(""), LineKind::Empty);
        assert_eq!(kind("    "), LineKind::Empty);
        assert_eq!(kind("\t"), LineKind::Empty);
        assert_eq!(kind("  # volume:0 disk:UpToDate"), LineKind::Empty);
    }

    #[test]
    fn test_depth_and_keys() {
        assert_eq!(kind("r0 role:Primary"), LineKind::ResourceHeader);
        assert_eq!(kind("r0"), LineKind::ResourceHeader);
        assert_eq!(kind("  disk:UpToDate"), LineKind::LocalVolume);
        assert_eq!(kind("  volume:1 disk:Inconsistent"), LineKind::LocalVolume);
        assert_eq!(kind("  node2 role:Secondary"), LineKind::PeerNodeHeader);
        assert_eq!(kind("  node3 connection:Connecting"), LineKind::PeerNodeHeader);
        assert_eq!(
            kind("    volume:0 replication:Established peer-disk:UpToDate"),
            LineKind::PeerVolume
        );
    }

    #[test]
    fn test_peer_disk_is_not_disk() {
        // 'peer-disk' at depth 2 must not pass for a local volume.
        assert_eq!(kind("  volume:0 peer-disk:UpToDate"), LineKind::Unrecognized);
        assert_eq!(kind("    volume:0 disk:UpToDate"), LineKind::Unrecognized);
    }

    #[test]
    fn test_verbose_details_are_benign() {
        assert_eq!(
            kind("      received:0 sent:0 out-of-sync:0 pending:0 unacked:0"),
            LineKind::Detail
        );
        assert_eq!(kind("        resync-suspended:no"), LineKind::Detail);
    }

    #[test]
    fn test_unrecognized() {
        assert_eq!(kind("  suspended:no"), LineKind::Unrecognized);
        assert_eq!(kind(" r0 role:Primary"), LineKind::Unrecognized);
        assert_eq!(kind("   disk:UpToDate"), LineKind::Unrecognized);
        assert_eq!(kind("    size:1024"), LineKind::Unrecognized);
    }

    #[test]
    fn test_tab_is_one_indent_character() {
        assert_eq!(kind("\tdisk:UpToDate"), LineKind::Unrecognized);
        assert_eq!(kind("\t\tdisk:UpToDate"), LineKind::LocalVolume);
        assert_eq!(kind("\t\t\t\tvolume:0 peer-disk:UpToDate"), LineKind::PeerVolume);
    }

    #[test]
    fn test_comment_is_stripped() {
        let line = classify("  node2 role:Secondary # the standby");
        assert_eq!(line.kind, LineKind::PeerNodeHeader);
        assert_eq!(line.content, "node2 role:Secondary");
    }
}
