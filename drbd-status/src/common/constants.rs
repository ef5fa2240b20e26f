/// The disk-state (and peer-disk-state) value of a fully synchronised volume.
pub const UP_TO_DATE: &str = "UpToDate";

/// The JSON connection-state of a peer whose role is known.
pub const CONNECTED: &str = "Connected";

/// Everything from this character to the end of a report line is a comment.
pub const COMMENT_MARKER: char = '#';

/// Separates the key from the value in a `key:value` report token.
pub const KEY_VALUE_SEPARATOR: char = ':';

/// Indentation of a resource header line.
pub const RESOURCE_DEPTH: usize = 0;

/// Indentation of local volume lines and peer node header lines.
pub const NODE_DEPTH: usize = 2;

/// Indentation of peer volume lines.
pub const PEER_VOLUME_DEPTH: usize = 4;

/// Lines indented this deep, or deeper, carry verbose statistics which are skipped.
pub const DETAIL_DEPTH: usize = 6;
