use snafu::Snafu;

/// Errors raised while turning a status report into resources. Both kinds are terminal for the
/// report being parsed, no partial list of resources is handed back.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[snafu(context(suffix(false)))]
pub enum Error {
    /// Error for when a line of the text report does not fit its indentation depth, or appears
    /// where no resource or peer node is open to receive it.
    #[snafu(display(
        "Malformed status report line {}: '{}' (after {} line(s), last: {:?})",
        line_number,
        line,
        seen.len(),
        seen.last()
    ))]
    MalformedReportLine {
        line_number: usize,
        line: String,
        seen: Vec<String>,
    },

    /// Error for when a JSON status document can't be decoded, or lacks the fields a resource
    /// needs.
    #[snafu(display("Malformed status document: {}", source))]
    MalformedDocument { source: DocumentError },
}

/// Reasons a JSON status document is rejected.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[snafu(context(suffix(false)))]
pub enum DocumentError {
    /// Error for when the input is not valid JSON.
    #[snafu(display("Failed to decode JSON: {}", source))]
    Decode { source: serde_json::Error },

    /// Error for when the top-level value is neither an array nor a single resource object.
    #[snafu(display("Expected an array of resources, found {}", found))]
    NotAnArray { found: String },

    /// Error for when a required field is absent.
    #[snafu(display("Missing field '{}' at {}", field, path))]
    MissingField { path: String, field: String },

    /// Error for when a field holds a value of an unexpected JSON type.
    #[snafu(display("Field '{}' at {} is not {}", field, path, expected))]
    WrongType {
        path: String,
        field: String,
        expected: String,
    },
}

impl From<DocumentError> for Error {
    fn from(source: DocumentError) -> Self {
        Self::MalformedDocument { source }
    }
}

impl Error {
    /// The raw report line which failed to parse, if this is a text report error.
    pub fn line(&self) -> Option<&str> {
        match self {
            Self::MalformedReportLine { line, .. } => Some(line.as_str()),
            Self::MalformedDocument { .. } => None,
        }
    }
}

/// A wrapper type to remove repeated Result<T, Error> returns.
pub type Result<T, E = Error> = std::result::Result<T, E>;
