use cointrend_core::SourceFailure;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    /// Network or TLS failure, timeout, or non-2xx status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The upstream API answered but reported an error in its body.
    #[error("{provider} API error: {message}")]
    Api {
        provider: &'static str,
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} credentials are not configured")]
    MissingCredentials(&'static str),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

impl SourceError {
    /// Whether the table was delivered but unreadable, as opposed to not
    /// delivered at all.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        match self {
            Self::Deserialize { .. } => true,
            Self::Csv { source, .. } => !matches!(source.kind(), csv::ErrorKind::Io(_)),
            Self::Http(_)
            | Self::Api { .. }
            | Self::MissingCredentials(_)
            | Self::InvalidBaseUrl { .. }
            | Self::Io { .. } => false,
        }
    }
}

impl From<SourceError> for SourceFailure {
    fn from(err: SourceError) -> Self {
        if err.is_malformed() {
            SourceFailure::Malformed(err.to_string())
        } else {
            SourceFailure::Unavailable(err.to_string())
        }
    }
}
