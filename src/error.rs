use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("no URL configured for {0}")]
    NotConfigured(&'static str),

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("timed out after {0}s")]
    Timeout(u64),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("unexpected content type '{0}'")]
    ContentType(String),

    #[error("empty response body")]
    EmptyBody,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("document has no rows")]
    EmptyDocument,

    #[error("header row has no '{marker}' anchor")]
    MissingAnchor { marker: String },
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("fetch: {0}")]
    Fetch(#[from] FetchError),

    #[error("parse: {0}")]
    Parse(#[from] ParseError),

    #[error("read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
