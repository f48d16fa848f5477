use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The first key of a path that could not be resolved
    #[error("Key not found: {0:?}")]
    KeyNotFound(String),

    #[error("Couldn't make request to {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("GitHub answered {url} with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Could not deserialize the response from {url}. Error: {source}")]
    Deserialize {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Expected {what} to be {expected}")]
    UnexpectedShape {
        what: String,
        expected: &'static str,
    },

    #[error("{0} not found")]
    MissingConfiguration(&'static str),
}
