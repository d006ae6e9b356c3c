use std::error::Error as StdError;
use std::fmt;

/// Error surfaced to callers of the Acadify client. Carries a short
/// user-facing message plus the underlying error when one exists.
#[derive(Debug)]
pub struct AcadifyError {
    pub message: String,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl AcadifyError {
    pub fn new(message: &str) -> Self {
        AcadifyError {
            message: message.to_string(),
            source: None,
        }
    }

    pub fn with_source(
        message: &str,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        AcadifyError {
            message: message.to_string(),
            source: Some(Box::new(source)),
        }
    }
}

impl fmt::Display for AcadifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AcadifyError: {}", self.message)
    }
}

impl StdError for AcadifyError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source.as_ref().map(|err| {
            let err: &(dyn StdError + 'static) = &**err;
            err
        })
    }
}

impl From<reqwest::Error> for AcadifyError {
    fn from(err: reqwest::Error) -> Self {
        AcadifyError::with_source("network request failed", err)
    }
}

impl From<reqwest_middleware::Error> for AcadifyError {
    fn from(err: reqwest_middleware::Error) -> Self {
        AcadifyError::with_source("network request failed", err)
    }
}

impl From<serde_json::Error> for AcadifyError {
    fn from(err: serde_json::Error) -> Self {
        AcadifyError::with_source("unexpected response shape", err)
    }
}

impl From<url::ParseError> for AcadifyError {
    fn from(err: url::ParseError) -> Self {
        AcadifyError::with_source("invalid URL", err)
    }
}

impl From<std::io::Error> for AcadifyError {
    fn from(err: std::io::Error) -> Self {
        AcadifyError::with_source("io error", err)
    }
}
