use ::scraper::error::SelectorErrorKind;
use std::path::PathBuf;

/// All errors that can occur while crawling VLR.
#[derive(thiserror::Error, Debug)]
pub enum VlrError {
    /// HTTP request failed (network, DNS, TLS, timeout, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// Server returned a non-success HTTP status code.
    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Failed to read the response body as text.
    #[error("failed to read response body from {url}: {source}")]
    ResponseBody {
        url: String,
        source: reqwest::Error,
    },

    /// A transient failure persisted through every attempt.
    #[error("giving up on {url} after {attempts} attempts: {source}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        source: Box<VlrError>,
    },

    /// The results listing has no usable pagination control.
    #[error("could not determine the last results page from {url}")]
    LastPageUnknown { url: String },

    /// A CSS selector string could not be parsed.
    #[error("invalid CSS selector: {0}")]
    Selector(String),

    /// Reading or writing a local file failed.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A record or seed file could not be (de)serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration file is not valid TOML for [`CrawlerConfig`](crate::CrawlerConfig).
    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A proxy URL was rejected by the HTTP client.
    #[error("invalid proxy {url}: {source}")]
    InvalidProxy {
        url: String,
        source: reqwest::Error,
    },

    /// The HTTP client could not be built.
    #[error("failed to build http client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl VlrError {
    /// Whether retrying the same request may succeed.
    ///
    /// Connection resets, timeouts, send failures and truncated bodies are
    /// transient. Status codes and local errors are not.
    pub fn is_transient(&self) -> bool {
        match self {
            VlrError::Http { source, .. } => {
                source.is_connect() || source.is_timeout() || source.is_request() || source.is_body()
            }
            VlrError::ResponseBody { .. } => true,
            _ => false,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        VlrError::Io {
            path: path.into(),
            source,
        }
    }
}

impl<'a> From<SelectorErrorKind<'a>> for VlrError {
    fn from(err: SelectorErrorKind<'a>) -> Self {
        VlrError::Selector(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, VlrError>;
