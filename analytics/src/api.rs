use async_trait::async_trait;
use serde_json::Value;
use strum_macros::{Display, EnumString};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InputData(String),
    // the only reason of `reqwest` dependency..
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Malformed payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Query parameters of one GET request, in wire order.
pub type Query = Vec<(String, String)>;

/// One response exactly as the provider returned it: the status code, the
/// decoded JSON body and the raw `Link` header when present. Deciding what a
/// status or a `Link` header means is up to the caller.
#[derive(Debug)]
pub struct ApiPage {
    pub status: u16,
    pub body: Value,
    pub link: Option<String>,
}

impl ApiPage {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Capability performing authenticated GET requests against the provider.
/// Paths are relative to the API base URL, e.g. `repos/{owner}/{name}/pulls`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, path: &str, query: &Query) -> Result<ApiPage>;
}

/// Which analyses a run performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Metric {
    All,
    Contributors,
    Pulls,
    Issues,
}

impl Metric {
    pub fn wants_contributors(self) -> bool {
        matches!(self, Metric::All | Metric::Contributors)
    }

    pub fn wants_pulls(self) -> bool {
        matches!(self, Metric::All | Metric::Pulls)
    }

    pub fn wants_issues(self) -> bool {
        matches!(self, Metric::All | Metric::Issues)
    }
}
