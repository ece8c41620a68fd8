//! Open/closed/old classification of pull requests and issues.
//!
//! Both endpoints share one algorithm: fetch every open item, count the ones
//! whose age since creation meets the day threshold, and estimate the closed
//! count without materializing it. Only the record shapes differ.

use chrono::{DateTime, Utc};
use derive_more::Constructor;
use log::info;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::api::{Query, Result, Transport};
use crate::paging::{base_query, estimate_count, fetch_all};
use crate::request::AnalysisRequest;

const SECONDS_PER_DAY: i64 = 86_400;

/// Aggregate counts for one endpoint. `old` counts open items only, so
/// `old <= open` holds by construction.
#[derive(Debug, PartialEq, Eq, Constructor)]
pub struct ItemStats {
    pub open: u64,
    pub closed: u64,
    pub old: u64,
}

/// Anything carrying a creation instant, the only field classification reads.
trait Created {
    fn created_at(&self) -> DateTime<Utc>;
}

/// Pull request record as the provider returns it. The merge instant is part
/// of the shape but plays no role in classification.
#[derive(Deserialize, Debug)]
pub struct Pull {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub merged_at: Option<DateTime<Utc>>,
}

impl Created for Pull {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[derive(Deserialize, Debug)]
pub struct Issue {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl Created for Issue {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Classifies the repository's pull requests. `old_after_days` is the age in
/// days at which an open pull request counts as old, boundary inclusive.
pub async fn pull_stats(
    transport: &dyn Transport,
    request: &AnalysisRequest,
    old_after_days: u32,
) -> Result<ItemStats> {
    let path = format!("{}/pulls", request.repo().path());
    classify::<Pull>(transport, &path, old_after_days, Utc::now()).await
}

/// Classifies the repository's issues, same thresholding as [`pull_stats`].
pub async fn issue_stats(
    transport: &dyn Transport,
    request: &AnalysisRequest,
    old_after_days: u32,
) -> Result<ItemStats> {
    let path = format!("{}/issues", request.repo().path());
    classify::<Issue>(transport, &path, old_after_days, Utc::now()).await
}

async fn classify<T>(
    transport: &dyn Transport,
    path: &str,
    old_after_days: u32,
    now: DateTime<Utc>,
) -> Result<ItemStats>
where
    T: DeserializeOwned + Created,
{
    let open_items: Vec<T> = fetch_all(transport, path, &state_query("open")).await?;
    let open = open_items.len() as u64;

    let old_border = i64::from(old_after_days) * SECONDS_PER_DAY;
    let old = open_items
        .iter()
        .filter(|item| (now - item.created_at()).num_seconds() >= old_border)
        .count() as u64;

    let closed = estimate_count(transport, path, &state_query("closed")).await?;
    info!("{}: open {}, closed {}, old {}", path, open, closed, old);
    Ok(ItemStats::new(open, closed, old))
}

fn state_query(state: &str) -> Query {
    let mut query = base_query();
    query.push(("state".to_string(), state.to_string()));
    query
}
