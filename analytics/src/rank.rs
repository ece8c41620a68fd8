//! Contributor ranking by commit count.

use derive_more::Constructor;
use log::info;
use serde::Deserialize;

use crate::api::{Query, Result, Transport};
use crate::paging::{base_query, estimate_count, fetch_all};
use crate::request::{format_instant, AnalysisRequest};

#[derive(Deserialize, Debug)]
struct Contributor {
    login: String,
}

/// One ranking row: a login and its commit count on the analyzed branch
/// within the analyzed window.
#[derive(Debug, PartialEq, Eq, Constructor)]
pub struct ContributorCommits {
    pub login: String,
    pub commits: u64,
}

/// Ranks every contributor of the repository by commit count, descending.
/// Ties keep the order contributors were first fetched in. Contributors with
/// no matching commits stay in the ranking with a count of 0.
///
/// One contributor costs one or two requests (the estimator's page 1 and
/// page n), issued strictly one after another.
pub async fn top_contributors(
    transport: &dyn Transport,
    request: &AnalysisRequest,
) -> Result<Vec<ContributorCommits>> {
    let contributors_path = format!("{}/contributors", request.repo().path());
    let contributors: Vec<Contributor> = fetch_all(transport, &contributors_path, &base_query()).await?;
    info!(
        "Ranking {} contributors of {}",
        contributors.len(),
        request.repo().path()
    );

    let commits_path = format!("{}/commits", request.repo().path());
    let mut ranking = Vec::with_capacity(contributors.len());
    for Contributor { login } in contributors {
        let commits = estimate_count(transport, &commits_path, &commit_query(request, &login)).await?;
        ranking.push(ContributorCommits::new(login, commits));
    }
    // Stable sort keeps first-seen order between equal counts.
    ranking.sort_by(|a, b| b.commits.cmp(&a.commits));
    Ok(ranking)
}

fn commit_query(request: &AnalysisRequest, login: &str) -> Query {
    let mut query = base_query();
    query.push(("author".to_string(), login.to_string()));
    query.push(("sha".to_string(), request.branch().to_string()));
    if let Some(since) = request.window().since() {
        query.push(("since".to_string(), format_instant(&since)));
    }
    if let Some(until) = request.window().until() {
        query.push(("until".to_string(), format_instant(&until)));
    }
    query
}
