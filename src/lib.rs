use analytics::api::Result;
use analytics::{issue_stats, pull_stats, top_contributors, AnalysisRequest, ContributorCommits, ItemStats};
use github_client::GithubClientBuilder;
use log::info;

mod args;

pub use args::Args;

/// Results of one analysis run; a metric skipped by the selector stays
/// `None`.
#[derive(Debug)]
pub struct Report {
    pub contributors: Option<Vec<ContributorCommits>>,
    pub pulls: Option<ItemStats>,
    pub issues: Option<ItemStats>,
}

/// Validates the input, then runs the selected analyses strictly one after
/// another over a single client.
pub async fn analyze(args: Args) -> Result<Report> {
    let mut client = GithubClientBuilder::default().with_github_url(&args.api_url);
    if let Some(token) = args.api_token {
        client = client.try_with_token(token)?;
    }
    let client = client.build()?;

    let request = AnalysisRequest::validate(
        &client,
        &args.url,
        args.since.as_deref(),
        args.until.as_deref(),
        args.branch.as_deref(),
    )
    .await?;
    info!("Analyzing {} (branch {})", request.repo().path(), request.branch());

    let contributors = if args.metric.wants_contributors() {
        Some(top_contributors(&client, &request).await?)
    } else {
        None
    };
    let pulls = if args.metric.wants_pulls() {
        Some(pull_stats(&client, &request, args.pulls_old_days).await?)
    } else {
        None
    };
    let issues = if args.metric.wants_issues() {
        Some(issue_stats(&client, &request, args.issues_old_days).await?)
    } else {
        None
    };

    Ok(Report {
        contributors,
        pulls,
        issues,
    })
}
