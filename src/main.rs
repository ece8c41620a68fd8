use analytics::api::Error;
use analytics::{ContributorCommits, ItemStats};
use clap::Parser;
use repo_analytics_app::Args;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    env_logger::init();
    let args = Args::parse();
    let top = args.top;

    let report = repo_analytics_app::analyze(args).await?;

    if let Some(ranking) = &report.contributors {
        render_ranking(ranking, top);
    }
    if let Some(stats) = &report.pulls {
        render_stats("pull requests", stats);
    }
    if let Some(stats) = &report.issues {
        render_stats("issues", stats);
    }

    Ok(())
}

fn render_ranking(ranking: &[ContributorCommits], limit: usize) {
    println!("Contributor ranking by commits");
    println!("{}", "-".repeat(57));
    println!("| {0:25} | {1:25} |", "Login", "Commits");
    println!("{}", "-".repeat(57));
    for row in ranking.iter().take(limit) {
        println!("| {0:25} | {1:25} |", row.login, row.commits);
    }
    println!("{}", "-".repeat(57));
}

fn render_stats(kind: &str, stats: &ItemStats) {
    println!("Analytics for {}", kind);
    println!("Open:\t{}", stats.open);
    println!("Closed:\t{}", stats.closed);
    println!("Old:\t{}", stats.old);
}
