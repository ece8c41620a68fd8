use analytics::api::Metric;
use clap::Parser;
use secrecy::SecretString;
use std::{
    fmt::{Debug, Display},
    str::FromStr,
};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Repository URL, e.g. https://github.com/{owner}/{name}
    #[clap(short, long, env)]
    pub url: String,

    /// Analysis window start, `YYYY.MM.DD HH:MM:SS` (UTC); ignored when unparsable
    #[clap(long, env)]
    pub since: Option<String>,

    /// Analysis window end, `YYYY.MM.DD HH:MM:SS` (UTC); ignored when unparsable
    #[clap(long, env)]
    pub until: Option<String>,

    /// Repository branch
    #[clap(short, long, env)]
    pub branch: Option<String>,

    /// Analyses to run
    #[clap(short, long, env, default_value = "all")]
    pub metric: Metric,

    /// API OAuth access token
    #[clap(short = 't', long, env)]
    pub api_token: Option<SecretString>,

    /// Repository API URL
    #[clap(long, env, default_value = "https://api.github.com")]
    pub api_url: String,

    /// Age in days at which an open pull request counts as old
    #[clap(long, env, default_value_t = 30, parse(try_from_str=days_in_range))]
    pub pulls_old_days: u32,

    /// Age in days at which an open issue counts as old
    #[clap(long, env, default_value_t = 30, parse(try_from_str=days_in_range))]
    pub issues_old_days: u32,

    /// Ranking rows to print
    #[clap(long, env, default_value_t = 25, parse(try_from_str=top_in_range))]
    pub top: usize,
}

fn days_in_range(value: &str) -> clap::Result<u32, String> {
    number_in_range(value, 1, 3650, "old-days threshold".to_string())
}

fn top_in_range(value: &str) -> clap::Result<usize, String> {
    number_in_range(value, 1, 1000, "top".to_string())
}

fn number_in_range<T>(value: &str, min: T, max: T, name: String) -> clap::Result<T, String>
where
    T: FromStr + PartialOrd + Display,
    <T as FromStr>::Err: Display,
{
    value.parse::<T>().map_err(|err| format!("{}", err)).and_then(|value| {
        if value < min || value > max {
            return Err(format!("{} is not in range {} .. {}.", name, min, max));
        }
        Ok(value)
    })
}
