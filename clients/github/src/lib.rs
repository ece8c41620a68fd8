//! `reqwest`-backed [`Transport`] for a GitHub-shaped REST API.

use analytics::api::{ApiPage, Query, Result, Transport};
use async_trait::async_trait;
use log::debug;
use reqwest::header;
use reqwest::Client;
use serde_json::Value;

mod builder;

pub use builder::GithubClientBuilder;

pub struct GithubClient {
    client: Client,
    github_url: String,
}

#[async_trait]
impl Transport for GithubClient {
    async fn get(&self, path: &str, query: &Query) -> Result<ApiPage> {
        let request_url = format!("{}/{}", self.github_url, path);
        debug!("GET {} {:?}", request_url, query);
        let response = self.client.get(request_url).query(query).send().await?;

        let status = response.status();
        let link = response
            .headers()
            .get(header::LINK)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        // Bodies of failed lookups are never read, only their status.
        let body = if status.is_success() {
            response.json::<Value>().await?
        } else {
            Value::Null
        };

        Ok(ApiPage {
            status: status.as_u16(),
            body,
            link,
        })
    }
}
