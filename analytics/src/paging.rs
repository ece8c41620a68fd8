//! Page-number pagination over the provider's `Link` header.
//!
//! The provider slices large result sets into pages of at most [`PER_PAGE`]
//! records and advertises the last page number in the `rel="last"` link of
//! the `Link` response header. A response without the header is the only
//! page.

use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::api::{ApiPage, Error, Query, Result, Transport};

/// Page size requested from the provider on every paged call.
pub const PER_PAGE: u32 = 100;

/// Query holding only the `per_page` parameter.
pub fn base_query() -> Query {
    vec![("per_page".to_string(), PER_PAGE.to_string())]
}

/// Fetches every page of `path` and returns the concatenated records in
/// provider order. The first request carries no `page` parameter; pages
/// `2..=n` are requested explicitly. Any transport failure or non-success
/// status aborts the whole fetch.
pub async fn fetch_all<T>(transport: &dyn Transport, path: &str, query: &Query) -> Result<Vec<T>>
where
    T: DeserializeOwned,
{
    let (page_count, mut records) = first_page(transport, path, query).await?;
    if let Some(n) = page_count {
        for page_no in 2..=n {
            let page = get_page(transport, path, &with_page(query, page_no)).await?;
            records.append(&mut records_of(page)?);
        }
    }
    debug!("Fetched {} records from {}", records.len(), path);
    Ok(serde_json::from_value(Value::Array(records))?)
}

/// Estimates the total record count behind `path` without walking every
/// page: page 1 and, when more pages exist, page `n` are the only requests.
/// Assumes every page but the last is exactly [`PER_PAGE`] long; a short
/// intermediate page undercounts silently.
pub async fn estimate_count(transport: &dyn Transport, path: &str, query: &Query) -> Result<u64> {
    let (page_count, first) = first_page(transport, path, query).await?;
    if first.is_empty() {
        return Ok(0);
    }
    match page_count {
        None => Ok(first.len() as u64),
        Some(n) => {
            let last = get_page(transport, path, &with_page(query, n)).await?;
            let last_len = records_of(last)?.len() as u64;
            Ok(u64::from(PER_PAGE) * u64::from(n - 1) + last_len)
        }
    }
}

/// First page plus the page count learned from its `Link` header. `None`
/// means the provider sent everything in this one response.
async fn first_page(
    transport: &dyn Transport,
    path: &str,
    query: &Query,
) -> Result<(Option<u32>, Vec<Value>)> {
    let page = get_page(transport, path, query).await?;
    let page_count = page.link.as_deref().and_then(last_page_number);
    Ok((page_count, records_of(page)?))
}

async fn get_page(transport: &dyn Transport, path: &str, query: &Query) -> Result<ApiPage> {
    let page = transport.get(path, query).await?;
    if !page.is_success() {
        return Err(Error::InputData(format!(
            "GET {} answered HTTP {}",
            path, page.status
        )));
    }
    Ok(page)
}

fn records_of(page: ApiPage) -> Result<Vec<Value>> {
    Ok(serde_json::from_value(page.body)?)
}

fn with_page(query: &Query, page_no: u32) -> Query {
    let mut query = query.clone();
    query.push(("page".to_string(), page_no.to_string()));
    query
}

/// Page number of the `rel="last"` link, e.g.
/// `<https://api.github.com/repos/o/n/pulls?per_page=100&page=9>; rel="last"`
/// yields 9. Matching `page` by name, not by substring: `per_page` must not
/// shadow it.
fn last_page_number(link: &str) -> Option<u32> {
    let last = link.split(',').find(|part| part.contains("rel=\"last\""))?;
    let target = last.split('<').nth(1)?.split('>').next()?;
    let target = Url::parse(target).ok()?;
    target
        .query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::FakeTransport;

    #[test]
    fn last_page_number_test() {
        let link = r#"<https://api.github.com/repos/rust-lang/rust/contributors?per_page=100&page=2>; rel="next", <https://api.github.com/repos/rust-lang/rust/contributors?per_page=100&page=50>; rel="last""#;
        assert_eq!(last_page_number(link), Some(50));
    }

    #[test]
    fn last_page_number_no_last_rel_test() {
        let link = r#"<https://api.github.com/repos/o/n/pulls?page=1>; rel="prev""#;
        assert_eq!(last_page_number(link), None);
    }

    #[tokio::test]
    async fn fetch_all_flattens_pages_in_order_test() {
        // 3 pages sized PER_PAGE, PER_PAGE, 7.
        let transport = FakeTransport::default().route(
            "repos/o/n/pulls",
            Vec::new(),
            synthetic_pages(&[PER_PAGE as usize, PER_PAGE as usize, 7]),
        );
        let records: Vec<Value> = fetch_all(&transport, "repos/o/n/pulls", &base_query())
            .await
            .unwrap();
        assert_eq!(records.len(), PER_PAGE as usize * 2 + 7);
        assert_eq!(records[0]["id"], 0);
        assert_eq!(records[PER_PAGE as usize]["id"], 0);
        assert_eq!(records.last().unwrap()["id"], 6);
    }

    #[tokio::test]
    async fn fetch_all_single_page_test() {
        let transport = FakeTransport::default().route("repos/o/n/pulls", Vec::new(), synthetic_pages(&[3]));
        let records: Vec<Value> = fetch_all(&transport, "repos/o/n/pulls", &base_query())
            .await
            .unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn fetch_all_surfaces_error_status_test() {
        let transport = FakeTransport::default();
        let fetched: Result<Vec<Value>> = fetch_all(&transport, "repos/o/n/void", &base_query()).await;
        assert!(matches!(fetched, Err(Error::InputData(_))));
    }

    #[tokio::test]
    async fn estimate_count_empty_first_page_test() {
        let transport = FakeTransport::default().route("repos/o/n/pulls", Vec::new(), synthetic_pages(&[0]));
        let count = estimate_count(&transport, "repos/o/n/pulls", &base_query()).await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn estimate_count_single_page_test() {
        let transport = FakeTransport::default().route("repos/o/n/pulls", Vec::new(), synthetic_pages(&[12]));
        let count = estimate_count(&transport, "repos/o/n/pulls", &base_query()).await.unwrap();
        assert_eq!(count, 12);
    }

    #[tokio::test]
    async fn estimate_count_skips_intermediate_pages_test() {
        let transport = FakeTransport::default().route(
            "repos/o/n/issues",
            Vec::new(),
            synthetic_pages(&[PER_PAGE as usize, PER_PAGE as usize, PER_PAGE as usize, PER_PAGE as usize, 42]),
        );
        let count = estimate_count(&transport, "repos/o/n/issues", &base_query()).await.unwrap();
        assert_eq!(count, u64::from(PER_PAGE) * 4 + 42);

        let requests = transport.requests();
        assert_eq!(requests.len(), 2, "only page 1 and page n should be fetched");
        assert!(requests[1].contains("page=5"), "last page must be requested explicitly");
    }

    fn synthetic_pages(lengths: &[usize]) -> Vec<Vec<Value>> {
        lengths
            .iter()
            .map(|len| (0..*len).map(|id| serde_json::json!({ "id": id })).collect())
            .collect()
    }
}
