//! `nextLink` pagination.
//!
//! ARM list operations return `{"value": [...], "nextLink": "..."}`. The
//! `nextLink` is an absolute URL (api-version included) for the following
//! page; an absent or empty link ends the listing.

use futures::stream::{self, Stream, TryStreamExt};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::Instrument;
use url::Url;

use crate::client::ArmClient;
use crate::error::ArmResult;

/// One page of a list operation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default)]
    pub value: Vec<T>,
    #[serde(default)]
    pub next_link: Option<String>,
}

impl<T> Page<T> {
    /// The link to the following page, if there is one.
    pub fn next(&self) -> Option<&str> {
        self.next_link.as_deref().filter(|link| !link.is_empty())
    }
}

/// Fetch a single page from a path or an absolute `nextLink`.
pub async fn get_page<T: DeserializeOwned>(client: &ArmClient, link: &str) -> ArmResult<Page<T>> {
    let page: Page<T> = client.get_json(link).await?;
    tracing::debug!(
        items = page.value.len(),
        has_next = page.next().is_some(),
        "fetched page"
    );
    Ok(page)
}

/// Stream every page starting at `first`, following `nextLink` until it runs out.
///
/// An error building the first URL is yielded as the only item. Page requests
/// run inside the span that was current when the stream was created.
pub fn pages<'a, T>(
    client: &'a ArmClient,
    first: ArmResult<Url>,
) -> impl Stream<Item = ArmResult<Page<T>>> + 'a
where
    T: DeserializeOwned + 'a,
{
    let span = tracing::Span::current();
    stream::try_unfold(Some(first), move |link| {
        async move {
            let Some(link) = link else {
                return Ok(None);
            };
            let page = get_page::<T>(client, link?.as_str()).await?;
            let next = page.next().map(|next| client.url(next));
            Ok(Some((page, next)))
        }
        .instrument(span.clone())
    })
}

/// Collect the items of every page.
pub async fn collect_all<T: DeserializeOwned>(client: &ArmClient, first: Url) -> ArmResult<Vec<T>> {
    collect_matching(client, first, |_| true).await
}

/// Collect the items of every page for which `predicate` returns `true`.
pub async fn collect_matching<T, F>(
    client: &ArmClient,
    first: Url,
    predicate: F,
) -> ArmResult<Vec<T>>
where
    T: DeserializeOwned,
    F: Fn(&T) -> bool,
{
    let mut stream = std::pin::pin!(pages::<T>(client, Ok(first)));
    let mut items = Vec::new();

    while let Some(page) = stream.try_next().await? {
        items.extend(page.value.into_iter().filter(|item| predicate(item)));
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ArmCredential;
    use futures::StreamExt;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        name: String,
    }

    fn client(server: &MockServer) -> ArmClient {
        ArmClient::builder()
            .endpoint(server.uri())
            .credential(ArmCredential::access_token("test-token"))
            .build()
            .expect("should build")
    }

    fn items_url(client: &ArmClient) -> Url {
        client
            .resource_url("/items", &[("api-version", "2023-01-01")])
            .expect("should build")
    }

    async fn mount_two_pages(server: &MockServer) {
        let next = format!("{}/items?api-version=2023-01-01&$skipToken=abc", server.uri());

        Mock::given(method("GET"))
            .and(path("/items"))
            .and(query_param("$skipToken", "abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [{"name": "c"}]
            })))
            .mount(server)
            .await;

        Mock::given(method("GET"))
            .and(path("/items"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [{"name": "a"}, {"name": "b"}],
                "nextLink": next
            })))
            .mount(server)
            .await;
    }

    #[test]
    fn empty_next_link_ends_listing() {
        let page: Page<Item> =
            serde_json::from_str(r#"{"value": [], "nextLink": ""}"#).unwrap();
        assert!(page.next().is_none());

        let page: Page<Item> = serde_json::from_str("{}").unwrap();
        assert!(page.value.is_empty());
        assert!(page.next().is_none());
    }

    #[tokio::test]
    async fn pages_follow_next_link() {
        let server = MockServer::start().await;
        mount_two_pages(&server).await;

        let client = client(&server);
        let fetched: Vec<Page<Item>> = pages(&client, Ok(items_url(&client)))
            .try_collect()
            .await
            .expect("should list");

        assert_eq!(fetched.len(), 2);
        assert_eq!(fetched[0].value.len(), 2);
        assert_eq!(fetched[1].value, vec![Item { name: "c".into() }]);
    }

    #[tokio::test]
    async fn collect_all_flattens_pages() {
        let server = MockServer::start().await;
        mount_two_pages(&server).await;

        let client = client(&server);
        let items: Vec<Item> = collect_all(&client, items_url(&client))
            .await
            .expect("should list");

        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn collect_matching_filters_across_pages() {
        let server = MockServer::start().await;
        mount_two_pages(&server).await;

        let client = client(&server);
        let items: Vec<Item> = collect_matching(
            &client,
            items_url(&client),
            |item: &Item| item.name != "b",
        )
        .await
        .expect("should list");

        assert_eq!(items, vec![Item { name: "a".into() }, Item { name: "c".into() }]);
    }

    #[tokio::test]
    async fn error_on_later_page_is_returned() {
        let server = MockServer::start().await;
        let next = format!("{}/broken", server.uri());

        Mock::given(method("GET"))
            .and(path("/items"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [{"name": "a"}],
                "nextLink": next
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "error": {"code": "AuthorizationFailed", "message": "no"}
            })))
            .mount(&server)
            .await;

        let client = client(&server);
        let mut stream = std::pin::pin!(pages::<Item>(&client, Ok(items_url(&client))));

        assert!(stream.next().await.expect("first page").is_ok());
        let err = stream.next().await.expect("second page").unwrap_err();
        assert_eq!(err.status(), Some(403));

        let err = collect_all::<Item>(&client, items_url(&client)).await.unwrap_err();
        assert_eq!(err.code(), Some("AuthorizationFailed"));
    }

    #[tokio::test]
    async fn invalid_first_url_is_the_only_item() {
        let server = MockServer::start().await;
        let client = client(&server);
        let first = Err(crate::error::ArmError::InvalidEndpoint {
            message: "cannot be a base".into(),
            source: None,
        });

        let results: Vec<ArmResult<Page<Item>>> = pages(&client, first).collect().await;

        assert_eq!(results.len(), 1);
        assert!(matches!(
            results[0],
            Err(crate::error::ArmError::InvalidEndpoint { .. })
        ));
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }
}
