//! A [`Fetcher`] backed by `reqwest`.

use async_trait::async_trait;
use serde_json::Value;
use swagql_define::Verb;
use tracing::{debug, instrument};
use url::Url;

use crate::context::Fetcher;
use crate::error::FetchError;
use crate::request::RequestOptions;

/// Sends requests to `base_url` joined with the operation's url path.
///
/// The base URL should include the API's `basePath`, e.g.
/// `https://petstore.example.com/v2`.
///
/// ## Examples
///
/// ```
/// use swagql_runtime::HttpFetcher;
///
/// let fetcher = HttpFetcher::parse("http://localhost:8080/v2/").unwrap();
/// assert_eq!(fetcher.url_for("/pet/1"), "http://localhost:8080/v2/pet/1");
/// ```
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpFetcher {
    pub fn new(base_url: Url) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Parses `base_url` and creates a fetcher with a default client.
    pub fn parse(base_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(base_url)?))
    }

    /// Uses a preconfigured client (timeouts, default headers, proxies).
    pub fn with_client(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full URL for a url path.
    pub fn url_for(&self, url_path: &str) -> String {
        format!(
            "{}{}",
            self.base_url.as_str().trim_end_matches('/'),
            url_path
        )
    }
}

fn method(verb: Verb) -> reqwest::Method {
    match verb {
        Verb::Get => reqwest::Method::GET,
        Verb::Put => reqwest::Method::PUT,
        Verb::Post => reqwest::Method::POST,
        Verb::Delete => reqwest::Method::DELETE,
        Verb::Options => reqwest::Method::OPTIONS,
        Verb::Head => reqwest::Method::HEAD,
        Verb::Patch => reqwest::Method::PATCH,
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    #[instrument(skip(self, options), fields(method = %options.method))]
    async fn fetch(&self, url_path: &str, options: &RequestOptions) -> Result<Value, FetchError> {
        let url = self.url_for(url_path);
        let mut req_builder = self.client.request(method(options.method), &url);

        for (key, value) in &options.headers {
            req_builder = req_builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = &options.body {
            req_builder = req_builder.json(body);
        }

        let response = req_builder.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(status = status.as_u16(), bytes = text.len(), "response received");

        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                body: text,
            });
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method as http_method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn url_for_joins_without_double_slash() {
        let fetcher = HttpFetcher::parse("http://example.com/v2").unwrap();
        assert_eq!(fetcher.url_for("/pet"), "http://example.com/v2/pet");

        let root = HttpFetcher::parse("http://example.com").unwrap();
        assert_eq!(root.url_for("/pet"), "http://example.com/pet");
    }

    #[tokio::test]
    async fn sends_method_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(http_method("POST"))
            .and(path("/v2/pet"))
            .and(query_param("dryRun", "true"))
            .and(header("api_key", "secret"))
            .and(body_json(json!({"name": "Fido"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 2})))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::parse(&format!("{}/v2", server.uri())).unwrap();
        let mut options = RequestOptions::new(Verb::Post);
        options.headers.insert("api_key".into(), "secret".into());
        options.body = Some(json!({"name": "Fido"}));

        let value = fetcher.fetch("/pet?dryRun=true", &options).await.unwrap();
        assert_eq!(value, json!({"id": 2}));
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(http_method("GET"))
            .and(path("/pet/9"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Pet not found"))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::parse(&server.uri()).unwrap();
        let err = fetcher
            .fetch("/pet/9", &RequestOptions::new(Verb::Get))
            .await
            .unwrap_err();
        match err {
            FetchError::HttpStatus { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "Pet not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_body_is_null() {
        let server = MockServer::start().await;
        Mock::given(http_method("DELETE"))
            .and(path("/pet/1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::parse(&server.uri()).unwrap();
        let value = fetcher
            .fetch("/pet/1", &RequestOptions::new(Verb::Delete))
            .await
            .unwrap();
        assert_eq!(value, Value::Null);
    }

    #[tokio::test]
    async fn invalid_json_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(http_method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::parse(&server.uri()).unwrap();
        let err = fetcher
            .fetch("/pet", &RequestOptions::new(Verb::Get))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }
}
