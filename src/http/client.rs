use anyhow::{Context, Result};
use reqwest::{Client, Proxy, Response};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

const DEFAULT_TIMEOUT: u64 = 30;
const USER_AGENT: &str = concat!("gqlprobe/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    headers: HashMap<String, String>,
}

impl HttpClient {
    pub fn new(proxy: Option<&str>, headers: HashMap<String, String>) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT))
            .danger_accept_invalid_certs(true)
            .user_agent(USER_AGENT);

        if let Some(proxy_url) = proxy {
            let proxy = Proxy::all(proxy_url).context("Invalid proxy URL")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self { client, headers })
    }

    fn apply_headers(&self, mut req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        for (key, value) in &self.headers {
            req = req.header(key, value);
        }
        req
    }

    /// Sends a query as a JSON POST body. `operationName` and `variables` are
    /// included only when supplied.
    pub async fn post_graphql(
        &self,
        url: &str,
        query: &str,
        operation_name: Option<&str>,
        variables: Option<Value>,
    ) -> Result<GraphQLResponse> {
        let mut body = json!({ "query": query });
        if let Some(name) = operation_name {
            body["operationName"] = json!(name);
        }
        if let Some(vars) = variables {
            body["variables"] = vars;
        }

        let req = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(&body);

        let req = self.apply_headers(req);
        let response = req.send().await.context("Failed to send POST request")?;

        Ok(GraphQLResponse::from_response(response).await)
    }

    /// Sends a query percent-encoded as the `query` query-string parameter.
    pub async fn get_graphql(&self, url: &str, query: &str) -> Result<GraphQLResponse> {
        let req = self.client.get(url).query(&[("query", query)]);

        let req = self.apply_headers(req);
        let response = req.send().await.context("Failed to send GET request")?;

        Ok(GraphQLResponse::from_response(response).await)
    }
}

#[derive(Debug, Clone)]
pub struct GraphQLResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

impl GraphQLResponse {
    async fn from_response(response: Response) -> Self {
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        // A body that is not valid JSON stays None; the success predicate
        // must be able to tell "parsed" from "unparseable".
        let body = response
            .text()
            .await
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok());

        Self {
            status,
            content_type,
            body,
        }
    }

    fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false)
    }

    /// The shared success check for every probe attempt: status 200, a JSON
    /// content type, a body that parsed, and `data.<key>` present.
    pub fn data_field(&self, key: &str) -> Option<&Value> {
        if self.status != 200 || !self.is_json() {
            return None;
        }
        self.body.as_ref()?.get("data")?.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, content_type: Option<&str>, body: Option<Value>) -> GraphQLResponse {
        GraphQLResponse {
            status,
            content_type: content_type.map(|s| s.to_string()),
            body,
        }
    }

    #[test]
    fn data_field_requires_status_200() {
        let resp = response(
            404,
            Some("application/json"),
            Some(json!({"data": {"__typename": "Query"}})),
        );
        assert!(resp.data_field("__typename").is_none());
    }

    #[test]
    fn data_field_requires_json_content_type() {
        let resp = response(
            200,
            Some("text/html"),
            Some(json!({"data": {"__typename": "Query"}})),
        );
        assert!(resp.data_field("__typename").is_none());

        let resp = response(200, None, Some(json!({"data": {"__typename": "Query"}})));
        assert!(resp.data_field("__typename").is_none());
    }

    #[test]
    fn data_field_accepts_content_type_with_charset() {
        let resp = response(
            200,
            Some("application/json; charset=utf-8"),
            Some(json!({"data": {"__typename": "Query"}})),
        );
        assert_eq!(resp.data_field("__typename"), Some(&json!("Query")));
    }

    #[test]
    fn data_field_requires_parsed_body() {
        let resp = response(200, Some("application/json"), None);
        assert!(resp.data_field("__typename").is_none());
    }

    #[test]
    fn data_field_requires_data_key() {
        let resp = response(
            200,
            Some("application/json"),
            Some(json!({"errors": [{"message": "nope"}]})),
        );
        assert!(resp.data_field("__typename").is_none());

        let resp = response(200, Some("application/json"), Some(json!({"data": null})));
        assert!(resp.data_field("__typename").is_none());
    }

    #[test]
    fn data_field_returns_nested_value() {
        let resp = response(
            200,
            Some("application/json"),
            Some(json!({"data": {"__schema": {"types": []}}})),
        );
        assert_eq!(resp.data_field("__schema"), Some(&json!({"types": []})));
    }
}
