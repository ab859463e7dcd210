use crate::http::{GraphQLResponse, HttpClient};
use serde_json::Value;

pub const DETECTION_QUERY: &str = "query{__typename}";
pub const DETECTION_QUERY_BARE: &str = "{__typename}";

fn replied_as_query_root(response: &GraphQLResponse) -> bool {
    response.data_field("__typename").and_then(Value::as_str) == Some("Query")
}

/// Heuristically decides whether `url` serves a GraphQL API: POST the
/// detection query first, fall back to GET with the query as a query-string
/// parameter. Transport errors and malformed responses count as a failed
/// attempt, never as an error.
pub async fn is_graphql(client: &HttpClient, url: &str) -> bool {
    if let Ok(response) = client.post_graphql(url, DETECTION_QUERY, None, None).await {
        if replied_as_query_root(&response) {
            return true;
        }
    }

    // The GET attempt stands on its own response; it shares nothing with the
    // POST attempt above.
    if let Ok(response) = client.get_graphql(url, DETECTION_QUERY_BARE).await {
        if replied_as_query_root(&response) {
            return true;
        }
    }

    false
}
