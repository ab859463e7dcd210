use crate::http::HttpClient;
use serde_json::{json, Value};

pub const INTROSPECTION_OPERATION: &str = "IntrospectionQuery";

/// The standard full introspection document: root types, all types with
/// fields/args/enum values, directives, and `ofType` chains seven levels deep
/// for wrapped types.
pub const INTROSPECTION_QUERY: &str = r#"
query IntrospectionQuery {
    __schema {
        queryType { name }
        mutationType { name }
        subscriptionType { name }
        types {
            ...FullType
        }
        directives {
            name
            description
            locations
            args {
                ...InputValue
            }
        }
    }
}

fragment FullType on __Type {
    kind
    name
    description
    fields(includeDeprecated: true) {
        name
        description
        args {
            ...InputValue
        }
        type {
            ...TypeRef
        }
        isDeprecated
        deprecationReason
    }
    inputFields {
        ...InputValue
    }
    interfaces {
        ...TypeRef
    }
    enumValues(includeDeprecated: true) {
        name
        description
        isDeprecated
        deprecationReason
    }
    possibleTypes {
        ...TypeRef
    }
}

fragment InputValue on __InputValue {
    name
    description
    type {
        ...TypeRef
    }
    defaultValue
}

fragment TypeRef on __Type {
    kind
    name
    ofType {
        kind
        name
        ofType {
            kind
            name
            ofType {
                kind
                name
                ofType {
                    kind
                    name
                    ofType {
                        kind
                        name
                        ofType {
                            kind
                            name
                            ofType {
                                kind
                                name
                            }
                        }
                    }
                }
            }
        }
    }
}
"#;

/// Fetches the full introspection response from an endpoint already confirmed
/// to speak GraphQL: POST first, GET fallback. Returns the entire parsed body
/// when it contains `data.__schema`, and None when introspection failed.
pub async fn fetch_schema(client: &HttpClient, url: &str) -> Option<Value> {
    let post = client
        .post_graphql(
            url,
            INTROSPECTION_QUERY,
            Some(INTROSPECTION_OPERATION),
            Some(json!({})),
        )
        .await;

    if let Ok(response) = post {
        if response.data_field("__schema").is_some() {
            return response.body;
        }
    }

    if let Ok(response) = client.get_graphql(url, INTROSPECTION_QUERY).await {
        if response.data_field("__schema").is_some() {
            return response.body;
        }
    }

    None
}
