use crate::http::HttpClient;
use crate::output::{schema_path, write_schema};
use crate::probe::{fetch_schema, is_graphql};
use crate::targets::validate_target;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Everything that can come out of probing one target. Failures below the
/// per-target level end up here, never as errors.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Outcome {
    Skipped { reason: String },
    NotGraphql,
    SchemaSaved { path: PathBuf },
    IntrospectionFailed,
    SaveFailed { error: String },
}

/// Runs the full pipeline for one raw target: validate, detect, introspect,
/// persist. A schema file is only ever written for a target that passed
/// detection.
pub async fn process_target(client: &HttpClient, raw_target: &str, output_dir: &Path) -> Outcome {
    let url = match validate_target(raw_target) {
        Ok(url) => url,
        Err(e) => {
            return Outcome::Skipped {
                reason: e.to_string(),
            }
        }
    };

    if !is_graphql(client, url.as_str()).await {
        return Outcome::NotGraphql;
    }

    let schema = match fetch_schema(client, url.as_str()).await {
        Some(schema) => schema,
        None => return Outcome::IntrospectionFailed,
    };

    let path = schema_path(output_dir, &url);
    match write_schema(&path, &schema) {
        Ok(()) => Outcome::SchemaSaved { path },
        Err(e) => Outcome::SaveFailed {
            error: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn outcomes_serialize_tagged() {
        assert_eq!(
            serde_json::to_value(Outcome::NotGraphql).unwrap(),
            json!({"result": "not_graphql"})
        );
        assert_eq!(
            serde_json::to_value(Outcome::SchemaSaved {
                path: PathBuf::from("out/example.com.json")
            })
            .unwrap(),
            json!({"result": "schema_saved", "path": "out/example.com.json"})
        );
        assert_eq!(
            serde_json::to_value(Outcome::Skipped {
                reason: "not a valid URL: relative URL without a base".to_string()
            })
            .unwrap(),
            json!({
                "result": "skipped",
                "reason": "not a valid URL: relative URL without a base"
            })
        );
    }
}
