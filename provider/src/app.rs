//! Core application

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::core::cli::{self, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME, APP_NAME_LOWER, ENV_DATA_FILE, ENV_LOG};
use crate::data::filters::{FilterLimits, parse_filter_json, transform_filter};
use crate::data::{
    FilterTranslatingProvider, ListQuery, ListResult, ManyReferenceQuery, MemoryStore, RecordStore,
};

pub struct CoreApp {
    pub config: AppConfig,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!(app = APP_NAME, "Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let app = Self {
            config: AppConfig::load(&cli_config)?,
        };

        match command {
            Commands::Transform { input } => app.transform(input.as_deref()),
            Commands::Query {
                resource,
                filter,
                target,
                id,
            } => {
                app.query(&resource, filter.as_deref(), target.zip(id))
                    .await
            }
        }
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        // stdout carries command output
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    fn transform(&self, input: Option<&Path>) -> Result<()> {
        let json_str = match input {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read filter file: {}", path.display()))?,
            None => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("Failed to read filter from stdin")?;
                buf
            }
        };

        println!("{}", render_transform(&json_str, &self.config.filters)?);
        Ok(())
    }

    async fn query(
        &self,
        resource: &str,
        filter: Option<&str>,
        reference: Option<(String, String)>,
    ) -> Result<()> {
        let Some(data_file) = self.config.store.data_file.as_deref() else {
            anyhow::bail!(
                "No record data file configured (use --data-file, {} or store.data_file)",
                ENV_DATA_FILE
            );
        };

        let store = MemoryStore::load(data_file)
            .with_context(|| format!("Failed to load record data: {}", data_file.display()))?;
        let provider = FilterTranslatingProvider::new(store);

        let result = run_query(
            &provider,
            resource,
            filter,
            reference,
            &self.config.filters,
        )
        .await?;

        println!("{}", serde_json::to_string_pretty(&result)?);
        Ok(())
    }
}

/// Translate filter JSON and render the store-native filter as pretty JSON.
///
/// An absent filter renders as `null`.
fn render_transform(json_str: &str, limits: &FilterLimits) -> Result<String> {
    let filter = parse_filter_json(json_str, limits)?;
    let transformed = transform_filter(filter.as_ref())?;
    Ok(serde_json::to_string_pretty(&transformed)?)
}

async fn run_query<S: RecordStore>(
    provider: &FilterTranslatingProvider<S>,
    resource: &str,
    filter: Option<&str>,
    reference: Option<(String, String)>,
    limits: &FilterLimits,
) -> Result<ListResult> {
    let filter = match filter {
        Some(json_str) => parse_filter_json(json_str, limits)?,
        None => None,
    };

    let result = match reference {
        Some((target, id)) => {
            let query = ManyReferenceQuery {
                target,
                id: parse_id(&id),
                filter,
            };
            provider.get_many_reference(resource, &query).await?
        }
        None => provider.get_list(resource, &ListQuery { filter }).await?,
    };
    Ok(result)
}

/// `7` is a number id, anything that is not JSON is a string id
fn parse_id(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider() -> FilterTranslatingProvider<MemoryStore> {
        let store = MemoryStore::from_json(
            &json!({
                "contacts": [
                    {"id": 1, "name": "Jane", "company_id": 7, "tags": [1, 2]},
                    {"id": 2, "name": "John", "company_id": 7, "tags": [3]},
                    {"id": 3, "name": "Ana", "company_id": "c-9", "tags": [2]}
                ]
            })
            .to_string(),
        )
        .unwrap();
        FilterTranslatingProvider::new(store)
    }

    #[test]
    fn test_render_transform() {
        let out = render_transform(r#"{"id@in": "(1,2)", "tags@cs": "{a}"}"#, &FilterLimits::default())
            .unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value, json!({"id_eq_any": [1, 2], "tags": ["a"]}));
    }

    #[test]
    fn test_render_transform_absent_filter() {
        assert_eq!(render_transform("null", &FilterLimits::default()).unwrap(), "null");
    }

    #[test]
    fn test_render_transform_reports_invalid_value() {
        let err = render_transform(r#"{"tags@cs": "a,b"}"#, &FilterLimits::default()).unwrap_err();
        assert!(err.to_string().starts_with("Invalid filter value"));
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("7"), json!(7));
        assert_eq!(parse_id("c-9"), json!("c-9"));
        assert_eq!(parse_id("\"7\""), json!("7"));
    }

    #[tokio::test]
    async fn test_run_query_list() {
        let result = run_query(
            &provider(),
            "contacts",
            Some(r#"{"tags@cs": "{2}"}"#),
            None,
            &FilterLimits::default(),
        )
        .await
        .unwrap();
        assert_eq!(result.total, 2);
    }

    #[tokio::test]
    async fn test_run_query_many_reference() {
        let result = run_query(
            &provider(),
            "contacts",
            None,
            Some(("company_id".to_string(), "c-9".to_string())),
            &FilterLimits::default(),
        )
        .await
        .unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.data[0]["name"], "Ana");
    }

    #[tokio::test]
    async fn test_run_query_enforces_limits() {
        let limits = FilterLimits {
            max_keys: 1,
            max_json_bytes: 1024,
        };
        let err = run_query(
            &provider(),
            "contacts",
            Some(r#"{"a": 1, "b": 2}"#),
            None,
            &limits,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("Maximum 1 filter keys"));
    }
}
