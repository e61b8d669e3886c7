use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{ENV_CONFIG, ENV_DATA_FILE, ENV_MAX_FILTER_JSON_BYTES, ENV_MAX_FILTER_KEYS};

#[derive(Parser)]
#[command(name = "crm-filter")]
#[command(version, about = "Translate CRM UI filters and query records", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Maximum number of keys in a filter object
    #[arg(long, global = true, env = ENV_MAX_FILTER_KEYS)]
    pub max_filter_keys: Option<usize>,

    /// Maximum filter JSON size in bytes
    #[arg(long, global = true, env = ENV_MAX_FILTER_JSON_BYTES)]
    pub max_filter_json_bytes: Option<usize>,

    /// JSON record data file (`{"resource": [record, ...]}`)
    #[arg(long, short = 'd', global = true, env = ENV_DATA_FILE)]
    pub data_file: Option<PathBuf>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Translate a UI filter and print the store-native filter
    Transform {
        /// Read the filter from a file instead of stdin
        #[arg(long, short = 'i')]
        input: Option<PathBuf>,
    },
    /// List records of a resource through the filter-translating provider
    Query {
        /// Resource name (e.g. contacts)
        resource: String,

        /// UI filter as JSON
        #[arg(long, short = 'f')]
        filter: Option<String>,

        /// Reference field for a many-reference query (requires --id)
        #[arg(long, requires = "id")]
        target: Option<String>,

        /// Referenced record id (requires --target)
        #[arg(long, requires = "target")]
        id: Option<String>,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config: Option<PathBuf>,
    pub max_filter_keys: Option<usize>,
    pub max_filter_json_bytes: Option<usize>,
    pub data_file: Option<PathBuf>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Commands) {
    let cli = Cli::parse();
    let config = CliConfig {
        config: cli.config,
        max_filter_keys: cli.max_filter_keys,
        max_filter_json_bytes: cli.max_filter_json_bytes,
        data_file: cli.data_file,
    };
    (config, cli.command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_query_with_reference() {
        let cli = Cli::try_parse_from([
            "crm-filter",
            "query",
            "contacts",
            "--filter",
            r#"{"age@gte": 18}"#,
            "--target",
            "company_id",
            "--id",
            "7",
            "--max-filter-keys",
            "5",
        ])
        .unwrap();

        assert_eq!(cli.max_filter_keys, Some(5));
        match cli.command {
            Commands::Query {
                resource,
                filter,
                target,
                id,
            } => {
                assert_eq!(resource, "contacts");
                assert_eq!(filter.as_deref(), Some(r#"{"age@gte": 18}"#));
                assert_eq!(target.as_deref(), Some("company_id"));
                assert_eq!(id.as_deref(), Some("7"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_target_requires_id() {
        let result = Cli::try_parse_from(["crm-filter", "query", "contacts", "--target", "x"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_transform() {
        let cli = Cli::try_parse_from(["crm-filter", "transform", "-i", "filter.json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Transform { input: Some(ref p) } if p == &PathBuf::from("filter.json")
        ));
    }
}
