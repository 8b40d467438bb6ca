//! EIDR registry command-line client
//!
//! Usage:
//!   eidr validate <ID>
//!   eidr compile '<json query>'
//!   eidr resolve <ID> [--view Full]
//!   eidr query ['<json query>' | --expression EXPR] [--page N] [--page-size N] [--root ID] [--ids-only]

use anyhow::Context;
use clap::{Parser, Subcommand};
use eidr_connector::{ConnectorConfig, QueryOptions, Registry};
use eidr_query::{id, Query, QueryNode};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

/// Resolve and query EIDR registry records
#[derive(Parser, Debug)]
#[command(name = "eidr")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML configuration file
    #[arg(short, long, env = "EIDR_CONFIG")]
    config: Option<PathBuf>,

    /// Registry endpoint (overrides the config file)
    #[arg(long, env = "EIDR_ENDPOINT")]
    endpoint: Option<String>,

    #[arg(long, env = "EIDR_USER_ID")]
    user_id: Option<String>,

    #[arg(long, env = "EIDR_PARTY_ID")]
    party_id: Option<String>,

    /// Base64-encoded MD5 digest of the account password
    #[arg(long, env = "EIDR_PASSWORD_SHADOW", hide_env_values = true)]
    password_shadow: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check whether an identifier is well-formed
    Validate { id: String },

    /// Compile a JSON query to a registry expression (use `-` to read stdin)
    Compile { query: String },

    /// Resolve an identifier
    Resolve {
        id: String,

        /// Resolution type: Full, SelfDefined, Simple, Provenance, DOIKernel,
        /// AlternateIDs or LinkedAlternateIDs
        #[arg(short, long, default_value = "Full")]
        view: String,
    },

    /// Run a query (requires credentials)
    Query {
        /// JSON query (use `-` to read stdin)
        #[arg(required_unless_present = "expression", conflicts_with = "expression")]
        query: Option<String>,

        /// Raw registry expression instead of a JSON query
        #[arg(short, long)]
        expression: Option<String>,

        #[arg(short, long, default_value = "1")]
        page: u32,

        #[arg(short = 's', long)]
        page_size: Option<u32>,

        /// Only search descendants of this identifier
        #[arg(short, long)]
        root: Option<String>,

        /// Return identifiers only
        #[arg(short, long)]
        ids_only: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    match &args.command {
        Command::Validate { id } => {
            if id::validate(id) {
                println!("{id}: valid");
                Ok(())
            } else {
                anyhow::bail!("{id}: not a valid EIDR identifier")
            }
        }
        Command::Compile { query } => {
            let node = parse_query(query)?;
            println!("{}", eidr_query::compile(&node)?);
            Ok(())
        }
        Command::Resolve { id, view } => {
            let registry = Registry::from_config(&load_config(&args)?)?;
            let record = registry.resolve(id, view).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        Command::Query {
            query,
            expression,
            page,
            page_size,
            root,
            ids_only,
        } => {
            let query = match (expression, query) {
                (Some(expr), _) => Query::Expression(expr.clone()),
                (None, Some(json)) => Query::Structured(parse_query(json)?),
                (None, None) => anyhow::bail!("either a JSON query or --expression is required"),
            };
            let options = QueryOptions {
                page_number: *page,
                page_size: *page_size,
                root: root.clone(),
                ids_only: *ids_only,
            };
            let registry = Registry::from_config(&load_config(&args)?)?;
            let results = registry.query(query, &options).await?;
            println!("{}", serde_json::to_string_pretty(&results)?);
            Ok(())
        }
    }
}

fn load_config(args: &Args) -> anyhow::Result<ConnectorConfig> {
    let mut config = match &args.config {
        Some(path) => ConnectorConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ConnectorConfig::default(),
    };

    if let Some(endpoint) = &args.endpoint {
        config.endpoint = endpoint.clone();
    }
    if args.user_id.is_some() {
        config.credentials.user_id = args.user_id.clone();
    }
    if args.party_id.is_some() {
        config.credentials.party_id = args.party_id.clone();
    }
    if args.password_shadow.is_some() {
        config.credentials.password_shadow = args.password_shadow.clone();
    }
    config.validate()?;
    Ok(config)
}

fn parse_query(source: &str) -> anyhow::Result<QueryNode> {
    let text = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read query from stdin")?;
        buf
    } else {
        source.to_string()
    };
    let value: serde_json::Value = serde_json::from_str(&text).context("query is not valid JSON")?;
    Ok(QueryNode::from_json(&value)?)
}
