use clap::Parser;
use fieldsql::{config, server};

/// fieldsql - Turn plain-language data requests into SQL over a field mapping catalog
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// HTTP server host address (overrides FIELDSQL_HOST)
    #[arg(long)]
    http_host: Option<String>,

    /// HTTP server port (overrides FIELDSQL_PORT)
    #[arg(long)]
    http_port: Option<u16>,

    /// Path to the field mapping CSV (overrides CSV_PATH)
    #[arg(long = "csv")]
    csv_path: Option<String>,

    /// Minimum match score, 0-100 (overrides MATCH_THRESHOLD)
    #[arg(long)]
    match_threshold: Option<f64>,

    /// Maximum matched fields per query (overrides MAX_MATCHES)
    #[arg(long)]
    max_matches: Option<usize>,

    /// Expand keywords with near-spellings found in field descriptions
    #[arg(long = "fuzzy")]
    fuzzy_matching: bool,

    /// Read configuration from a YAML file instead of the environment
    #[arg(long)]
    config: Option<String>,
}

impl From<Cli> for config::CliConfig {
    fn from(cli: Cli) -> Self {
        config::CliConfig {
            config_file: cli.config,
            http_host: cli.http_host,
            http_port: cli.http_port,
            csv_path: cli.csv_path,
            match_threshold: cli.match_threshold,
            max_matches: cli.max_matches,
            fuzzy_matching: cli.fuzzy_matching,
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize logger - defaults to INFO level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    println!("\nfieldsql v{}\n", env!("CARGO_PKG_VERSION"));

    let cli_config: config::CliConfig = cli.into();
    let config = match config::ServerConfig::from_cli(cli_config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    server::run_with_config(config).await;
}
