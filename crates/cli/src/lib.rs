pub mod commands;
pub mod render;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use sellpoint_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat, LoggingConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{warn, Level};

#[derive(Debug, Parser)]
#[command(
    name = "sellpoint",
    about = "Product selling-point lookup with category insights",
    long_about = "Look up static selling points for a manufacturer's product and fetch category insights through the knowledge-query proxy, falling back to the local knowledge base when the proxy is unavailable.",
    after_help = "Examples:\n  sellpoint manufacturers\n  sellpoint lookup --manufacturer 重庆药友 --product '阿拓莫兰 谷胱甘肽片 36片'\n  sellpoint insight 抗生素 --json --timeout-secs 5\n  printf '达仁堂\\t达仁堂 速效救心丸 120丸\\n' | sellpoint session"
)]
pub struct Cli {
    #[arg(long, global = true, value_name = "PATH", help = "Read configuration from this file (must exist)")]
    config: Option<PathBuf>,
    #[arg(long, global = true, value_name = "URL", help = "Override remote.endpoint")]
    endpoint: Option<String>,
    #[arg(long, global = true, value_name = "SECS", help = "Override remote.timeout_secs")]
    timeout_secs: Option<u64>,
    #[arg(long, global = true, value_name = "PATH", help = "Override catalog.path")]
    catalog: Option<PathBuf>,
    #[arg(long, global = true, value_name = "LEVEL", help = "Override logging.level")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "List manufacturers in catalog order")]
    Manufacturers,
    #[command(about = "List the products of one manufacturer")]
    Products { manufacturer: String },
    #[command(about = "Show a product's selling points and its category insights")]
    Lookup {
        #[arg(long)]
        manufacturer: String,
        #[arg(long)]
        product: String,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Resolve category insights for a single category")]
    Insight {
        category: String,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(
        about = "Read `manufacturer<TAB>product` lines from stdin, sharing one insight cache"
    )]
    Session {
        #[arg(long, help = "Emit machine-readable JSON output when input closes")]
        json: bool,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution"
    )]
    Config,
    #[command(about = "Validate config, catalog and insight client readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

impl Cli {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                remote_endpoint: self.endpoint.clone(),
                remote_timeout_secs: self.timeout_secs,
                catalog_path: self.catalog.clone(),
                log_level: self.log_level.clone(),
            },
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = cli.load_options();
    let loaded = AppConfig::load(options.clone());

    let logging = match &loaded {
        Ok(config) => config.logging.clone(),
        Err(_) => AppConfig::default().logging,
    };
    if let Err(error) = init_logging(&logging) {
        eprintln!("logging disabled: {error}");
    }
    if let Err(error) = &loaded {
        warn!(event_name = "cli.config.invalid", error = %error, "configuration failed to load");
    }

    let result = match cli.command {
        Command::Manufacturers => commands::catalog::manufacturers(&loaded),
        Command::Products { manufacturer } => commands::catalog::products(&loaded, &manufacturer),
        Command::Lookup { manufacturer, product, json } => {
            commands::lookup::run(&loaded, &manufacturer, &product, json)
        }
        Command::Insight { category, json } => commands::insight::run(&loaded, &category, json),
        Command::Session { json } => commands::session::run(&loaded, json),
        Command::Config => commands::config::run(&loaded, &options),
        Command::Doctor { json } => commands::doctor::run(&loaded, json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let log_level = logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    let installed = match logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    installed.map_err(|error| anyhow!(error))
}
