use clap::Parser;
use vol_spike::cli::{print_config, Cli, Commands};
use vol_spike::config::Config;

const DEFAULT_CONFIG: &str = include_str!("../config.toml.example");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using default configuration");
            toml::from_str(DEFAULT_CONFIG)?
        }
    };
    config.apply_env()?;
    config.validate()?;

    // Initialize telemetry
    let _telemetry = vol_spike::telemetry::init_telemetry(&config.telemetry)?;

    if config.filter.strict_list_enabled && !config.filter.strict_list_path.exists() {
        tracing::warn!(
            path = %config.filter.strict_list_path.display(),
            "Strict list enabled but file not found, run `vol-spike strict-list` to create it"
        );
    }

    match cli.command {
        Commands::Run(args) => {
            args.execute(&config).await?;
        }
        Commands::Once(args) => {
            args.execute(&config).await?;
        }
        Commands::StrictList(args) => {
            args.execute(&config).await?;
        }
        Commands::Config => {
            print_config(&config);
        }
    }

    Ok(())
}
