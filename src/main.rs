use clap::Parser;
use micro_signal::cli::{Cli, Commands};
use micro_signal::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // .env is optional
    dotenvy::dotenv().ok();

    // Load configuration
    let mut config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        Config::default()
    });
    config.apply_env_overrides();
    config.validate()?;

    // Initialize telemetry
    let _telemetry = micro_signal::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run(args) => {
            tracing::info!("Starting dry-run replay");
            args.execute(&config).await?;
        }
        Commands::Fit(args) => {
            tracing::info!("Starting one-shot fit");
            args.execute(&config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
