//! Entry point for the `deploy` command.
//!
//! Loads the deployment configuration, publishes the configured contract to
//! the selected network and prints `deployed to 0x...` on success. Logs go
//! to stderr so stdout carries only the result line.

use clap::Parser;
use deployer_config::Config;
use std::path::PathBuf;
use std::process::ExitCode;

/// Command-line arguments for the deployer.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Network to deploy to, as named in the configuration file
	#[arg(short, long)]
	network: Option<String>,

	/// Path to the configuration file
	#[arg(short, long, env = "DEPLOYER_CONFIG", default_value = "config/ganache.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

#[tokio::main]
async fn main() -> ExitCode {
	let _ = dotenvy::dotenv();
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	fmt()
		.with_env_filter(env_filter)
		.with_target(true)
		.with_writer(std::io::stderr)
		.init();

	let outcome = deploy(&args).await;
	ExitCode::from(deployer_service::report(
		&outcome,
		&mut std::io::stdout(),
		&mut std::io::stderr(),
	))
}

async fn deploy(
	args: &Args,
) -> Result<deployer_types::DeploymentResult, Box<dyn std::error::Error>> {
	tracing::info!("Loading configuration from file: {:?}", args.config);
	let config = Config::from_file(&args.config).await?;

	let result = deployer_service::run(&config, args.network.as_deref()).await?;
	Ok(result)
}
