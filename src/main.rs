use anyhow::Result;
use authgate::{config::Config, gateway, users::hash_password};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "authgate")]
#[command(about = "HTTP API gateway with Basic and session-cookie authentication")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP gateway
    Serve {
        /// Address to bind (overrides config and API_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config and API_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Config file (default: platform config dir)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the SHA-256 digest stored for a password
    HashPassword {
        plaintext: String,
    },

    /// Print the effective configuration as TOML
    Config {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port, config } => {
            let mut config = Config::load(config.as_deref())?;
            if let Some(host) = host {
                config.gateway.host = host;
            }
            if let Some(port) = port {
                config.gateway.port = port;
            }
            gateway::run_gateway(config).await
        }
        Commands::HashPassword { plaintext } => {
            println!("{}", hash_password(&plaintext));
            Ok(())
        }
        Commands::Config { config } => {
            let config = Config::load(config.as_deref())?;
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}
