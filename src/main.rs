//! Coremind CLI binary entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use coremind::cli::{self, Cli, Commands};
use coremind::config::AppConfig;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load();

    let result = match cli.command {
        Commands::Login(args) => cli::auth::handle_login(&config, &args).await,
        Commands::Logout => cli::auth::handle_logout(&config),
        Commands::Whoami(args) => cli::auth::handle_whoami(&config, &args).await,
        Commands::Chat(args) => cli::chat::handle_chat(&config, &args).await,
        #[cfg(feature = "server")]
        Commands::Serve(args) => cli::serve::handle_serve(&args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
