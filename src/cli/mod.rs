//! CLI surface for coremind.

pub mod auth;
pub mod chat;

#[cfg(feature = "server")]
pub mod serve;

use clap::{Parser, Subcommand};

/// How a command finished, short of an error.
///
/// `Cancelled` covers user-initiated aborts (declined prompts, Ctrl-C during
/// login); both variants exit 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommandOutcome {
    Success,
    Cancelled,
}

/// Coremind CLI
#[derive(Parser, Debug)]
#[command(name = "coremind", version, about = "Device-login CLI with an AI chat session")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in via the device authorization flow
    Login(LoginArgs),
    /// Remove the stored credential
    Logout,
    /// Show the identity bound to the stored credential
    Whoami(WhoamiArgs),
    /// Chat with the AI (requires login)
    Chat(ChatArgs),
    /// Run the demo session endpoint
    #[cfg(feature = "server")]
    Serve(ServeArgs),
}

/// Arguments for `coremind login`.
#[derive(Parser, Debug)]
pub struct LoginArgs {
    /// Identity server base URL
    #[arg(long)]
    pub server_url: Option<String>,

    /// OAuth client id
    #[arg(long)]
    pub client_id: Option<String>,
}

/// Arguments for `coremind whoami`.
#[derive(Parser, Debug)]
pub struct WhoamiArgs {
    /// Identity server base URL
    #[arg(long)]
    pub server_url: Option<String>,
}

/// Arguments for `coremind chat`.
#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// Identity server base URL
    #[arg(long)]
    pub server_url: Option<String>,

    /// Model to chat with
    #[arg(short, long)]
    pub model: Option<String>,
}

/// Arguments for `coremind serve`.
#[cfg(feature = "server")]
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:5000")]
    pub listen: std::net::SocketAddr,
}
