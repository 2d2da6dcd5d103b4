//! Handler for the credential-gated chat session.

use std::io::Write;

use crate::api::ApiClient;
use crate::auth::{require_credential, FileCredentialStore};
use crate::config::AppConfig;
use crate::error::CoremindError;
use crate::llm::{ChatMessage, GeminiClient};

use super::{ChatArgs, CommandOutcome};

/// Handle `coremind chat`.
///
/// The gate is the same as `whoami`: a live stored credential that the
/// backend still recognizes. The transcript lives in memory for the duration
/// of the session only.
pub async fn handle_chat(
    config: &AppConfig,
    args: &ChatArgs,
) -> Result<CommandOutcome, CoremindError> {
    let store = FileCredentialStore::new(config.config_dir.clone());
    let credential = require_credential(&store)?;

    let api = ApiClient::new(args.server_url.as_deref().unwrap_or(&config.server_url));
    let identity = api.fetch_identity(&credential).await?;
    println!("Welcome back, {}!", identity.user.name);

    let api_key = config.gemini_api_key.as_deref().ok_or_else(|| {
        CoremindError::Configuration("GEMINI_API_KEY is required for chat".to_string())
    })?;
    let model = args.model.as_deref().unwrap_or(&config.model);
    let client = GeminiClient::new(api_key, model);

    println!("Chatting with {model}. Type 'exit' to leave.");
    let mut transcript: Vec<ChatMessage> = Vec::new();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        let read = std::io::stdin().read_line(&mut line)?;
        if read == 0 {
            // EOF
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }

        transcript.push(ChatMessage::user(line));
        let reply = client.generate(&transcript).await?;
        println!("{reply}\n");
        transcript.push(ChatMessage::model(reply));
    }

    println!("Bye!");
    Ok(CommandOutcome::Success)
}
