//! `querywright translate`: One-shot translation from the command line.

use querywright_config::AppConfig;
use querywright_core::message::ConversationTurn;
use querywright_gateway::HistoryEntry;
use querywright_translator::{TranslateRequest, TranslateResponse, Translator};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Prints the envelope on stdout. A failed translation is already described
/// there, so it only shows up in the exit status.
pub async fn run(
    utterance: String,
    history: Option<PathBuf>,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let translator = Translator::from_config(&config)?;

    let history = match history {
        Some(path) => load_history(&path)?,
        None => Vec::new(),
    };

    let response = translator
        .translate(TranslateRequest::new(utterance).with_history(history))
        .await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(ExitCode::from(exit_status(&response)))
}

fn exit_status(response: &TranslateResponse) -> u8 {
    match response {
        TranslateResponse::Success { .. } => 0,
        TranslateResponse::Failure { .. } => 1,
    }
}

/// Read prior turns from a JSON file in the same shape the HTTP API accepts.
pub fn load_history(path: &Path) -> Result<Vec<ConversationTurn>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read history file {}: {e}", path.display()))?;
    let entries: Vec<HistoryEntry> = serde_json::from_str(&content)
        .map_err(|e| format!("Invalid history file {}: {e}", path.display()))?;
    Ok(entries.into_iter().map(Into::into).collect())
}
