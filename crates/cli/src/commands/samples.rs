//! `querywright samples`: Smoke-test the configured backend with canned utterances.

use querywright_config::AppConfig;
use querywright_translator::{TranslateRequest, TranslateResponse, Translator};

pub const SAMPLE_UTTERANCES: &[&str] = &[
    "Find all alumni working at Google",
    "Show me upcoming events",
    "Get all photos from event E1001",
    "Find alumni who graduated in 2024",
    "Show me all reservations for the networking gala",
];

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let translator = Translator::from_config(&config)?;

    println!(
        "Testing {} / {} with {} samples...",
        translator.generator().provider_name(),
        translator.generator().model(),
        SAMPLE_UTTERANCES.len()
    );

    let mut failures = 0;
    for utterance in SAMPLE_UTTERANCES {
        println!();
        println!("Query:   {utterance}");
        match translator.translate(TranslateRequest::new(*utterance)).await {
            TranslateResponse::Success { result, .. } => println!("GraphQL: {result}"),
            TranslateResponse::Failure { error, .. } => {
                failures += 1;
                println!("Error:   {error}");
            }
        }
    }

    println!();
    if failures > 0 {
        return Err(format!("{failures} of {} samples failed", SAMPLE_UTTERANCES.len()).into());
    }
    println!("All samples translated.");
    Ok(())
}
