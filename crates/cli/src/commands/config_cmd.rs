//! `querywright config`: Configuration management commands.

use querywright_config::AppConfig;

pub fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("Validating configuration...");

    match AppConfig::load() {
        Ok(config) => {
            println!("   OK  Config parsed successfully");

            let warnings = warnings_for(&config);
            if warnings.is_empty() {
                println!("   OK  All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   WARN  {w}");
                }
            }

            println!();
            println!("   Provider:  {}", config.default_provider);
            println!("   Model:     {}", config.default_model);
            println!("   Timeout:   {}s", config.translator.request_timeout_secs);
            println!("   History:   {} turns", config.translator.history_window);
            println!(
                "   Gateway:   {}:{}",
                config.gateway.host, config.gateway.port
            );
        }
        Err(e) => {
            println!("   ERROR  Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

/// Non-fatal problems worth pointing out.
fn warnings_for(config: &AppConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    let needs_key = !matches!(
        config.default_provider.as_str(),
        "ollama" | "ollama-openai" | "vllm" | "llamacpp" | "llama.cpp"
    );
    let provider_key = config
        .providers
        .get(&config.default_provider)
        .is_some_and(|p| p.api_key.is_some());
    if needs_key && !config.has_api_key() && !provider_key {
        warnings.push(format!(
            "No API key for provider '{}' (set QUERYWRIGHT_API_KEY or OPENROUTER_API_KEY)",
            config.default_provider
        ));
    }

    if config.translator.request_timeout_secs == 0 {
        warnings.push("translator.request_timeout_secs is 0; every request will time out".into());
    }

    if config.gateway.host == "0.0.0.0" && config.gateway.cors_origins.is_empty() {
        warnings.push("Gateway bound to 0.0.0.0 with CORS open to any origin".into());
    }

    warnings
}

pub fn show() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let mut shown = config.clone();
    if shown.api_key.is_some() {
        shown.api_key = Some("***".into());
    }
    for provider in shown.providers.values_mut() {
        if provider.api_key.is_some() {
            provider.api_key = Some("***".into());
        }
    }
    let toml_str = toml::to_string_pretty(&shown)?;
    println!("{toml_str}");
    Ok(())
}

pub fn path() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_dir().join("config.toml");
    println!("{}", config_path.display());
    Ok(())
}
