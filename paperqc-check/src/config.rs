//! Configuration resolution for paperqc-check
//!
//! The AI reviewer is optional: when no API key is configured the service
//! runs with best-effort AI steps disabled and every check still completes.

use paperqc_common::config::TomlConfig;
use tracing::{info, warn};

/// Resolved AI reviewer settings
#[derive(Debug, Clone)]
pub struct AiSettings {
    pub api_key: String,
    pub api_url: Option<String>,
    pub model: Option<String>,
}

/// Resolve AI reviewer settings with ENV → TOML priority.
///
/// Returns None when no usable API key is configured anywhere.
pub fn resolve_ai_settings(toml_config: &TomlConfig) -> Option<AiSettings> {
    // Tier 1: environment variables
    if let Ok(key) = std::env::var("PAPERQC_AI_API_KEY") {
        if is_valid_key(&key) {
            info!("AI API key loaded from environment variable");
            return Some(AiSettings {
                api_key: key,
                api_url: std::env::var("PAPERQC_AI_API_URL").ok(),
                model: std::env::var("PAPERQC_AI_MODEL").ok(),
            });
        }
        warn!("PAPERQC_AI_API_KEY is set but empty, ignoring");
    }

    // Tier 2: TOML config
    if let Some(ai) = &toml_config.ai {
        if is_valid_key(&ai.api_key) {
            info!("AI API key loaded from TOML config");
            return Some(AiSettings {
                api_key: ai.api_key.clone(),
                api_url: ai.api_url.clone(),
                model: ai.model.clone(),
            });
        }
    }

    info!("No AI API key configured, AI review steps disabled");
    None
}

/// Validate API key (non-empty, non-whitespace)
fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
