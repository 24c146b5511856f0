/// Environment variables holding the OpenRouter API key, in lookup order
pub const API_KEY_VARS: &[&str] = &["OPEN_ROUTER_API_KEY", "OPENROUTER_API_KEY"];

/// Environment variables naming the model, in lookup order
pub const MODEL_VARS: &[&str] = &["OPEN_ROUTER_MODEL", "HAYAGRIVA_LLM_MODEL"];

/// Environment variable overriding the chat-completion endpoint
pub const ENDPOINT_VAR: &str = "HAYAGRIVA_LLM_API_URL";

/// Reads an environment variable, treating blank values as unset
pub fn get_env_value(key: &str) -> Option<String> {
    let value = std::env::var(key).ok()?;
    if value.trim().is_empty() {
        None
    } else {
        Some(value.trim().to_string())
    }
}

/// First non-blank value among `keys`
pub fn first_env_value(keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| get_env_value(key))
}
