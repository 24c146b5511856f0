#![allow(dead_code)]

use std::path::Path;

use hayagriva_llm::config::LlmSettings;
use serde_json::{json, Value};

pub mod test_helpers {
    use super::*;

    /// Path the mock server answers chat completions on
    pub const COMPLETIONS_PATH: &str = "/api/v1/chat/completions";

    pub fn setup_test_logger() {
        let _ = env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .is_test(true)
            .try_init();
    }

    /// Settings pointing at a mockito server
    pub fn mock_settings(server_url: &str) -> LlmSettings {
        LlmSettings {
            api_key: Some("sk-or-test".to_string()),
            endpoint: format!("{}{}", server_url, COMPLETIONS_PATH),
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Chat-completion response body whose message content is `content`
    pub fn chat_body(content: &str) -> String {
        json!({
            "id": "gen-test",
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })
        .to_string()
    }

    /// Chat-completion response body carrying `value` as compact JSON text
    pub fn chat_json(value: &Value) -> String {
        chat_body(&value.to_string())
    }

    pub fn write_manifest(dir: &Path, manifest: &Value) {
        std::fs::write(dir.join("package.json"), manifest.to_string()).expect("write package.json");
    }

    pub fn read_json(path: &Path) -> Value {
        let raw = std::fs::read_to_string(path).expect("read json");
        serde_json::from_str(&raw).expect("parse json")
    }
}
