//! LLM 层：客户端抽象、OpenAI 兼容实现、Mock 与带兜底的 Gateway

pub mod gateway;
pub mod mock;
pub mod openai;
pub mod traits;

use std::sync::Arc;

pub use gateway::{LlmGateway, COMPLETION_FALLBACK};
pub use mock::{EchoLlmClient, ScriptedLlmClient};
pub use openai::OpenAiClient;
pub use traits::LlmClient;

use crate::config::AppConfig;

/// 从配置创建 LLM 客户端：有 API Key 走 OpenAI 兼容端点，否则用回显 Mock（离线联调）
pub fn create_llm_from_config(cfg: &AppConfig) -> Arc<dyn LlmClient> {
    let api_key = cfg
        .llm
        .api_key
        .clone()
        .or_else(|| std::env::var("OPENAI_API_KEY").ok());

    match api_key {
        Some(key) => Arc::new(OpenAiClient::new(
            cfg.llm.base_url.as_deref(),
            &cfg.llm.model,
            Some(&key),
            cfg.llm.temperature,
            cfg.llm.max_tokens,
        )),
        None => {
            tracing::warn!("no API key configured, falling back to echo mock client");
            Arc::new(EchoLlmClient)
        }
    }
}
