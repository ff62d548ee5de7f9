//! LLM 客户端抽象
//!
//! 所有后端（OpenAI 兼容 / Mock）实现 LlmClient；传输失败以 Err(String) 返回，
//! 由上层 Gateway 决定兜底策略。

use async_trait::async_trait;

use crate::memory::Message;

/// LLM 客户端 trait：一次非流式补全
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, messages: &[Message]) -> Result<String, String>;
}
