//! Language Model Gateway
//!
//! 拼 [system] + history 调用底层客户端并去除首尾空白。传输/服务失败不向上传播，
//! 而是返回固定兜底文案：兜底文案里没有 JSON、也没有任何触发短语，
//! 编排循环会把它当作终结性自由文本，循环得以优雅收尾（代价是该轮工具意图识别静默降级）。

use std::sync::Arc;

use crate::llm::LlmClient;
use crate::memory::Message;

/// 上游补全失败时返回给用户的固定文案
pub const COMPLETION_FALLBACK: &str = "Oh, honey! My antennae are a bit fuzzy right now. \
I couldn't connect to the hive. Please try again later.";

/// Gateway：持有 LLM 客户端，complete 永不失败
pub struct LlmGateway {
    llm: Arc<dyn LlmClient>,
}

impl LlmGateway {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// 以给定 system prompt 与历史调用 LLM；失败时返回 COMPLETION_FALLBACK
    pub async fn complete(&self, system: &str, history: &[Message]) -> String {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(Message::system(system));
        messages.extend_from_slice(history);

        match self.llm.complete(&messages).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "completion backend failed, returning fallback text");
                COMPLETION_FALLBACK.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ScriptedLlmClient;

    #[tokio::test]
    async fn test_complete_strips_whitespace() {
        let gateway = LlmGateway::new(Arc::new(ScriptedLlmClient::new(["  hi there \n"])));
        let out = gateway.complete("sys", &[Message::user("hello")]).await;
        assert_eq!(out, "hi there");
    }

    #[tokio::test]
    async fn test_failure_returns_fallback() {
        // 空脚本：第一次调用即失败
        let gateway = LlmGateway::new(Arc::new(ScriptedLlmClient::new(Vec::<String>::new())));
        let out = gateway.complete("sys", &[Message::user("hello")]).await;
        assert_eq!(out, COMPLETION_FALLBACK);
    }
}
