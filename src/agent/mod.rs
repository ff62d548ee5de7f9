//! Agent 运行时
//!
//! 供上层瘦请求层（HTTP / CLI）调用的无界面逻辑：create_agent_components 从配置
//! 构建 Gateway / 执行器 / 画像存储 / 会话存储（显式上下文对象，不做进程级单例），
//! handle_chat_turn 对单条用户输入跑编排循环并返回结构化的 TurnResponse——
//! 永远是 {status, tool_name, data}，不向外抛裸错误。

pub mod classify;
pub mod loop_;
pub mod prompt;
pub mod summarize;
pub mod translate;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;

pub use classify::{classify_reply, ReplyClass, FINAL_ANSWER_MARKER};
pub use loop_::{run_turn, TurnResult, MAX_PLAN_STEPS};
pub use summarize::summarize_result;
pub use translate::{parse_tool_invocation, ParsedCommand, ReplyTextRequest, ToolInvocation};

use crate::calendar::{CalendarExecutor, GoogleCalendarClient};
use crate::config::AppConfig;
use crate::core::AgentError;
use crate::llm::{create_llm_from_config, LlmGateway};
use crate::memory::SessionStore;
use crate::profile::FileProfileStore;

/// 预构建的 Agent 组件：Gateway、日历执行器、画像存储、会话存储，多会话共享
pub struct AgentComponents {
    pub gateway: LlmGateway,
    pub executor: CalendarExecutor,
    pub profiles: FileProfileStore,
    pub sessions: SessionStore,
}

/// 从配置创建 Agent 组件（LLM、日历客户端、画像目录、会话参数）
pub fn create_agent_components(cfg: &AppConfig) -> AgentComponents {
    let llm = create_llm_from_config(cfg);
    let calendar = Arc::new(GoogleCalendarClient::new(&cfg.calendar));
    AgentComponents {
        gateway: LlmGateway::new(llm),
        executor: CalendarExecutor::new(calendar, cfg.calendar.max_results),
        profiles: FileProfileStore::new(&cfg.profiles.dir),
        sessions: SessionStore::new(cfg.app.max_context_turns, cfg.app.session_timeout_secs),
    }
}

/// 轮次状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnStatus {
    Success,
    Error,
}

/// 对外的轮次结果：成功时 data 为 {"text": ...}，失败时为结构化错误负载
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnResponse {
    pub status: TurnStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    pub data: serde_json::Value,
}

impl TurnResponse {
    fn success(text: String) -> Self {
        Self {
            status: TurnStatus::Success,
            tool_name: Some("reply_text".to_string()),
            data: json!({ "text": text }),
        }
    }

    fn error(err: &AgentError) -> Self {
        let mut payload = json!({
            "error_kind": err.kind(),
            "message": err.to_string(),
        });
        if let AgentError::Validation { fields, .. } = err {
            payload["fields"] = json!(fields);
        }
        Self {
            status: TurnStatus::Error,
            tool_name: None,
            data: payload,
        }
    }
}

/// 处理单条用户消息：取或建会话、串行化该会话的轮次、跑编排循环。
/// 记忆只在成功终结路径写回；出错（含步数超限）时丢弃本轮新增消息。
pub async fn handle_chat_turn(
    components: &AgentComponents,
    user_key: &str,
    user_message: &str,
) -> TurnResponse {
    let session = match components
        .sessions
        .get_or_create(user_key, &components.profiles)
        .await
    {
        Ok(s) => s,
        Err(e) => return TurnResponse::error(&e),
    };

    // 同一会话的并发轮次在这里排队；不同会话互不阻塞
    let mut memory = session.memory.lock().await;
    let mut working = memory.clone();

    match run_turn(
        &components.gateway,
        &components.executor,
        &mut working,
        &session.profile,
        user_message,
    )
    .await
    {
        Ok(turn) => {
            *memory = working;
            session.touch();
            TurnResponse::success(turn.response)
        }
        Err(e) => {
            tracing::warn!(user = user_key, error = %e, "chat turn aborted");
            TurnResponse::error(&e)
        }
    }
}
