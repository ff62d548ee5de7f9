//! Agent 错误类型
//!
//! 传播策略：LLM 传输失败由 Gateway 就地兜底（见 llm::gateway），永远不会成为 AgentError；
//! 其余错误（参数校验、未知工具、日历服务、步数超限）立即中止当前轮次并原样上报调用方。

use thiserror::Error;

use crate::calendar::CalendarError;

/// 编排循环运行过程中可能出现的错误（校验、未知工具、日历服务、步数超限等）
#[derive(Error, Debug)]
pub enum AgentError {
    /// 工具参数缺失或格式错误，携带逐字段说明
    #[error("Invalid parameters for tool '{tool}': {}", .fields.join("; "))]
    Validation { tool: String, fields: Vec<String> },

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error(transparent)]
    Calendar(#[from] CalendarError),

    /// 步数预算耗尽：提示用户重试，而不是无限循环
    #[error("Took too many steps ({0}) without reaching an answer, please try again")]
    BudgetExceeded(usize),

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl AgentError {
    /// 稳定的错误种类标识，用于对外错误负载的 error_kind 字段
    pub fn kind(&self) -> &'static str {
        match self {
            AgentError::Validation { .. } => "validation_error",
            AgentError::UnknownTool(_) => "unknown_tool",
            AgentError::Calendar(_) => "calendar_error",
            AgentError::BudgetExceeded(_) => "budget_exceeded",
            AgentError::ProfileNotFound(_) => "profile_not_found",
            AgentError::Config(_) => "config_error",
        }
    }
}
