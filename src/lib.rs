//! Billa - 会话式日程助理
//!
//! 模块划分：
//! - **agent**: 编排循环（规划 -> 分类 -> 工具翻译 -> 执行 -> 观察折叠）与对外的 handle_chat_turn
//! - **calendar**: 日历动作执行器与 Google Calendar v3 客户端（CalendarApi trait）
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 错误分类（AgentError）
//! - **llm**: LLM 客户端抽象与实现（OpenAI 兼容 / Mock）、带兜底的 Gateway
//! - **memory**: 会话记忆（按用户键隔离的对话历史）
//! - **profile**: 用户画像加载（名字、时区、工作时间、优先级）

pub mod agent;
pub mod calendar;
pub mod config;
pub mod core;
pub mod llm;
pub mod memory;
pub mod observability;
pub mod profile;

pub use agent::{handle_chat_turn, AgentComponents, TurnResponse, TurnStatus};
pub use core::AgentError;
