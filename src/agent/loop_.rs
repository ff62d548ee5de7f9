//! 编排循环
//!
//! 每条用户消息一个实例：PLANNING -> {FINAL, TOOL_DETECTED, CONTINUE}，
//! 最多 MAX_PLAN_STEPS 轮规划。规划角色带全量历史推理意图；命中触发短语后
//! 由翻译角色（只拿规划回复，不带历史）产出工具 JSON，经校验、执行、裁剪后
//! 以 OBSERVATION 折叠回记忆，再回到规划。工具路径上的任何错误立即中止
//! 整轮并上报——不做部分成功汇报，也不在循环内重试。

use chrono::Utc;

use crate::agent::classify::{classify_reply, ReplyClass};
use crate::agent::prompt::{planner_system_prompt, translator_system_prompt};
use crate::agent::summarize::summarize_result;
use crate::agent::translate::{parse_tool_invocation, ParsedCommand, ToolInvocation};
use crate::calendar::CalendarExecutor;
use crate::core::AgentError;
use crate::llm::LlmGateway;
use crate::memory::{ConversationMemory, Message};
use crate::profile::UserProfile;

/// 单条用户消息内的最大规划轮数，防止死循环
pub const MAX_PLAN_STEPS: usize = 5;

/// 一轮对话的结果：给用户的最终回答
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnResult {
    pub response: String,
}

/// 执行一轮对话。调用方负责会话级串行与成功路径上的记忆写回。
pub async fn run_turn(
    gateway: &LlmGateway,
    executor: &CalendarExecutor,
    memory: &mut ConversationMemory,
    profile: &UserProfile,
    user_message: &str,
) -> Result<TurnResult, AgentError> {
    memory.push(Message::user(user_message));

    let now = Utc::now();
    let planner_system = planner_system_prompt(profile, now);
    let translator_system = translator_system_prompt(profile, now);

    for step in 0..MAX_PLAN_STEPS {
        // PLANNING：全量历史
        let reply = gateway.complete(&planner_system, memory.messages()).await;
        memory.push(Message::assistant(reply.clone()));

        match classify_reply(&reply) {
            ReplyClass::Final(answer) => {
                tracing::debug!(step, "planning reply carries final marker");
                return Ok(TurnResult { response: answer });
            }
            ReplyClass::PlainAnswer => {
                // 兜底终结路径：无标记、无触发短语，回复本身即回答
                tracing::debug!(step, "planning reply terminates as plain answer");
                return Ok(TurnResult { response: reply });
            }
            ReplyClass::ToolIntent => {
                // TOOL_DETECTED：翻译角色只拿规划回复，不带累计历史
                let command = gateway
                    .complete(&translator_system, &[Message::user(reply.clone())])
                    .await;

                let invocation = match parse_tool_invocation(&command)? {
                    // 翻译角色没有产出 JSON：按终结性自由文本收尾
                    ParsedCommand::FreeText(text) => {
                        return Ok(TurnResult { response: text });
                    }
                    ParsedCommand::Invocation(inv) => inv,
                };

                if let ToolInvocation::ReplyText(reply) = invocation {
                    return Ok(TurnResult {
                        response: reply.text,
                    });
                }

                let tool_name = invocation.tool_name();
                let result = execute_calendar_tool(executor, &invocation).await?;
                let observation = summarize_result(tool_name, &result);
                memory.push(Message::assistant(format!(
                    "OBSERVATION: {observation}"
                )));
                tracing::debug!(step, tool = tool_name, "observation folded into memory");
                // CONTINUE：回到规划
            }
        }
    }

    Err(AgentError::BudgetExceeded(MAX_PLAN_STEPS))
}

/// 把一条已校验的日历工具调用派发给执行器，统一返回 JSON 结果
async fn execute_calendar_tool(
    executor: &CalendarExecutor,
    invocation: &ToolInvocation,
) -> Result<serde_json::Value, AgentError> {
    match invocation {
        ToolInvocation::CreateEvent(req) => {
            let created = executor.create_event(req).await?;
            Ok(serde_json::to_value(created).expect("event result serializes"))
        }
        ToolInvocation::FindEvent(req) => {
            let found = executor.find_events(req).await?;
            Ok(serde_json::to_value(found).expect("event results serialize"))
        }
        ToolInvocation::UpdateEvent(req) => {
            let updated = executor.update_event(req).await?;
            Ok(serde_json::to_value(updated).expect("event result serializes"))
        }
        ToolInvocation::DeleteEvent(req) => executor.delete_event(req).await,
        // reply_text 在循环里已经短路，不会走到执行器
        ToolInvocation::ReplyText(reply) => {
            Ok(serde_json::json!({ "text": reply.text }))
        }
    }
}
